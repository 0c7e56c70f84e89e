//! # Placement Module
//!
//! Constraint-based entity placement over generated terrain.
//!
//! Placement is sequential by nature: every accepted position changes the
//! distance landscape for the candidates that follow, so requests are
//! processed strictly in order and the Player is always handled first: its
//! spawn anchors the `max_distance_from_player` constraint of every later
//! request.
//!
//! Each entity instance gets a bounded resampling budget
//! ([`crate::config::MAX_PLACEMENT_ATTEMPTS`]); when the budget runs out the
//! instance is skipped and placement moves on. Under-placement is a normal,
//! reportable outcome, never an error here: a request for `count = N` may
//! legitimately yield fewer than `N` entities on cramped or disconnected
//! terrain. The validator surfaces suspicious ratios as warnings.

use crate::config::{MAX_PLACEMENT_ATTEMPTS, TOURNAMENT_SIZE};
use crate::level::Entity;
use crate::map::{Position, TileMap};
use crate::rng::GenRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chebyshev radius of the box sampled around a cluster anchor.
const CLUSTER_RADIUS: i32 = 4;

/// What a placed entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Item,
    PowerUp,
    Npc,
    Exit,
    Checkpoint,
    Obstacle,
    Trigger,
}

impl EntityKind {
    /// Kinds the validator expects to be reachable from a spawn point.
    pub fn must_be_reachable(self) -> bool {
        matches!(self, EntityKind::Exit | EntityKind::Checkpoint)
    }
}

/// Heuristic governing where candidate positions are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Uniform over all walkable tiles
    Random,
    /// Near the most recently placed entity of the same kind
    Clustered,
    /// Biased toward maximizing separation from everything placed so far
    Spread,
    /// Walkable tiles touching at least one non-walkable neighbor
    NearWalls,
    /// Biased toward the grid centroid
    Center,
    /// Biased away from the player spawn
    FarFromPlayer,
}

/// One batch of entities to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPlacementRequest {
    /// Kind of entity to place
    pub kind: EntityKind,
    /// Desired number of instances; placement may yield fewer
    pub count: u32,
    /// Minimum Euclidean distance to every other placed entity
    #[serde(default)]
    pub min_distance: f64,
    /// Upper bound on the distance to the player spawn; `None` is unbounded
    #[serde(default)]
    pub max_distance_from_player: Option<f64>,
    /// Candidate sampling heuristic
    #[serde(default = "default_strategy")]
    pub strategy: PlacementStrategy,
    /// Opaque payload copied onto every placed instance
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

fn default_strategy() -> PlacementStrategy {
    PlacementStrategy::Random
}

impl EntityPlacementRequest {
    /// Creates an unconstrained request with the `random` strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use levelforge::{EntityKind, EntityPlacementRequest, PlacementStrategy};
    ///
    /// let request = EntityPlacementRequest::new(EntityKind::Enemy, 5);
    /// assert_eq!(request.count, 5);
    /// assert_eq!(request.strategy, PlacementStrategy::Random);
    /// assert!(request.max_distance_from_player.is_none());
    /// ```
    pub fn new(kind: EntityKind, count: u32) -> Self {
        Self {
            kind,
            count,
            min_distance: 0.0,
            max_distance_from_player: None,
            strategy: PlacementStrategy::Random,
            properties: HashMap::new(),
        }
    }
}

/// Requested-versus-placed tally for one processed request.
///
/// Recorded into the level metadata so the validator can flag requests whose
/// constraints made most of their instances unplaceable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub kind: EntityKind,
    pub strategy: PlacementStrategy,
    pub requested: u32,
    pub placed: u32,
}

/// Places entities for every request over the given terrain.
///
/// Processing order: the first Player request runs first (one is synthesized
/// with `count = 1` and the `random` strategy when the config has none), then
/// the remaining requests in config order. Returns the placed entities in
/// placement order together with one [`PlacementOutcome`] per processed
/// request. Never fails; an all-wall map simply yields no entities.
pub fn place(
    terrain: &TileMap,
    requests: &[EntityPlacementRequest],
    seed: u64,
) -> (Vec<Entity>, Vec<PlacementOutcome>) {
    let ordered = processing_order(requests);
    let mut placer = Placer::new(terrain, seed);

    let mut entities = Vec::new();
    let mut outcomes = Vec::with_capacity(ordered.len());

    for request in &ordered {
        let mut placed = 0;
        for _ in 0..request.count {
            let Some(position) = placer.try_place(request) else {
                continue;
            };
            entities.push(Entity {
                id: entities.len() as u32,
                kind: request.kind,
                position,
                properties: request.properties.clone(),
            });
            placed += 1;
        }

        log::debug!(
            "placed {placed}/{} {:?} entities with {:?}",
            request.count,
            request.kind,
            request.strategy
        );
        outcomes.push(PlacementOutcome {
            kind: request.kind,
            strategy: request.strategy,
            requested: request.count,
            placed,
        });
    }

    (entities, outcomes)
}

/// Moves the first Player request to the front, synthesizing one if absent.
fn processing_order(requests: &[EntityPlacementRequest]) -> Vec<EntityPlacementRequest> {
    let mut ordered = Vec::with_capacity(requests.len() + 1);

    match requests.iter().position(|r| r.kind == EntityKind::Player) {
        Some(player_index) => {
            ordered.push(requests[player_index].clone());
            ordered.extend(
                requests
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| *index != player_index)
                    .map(|(_, request)| request.clone()),
            );
        }
        None => {
            ordered.push(EntityPlacementRequest::new(EntityKind::Player, 1));
            ordered.extend(requests.iter().cloned());
        }
    }

    ordered
}

/// Accepted position plus the constraint it carried, kept so later
/// candidates can honor both sides of every pairwise `min_distance`.
struct PlacedRecord {
    position: Position,
    kind: EntityKind,
    min_distance: f64,
}

struct Placer<'a> {
    terrain: &'a TileMap,
    walkable: Vec<Position>,
    wall_adjacent: Vec<Position>,
    rng: GenRng,
    placed: Vec<PlacedRecord>,
    player_position: Option<Position>,
}

impl<'a> Placer<'a> {
    fn new(terrain: &'a TileMap, seed: u64) -> Self {
        let walkable = terrain.walkable_positions();
        let wall_adjacent = walkable
            .iter()
            .copied()
            .filter(|pos| terrain.is_wall_adjacent(*pos))
            .collect();
        Self {
            terrain,
            walkable,
            wall_adjacent,
            rng: GenRng::seeded(seed),
            placed: Vec::new(),
            player_position: None,
        }
    }

    /// Samples candidates until one satisfies every constraint or the
    /// attempt budget runs out.
    fn try_place(&mut self, request: &EntityPlacementRequest) -> Option<Position> {
        if self.walkable.is_empty() {
            return None;
        }

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let Some(candidate) = self.sample_candidate(request) else {
                return None;
            };
            if !self.accepts(candidate, request) {
                continue;
            }

            self.placed.push(PlacedRecord {
                position: candidate,
                kind: request.kind,
                min_distance: request.min_distance,
            });
            if request.kind == EntityKind::Player && self.player_position.is_none() {
                self.player_position = Some(candidate);
            }
            return Some(candidate);
        }

        None
    }

    /// One candidate draw according to the request's strategy.
    ///
    /// Draw order per attempt: `random`/`near_walls` consume one pick;
    /// `clustered` consumes two offset draws (plus one anchor pick when
    /// nothing is placed yet); the tournament strategies consume
    /// [`TOURNAMENT_SIZE`] picks.
    fn sample_candidate(&mut self, request: &EntityPlacementRequest) -> Option<Position> {
        match request.strategy {
            PlacementStrategy::Random => self.uniform(),
            PlacementStrategy::NearWalls => {
                self.rng.pick(&self.wall_adjacent).copied()
            }
            PlacementStrategy::Clustered => self.sample_clustered(request.kind),
            PlacementStrategy::Spread => {
                if self.placed.is_empty() {
                    self.uniform()
                } else {
                    self.tournament(|placer, pos| {
                        placer
                            .placed
                            .iter()
                            .map(|record| pos.euclidean_distance(record.position))
                            .fold(f64::INFINITY, f64::min)
                    })
                }
            }
            PlacementStrategy::Center => {
                let center = Position::new(
                    self.terrain.width() as i32 / 2,
                    self.terrain.height() as i32 / 2,
                );
                self.tournament(move |_, pos| -pos.euclidean_distance(center))
            }
            PlacementStrategy::FarFromPlayer => match self.player_position {
                None => self.uniform(),
                Some(player) => self.tournament(move |_, pos| pos.euclidean_distance(player)),
            },
        }
    }

    fn uniform(&mut self) -> Option<Position> {
        self.rng.pick(&self.walkable).copied()
    }

    /// Draws [`TOURNAMENT_SIZE`] uniform candidates and keeps the
    /// highest-scoring one; ties go to the earliest draw.
    fn tournament<F>(&mut self, score: F) -> Option<Position>
    where
        F: Fn(&Self, Position) -> f64,
    {
        let mut best: Option<(Position, f64)> = None;
        for _ in 0..TOURNAMENT_SIZE {
            let Some(candidate) = self.uniform() else {
                return None;
            };
            let value = score(self, candidate);
            if best.map(|(_, best_value)| value > best_value).unwrap_or(true) {
                best = Some((candidate, value));
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// Uniform offset inside the cluster box around the anchor. The raw
    /// candidate may land on a non-walkable tile; the acceptance check
    /// rejects it and the attempt budget absorbs the miss.
    fn sample_clustered(&mut self, kind: EntityKind) -> Option<Position> {
        let anchor = self
            .placed
            .iter()
            .rev()
            .find(|record| record.kind == kind)
            .or_else(|| self.placed.last())
            .map(|record| record.position);

        let anchor = match anchor {
            Some(position) => position,
            None => self.uniform()?,
        };

        let dx = self.rng.range_i32(-CLUSTER_RADIUS, CLUSTER_RADIUS + 1);
        let dy = self.rng.range_i32(-CLUSTER_RADIUS, CLUSTER_RADIUS + 1);
        Some(anchor + Position::new(dx, dy))
    }

    /// Full constraint check for one candidate.
    fn accepts(&self, candidate: Position, request: &EntityPlacementRequest) -> bool {
        if !self.terrain.is_walkable(candidate) {
            return false;
        }
        if self.placed.iter().any(|record| record.position == candidate) {
            return false;
        }

        for record in &self.placed {
            let required = record.min_distance.max(request.min_distance);
            if required > 0.0 && candidate.euclidean_distance(record.position) < required {
                return false;
            }
        }

        if let (Some(limit), Some(player)) = (request.max_distance_from_player, self.player_position)
        {
            if candidate.euclidean_distance(player) > limit {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileKind;

    fn open_map(width: u32, height: u32) -> TileMap {
        TileMap::filled(width, height, TileKind::Ground)
    }

    #[test]
    fn test_deterministic_placement() {
        let map = open_map(20, 20);
        let requests = vec![
            EntityPlacementRequest::new(EntityKind::Enemy, 5),
            EntityPlacementRequest::new(EntityKind::Item, 3),
        ];

        let (a, _) = place(&map, &requests, 42);
        let (b, _) = place(&map, &requests, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_implicit_player_is_synthesized_first() {
        let map = open_map(10, 10);
        let requests = vec![EntityPlacementRequest::new(EntityKind::Enemy, 2)];

        let (entities, outcomes) = place(&map, &requests, 1);
        assert_eq!(entities[0].kind, EntityKind::Player);
        assert_eq!(outcomes[0].kind, EntityKind::Player);
        assert_eq!(outcomes[0].requested, 1);
        assert_eq!(outcomes[0].placed, 1);
    }

    #[test]
    fn test_explicit_player_request_is_honored() {
        let map = open_map(10, 10);
        let mut player = EntityPlacementRequest::new(EntityKind::Player, 1);
        player.strategy = PlacementStrategy::Center;
        let requests = vec![
            EntityPlacementRequest::new(EntityKind::Enemy, 1),
            player,
        ];

        let (entities, outcomes) = place(&map, &requests, 1);
        // The player request is moved to the front of processing.
        assert_eq!(entities[0].kind, EntityKind::Player);
        assert_eq!(outcomes[0].strategy, PlacementStrategy::Center);
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_zero_count_player_suppresses_implicit_spawn() {
        let map = open_map(10, 10);
        let requests = vec![EntityPlacementRequest::new(EntityKind::Player, 0)];

        let (entities, outcomes) = place(&map, &requests, 1);
        assert!(entities.is_empty());
        assert_eq!(outcomes[0].requested, 0);
        assert_eq!(outcomes[0].placed, 0);
    }

    #[test]
    fn test_all_wall_map_places_nothing() {
        let map = TileMap::filled(10, 10, TileKind::Wall);
        let requests = vec![EntityPlacementRequest::new(EntityKind::Enemy, 5)];

        let (entities, outcomes) = place(&map, &requests, 7);
        assert!(entities.is_empty());
        assert!(outcomes.iter().all(|outcome| outcome.placed == 0));
    }

    #[test]
    fn test_entities_land_on_walkable_tiles() {
        let mut map = TileMap::filled(16, 16, TileKind::Wall);
        for y in 4..12 {
            for x in 4..12 {
                map.set(Position::new(x, y), TileKind::Ground);
            }
        }
        let requests = vec![EntityPlacementRequest::new(EntityKind::Enemy, 10)];

        let (entities, _) = place(&map, &requests, 3);
        for entity in &entities {
            assert!(map.is_walkable(entity.position));
        }
    }

    #[test]
    fn test_min_distance_is_enforced_pairwise() {
        let map = open_map(30, 30);
        let mut request = EntityPlacementRequest::new(EntityKind::Enemy, 6);
        request.min_distance = 5.0;

        let (entities, _) = place(&map, &[request], 11);
        let enemies: Vec<_> = entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Enemy)
            .collect();

        for (i, a) in enemies.iter().enumerate() {
            for b in enemies.iter().skip(i + 1) {
                assert!(a.position.euclidean_distance(b.position) >= 5.0);
            }
        }
    }

    #[test]
    fn test_impossible_min_distance_under_places_without_error() {
        let map = open_map(6, 6);
        let mut request = EntityPlacementRequest::new(EntityKind::Enemy, 5);
        request.min_distance = 10.0;

        // A 6x6 grid cannot hold 5 points pairwise 10 apart; at most one
        // enemy fits once the player is down.
        let (entities, outcomes) = place(&map, &[request], 5);
        let enemy_count = entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Enemy)
            .count();
        assert!(enemy_count < 5);

        let enemy_outcome = outcomes
            .iter()
            .find(|outcome| outcome.kind == EntityKind::Enemy)
            .unwrap();
        assert_eq!(enemy_outcome.requested, 5);
        assert_eq!(enemy_outcome.placed as usize, enemy_count);
    }

    #[test]
    fn test_max_distance_from_player() {
        let map = open_map(40, 40);
        let mut request = EntityPlacementRequest::new(EntityKind::Item, 8);
        request.max_distance_from_player = Some(6.0);

        let (entities, _) = place(&map, &[request], 21);
        let player = entities
            .iter()
            .find(|entity| entity.kind == EntityKind::Player)
            .unwrap()
            .position;

        for item in entities.iter().filter(|entity| entity.kind == EntityKind::Item) {
            assert!(item.position.euclidean_distance(player) <= 6.0);
        }
    }

    #[test]
    fn test_near_walls_strategy() {
        let map = open_map(20, 20);
        let mut request = EntityPlacementRequest::new(EntityKind::Obstacle, 6);
        request.strategy = PlacementStrategy::NearWalls;

        let (entities, _) = place(&map, &[request], 9);
        for obstacle in entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Obstacle)
        {
            assert!(map.is_wall_adjacent(obstacle.position));
        }
    }

    #[test]
    fn test_no_two_entities_share_a_tile() {
        let map = open_map(8, 8);
        let requests = vec![
            EntityPlacementRequest::new(EntityKind::Enemy, 20),
            EntityPlacementRequest::new(EntityKind::Item, 20),
        ];

        let (entities, _) = place(&map, &requests, 2);
        let mut seen = std::collections::HashSet::new();
        for entity in &entities {
            assert!(seen.insert(entity.position), "tile placed twice");
        }
    }

    #[test]
    fn test_ids_are_sequential_in_placement_order() {
        let map = open_map(12, 12);
        let requests = vec![EntityPlacementRequest::new(EntityKind::Enemy, 4)];

        let (entities, _) = place(&map, &requests, 6);
        for (index, entity) in entities.iter().enumerate() {
            assert_eq!(entity.id, index as u32);
        }
    }

    #[test]
    fn test_properties_are_copied_through() {
        let map = open_map(10, 10);
        let mut request = EntityPlacementRequest::new(EntityKind::Npc, 1);
        request
            .properties
            .insert("dialogue".to_string(), serde_json::json!("hello"));

        let (entities, _) = place(&map, &[request], 4);
        let npc = entities
            .iter()
            .find(|entity| entity.kind == EntityKind::Npc)
            .unwrap();
        assert_eq!(npc.properties["dialogue"], serde_json::json!("hello"));
    }
}
