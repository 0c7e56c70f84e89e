//! # Level Module
//!
//! The assembled level aggregate and its metadata.
//!
//! Assembly is pure bookkeeping: it wraps the terrain and the placed
//! entities into a [`Level`] value and derives the spawn points from the
//! Player entities. No validation happens here; that is the validator's
//! job, kept separate so that assembly can never fail.

use crate::generation::Algorithm;
use crate::map::{Position, TileMap};
use crate::placement::{EntityKind, PlacementOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// A placed game object.
///
/// Entities are plain values: ids are sequential within their level, and no
/// entity references another. Relationships such as "nearest enemy" are
/// derived on demand from positions, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier unique within the owning level, in placement order
    pub id: u32,
    /// What the entity is
    pub kind: EntityKind,
    /// Tile coordinates
    pub position: Position,
    /// Opaque payload copied verbatim from the placement request
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

/// Provenance and bookkeeping attached to an assembled level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    /// Seed the level was generated from
    pub seed: u64,
    /// Terrain algorithm that produced the map
    pub algorithm: Algorithm,
    /// Creation time, seconds since the Unix epoch
    pub created_at: u64,
    /// Requested-versus-placed counts per placement request, recorded for
    /// the validator's quantity checks
    pub placements: Vec<PlacementOutcome>,
}

impl LevelMetadata {
    /// Creates metadata stamped with the current wall-clock time.
    pub fn new(seed: u64, algorithm: Algorithm, placements: Vec<PlacementOutcome>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Self {
            seed,
            algorithm,
            created_at,
            placements,
        }
    }
}

/// A fully assembled, immutable level.
///
/// Owns its terrain, entity list, and spawn points. There are no mutating
/// accessors: edits mean generating or assembling a new `Level`.
///
/// # Examples
///
/// ```
/// use levelforge::{Algorithm, GenerationConfig};
///
/// let config = GenerationConfig::new(24, 24, 3, Algorithm::Rooms);
/// let level = levelforge::generate(&config).unwrap();
/// // The implicit player always yields a spawn point on a non-degenerate map.
/// assert_eq!(level.spawn_points().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    terrain: TileMap,
    entities: Vec<Entity>,
    spawn_points: Vec<Position>,
    metadata: LevelMetadata,
}

impl Level {
    /// The terrain grid.
    pub fn terrain(&self) -> &TileMap {
        &self.terrain
    }

    /// All placed entities, in placement order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Valid player-start positions, derived from Player entities.
    pub fn spawn_points(&self) -> &[Position] {
        &self.spawn_points
    }

    /// Level provenance and placement bookkeeping.
    pub fn metadata(&self) -> &LevelMetadata {
        &self.metadata
    }

    /// Iterates over entities of one kind.
    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| entity.kind == kind)
    }
}

/// Assembles a level from its parts.
///
/// Spawn points are the positions of Player-kind entities; if none were
/// placeable the list is simply empty. Total function, no failure path.
pub fn assemble(terrain: TileMap, entities: Vec<Entity>, metadata: LevelMetadata) -> Level {
    let spawn_points = entities
        .iter()
        .filter(|entity| entity.kind == EntityKind::Player)
        .map(|entity| entity.position)
        .collect();

    Level {
        terrain,
        entities,
        spawn_points,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileKind;

    fn entity(id: u32, kind: EntityKind, x: i32, y: i32) -> Entity {
        Entity {
            id,
            kind,
            position: Position::new(x, y),
            properties: HashMap::new(),
        }
    }

    #[test]
    fn test_assemble_derives_spawn_points() {
        let terrain = TileMap::filled(8, 8, TileKind::Ground);
        let entities = vec![
            entity(0, EntityKind::Player, 2, 3),
            entity(1, EntityKind::Enemy, 5, 5),
            entity(2, EntityKind::Exit, 7, 7),
        ];
        let metadata = LevelMetadata::new(1, Algorithm::Noise, Vec::new());

        let level = assemble(terrain, entities, metadata);
        assert_eq!(level.spawn_points(), &[Position::new(2, 3)]);
        assert_eq!(level.entities().len(), 3);
    }

    #[test]
    fn test_assemble_without_player() {
        let terrain = TileMap::filled(4, 4, TileKind::Ground);
        let entities = vec![entity(0, EntityKind::Item, 1, 1)];
        let metadata = LevelMetadata::new(9, Algorithm::Maze, Vec::new());

        let level = assemble(terrain, entities, metadata);
        assert!(level.spawn_points().is_empty());
    }

    #[test]
    fn test_entities_of_kind() {
        let terrain = TileMap::filled(6, 6, TileKind::Ground);
        let entities = vec![
            entity(0, EntityKind::Player, 0, 0),
            entity(1, EntityKind::Enemy, 1, 0),
            entity(2, EntityKind::Enemy, 2, 0),
        ];
        let metadata = LevelMetadata::new(4, Algorithm::Cellular, Vec::new());

        let level = assemble(terrain, entities, metadata);
        assert_eq!(level.entities_of_kind(EntityKind::Enemy).count(), 2);
        assert_eq!(level.entities_of_kind(EntityKind::Exit).count(), 0);
    }

    #[test]
    fn test_metadata_preserved() {
        let terrain = TileMap::filled(4, 4, TileKind::Ground);
        let metadata = LevelMetadata::new(123, Algorithm::Rooms, Vec::new());

        let level = assemble(terrain, Vec::new(), metadata);
        assert_eq!(level.metadata().seed, 123);
        assert_eq!(level.metadata().algorithm, Algorithm::Rooms);
    }
}
