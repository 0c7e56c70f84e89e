//! # Validation Module
//!
//! Structural and playability checks over assembled levels.
//!
//! Validation is advisory and must always complete: findings are returned as
//! structured errors and warnings in a [`PlayabilityReport`], never thrown.
//! Errors mark contract violations that block usability (an entity inside a
//! wall means the placer and assembler disagreed about the terrain);
//! warnings mark suspicious but renderable results (an unreachable exit is
//! still a well-formed level, and the caller decides whether to reject it).
//!
//! Reachability is computed with a breadth-first sweep over the 4-connected
//! walkable-tile graph, seeded from every spawn point.

use crate::level::Level;
use crate::map::{Position, TileKind, TileMap};
use crate::placement::EntityKind;
use crate::config;
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single validation finding.
///
/// The same enum covers errors and warnings; the report decides which list a
/// finding lands in.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationIssue {
    /// Terrain dimensions fall outside the engine's accepted range
    #[error("map dimensions {width}x{height} outside allowed range")]
    MapDimensionsOutOfRange { width: u32, height: u32 },

    /// An entity sits outside the terrain grid
    #[error("entity {id} at ({x}, {y}) is out of bounds")]
    EntityOutOfBounds { id: u32, x: i32, y: i32 },

    /// An entity sits on a tile nothing can stand on
    #[error("entity {id} at ({x}, {y}) is standing on {tile:?}")]
    EntityOnBlockedTile { id: u32, x: i32, y: i32, tile: TileKind },

    /// The level has no player spawn at all
    #[error("level has no spawn points")]
    NoSpawnPoints,

    /// A must-reach entity cannot be walked to from any spawn point
    #[error("{kind:?} entity {id} at ({x}, {y}) is unreachable from every spawn point")]
    UnreachableEntity {
        id: u32,
        kind: EntityKind,
        x: i32,
        y: i32,
    },

    /// A placement request satisfied less than half of its count
    #[error("{kind:?} request placed {placed} of {requested}")]
    LowPlacementRatio {
        kind: EntityKind,
        requested: u32,
        placed: u32,
    },
}

/// Structured result of one validation pass.
///
/// # Examples
///
/// ```
/// use levelforge::{Algorithm, GenerationConfig};
///
/// let config = GenerationConfig::new(24, 24, 11, Algorithm::Rooms);
/// let level = levelforge::generate(&config).unwrap();
/// let report = levelforge::validate(&level);
/// assert!(report.is_playable());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayabilityReport {
    /// Findings that block usability
    pub errors: Vec<ValidationIssue>,
    /// Suspicious but non-blocking findings
    pub warnings: Vec<ValidationIssue>,
}

impl PlayabilityReport {
    /// Whether the level passed every blocking check.
    pub fn is_playable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the pass produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validates a level and reports every finding.
///
/// Works on any well-formed [`Level`], including ones assembled outside the
/// generation pipeline. Never mutates the level; two passes over the same
/// level return equal reports.
pub fn validate(level: &Level) -> PlayabilityReport {
    let mut report = PlayabilityReport::default();
    let terrain = level.terrain();

    check_dimensions(terrain, &mut report);
    let misplaced = check_entity_positions(level, &mut report);
    check_reachability(level, &misplaced, &mut report);
    check_placement_ratios(level, &mut report);

    report
}

fn check_dimensions(terrain: &TileMap, report: &mut PlayabilityReport) {
    let range = config::MIN_MAP_DIMENSION..=config::MAX_MAP_DIMENSION;
    if !range.contains(&terrain.width()) || !range.contains(&terrain.height()) {
        report.errors.push(ValidationIssue::MapDimensionsOutOfRange {
            width: terrain.width(),
            height: terrain.height(),
        });
    }
}

/// Bounds and walkability per entity. The placer's contract should make
/// these findings impossible; their presence means the pipeline stages have
/// drifted apart. Returns the ids of offending entities so the reachability
/// pass can skip them.
fn check_entity_positions(level: &Level, report: &mut PlayabilityReport) -> HashSet<u32> {
    let terrain = level.terrain();
    let mut misplaced = HashSet::new();

    for entity in level.entities() {
        if !terrain.in_bounds(entity.position) {
            report.errors.push(ValidationIssue::EntityOutOfBounds {
                id: entity.id,
                x: entity.position.x,
                y: entity.position.y,
            });
            misplaced.insert(entity.id);
        } else if let Some(tile) = terrain.tile(entity.position) {
            if !tile.is_walkable() {
                report.errors.push(ValidationIssue::EntityOnBlockedTile {
                    id: entity.id,
                    x: entity.position.x,
                    y: entity.position.y,
                    tile,
                });
                misplaced.insert(entity.id);
            }
        }
    }

    misplaced
}

fn check_reachability(level: &Level, misplaced: &HashSet<u32>, report: &mut PlayabilityReport) {
    if level.spawn_points().is_empty() {
        report.warnings.push(ValidationIssue::NoSpawnPoints);
        return;
    }

    let reachable = reachable_from_spawns(level.terrain(), level.spawn_points());
    for entity in level.entities() {
        if !entity.kind.must_be_reachable() || misplaced.contains(&entity.id) {
            continue;
        }
        if !reachable.contains(&entity.position) {
            report.warnings.push(ValidationIssue::UnreachableEntity {
                id: entity.id,
                kind: entity.kind,
                x: entity.position.x,
                y: entity.position.y,
            });
        }
    }
}

fn check_placement_ratios(level: &Level, report: &mut PlayabilityReport) {
    for outcome in &level.metadata().placements {
        if outcome.requested > 0 && outcome.placed * 2 < outcome.requested {
            report.warnings.push(ValidationIssue::LowPlacementRatio {
                kind: outcome.kind,
                requested: outcome.requested,
                placed: outcome.placed,
            });
        }
    }
}

/// Union of the walkable tiles reachable from each spawn point.
fn reachable_from_spawns(terrain: &TileMap, spawns: &[Position]) -> HashSet<Position> {
    let mut reachable = HashSet::new();

    for &spawn in spawns {
        if !terrain.is_walkable(spawn) || reachable.contains(&spawn) {
            continue;
        }
        for position in bfs_reach(spawn, |&pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|neighbor| terrain.is_walkable(*neighbor))
                .collect::<Vec<_>>()
        }) {
            reachable.insert(position);
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Algorithm;
    use crate::level::{assemble, Entity, LevelMetadata};
    use crate::placement::{PlacementOutcome, PlacementStrategy};
    use std::collections::HashMap;

    fn entity(id: u32, kind: EntityKind, x: i32, y: i32) -> Entity {
        Entity {
            id,
            kind,
            position: Position::new(x, y),
            properties: HashMap::new(),
        }
    }

    fn metadata() -> LevelMetadata {
        LevelMetadata::new(0, Algorithm::Noise, Vec::new())
    }

    #[test]
    fn test_clean_open_level() {
        let terrain = TileMap::filled(10, 10, TileKind::Ground);
        let entities = vec![
            entity(0, EntityKind::Player, 1, 1),
            entity(1, EntityKind::Exit, 8, 8),
        ];
        let level = assemble(terrain, entities, metadata());

        let report = validate(&level);
        assert!(report.is_clean());
    }

    #[test]
    fn test_entity_out_of_bounds_is_error() {
        let terrain = TileMap::filled(10, 10, TileKind::Ground);
        let entities = vec![
            entity(0, EntityKind::Player, 1, 1),
            entity(1, EntityKind::Enemy, 12, 3),
        ];
        let level = assemble(terrain, entities, metadata());

        let report = validate(&level);
        assert!(!report.is_playable());
        assert_eq!(
            report.errors,
            vec![ValidationIssue::EntityOutOfBounds { id: 1, x: 12, y: 3 }]
        );
    }

    #[test]
    fn test_entity_on_blocked_tile_is_error() {
        let mut terrain = TileMap::filled(10, 10, TileKind::Ground);
        terrain.set(Position::new(4, 4), TileKind::Lava);
        let entities = vec![
            entity(0, EntityKind::Player, 1, 1),
            entity(1, EntityKind::Item, 4, 4),
        ];
        let level = assemble(terrain, entities, metadata());

        let report = validate(&level);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::EntityOnBlockedTile {
                id: 1,
                x: 4,
                y: 4,
                tile: TileKind::Lava,
            }]
        );
    }

    #[test]
    fn test_missing_spawn_points_is_warning() {
        let terrain = TileMap::filled(8, 8, TileKind::Ground);
        let level = assemble(terrain, vec![entity(0, EntityKind::Exit, 2, 2)], metadata());

        let report = validate(&level);
        assert!(report.is_playable());
        assert!(report.warnings.contains(&ValidationIssue::NoSpawnPoints));
    }

    #[test]
    fn test_unreachable_exit_is_warning_not_error() {
        // Wall column splits the map into two components.
        let mut terrain = TileMap::filled(9, 9, TileKind::Ground);
        for y in 0..9 {
            terrain.set(Position::new(4, y), TileKind::Wall);
        }
        let entities = vec![
            entity(0, EntityKind::Player, 1, 1),
            entity(1, EntityKind::Exit, 7, 7),
        ];
        let level = assemble(terrain, entities, metadata());

        let report = validate(&level);
        assert!(report.is_playable());
        assert_eq!(
            report.warnings,
            vec![ValidationIssue::UnreachableEntity {
                id: 1,
                kind: EntityKind::Exit,
                x: 7,
                y: 7,
            }]
        );
    }

    #[test]
    fn test_reachable_checkpoint_produces_no_warning() {
        let terrain = TileMap::filled(9, 9, TileKind::Ground);
        let entities = vec![
            entity(0, EntityKind::Player, 1, 1),
            entity(1, EntityKind::Checkpoint, 7, 7),
        ];
        let level = assemble(terrain, entities, metadata());

        assert!(validate(&level).is_clean());
    }

    #[test]
    fn test_low_placement_ratio_is_warning() {
        let terrain = TileMap::filled(8, 8, TileKind::Ground);
        let placements = vec![
            PlacementOutcome {
                kind: EntityKind::Enemy,
                strategy: PlacementStrategy::Random,
                requested: 10,
                placed: 3,
            },
            PlacementOutcome {
                kind: EntityKind::Item,
                strategy: PlacementStrategy::Random,
                requested: 4,
                placed: 2,
            },
        ];
        let level = assemble(
            terrain,
            vec![entity(0, EntityKind::Player, 1, 1)],
            LevelMetadata::new(0, Algorithm::Noise, placements),
        );

        let report = validate(&level);
        // 3/10 warns, 2/4 is exactly half and does not.
        assert_eq!(
            report.warnings,
            vec![ValidationIssue::LowPlacementRatio {
                kind: EntityKind::Enemy,
                requested: 10,
                placed: 3,
            }]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut terrain = TileMap::filled(12, 12, TileKind::Ground);
        for y in 0..12 {
            terrain.set(Position::new(6, y), TileKind::Water);
        }
        let entities = vec![
            entity(0, EntityKind::Player, 2, 2),
            entity(1, EntityKind::Exit, 10, 10),
            entity(2, EntityKind::Enemy, 20, 20),
        ];
        let level = assemble(terrain, entities, metadata());

        let first = validate(&level);
        let second = validate(&level);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dimension_bounds_checked_on_external_levels() {
        let terrain = TileMap::filled(2, 2, TileKind::Ground);
        let level = assemble(terrain, Vec::new(), metadata());

        let report = validate(&level);
        assert!(report
            .errors
            .contains(&ValidationIssue::MapDimensionsOutOfRange { width: 2, height: 2 }));
    }
}
