//! # Levelforge
//!
//! A deterministic procedural level-generation engine for tile-based 2D games.
//!
//! ## Architecture Overview
//!
//! Levelforge turns a declarative [`GenerationConfig`] into a playable
//! [`Level`] through a fixed pipeline of pure stages:
//!
//! - **Terrain synthesis**: four interchangeable algorithms (noise, cellular
//!   automaton, maze, rooms) that all share the same `(width, height, seed,
//!   params) -> TileMap` contract
//! - **Entity placement**: constraint-based sampling of entity positions over
//!   the walkable tiles, with per-request strategies and distance rules
//! - **Level assembly**: pure aggregation of terrain, entities, and spawn
//!   metadata into an immutable [`Level`]
//! - **Playability validation**: structural and reachability checks producing
//!   a [`PlayabilityReport`] of errors and warnings
//!
//! ## Determinism
//!
//! Every generation call is an independent, reproducible computation keyed by
//! `(config, config.seed)`. Two calls with the same config produce
//! byte-identical tile grids and entity lists. No stage shares mutable state
//! with another call, so the engine is safely callable from multiple threads
//! as long as each call owns its own config.
//!
//! ## Entry Points
//!
//! The crate exposes exactly two operations: [`generate`] runs the full
//! pipeline, and [`validate`] inspects any well-formed level, including ones
//! constructed outside this crate.

pub mod generation;
pub mod level;
pub mod map;
pub mod placement;
pub mod rng;
pub mod validation;

// Core re-exports so callers can use `levelforge::X` for the common types.
pub use generation::{generate, Algorithm, GenerationConfig, ParamValue, Params};
pub use level::{assemble, Entity, Level, LevelMetadata};
pub use map::{Position, TileKind, TileMap};
pub use placement::{EntityKind, EntityPlacementRequest, PlacementOutcome, PlacementStrategy};
pub use validation::{validate, PlayabilityReport, ValidationIssue};

/// Core error type for the Levelforge engine.
///
/// Hard failures are deliberately rare: only top-level configuration problems
/// abort generation. Everything else (under-placement, parameter fallbacks,
/// playability findings) is reported through softer channels and never
/// surfaces as an `Err`.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Top-level configuration is outside the engine's contract
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Levelforge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Smallest accepted map dimension in tiles
    pub const MIN_MAP_DIMENSION: u32 = 4;

    /// Largest accepted map dimension in tiles
    pub const MAX_MAP_DIMENSION: u32 = 512;

    /// Resampling budget per entity instance before the instance is skipped
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 250;

    /// Candidates drawn per tournament round by biased placement strategies
    pub const TOURNAMENT_SIZE: usize = 8;
}
