//! # Generation Module
//!
//! Terrain synthesis strategies and the top-level generation pipeline.
//!
//! Four algorithms share one contract: `(width, height, seed, params)` in, a
//! finished [`TileMap`] out. Each is a total function: malformed numeric
//! parameters fall back to documented defaults instead of failing, and
//! degenerate dimensions produce degenerate (but well-formed) maps. Strategy
//! selection is a closed enum dispatched by pattern match, so the set of
//! algorithms is fixed at compile time and extension means adding a variant.

pub mod cellular;
pub mod maze;
pub mod noise;
pub mod rooms;

use crate::level::{self, Level, LevelMetadata};
use crate::map::TileKind;
use crate::placement::{self, EntityPlacementRequest};
use crate::rng::{derive_seed, PLACEMENT_STREAM, TERRAIN_STREAM};
use crate::{config, ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Terrain synthesis algorithm selector.
///
/// The set is closed by design. Configuration layers deserialize this from
/// its snake_case name, so an unrecognized algorithm name is rejected at the
/// config boundary before the pipeline ever runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Layered coherent-noise field thresholded into terrain bands
    Noise,
    /// Cave-like regions smoothed out of random fill by a cellular automaton
    Cellular,
    /// Perfect maze carved by randomized depth-first traversal
    Maze,
    /// Rectangular rooms joined by L-shaped corridors
    Rooms,
}

impl Algorithm {
    /// Canonical name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Noise => "noise",
            Algorithm::Cellular => "cellular",
            Algorithm::Maze => "maze",
            Algorithm::Rooms => "rooms",
        }
    }
}

/// A single algorithm parameter value.
///
/// Parameters arrive as a string-keyed bag because each algorithm has its
/// own vocabulary; values are either numeric or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
}

impl ParamValue {
    /// Numeric view of the value, if it is one.
    pub fn as_number(self) -> Option<f64> {
        match self {
            ParamValue::Number(value) => Some(value),
            ParamValue::Flag(_) => None,
        }
    }

    /// Boolean view of the value, if it is one.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            ParamValue::Flag(value) => Some(value),
            ParamValue::Number(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// Read-only view over an algorithm parameter bag with per-parameter
/// defaulting and range clamping.
///
/// Lookups never fail: a missing key yields the default, a wrongly typed or
/// non-finite value yields the default with a logged warning, and an
/// out-of-range value is clamped with a logged warning. Generation must
/// never abort because of a malformed numeric parameter.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    values: &'a HashMap<String, ParamValue>,
}

impl<'a> Params<'a> {
    /// Wraps a parameter bag.
    pub fn new(values: &'a HashMap<String, ParamValue>) -> Self {
        Self { values }
    }

    /// Fetches a float parameter, clamped to `[min, max]`.
    pub fn f64_in(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        let value = match self.values.get(key) {
            None => return default,
            Some(value) => match value.as_number() {
                Some(number) if number.is_finite() => number,
                _ => {
                    log::warn!(
                        "parameter {key:?} is not a finite number, using default {default}"
                    );
                    return default;
                }
            },
        };

        if value < min || value > max {
            let clamped = value.clamp(min, max);
            log::warn!("parameter {key:?}={value} outside [{min}, {max}], clamped to {clamped}");
            clamped
        } else {
            value
        }
    }

    /// Fetches an integer parameter, clamped to `[min, max]`.
    ///
    /// Numeric values are truncated toward zero before clamping.
    pub fn u32_in(&self, key: &str, default: u32, min: u32, max: u32) -> u32 {
        let value = self.f64_in(key, default as f64, 0.0, u32::MAX as f64) as u32;
        if value < min || value > max {
            let clamped = value.clamp(min, max);
            log::warn!("parameter {key:?}={value} outside [{min}, {max}], clamped to {clamped}");
            clamped
        } else {
            value
        }
    }

    /// Fetches a boolean parameter.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            None => default,
            Some(value) => match value.as_flag() {
                Some(flag) => flag,
                None => {
                    log::warn!("parameter {key:?} is not a flag, using default {default}");
                    default
                }
            },
        }
    }
}

/// Declarative description of one level to generate.
///
/// The config is caller-owned input and read-only to the engine. The only
/// hard invariant enforced here is the dimension range; everything
/// algorithm-internal degrades to defaults instead of failing.
///
/// # Examples
///
/// ```
/// use levelforge::{Algorithm, GenerationConfig};
///
/// let config = GenerationConfig::new(32, 24, 42, Algorithm::Cellular);
/// let level = levelforge::generate(&config).unwrap();
/// assert_eq!(level.terrain().width(), 32);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Root seed for the deterministic draw streams
    pub seed: u64,
    /// Terrain synthesis strategy
    pub algorithm: Algorithm,
    /// Algorithm-specific parameter bag
    #[serde(default)]
    pub parameters: HashMap<String, ParamValue>,
    /// Ordered banding palette for the noise generator; empty means the
    /// built-in default palette
    #[serde(default)]
    pub terrain_types: Vec<TileKind>,
    /// Entity placement requests, processed in order
    #[serde(default)]
    pub entities: Vec<EntityPlacementRequest>,
}

impl GenerationConfig {
    /// Creates a config with no parameters and no entity requests.
    pub fn new(width: u32, height: u32, seed: u64, algorithm: Algorithm) -> Self {
        Self {
            width,
            height,
            seed,
            algorithm,
            parameters: HashMap::new(),
            terrain_types: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Sets a numeric algorithm parameter.
    pub fn set_number(&mut self, key: &str, value: f64) {
        self.parameters.insert(key.to_string(), ParamValue::Number(value));
    }

    /// Sets a boolean algorithm parameter.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.parameters.insert(key.to_string(), ParamValue::Flag(value));
    }

    /// Checks the top-level contract: dimensions within the accepted range.
    pub fn validate(&self) -> ForgeResult<()> {
        let range = config::MIN_MAP_DIMENSION..=config::MAX_MAP_DIMENSION;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(ForgeError::InvalidConfig(format!(
                "map dimensions {}x{} outside allowed range {}..={}",
                self.width,
                self.height,
                config::MIN_MAP_DIMENSION,
                config::MAX_MAP_DIMENSION
            )));
        }
        Ok(())
    }
}

/// Runs the full generation pipeline for one config.
///
/// Terrain synthesis, entity placement, and level assembly are chained in a
/// fixed order; each stage consumes a sub-seed derived from `config.seed`,
/// so the result is deterministic for a fixed config. The only failure mode
/// is a config whose dimensions are out of contract; under-placement and
/// playability problems are reported by [`crate::validate`], never here.
///
/// # Examples
///
/// ```
/// use levelforge::{Algorithm, GenerationConfig};
///
/// let config = GenerationConfig::new(20, 20, 7, Algorithm::Maze);
/// let a = levelforge::generate(&config).unwrap();
/// let b = levelforge::generate(&config).unwrap();
/// assert_eq!(a.terrain(), b.terrain());
/// ```
pub fn generate(config: &GenerationConfig) -> ForgeResult<Level> {
    config.validate()?;

    let params = Params::new(&config.parameters);
    let terrain_seed = derive_seed(config.seed, TERRAIN_STREAM);
    let terrain = match config.algorithm {
        Algorithm::Noise => noise::generate(
            config.width,
            config.height,
            terrain_seed,
            &params,
            &config.terrain_types,
        ),
        Algorithm::Cellular => cellular::generate(config.width, config.height, terrain_seed, &params),
        Algorithm::Maze => maze::generate(config.width, config.height, terrain_seed, &params),
        Algorithm::Rooms => rooms::generate(config.width, config.height, terrain_seed, &params),
    };

    let placement_seed = derive_seed(config.seed, PLACEMENT_STREAM);
    let (entities, outcomes) = placement::place(&terrain, &config.entities, placement_seed);

    let metadata = LevelMetadata::new(config.seed, config.algorithm, outcomes);
    Ok(level::assemble(terrain, entities, metadata))
}
