//! # Noise Terrain Generator
//!
//! Fractal value field thresholded into terrain bands.
//!
//! Each cell's value is a pure function of `(x, y, seed)`: layered Perlin
//! octaves with configurable amplitude decay and frequency growth, combined
//! and normalized to `[0, 1]`, then mapped onto an ordered palette of tile
//! kinds. Because no mutable state is carried between cells, rows are
//! computed in parallel with rayon, and the output is bit-identical to a
//! sequential pass.
//!
//! ## Parameters
//!
//! | key           | default | range        |
//! |---------------|---------|--------------|
//! | `octaves`     | 4       | 1..=8        |
//! | `persistence` | 0.5     | 0.05..=1.0   |
//! | `lacunarity`  | 2.0     | 1.0..=4.0    |
//! | `scale`       | 0.1     | 0.001..=1.0  |
//! | `water_level` | 0.3     | 0.0..=0.95   |

use crate::generation::Params;
use crate::map::{TileKind, TileMap};
use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

/// Palette used when the config supplies no `terrain_types`.
const DEFAULT_PALETTE: [TileKind; 5] = [
    TileKind::Water,
    TileKind::Sand,
    TileKind::Grass,
    TileKind::Ground,
    TileKind::Stone,
];

/// Generates a terrain map from layered coherent noise.
///
/// The first palette entry fills every cell whose normalized value falls
/// below `water_level`; the remaining entries split the rest of the value
/// range evenly, in palette order.
pub fn generate(
    width: u32,
    height: u32,
    seed: u64,
    params: &Params<'_>,
    palette: &[TileKind],
) -> TileMap {
    let octaves = params.u32_in("octaves", 4, 1, 8);
    let persistence = params.f64_in("persistence", 0.5, 0.05, 1.0);
    let lacunarity = params.f64_in("lacunarity", 2.0, 1.0, 4.0);
    let scale = params.f64_in("scale", 0.1, 0.001, 1.0);
    let water_level = params.f64_in("water_level", 0.3, 0.0, 0.95);

    let palette: &[TileKind] = if palette.is_empty() {
        &DEFAULT_PALETTE
    } else {
        palette
    };

    // Fold the 64-bit seed before handing it to the 32-bit permutation
    // table so distinct config seeds stay distinct.
    let perlin = Perlin::new((seed ^ (seed >> 32)) as u32);

    let rows: Vec<Vec<TileKind>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let value = fractal_value(
                        &perlin,
                        x,
                        y,
                        octaves,
                        persistence,
                        lacunarity,
                        scale,
                    );
                    band(value, water_level, palette)
                })
                .collect()
        })
        .collect();

    let mut map = TileMap::filled(width, height, palette[0]);
    map.fill_from(rows.into_iter().flatten().collect());
    map
}

/// Combined multi-octave noise value for one cell, normalized to `[0, 1]`.
///
/// Cell coordinates are offset by half a tile before scaling; Perlin noise
/// vanishes on the integer lattice, and the offset keeps whole rows from
/// collapsing onto the zero contour at coarse scales.
fn fractal_value(
    perlin: &Perlin,
    x: u32,
    y: u32,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    scale: f64,
) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut total = 0.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves {
        let nx = (x as f64 + 0.5) * scale * frequency;
        let ny = (y as f64 + 0.5) * scale * frequency;
        total += amplitude * perlin.get([nx, ny]);
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    let normalized = (total / max_amplitude + 1.0) * 0.5;
    normalized.clamp(0.0, 1.0)
}

/// Maps a normalized value onto the palette.
fn band(value: f64, water_level: f64, palette: &[TileKind]) -> TileKind {
    if palette.len() == 1 || value < water_level {
        return palette[0];
    }

    let upper = &palette[1..];
    let span = (1.0 - water_level).max(f64::EPSILON);
    let t = ((value - water_level) / span).clamp(0.0, 1.0);
    let index = ((t * upper.len() as f64) as usize).min(upper.len() - 1);
    upper[index]
}
