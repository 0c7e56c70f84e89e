//! # Cellular-Automaton Terrain Generator
//!
//! Organic cave regions smoothed out of random fill.
//!
//! The grid is seeded with independent Wall/Ground draws per cell (row-major
//! draw order, part of the determinism contract), then a fixed number of
//! smoothing passes turn the static into caves: a cell becomes Wall when its
//! 8-neighborhood wall count exceeds the vote threshold. Cells beyond the
//! map edge count as Wall, and the border row/column is forced Wall on every
//! pass so caves never leak off the map.
//!
//! ## Parameters
//!
//! | key                | default | range      |
//! |--------------------|---------|------------|
//! | `fill_probability` | 0.45    | 0.0..=1.0  |
//! | `iterations`       | 4       | 0..=12     |
//! | `wall_threshold`   | 4       | 1..=8      |

use crate::generation::Params;
use crate::map::{TileKind, TileMap};
use crate::rng::GenRng;

/// Generates cave-like terrain with a smoothing cellular automaton.
pub fn generate(width: u32, height: u32, seed: u64, params: &Params<'_>) -> TileMap {
    let fill_probability = params.f64_in("fill_probability", 0.45, 0.0, 1.0);
    let iterations = params.u32_in("iterations", 4, 0, 12);
    let wall_threshold = params.u32_in("wall_threshold", 4, 1, 8);

    let w = width as usize;
    let h = height as usize;
    let mut rng = GenRng::seeded(seed);

    // Initial fill, row-major. Border cells are wall from the start.
    let mut walls = vec![false; w * h];
    for y in 0..h {
        for x in 0..w {
            let on_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            walls[y * w + x] = on_border || rng.chance(fill_probability);
        }
    }

    for _ in 0..iterations {
        let mut next = vec![false; w * h];
        for y in 0..h {
            for x in 0..w {
                let on_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                next[y * w + x] =
                    on_border || neighbor_walls(&walls, w, h, x, y) > wall_threshold;
            }
        }
        walls = next;
    }

    let mut map = TileMap::filled(width, height, TileKind::Wall);
    map.fill_from(
        walls
            .into_iter()
            .map(|wall| if wall { TileKind::Wall } else { TileKind::Ground })
            .collect(),
    );
    map
}

/// Wall count over the 8-neighborhood; out-of-bounds neighbors are walls.
fn neighbor_walls(walls: &[bool], w: usize, h: usize, x: usize, y: usize) -> u32 {
    let mut count = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                count += 1;
            } else if walls[ny as usize * w + nx as usize] {
                count += 1;
            }
        }
    }
    count
}
