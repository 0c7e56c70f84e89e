//! # Maze Terrain Generator
//!
//! Perfect maze carved by randomized depth-first traversal.
//!
//! The map is modeled as a logical cell grid where each cell spans
//! `corridor_width` tiles and neighboring cells are separated by a one-tile
//! wall strip. Starting from the top-left cell, the carver repeatedly picks
//! an unvisited neighbor at random, opens the passage between the two cells,
//! and backtracks from dead ends via an explicit stack. Every cell is
//! reachable from the start by construction, so the walkable tiles form
//! exactly one connected component.
//!
//! Draw order: one uniform pick per step among the unvisited neighbors,
//! collected in N/W/E/S order.
//!
//! ## Parameters
//!
//! | key              | default | range  |
//! |------------------|---------|--------|
//! | `corridor_width` | 1       | 1..=8  |

use crate::generation::Params;
use crate::map::{Position, TileKind, TileMap};
use crate::rng::GenRng;

/// Generates a maze. Dimensions too small to hold a single cell yield the
/// all-Wall map rather than an error.
pub fn generate(width: u32, height: u32, seed: u64, params: &Params<'_>) -> TileMap {
    let corridor_width = params.u32_in("corridor_width", 1, 1, 8) as i32;
    let pitch = corridor_width + 1;

    let mut map = TileMap::filled(width, height, TileKind::Wall);

    // Logical cell counts; a cell needs `corridor_width` tiles plus the
    // leading wall strip.
    let cells_x = (width as i32 - 1) / pitch;
    let cells_y = (height as i32 - 1) / pitch;
    if cells_x == 0 || cells_y == 0 {
        return map;
    }

    let mut rng = GenRng::seeded(seed);
    let mut visited = vec![false; (cells_x * cells_y) as usize];
    let mut stack = vec![(0i32, 0i32)];
    visited[0] = true;
    carve_cell(&mut map, 0, 0, corridor_width, pitch);

    while let Some(&(cx, cy)) = stack.last() {
        let neighbors: Vec<(i32, i32)> = [(0, -1), (-1, 0), (1, 0), (0, 1)]
            .iter()
            .map(|(dx, dy)| (cx + dx, cy + dy))
            .filter(|&(nx, ny)| {
                nx >= 0
                    && ny >= 0
                    && nx < cells_x
                    && ny < cells_y
                    && !visited[(ny * cells_x + nx) as usize]
            })
            .collect();

        let Some(&(nx, ny)) = rng.pick(&neighbors) else {
            stack.pop();
            continue;
        };

        visited[(ny * cells_x + nx) as usize] = true;
        carve_cell(&mut map, nx, ny, corridor_width, pitch);
        carve_passage(&mut map, (cx, cy), (nx, ny), corridor_width, pitch);
        stack.push((nx, ny));
    }

    map
}

/// Opens the `corridor_width`-square tile block of one logical cell.
fn carve_cell(map: &mut TileMap, cx: i32, cy: i32, corridor_width: i32, pitch: i32) {
    let origin_x = 1 + cx * pitch;
    let origin_y = 1 + cy * pitch;
    for y in origin_y..origin_y + corridor_width {
        for x in origin_x..origin_x + corridor_width {
            map.set(Position::new(x, y), TileKind::Ground);
        }
    }
}

/// Opens the one-tile wall strip between two adjacent cells.
fn carve_passage(
    map: &mut TileMap,
    from: (i32, i32),
    to: (i32, i32),
    corridor_width: i32,
    pitch: i32,
) {
    let (fx, fy) = from;
    let (tx, ty) = to;

    if fy == ty {
        // Horizontal passage: the strip sits after the left cell's block.
        let left = fx.min(tx);
        let strip_x = 1 + left * pitch + corridor_width;
        let origin_y = 1 + fy * pitch;
        for y in origin_y..origin_y + corridor_width {
            map.set(Position::new(strip_x, y), TileKind::Ground);
        }
    } else {
        let top = fy.min(ty);
        let strip_y = 1 + top * pitch + corridor_width;
        let origin_x = 1 + fx * pitch;
        for x in origin_x..origin_x + corridor_width {
            map.set(Position::new(x, strip_y), TileKind::Ground);
        }
    }
}
