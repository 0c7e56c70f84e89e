//! # Tile Map
//!
//! The 2D terrain grid produced by the generators.
//!
//! A [`TileMap`] is mutable only inside this crate while a terrain generator
//! is carving it; once it leaves the generation pipeline it is effectively
//! immutable. The entity placer and the validator both consume it read-only.

use crate::map::{Position, TileKind};
use serde::{Deserialize, Serialize};

/// Row-major 2D grid of [`TileKind`] values.
///
/// Coordinates run `[0, width) × [0, height)` with `(0, 0)` at the top-left
/// corner.
///
/// # Examples
///
/// ```
/// use levelforge::{Position, TileKind, TileMap};
///
/// let map = TileMap::filled(8, 6, TileKind::Ground);
/// assert_eq!(map.width(), 8);
/// assert_eq!(map.height(), 6);
/// assert_eq!(map.tile(Position::new(3, 3)), Some(TileKind::Ground));
/// assert_eq!(map.tile(Position::new(8, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    /// Creates a map with every tile set to the given kind.
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width as usize) * (height as usize)],
        }
    }

    /// Map width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Returns the tile at the position, or `None` when out of bounds.
    pub fn tile(&self, pos: Position) -> Option<TileKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[self.index(pos)])
    }

    /// Whether the position is in bounds and on a walkable tile.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(TileKind::is_walkable).unwrap_or(false)
    }

    /// Whether a walkable tile touches at least one non-walkable neighbor.
    ///
    /// Out-of-bounds neighbors count as non-walkable, so tiles on the map
    /// edge qualify. Used by the `near_walls` placement strategy.
    pub fn is_wall_adjacent(&self, pos: Position) -> bool {
        if !self.is_walkable(pos) {
            return false;
        }
        pos.adjacent_positions()
            .into_iter()
            .any(|neighbor| !self.is_walkable(neighbor))
    }

    /// Collects every walkable position in row-major order.
    ///
    /// The fixed ordering matters: the placer indexes into this list with
    /// seeded draws, so iteration order is part of the determinism contract.
    pub fn walkable_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                if self.is_walkable(pos) {
                    positions.push(pos);
                }
            }
        }
        positions
    }

    /// Counts tiles of the given kind.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Iterates over `(position, kind)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        let width = self.width as i32;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let pos = Position::new(index as i32 % width, index as i32 / width);
            (pos, *kind)
        })
    }

    /// Sets the tile at an in-bounds position. Out-of-bounds writes are
    /// ignored so corridor carving can clip against the map edge.
    pub(crate) fn set(&mut self, pos: Position, kind: TileKind) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = kind;
        }
    }

    /// Replaces the whole grid from a row-major buffer of matching size.
    pub(crate) fn fill_from(&mut self, tiles: Vec<TileKind>) {
        debug_assert_eq!(tiles.len(), self.tiles.len());
        self.tiles = tiles;
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }
}
