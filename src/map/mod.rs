//! # Map Module
//!
//! Tile-grid primitives shared by every pipeline stage.
//!
//! This module contains the fundamental spatial building blocks of the
//! engine:
//! - Integer tile coordinates and distance geometry
//! - The closed set of terrain tile kinds and their walkability
//! - The immutable-after-construction tile grid itself

pub mod tilemap;

pub use tilemap::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D tile coordinate in a level grid.
///
/// # Examples
///
/// ```
/// use levelforge::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.adjacent_positions();
/// assert_eq!(adjacent.len(), 8); // All 8 surrounding positions
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use levelforge::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Euclidean distance to another position.
    ///
    /// All placement distance constraints are measured with this metric.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns all 8 adjacent positions (including diagonals).
    pub fn adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x - 1, self.y - 1), // NW
            Position::new(self.x, self.y - 1),     // N
            Position::new(self.x + 1, self.y - 1), // NE
            Position::new(self.x - 1, self.y),     // W
            Position::new(self.x + 1, self.y),     // E
            Position::new(self.x - 1, self.y + 1), // SW
            Position::new(self.x, self.y + 1),     // S
            Position::new(self.x + 1, self.y + 1), // SE
        ]
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    ///
    /// Connectivity and reachability are computed over this neighborhood.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Terrain category of a single grid cell.
///
/// The set is closed: terrain generators only ever emit these kinds, and
/// each kind carries a static walkability verdict that the placer and the
/// validator both rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Ground,
    Wall,
    Water,
    Grass,
    Sand,
    Stone,
    Lava,
    Ice,
}

impl TileKind {
    /// Whether entities may stand on this tile kind.
    ///
    /// Walkability also defines the graph over which reachability is
    /// computed: two walkable tiles are connected when cardinally adjacent.
    ///
    /// # Examples
    ///
    /// ```
    /// use levelforge::TileKind;
    ///
    /// assert!(TileKind::Ground.is_walkable());
    /// assert!(TileKind::Ice.is_walkable());
    /// assert!(!TileKind::Wall.is_walkable());
    /// assert!(!TileKind::Lava.is_walkable());
    /// ```
    pub fn is_walkable(self) -> bool {
        match self {
            TileKind::Ground | TileKind::Grass | TileKind::Sand | TileKind::Stone | TileKind::Ice => {
                true
            }
            TileKind::Wall | TileKind::Water | TileKind::Lava => false,
        }
    }

    /// Short display name used in reports and logs.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Ground => "ground",
            TileKind::Wall => "wall",
            TileKind::Water => "water",
            TileKind::Grass => "grass",
            TileKind::Sand => "sand",
            TileKind::Stone => "stone",
            TileKind::Lava => "lava",
            TileKind::Ice => "ice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
    }

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
    }

    #[test]
    fn test_position_euclidean_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.euclidean_distance(pos2), 5.0);
    }

    #[test]
    fn test_position_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.adjacent_positions();
        assert_eq!(adjacent.len(), 8);
        assert!(adjacent.contains(&Position::new(4, 4)));
        assert!(adjacent.contains(&Position::new(6, 6)));
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(5, 4))); // North
        assert!(adjacent.contains(&Position::new(4, 5))); // West
        assert!(!adjacent.contains(&Position::new(4, 4))); // No diagonal
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_walkability_partition() {
        let walkable = [
            TileKind::Ground,
            TileKind::Grass,
            TileKind::Sand,
            TileKind::Stone,
            TileKind::Ice,
        ];
        let blocked = [TileKind::Wall, TileKind::Water, TileKind::Lava];

        for kind in walkable {
            assert!(kind.is_walkable(), "{} should be walkable", kind.name());
        }
        for kind in blocked {
            assert!(!kind.is_walkable(), "{} should block", kind.name());
        }
    }
}
