//! # Rooms Terrain Generator
//!
//! Rectangular rooms joined by L-shaped corridors.
//!
//! Rooms are placed by rejection sampling: each candidate gets a seeded
//! position and size, and is dropped when it would touch an existing room
//! (a one-tile wall margin is kept between rooms). Placed rooms are carved
//! into an all-Wall canvas and chained together with L-shaped corridors;
//! a few seeded extra connections add loops so the layout is not a pure
//! tree.
//!
//! Draw order per generation: room count, then per-candidate `(w, h, x, y)`
//! quads, then one orientation draw per corridor, then the extra-connection
//! pair draws.
//!
//! ## Parameters
//!
//! | key                      | default | range      |
//! |--------------------------|---------|------------|
//! | `min_rooms`              | 4       | 1..=64     |
//! | `max_rooms`              | 10      | 1..=64     |
//! | `min_room_size`          | 4       | 3..=32     |
//! | `max_room_size`          | 10      | 3..=32     |
//! | `extra_connection_chance`| 0.15    | 0.0..=1.0  |

use crate::generation::Params;
use crate::map::{Position, TileKind, TileMap};
use crate::rng::GenRng;

/// Candidate placements tried per room before giving up on it.
const MAX_ROOM_ATTEMPTS: u32 = 100;

/// A placed rectangular room, walls included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Room {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Room {
    fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test with a one-tile margin so neighboring rooms keep a wall
    /// between them.
    fn touches(&self, other: &Room) -> bool {
        !(self.x >= other.x + other.width + 1
            || other.x >= self.x + self.width + 1
            || self.y >= other.y + other.height + 1
            || other.y >= self.y + self.height + 1)
    }
}

/// Generates a room-and-corridor layout.
///
/// Maps too small for a single 3x3 room fall back to carving the whole
/// interior open; the function is total either way.
pub fn generate(width: u32, height: u32, seed: u64, params: &Params<'_>) -> TileMap {
    let min_rooms = params.u32_in("min_rooms", 4, 1, 64);
    let max_rooms = params.u32_in("max_rooms", 10, 1, 64).max(min_rooms);
    let min_size = params.u32_in("min_room_size", 4, 3, 32) as i32;
    let max_size = params.u32_in("max_room_size", 10, 3, 32) as i32;
    let extra_connection_chance = params.f64_in("extra_connection_chance", 0.15, 0.0, 1.0);

    let mut map = TileMap::filled(width, height, TileKind::Wall);
    let w = width as i32;
    let h = height as i32;

    // Room plus its surrounding wall needs a 3x3 interior at minimum.
    if w < 5 || h < 5 {
        carve_rect(&mut map, 1, 1, w - 2, h - 2);
        return map;
    }

    let size_cap = (w - 2).min(h - 2);
    let max_size = max_size.min(size_cap);
    let min_size = min_size.min(max_size);

    let mut rng = GenRng::seeded(seed);
    let room_count = rng.range_u32(min_rooms, max_rooms + 1);

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..room_count {
        if let Some(room) = try_place_room(w, h, &rooms, &mut rng, min_size, max_size) {
            carve_rect(&mut map, room.x, room.y, room.width, room.height);
            rooms.push(room);
        }
    }

    // Guarantee some walkable space even when every candidate collided.
    if rooms.is_empty() {
        carve_rect(&mut map, 1, 1, size_cap.min(4), size_cap.min(4));
        return map;
    }

    // Chain successive rooms, then sprinkle extra loops.
    for i in 0..rooms.len().saturating_sub(1) {
        carve_l_corridor(&mut map, rooms[i].center(), rooms[i + 1].center(), &mut rng);
    }

    let extra = (rooms.len() as f64 * extra_connection_chance).round() as usize;
    for _ in 0..extra {
        let a = rng.range_u32(0, rooms.len() as u32) as usize;
        let b = rng.range_u32(0, rooms.len() as u32) as usize;
        if a != b {
            carve_l_corridor(&mut map, rooms[a].center(), rooms[b].center(), &mut rng);
        }
    }

    map
}

/// Samples one room candidate per attempt until one fits.
///
/// Rooms stay one tile off every map edge.
fn try_place_room(
    w: i32,
    h: i32,
    existing: &[Room],
    rng: &mut GenRng,
    min_size: i32,
    max_size: i32,
) -> Option<Room> {
    for _ in 0..MAX_ROOM_ATTEMPTS {
        let room_w = rng.range_i32(min_size, max_size + 1);
        let room_h = rng.range_i32(min_size, max_size + 1);
        let room = Room {
            x: rng.range_i32(1, (w - room_w - 1).max(2)),
            y: rng.range_i32(1, (h - room_h - 1).max(2)),
            width: room_w,
            height: room_h,
        };

        if room.x + room.width > w - 1 || room.y + room.height > h - 1 {
            continue;
        }
        if existing.iter().any(|other| room.touches(other)) {
            continue;
        }
        return Some(room);
    }
    None
}

fn carve_rect(map: &mut TileMap, x: i32, y: i32, width: i32, height: i32) {
    for ty in y..y + height {
        for tx in x..x + width {
            map.set(Position::new(tx, ty), TileKind::Ground);
        }
    }
}

/// Carves an L-shaped corridor between two points; the elbow orientation is
/// one seeded draw.
fn carve_l_corridor(map: &mut TileMap, start: Position, end: Position, rng: &mut GenRng) {
    let horizontal_first = rng.chance(0.5);
    let elbow = if horizontal_first {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };

    carve_line(map, start, elbow);
    carve_line(map, elbow, end);
}

/// Carves a straight axis-aligned run of Ground tiles.
fn carve_line(map: &mut TileMap, from: Position, to: Position) {
    if from.y == to.y {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            map.set(Position::new(x, from.y), TileKind::Ground);
        }
    } else {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            map.set(Position::new(from.x, y), TileKind::Ground);
        }
    }
}
