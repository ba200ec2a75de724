//! World queries the generator needs from its host
//!
//! The grid asks a [`WalkabilityOracle`] once per cell, and wall derivation asks
//! a [`RoomGeometry`] whether a wall slot is already occupied and how high the
//! floor is there. Hosts can back these with a physics engine; [`RoomFootprints`]
//! answers both from the placed rooms' boxes alone.

use glam::{Vec2, Vec3};

use crate::geometry::planar;
use crate::room::Room;

/// Answers "can a corridor pass through this point?"
pub trait WalkabilityOracle {
    /// Whether the cell centred at `position` is free of obstacles
    fn is_walkable(&self, position: Vec3) -> bool;
}

impl<F> WalkabilityOracle for F
where
    F: Fn(Vec3) -> bool,
{
    fn is_walkable(&self, position: Vec3) -> bool {
        self(position)
    }
}

/// Answers questions about room geometry when placing corridor walls
pub trait RoomGeometry {
    /// Whether a box of the given half extent centred at `position` touches room walls or floors
    fn is_blocked(&self, position: Vec3, half_extent: f32) -> bool;

    /// Floor height below `position`, if any room floor is there
    fn ground_height(&self, position: Vec3) -> Option<f32>;
}

/// Obstacle model built from placed room footprints
///
/// A point is unwalkable when it lies inside any room footprint; room floors
/// sit at each room's `position.y`.
#[derive(Debug, Clone, Default)]
pub struct RoomFootprints {
    boxes: Vec<FootprintBox>,
}

#[derive(Debug, Clone, Copy)]
struct FootprintBox {
    center: Vec2,
    half: Vec2,
    floor_y: f32,
}

impl FootprintBox {
    fn overlaps(&self, point: Vec2, margin: f32) -> bool {
        let offset = (point - self.center).abs();
        offset.x < self.half.x + margin && offset.y < self.half.y + margin
    }
}

impl RoomFootprints {
    /// Build from placed rooms
    pub fn new(rooms: &[Room]) -> Self {
        let boxes = rooms
            .iter()
            .map(|room| FootprintBox {
                center: room.planar_center(),
                half: Vec2::new(room.size.x, room.size.z) * 0.5,
                floor_y: room.position.y,
            })
            .collect();
        Self { boxes }
    }

    /// Number of footprints tracked
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether no footprints are tracked
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl WalkabilityOracle for RoomFootprints {
    fn is_walkable(&self, position: Vec3) -> bool {
        let point = planar(position);
        !self.boxes.iter().any(|b| b.overlaps(point, 0.0))
    }
}

impl RoomGeometry for RoomFootprints {
    fn is_blocked(&self, position: Vec3, half_extent: f32) -> bool {
        let point = planar(position);
        self.boxes.iter().any(|b| b.overlaps(point, half_extent))
    }

    fn ground_height(&self, position: Vec3) -> Option<f32> {
        let point = planar(position);
        self.boxes
            .iter()
            .find(|b| b.overlaps(point, 0.0))
            .map(|b| b.floor_y)
    }
}
