//! Spatial indexing for point-to-room lookups
//!
//! Connectivity edges carry only room-centre points; the corridor stage maps
//! each endpoint back to the room whose footprint contains it. With the
//! `spatial-index` feature the candidate room comes from a KD-tree over room
//! centres, otherwise from a linear scan.

use glam::Vec2;

use crate::room::{Room, RoomHandle};

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Lookup structure from map-plane points to placed rooms
///
/// # Example
///
/// ```
/// use rust_dungeon_layout::*;
/// use glam::{Vec2, Vec3};
///
/// let blueprint = RoomBlueprint::new("Box", Vec3::new(4.0, 3.0, 4.0));
/// let rooms = vec![
///     Room::from_blueprint(RoomHandle(0), &blueprint, Vec3::new(-10.0, 0.0, 0.0)),
///     Room::from_blueprint(RoomHandle(1), &blueprint, Vec3::new(10.0, 0.0, 0.0)),
/// ];
///
/// let index = RoomIndex::new(&rooms);
/// assert_eq!(index.room_at(Vec2::new(9.0, 1.0)), Some(RoomHandle(1)));
/// assert_eq!(index.room_at(Vec2::new(0.0, 0.0)), None);
/// ```
#[derive(Clone)]
pub struct RoomIndex {
    rooms: Vec<IndexedRoom>,
    #[cfg(feature = "spatial-index")]
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

#[derive(Debug, Clone, Copy)]
struct IndexedRoom {
    handle: RoomHandle,
    center: Vec2,
    half: Vec2,
}

impl IndexedRoom {
    fn contains(&self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half.x && offset.y <= self.half.y
    }
}

impl RoomIndex {
    /// Build the index from placed rooms
    pub fn new(rooms: &[Room]) -> Self {
        let rooms: Vec<IndexedRoom> = rooms
            .iter()
            .map(|room| IndexedRoom {
                handle: room.handle,
                center: room.planar_center(),
                half: Vec2::new(room.size.x, room.size.z) * 0.5,
            })
            .collect();

        #[cfg(feature = "spatial-index")]
        let tree = if rooms.is_empty() {
            None
        } else {
            let points: Vec<[f32; 2]> = rooms.iter().map(|r| [r.center.x, r.center.y]).collect();
            Some(ImmutableKdTree::new_from_slice(&points))
        };

        Self {
            rooms,
            #[cfg(feature = "spatial-index")]
            tree,
        }
    }

    /// Number of indexed rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are indexed
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room whose footprint contains `point`, if any
    ///
    /// Placed footprints never overlap, so the containing room is unique. The
    /// nearest centre is tried first; a linear scan covers elongated rooms whose
    /// centre is not the closest one.
    pub fn room_at(&self, point: Vec2) -> Option<RoomHandle> {
        if let Some(candidate) = self.nearest(point) {
            let room = &self.rooms[candidate];
            if room.contains(point) {
                return Some(room.handle);
            }
        }

        self.rooms
            .iter()
            .find(|room| room.contains(point))
            .map(|room| room.handle)
    }

    #[cfg(feature = "spatial-index")]
    fn nearest(&self, point: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[point.x, point.y]);
        Some(result.item as usize)
    }

    #[cfg(not(feature = "spatial-index"))]
    fn nearest(&self, point: Vec2) -> Option<usize> {
        self.rooms
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.center
                    .distance_squared(point)
                    .total_cmp(&b.center.distance_squared(point))
            })
            .map(|(i, _)| i)
    }
}
