//! Rejection-sampled room placement
//!
//! Footprints are compared on the map plane as padded axis-aligned boxes
//! (parry3d `Aabb`s flattened to `y = 0`). Touching counts as overlapping.

use glam::Vec3;
use parry3d::bounding_volume::{Aabb, BoundingVolume};
use parry3d::math::{Point, Vector};
use rand::Rng;

use crate::config::DungeonConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::snap_round;
use crate::room::{Room, RoomBlueprint, RoomCatalog, RoomHandle};

/// Rooms that made it onto the map, plus the ones that did not
#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Placed rooms in placement order; index 0 is the spawn room when it fit
    pub rooms: Vec<Room>,
    /// One `PlacementExhausted` per room that could not be placed
    pub skipped: Vec<LayoutError>,
}

/// Padded footprint of a room centred at `center`, flattened onto the map plane
pub fn padded_footprint(center: Vec3, size: Vec3, padding: f32) -> Aabb {
    Aabb::from_half_extents(
        Point::new(center.x, 0.0, center.z),
        Vector::new(size.x * 0.5 + padding, 0.0, size.z * 0.5 + padding),
    )
}

impl Placement {
    fn place<R: Rng + ?Sized>(&mut self, blueprint: &RoomBlueprint, config: &DungeonConfig, rng: &mut R) {
        match try_place_room(blueprint, &self.rooms, config, rng) {
            Ok(room) => self.rooms.push(room),
            Err(err) => {
                log::warn!("Skipping room: {}", err);
                self.skipped.push(err);
            }
        }
    }
}

fn map_bounds(config: &DungeonConfig) -> Aabb {
    let half = config.map_size * 0.5;
    Aabb::new(Point::new(-half.x, 0.0, -half.y), Point::new(half.x, 0.0, half.y))
}

/// Try to find a spot for `blueprint` among the `placed` rooms
///
/// Draws up to `config.max_placement_attempts` positions uniformly inside the
/// map, snapped to the corridor tile lattice. A position is accepted when the
/// padded footprint lies inside the map and does not touch any placed room's
/// padded footprint.
///
/// # Errors
///
/// Returns `PlacementExhausted` when every attempt is rejected.
pub fn try_place_room<R: Rng + ?Sized>(
    blueprint: &RoomBlueprint,
    placed: &[Room],
    config: &DungeonConfig,
    rng: &mut R,
) -> Result<Room> {
    let half_map = config.map_size * 0.5;
    let bounds = map_bounds(config);
    let padding = config.room_padding;

    let placed_boxes: Vec<Aabb> = placed
        .iter()
        .map(|room| padded_footprint(room.center(), room.size, padding))
        .collect();

    for attempt in 1..=config.max_placement_attempts {
        let sample = Vec3::new(
            rng.gen_range(-half_map.x..=half_map.x),
            0.0,
            rng.gen_range(-half_map.y..=half_map.y),
        );
        let position = snap_round(sample, config.corridor_tile_size, 0.0);
        let footprint = padded_footprint(position + blueprint.center_offset, blueprint.size, padding);

        if !bounds.contains(&footprint) {
            continue;
        }
        if placed_boxes.iter().any(|other| other.intersects(&footprint)) {
            continue;
        }

        log::debug!(
            "Placed '{}' at {} after {} attempt(s)",
            blueprint.name,
            position,
            attempt
        );
        return Ok(Room::from_blueprint(RoomHandle(placed.len()), blueprint, position));
    }

    Err(LayoutError::PlacementExhausted {
        blueprint: blueprint.name.clone(),
        attempts: config.max_placement_attempts,
    })
}

/// Place the spawn room, then `config.room_count` rooms drawn from the catalog
///
/// Rooms that cannot be placed are skipped and reported in
/// [`Placement::skipped`]; later rooms are still attempted.
///
/// # Errors
///
/// Returns `EmptyCatalog` if random rooms are requested but the catalog's
/// pool is empty.
pub fn place_rooms<R: Rng + ?Sized>(
    config: &DungeonConfig,
    catalog: &RoomCatalog,
    rng: &mut R,
) -> Result<Placement> {
    if config.room_count > 0 && catalog.rooms.is_empty() {
        return Err(LayoutError::EmptyCatalog);
    }

    let mut placement = Placement::default();
    placement.place(&catalog.spawn, config, rng);

    for _ in 0..config.room_count {
        let blueprint = &catalog.rooms[rng.gen_range(0..catalog.rooms.len())];
        placement.place(blueprint, config, rng);
    }

    Ok(placement)
}
