//! Door selection and finalisation
//!
//! Each end of a connection picks the door of its room that best faces the
//! other room, then resolves that door to the tile a corridor should start on.
//! Once every corridor is carved, doors are finalised as open or walled.

use glam::Vec3;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::snap_round;
use crate::room::{Door, DoorId, Room};

/// Weight of the facing term in the door score
pub const ALIGNMENT_WEIGHT: f32 = 2.0;

/// Which fallback tier produced a connection tile
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionSource {
    /// The door's active `CenterTile` marker, used as-is
    CenterMarker,
    /// First active `Tile` marker, snapped to the tile lattice
    TileMarker,
    /// The door's own position, snapped to the tile lattice
    DoorPosition,
    /// The room has no doors; its footprint centre is used
    RoomCenter,
}

/// Where a corridor should attach to a room
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorConnection {
    /// World position of the connection tile
    pub position: Vec3,
    /// Chosen door, `None` for doorless rooms
    pub door: Option<DoorId>,
    /// Tier that produced `position`
    pub source: ConnectionSource,
}

/// Score of `door` for a connection towards `target`
///
/// `2 * dot(outward, normalize(target - door)) - distance(door, target)`.
/// A target exactly on the door scores only the (zero) distance term.
pub fn door_score(door: &Door, target: Vec3) -> f32 {
    let to_target = (target - door.position).normalize_or_zero();
    door.outward.dot(to_target) * ALIGNMENT_WEIGHT - door.position.distance(target)
}

/// Best door of `room` for a connection towards `target`
///
/// Returns `None` when the room has no doors. Equal scores keep the earlier door.
pub fn select_door(room: &Room, target: Vec3) -> Option<&Door> {
    let mut best: Option<(&Door, f32)> = None;
    for door in &room.doors {
        let score = door_score(door, target);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((door, score)),
        }
    }
    best.map(|(door, _)| door)
}

/// Resolve a door to its connection tile
///
/// Falls back from the `CenterTile` marker to any active tile marker to the
/// door position; the last two are round-snapped to `tile_size` with their
/// height kept.
pub fn connection_tile(door: &Door, tile_size: f32) -> (Vec3, ConnectionSource) {
    if let Some(marker) = door.center_marker() {
        return (marker.offset, ConnectionSource::CenterMarker);
    }

    if let Some(marker) = door.tile_marker() {
        log::debug!("Door '{}' has no CenterTile marker, using '{}'", door.name, marker.name);
        let pos = marker.offset;
        return (snap_round(pos, tile_size, pos.y), ConnectionSource::TileMarker);
    }

    log::debug!("Door '{}' has no tile markers, using its own position", door.name);
    (
        snap_round(door.position, tile_size, door.position.y),
        ConnectionSource::DoorPosition,
    )
}

/// Pick the best door of `room` towards `target` and resolve it to a tile
pub fn resolve_connection(room: &Room, target: Vec3, tile_size: f32) -> DoorConnection {
    match select_door(room, target) {
        Some(door) => {
            let (position, source) = connection_tile(door, tile_size);
            DoorConnection {
                position,
                door: Some(door.id),
                source,
            }
        }
        None => DoorConnection {
            position: room.center(),
            door: None,
            source: ConnectionSource::RoomCenter,
        },
    }
}

/// Final state of a door after carving
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// A corridor reaches this door; show the door, hide its wall
    Open,
    /// No corridor reaches this door; show its wall instead
    Walled,
}

/// Finalised door with the name of the wall piece it pairs with
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorStatus {
    /// The door
    pub door: DoorId,
    /// Open or walled
    pub state: DoorState,
    /// Wall piece name: the door name with "Door" replaced by "Wall"
    pub wall: String,
}

/// Decide open/walled for every door of every room
pub fn finalize_doors(rooms: &[Room], connected: &HashSet<DoorId>) -> Vec<DoorStatus> {
    rooms
        .iter()
        .flat_map(|room| room.doors.iter())
        .map(|door| DoorStatus {
            door: door.id,
            state: if connected.contains(&door.id) {
                DoorState::Open
            } else {
                DoorState::Walled
            },
            wall: door.name.replace("Door", "Wall"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{DoorBlueprint, Facing, Marker, MarkerRole, RoomBlueprint, RoomHandle};

    fn room_at(handle: usize, position: Vec3) -> Room {
        let blueprint = RoomBlueprint::with_cardinal_doors("Room", 4.0, 4.0, 3.0);
        Room::from_blueprint(RoomHandle(handle), &blueprint, position)
    }

    #[test]
    fn test_select_door_faces_target() {
        let room = room_at(0, Vec3::ZERO);

        let east = select_door(&room, Vec3::new(20.0, 0.0, 1.0)).unwrap();
        assert_eq!(east.name, "Right Door");

        let north = select_door(&room, Vec3::new(-1.0, 0.0, 15.0)).unwrap();
        assert_eq!(north.name, "Up Door");

        let south_west = select_door(&room, Vec3::new(-3.0, 0.0, -30.0)).unwrap();
        assert_eq!(south_west.name, "Down Door");
    }

    #[test]
    fn test_distance_dominates_alignment() {
        // A door facing away but much closer still wins.
        let blueprint = RoomBlueprint::new("Hall", Vec3::new(20.0, 3.0, 4.0))
            .with_door(DoorBlueprint::new("Left Door", Facing::Left, Vec3::new(-10.0, 0.0, 0.0)))
            .with_door(DoorBlueprint::new("Up Door", Facing::Up, Vec3::new(8.0, 0.0, 2.0)));
        let room = Room::from_blueprint(RoomHandle(0), &blueprint, Vec3::ZERO);

        // Left: 2 * -0.64 - 7.81; Up: 2 * 0.29 - 13.6
        let door = select_door(&room, Vec3::new(-5.0, 0.0, 6.0)).unwrap();
        assert_eq!(door.name, "Left Door");
    }

    #[test]
    fn test_doorless_room_uses_centre() {
        let mut blueprint = RoomBlueprint::new("Closet", Vec3::new(4.0, 3.0, 4.0));
        blueprint.center_offset = Vec3::new(1.0, 0.0, 0.0);
        let room = Room::from_blueprint(RoomHandle(2), &blueprint, Vec3::new(5.0, 0.0, 5.0));

        assert!(select_door(&room, Vec3::ZERO).is_none());
        let connection = resolve_connection(&room, Vec3::ZERO, 1.0);
        assert_eq!(connection.position, Vec3::new(6.0, 0.0, 5.0));
        assert_eq!(connection.door, None);
        assert_eq!(connection.source, ConnectionSource::RoomCenter);
    }

    #[test]
    fn test_connection_tile_fallback_tiers() {
        let base = DoorBlueprint::new("Up Door", Facing::Up, Vec3::new(0.3, 0.0, 2.0));

        let with_center = base
            .clone()
            .with_marker(Marker::new("Tile", MarkerRole::Tile, Vec3::new(1.2, 0.0, 2.6)))
            .with_marker(Marker::new("CenterTile", MarkerRole::CenterTile, Vec3::new(0.3, 0.0, 2.5)));
        let with_tile = base
            .clone()
            .with_marker(Marker::new("Tile", MarkerRole::Tile, Vec3::new(1.2, 0.0, 2.6)));
        let mut inactive = Marker::new("CenterTile", MarkerRole::CenterTile, Vec3::ZERO);
        inactive.active = false;
        let bare = base.with_marker(inactive);

        let blueprint = RoomBlueprint::new("Room", Vec3::new(4.0, 3.0, 4.0))
            .with_door(with_center)
            .with_door(with_tile)
            .with_door(bare);
        let room = Room::from_blueprint(RoomHandle(0), &blueprint, Vec3::new(10.0, 0.0, 0.0));

        let (pos, source) = connection_tile(&room.doors[0], 1.0);
        assert_eq!(source, ConnectionSource::CenterMarker);
        assert_eq!(pos, Vec3::new(10.3, 0.0, 2.5));

        let (pos, source) = connection_tile(&room.doors[1], 1.0);
        assert_eq!(source, ConnectionSource::TileMarker);
        assert_eq!(pos, Vec3::new(11.0, 0.0, 3.0));

        let (pos, source) = connection_tile(&room.doors[2], 1.0);
        assert_eq!(source, ConnectionSource::DoorPosition);
        assert_eq!(pos, Vec3::new(10.0, 0.0, 2.0));
    }

    #[test]
    fn test_resolve_connection_reports_door() {
        let room = room_at(4, Vec3::new(-10.0, 0.0, 0.0));
        let connection = resolve_connection(&room, Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert_eq!(connection.door, Some(DoorId { room: RoomHandle(4), index: 3 }));
        assert_eq!(connection.source, ConnectionSource::CenterMarker);
        assert_eq!(connection.position, Vec3::new(-7.5, 0.0, 0.0));
    }

    #[test]
    fn test_finalize_doors() {
        let rooms = vec![room_at(0, Vec3::ZERO), room_at(1, Vec3::new(20.0, 0.0, 0.0))];
        let connected: HashSet<DoorId> = [
            DoorId { room: RoomHandle(0), index: 3 },
            DoorId { room: RoomHandle(1), index: 2 },
        ]
        .into_iter()
        .collect();

        let statuses = finalize_doors(&rooms, &connected);
        assert_eq!(statuses.len(), 8);
        let open: Vec<&DoorStatus> = statuses.iter().filter(|s| s.state == DoorState::Open).collect();
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].wall, "Right Wall");
        assert_eq!(open[1].wall, "Left Wall");
    }
}
