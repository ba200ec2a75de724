//! Room and Door Structures
//!
//! A [`RoomBlueprint`] is the authoring-time description of a room asset: its
//! footprint and the doors it exposes, in local space. Placement turns a
//! blueprint into a [`Room`] with world-space [`Door`]s.

use glam::{Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::planar;

/// Cardinal direction a door opens towards (map plane, `+z` is "up")
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    /// `+z`
    Up,
    /// `-z`
    Down,
    /// `-x`
    Left,
    /// `+x`
    Right,
}

impl Facing {
    /// All four facings
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    /// Unit outward vector in world space
    pub fn vector(self) -> Vec3 {
        match self {
            Facing::Up => Vec3::Z,
            Facing::Down => Vec3::NEG_Z,
            Facing::Left => Vec3::NEG_X,
            Facing::Right => Vec3::X,
        }
    }

    /// Infer a facing from a legacy asset name
    ///
    /// Case-insensitive substring match checked in the order `up`, `down`,
    /// `right`, `left`; the first keyword found wins.
    pub fn from_name(name: &str) -> Option<Facing> {
        let lower = name.to_lowercase();
        [
            ("up", Facing::Up),
            ("down", Facing::Down),
            ("right", Facing::Right),
            ("left", Facing::Left),
        ]
        .into_iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, facing)| facing)
    }

    /// Round an arbitrary direction to its dominant cardinal axis
    ///
    /// Ties between `|x|` and `|z|` resolve to the z axis.
    pub fn from_vector(direction: Vec3) -> Facing {
        if direction.x.abs() > direction.z.abs() {
            if direction.x >= 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if direction.z >= 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    }
}

/// What a marker attached to a door stands for
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// The designated tile a corridor should start from
    CenterTile,
    /// Any other floor tile of the door's extension
    Tile,
    /// Decoration or anything the generator should ignore
    Other,
}

impl MarkerRole {
    /// Infer a role from a legacy marker name (`CenterTile`, `*Tile*`, other)
    pub fn from_name(name: &str) -> MarkerRole {
        if name == "CenterTile" {
            MarkerRole::CenterTile
        } else if name.contains("Tile") {
            MarkerRole::Tile
        } else {
            MarkerRole::Other
        }
    }
}

/// A positioned marker in a door's extension
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Asset name, kept for diagnostics and legacy role inference
    pub name: String,
    /// Explicit role
    pub role: MarkerRole,
    /// Offset from the room position
    pub offset: Vec3,
    /// Inactive markers are ignored
    pub active: bool,
}

impl Marker {
    /// An active marker with an explicit role
    pub fn new(name: impl Into<String>, role: MarkerRole, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            role,
            offset,
            active: true,
        }
    }

    /// An active marker whose role is inferred from its name
    pub fn from_legacy_name(name: impl Into<String>, offset: Vec3) -> Self {
        let name = name.into();
        let role = MarkerRole::from_name(&name);
        Self::new(name, role, offset)
    }
}

/// Authoring-time description of one door of a room asset
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DoorBlueprint {
    /// Asset name (e.g. "Up Door")
    pub name: String,
    /// Explicit outward facing; `None` falls back to the name, then `forward`
    pub facing: Option<Facing>,
    /// Stored forward vector of the door object
    pub forward: Vec3,
    /// Offset from the room position
    pub offset: Vec3,
    /// Extension markers
    pub markers: Vec<Marker>,
}

impl DoorBlueprint {
    /// A door with explicit facing and no markers
    pub fn new(name: impl Into<String>, facing: Facing, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            facing: Some(facing),
            forward: facing.vector(),
            offset,
            markers: Vec::new(),
        }
    }

    /// Add a marker
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Outward direction: explicit facing, then name keywords, then `forward`
    pub fn outward_direction(&self) -> Vec3 {
        self.facing
            .or_else(|| Facing::from_name(&self.name))
            .map(Facing::vector)
            .unwrap_or(self.forward)
    }
}

/// Authoring-time description of a room asset
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoomBlueprint {
    /// Asset name
    pub name: String,
    /// Footprint size (x, height, z)
    pub size: Vec3,
    /// Offset of the footprint centre from the room position
    pub center_offset: Vec3,
    /// Doors in declaration order
    pub doors: Vec<DoorBlueprint>,
}

impl RoomBlueprint {
    /// A blueprint with a centred footprint and no doors
    pub fn new(name: impl Into<String>, size: Vec3) -> Self {
        Self {
            name: name.into(),
            size,
            center_offset: Vec3::ZERO,
            doors: Vec::new(),
        }
    }

    /// Add a door
    pub fn with_door(mut self, door: DoorBlueprint) -> Self {
        self.doors.push(door);
        self
    }

    /// Rectangular room with one door at the middle of each wall
    ///
    /// Each door carries a `CenterTile` marker half a tile outside the
    /// footprint, so corridors start on floor just beyond the doorway.
    pub fn with_cardinal_doors(name: impl Into<String>, width: f32, depth: f32, height: f32) -> Self {
        let mut blueprint = Self::new(name, Vec3::new(width, height, depth));
        let half = Vec2::new(width, depth) * 0.5;

        for facing in Facing::ALL {
            let dir = facing.vector();
            let edge = Vec3::new(dir.x * half.x, 0.0, dir.z * half.y);
            let label = format!("{:?} Door", facing);
            let door = DoorBlueprint::new(label, facing, edge).with_marker(Marker::new(
                "CenterTile",
                MarkerRole::CenterTile,
                edge + dir * 0.5,
            ));
            blueprint = blueprint.with_door(door);
        }

        blueprint
    }
}

/// The set of room assets a generation run draws from
///
/// The spawn blueprint is placed first; the remaining rooms are drawn
/// uniformly from `rooms`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCatalog {
    /// Room placed before all others
    pub spawn: RoomBlueprint,
    /// Pool for the random rooms
    pub rooms: Vec<RoomBlueprint>,
}

impl RoomCatalog {
    /// Create a catalog
    pub fn new(spawn: RoomBlueprint, rooms: Vec<RoomBlueprint>) -> Self {
        Self { spawn, rooms }
    }

    /// Catalog where every room, spawn included, is the same square room
    pub fn uniform(side: f32) -> Self {
        let spawn = RoomBlueprint::with_cardinal_doors("Spawn Room", side, side, 3.0);
        let room = RoomBlueprint::with_cardinal_doors("Room", side, side, 3.0);
        Self::new(spawn, vec![room])
    }
}

/// Opaque handle to a placed room (its index in placement order)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomHandle(pub usize);

/// Identifies one door of one placed room
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorId {
    /// Owning room
    pub room: RoomHandle,
    /// Index into the room's door list
    pub index: usize,
}

/// A door of a placed room, in world space
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    /// Stable identifier (owner room + index)
    pub id: DoorId,
    /// Asset name
    pub name: String,
    /// Unit-ish direction pointing out of the room
    pub outward: Vec3,
    /// World position of the door
    pub position: Vec3,
    /// Extension markers with world-space offsets applied
    pub markers: Vec<Marker>,
}

impl Door {
    /// The active `CenterTile` marker, if any
    pub fn center_marker(&self) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.active && m.role == MarkerRole::CenterTile)
    }

    /// The first active plain `Tile` marker, if any
    pub fn tile_marker(&self) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.active && m.role == MarkerRole::Tile)
    }

    /// World positions of every active tile marker, flattened to `floor_y`
    pub fn extension_tiles(&self, floor_y: f32) -> Vec<Vec3> {
        self.markers
            .iter()
            .filter(|m| m.active && m.role != MarkerRole::Other)
            .map(|m| Vec3::new(m.offset.x, floor_y, m.offset.z))
            .collect()
    }
}

/// A room that was successfully placed on the map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Handle (placement order index)
    pub handle: RoomHandle,
    /// Name of the blueprint it was placed from
    pub blueprint: String,
    /// Snapped world position
    pub position: Vec3,
    /// Footprint size
    pub size: Vec3,
    /// Offset of the footprint centre from `position`
    pub center_offset: Vec3,
    /// Doors in blueprint order
    pub doors: Vec<Door>,
}

impl Room {
    /// Instantiate a blueprint at `position`, resolving its doors to world space
    pub fn from_blueprint(handle: RoomHandle, blueprint: &RoomBlueprint, position: Vec3) -> Self {
        let doors = blueprint
            .doors
            .iter()
            .enumerate()
            .map(|(index, door)| Door {
                id: DoorId {
                    room: handle,
                    index,
                },
                name: door.name.clone(),
                outward: door.outward_direction(),
                position: position + door.offset,
                markers: door
                    .markers
                    .iter()
                    .map(|m| Marker {
                        offset: position + m.offset,
                        ..m.clone()
                    })
                    .collect(),
            })
            .collect();

        Self {
            handle,
            blueprint: blueprint.name.clone(),
            position,
            size: blueprint.size,
            center_offset: blueprint.center_offset,
            doors,
        }
    }

    /// World-space centre of the footprint
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + self.center_offset
    }

    /// Centre projected onto the map plane (the triangulation vertex)
    #[inline]
    pub fn planar_center(&self) -> Vec2 {
        planar(self.center())
    }

    /// Whether a map-plane point lies inside the footprint (edges inclusive)
    pub fn contains_planar(&self, point: Vec2) -> bool {
        let offset = (point - self.planar_center()).abs();
        let half = Vec2::new(self.size.x, self.size.z) * 0.5;
        offset.x <= half.x && offset.y <= half.y
    }

    /// Look up a door by id
    pub fn door(&self, id: DoorId) -> Option<&Door> {
        if id.room != self.handle {
            return None;
        }
        self.doors.get(id.index)
    }
}
