//! Corridor carving and wall derivation
//!
//! Every spanning-tree edge is mapped back to its two rooms, each end picks a
//! door, and the pathfinder runs door to door. Path cells are floor-snapped to
//! the corridor tile lattice and merged into one append-only tile set; tiles
//! claimed by an earlier corridor are not claimed again. Walls go on every
//! tile side that borders neither another tile nor room geometry.

use glam::Vec3;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::{LayoutError, Result};
use crate::generation::doors::{resolve_connection, DoorConnection};
use crate::geometry::{snap_floor, Edge};
use crate::grid::Grid;
use crate::oracle::RoomGeometry;
use crate::pathfinding::find_path;
use crate::room::{DoorId, Facing, Room, RoomHandle};
use crate::spatial::RoomIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TileKey([u32; 3]);

impl TileKey {
    fn new(position: Vec3) -> Self {
        let p = position + Vec3::ZERO;
        Self([p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
    }
}

/// Insertion-ordered set of unique corridor tile positions
///
/// Positions are compared exactly. Tiles are never removed.
///
/// # Example
///
/// ```
/// use rust_dungeon_layout::generation::CorridorTileSet;
/// use glam::Vec3;
///
/// let mut tiles = CorridorTileSet::new();
/// assert!(tiles.insert(Vec3::new(0.5, 0.0, 0.5)));
/// assert!(!tiles.insert(Vec3::new(0.5, 0.0, 0.5)));
/// assert_eq!(tiles.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CorridorTileSet {
    tiles: Vec<Vec3>,
    keys: HashSet<TileKey>,
}

impl CorridorTileSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile; `false` (and no change) if it was already present
    pub fn insert(&mut self, position: Vec3) -> bool {
        if self.keys.insert(TileKey::new(position)) {
            self.tiles.push(position);
            true
        } else {
            false
        }
    }

    /// Whether `position` has been carved
    pub fn contains(&self, position: Vec3) -> bool {
        self.keys.contains(&TileKey::new(position))
    }

    /// Number of distinct tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has been carved
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.tiles.iter()
    }

    /// Tiles in insertion order, as a slice
    pub fn as_slice(&self) -> &[Vec3] {
        &self.tiles
    }
}

/// One carved connection between two rooms
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Corridor {
    /// Room at the first edge endpoint
    pub from: RoomHandle,
    /// Room at the second edge endpoint
    pub to: RoomHandle,
    /// Where the corridor leaves `from`
    pub start: DoorConnection,
    /// Where the corridor enters `to`
    pub end: DoorConnection,
    /// Grid cell centres visited by the search, start to end
    pub path: Vec<Vec3>,
    /// Tiles this corridor added to the shared set (earlier claims excluded)
    pub tiles: Vec<Vec3>,
}

/// A connection that could not be carved
#[derive(Debug, Clone, PartialEq)]
pub struct FailedConnection {
    /// Room at the first edge endpoint
    pub from: RoomHandle,
    /// Room at the second edge endpoint
    pub to: RoomHandle,
    /// `NoPath` or `InvalidEndpoint`
    pub reason: LayoutError,
}

/// Everything produced by one carving pass
#[derive(Debug, Clone, Default)]
pub struct CarveOutcome {
    /// Successfully carved corridors, in edge order
    pub corridors: Vec<Corridor>,
    /// Edges whose path search failed
    pub failures: Vec<FailedConnection>,
    /// Union of all corridor tiles
    pub tiles: CorridorTileSet,
    /// Doors that a carved corridor reaches
    pub connected_doors: HashSet<DoorId>,
}

/// A wall segment bordering a corridor tile
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlacement {
    /// Midpoint of the tile side, at floor height
    pub position: Vec3,
    /// Side of the tile the wall closes off (points away from the corridor)
    pub facing: Facing,
}

impl WallPlacement {
    /// Unit vector pointing away from the corridor
    pub fn outward(&self) -> Vec3 {
        self.facing.vector()
    }
}

/// Carve one corridor per edge
///
/// Edge endpoints that do not fall inside any room are skipped with a warning.
/// A search must return at least two cells to count as a corridor.
pub fn carve_corridors(
    grid: &Grid,
    edges: &[Edge],
    rooms: &[Room],
    index: &RoomIndex,
    config: &DungeonConfig,
) -> CarveOutcome {
    let mut outcome = CarveOutcome::default();

    for edge in edges {
        let endpoints = index
            .room_at(edge.a)
            .zip(index.room_at(edge.b))
            .and_then(|(a, b)| rooms.get(a.0).zip(rooms.get(b.0)));

        let Some((from, to)) = endpoints else {
            log::warn!("Edge {} -> {} does not start and end in rooms", edge.a, edge.b);
            continue;
        };

        let start = resolve_connection(from, to.center(), config.corridor_tile_size);
        let end = resolve_connection(to, from.center(), config.corridor_tile_size);

        match carve_path(grid, &start, &end, config) {
            Ok(path) => {
                let mut corridor_tiles = HashSet::with_capacity(path.len());
                let mut claimed = Vec::new();
                for &point in &path {
                    let tile = snap_floor(point, config.corridor_tile_size, point.y);
                    if corridor_tiles.insert(TileKey::new(tile)) && outcome.tiles.insert(tile) {
                        claimed.push(tile);
                    }
                }

                outcome.connected_doors.extend(start.door);
                outcome.connected_doors.extend(end.door);

                log::debug!(
                    "Corridor {} -> {}: {} cells, {} new tiles",
                    from.handle.0,
                    to.handle.0,
                    path.len(),
                    claimed.len()
                );

                outcome.corridors.push(Corridor {
                    from: from.handle,
                    to: to.handle,
                    start,
                    end,
                    path,
                    tiles: claimed,
                });
            }
            Err(reason) => {
                log::warn!(
                    "Skipping connection {} -> {}: {}",
                    from.handle.0,
                    to.handle.0,
                    reason
                );
                outcome.failures.push(FailedConnection {
                    from: from.handle,
                    to: to.handle,
                    reason,
                });
            }
        }
    }

    outcome
}

/// Search between two connection tiles, nudged onto walkable cells
fn carve_path(
    grid: &Grid,
    start: &DoorConnection,
    end: &DoorConnection,
    config: &DungeonConfig,
) -> Result<Vec<Vec3>> {
    let tile = config.corridor_tile_size;
    let radius = config.nearest_walkable_radius;

    let from = snap_floor(start.position, tile, start.position.y);
    let to = snap_floor(end.position, tile, end.position.y);
    let from = grid.nearest_walkable(from, radius).world_position;
    let to = grid.nearest_walkable(to, radius).world_position;

    let path = find_path(grid, from, to, &config.path_options())?;
    if path.len() < 2 {
        return Err(LayoutError::NoPath {
            start: from,
            target: to,
            expanded: path.expanded,
        });
    }
    Ok(path.positions)
}

/// Wall segments around `tiles`
///
/// Each tile side facing a non-tile neighbour gets a wall at its midpoint,
/// unless `geometry` reports a room already there. Height comes from the room
/// floor below the slot, else `config.corridor_floor_height`.
pub fn derive_walls<G>(tiles: &CorridorTileSet, geometry: &G, config: &DungeonConfig) -> Vec<WallPlacement>
where
    G: RoomGeometry + ?Sized,
{
    let size = config.corridor_tile_size;
    let mut walls = Vec::new();

    for &tile in tiles.iter() {
        for facing in Facing::ALL {
            let step = facing.vector() * size;
            let neighbor = snap_floor(tile + step, size, tile.y);
            if tiles.contains(neighbor) {
                continue;
            }

            let slot = tile + step * 0.5;
            if geometry.is_blocked(slot, config.wall_probe_half_extent) {
                continue;
            }

            let y = geometry
                .ground_height(slot)
                .unwrap_or(config.corridor_floor_height);
            walls.push(WallPlacement {
                position: Vec3::new(slot.x, y, slot.z),
                facing,
            });
        }
    }

    log::debug!("Derived {} wall segments around {} tiles", walls.len(), tiles.len());
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{RoomFootprints, WalkabilityOracle};
    use crate::room::RoomBlueprint;
    use glam::Vec2;

    struct Scene {
        config: DungeonConfig,
        rooms: Vec<Room>,
        footprints: RoomFootprints,
        index: RoomIndex,
    }

    fn scene() -> Scene {
        let config = DungeonConfig::default();
        let blueprint = RoomBlueprint::with_cardinal_doors("Room", 4.0, 4.0, 3.0);
        let rooms = vec![
            Room::from_blueprint(RoomHandle(0), &blueprint, Vec3::new(-10.0, 0.0, 0.0)),
            Room::from_blueprint(RoomHandle(1), &blueprint, Vec3::new(10.0, 0.0, 0.0)),
        ];
        Scene {
            config,
            footprints: RoomFootprints::new(&rooms),
            index: RoomIndex::new(&rooms),
            rooms,
        }
    }

    fn grid_for<O: WalkabilityOracle>(config: &DungeonConfig, oracle: &O) -> Grid {
        Grid::new(
            Vec3::new(0.0, config.corridor_floor_height, 0.0),
            config.grid_size(),
            config.corridor_width,
            oracle,
        )
    }

    fn edge() -> Edge {
        Edge::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0))
    }

    #[test]
    fn test_tile_set_is_idempotent() {
        let mut tiles = CorridorTileSet::new();
        let a = Vec3::new(1.5, -1.4, 2.5);
        assert!(tiles.insert(a));
        assert!(tiles.insert(Vec3::new(2.5, -1.4, 2.5)));
        assert!(!tiles.insert(a));
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles.as_slice()[0], a);
        assert!(tiles.contains(a));
        assert!(!tiles.contains(Vec3::new(1.5, 0.0, 2.5)));
    }

    #[test]
    fn test_carve_straight_corridor() {
        let scene = scene();
        let grid = grid_for(&scene.config, &scene.footprints);

        let outcome = carve_corridors(&grid, &[edge()], &scene.rooms, &scene.index, &scene.config);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.corridors.len(), 1);

        let corridor = &outcome.corridors[0];
        assert_eq!((corridor.from, corridor.to), (RoomHandle(0), RoomHandle(1)));
        // Right door marker of room 0 to left door marker of room 1 along z = 0.5
        assert_eq!(corridor.path.len(), 16);
        assert_eq!(corridor.path[0], Vec3::new(-7.5, -1.4, 0.5));
        assert_eq!(corridor.path[15], Vec3::new(7.5, -1.4, 0.5));
        assert_eq!(corridor.tiles.len(), 16);
        assert_eq!(outcome.tiles.len(), 16);

        let expected: HashSet<DoorId> = [
            DoorId { room: RoomHandle(0), index: 3 },
            DoorId { room: RoomHandle(1), index: 2 },
        ]
        .into_iter()
        .collect();
        assert_eq!(outcome.connected_doors, expected);
    }

    #[test]
    fn test_repeated_edge_claims_no_new_tiles() {
        let scene = scene();
        let grid = grid_for(&scene.config, &scene.footprints);

        let outcome = carve_corridors(&grid, &[edge(), edge()], &scene.rooms, &scene.index, &scene.config);
        assert_eq!(outcome.corridors.len(), 2);
        assert!(outcome.corridors[1].tiles.is_empty());
        assert_eq!(outcome.tiles.len(), 16);
    }

    #[test]
    fn test_blocked_connection_is_reported() {
        let scene = scene();
        let footprints = scene.footprints.clone();
        // A wall across the whole map between the rooms
        let oracle = move |p: Vec3| footprints.is_walkable(p) && p.x.abs() > 1.0;
        let grid = grid_for(&scene.config, &oracle);

        let outcome = carve_corridors(&grid, &[edge()], &scene.rooms, &scene.index, &scene.config);
        assert!(outcome.corridors.is_empty());
        assert!(outcome.tiles.is_empty());
        assert!(outcome.connected_doors.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(outcome.failures[0].reason, LayoutError::NoPath { .. }));
    }

    #[test]
    fn test_edge_outside_rooms_is_skipped() {
        let scene = scene();
        let grid = grid_for(&scene.config, &scene.footprints);
        let stray = Edge::new(Vec2::new(0.0, 20.0), Vec2::new(10.0, 0.0));

        let outcome = carve_corridors(&grid, &[stray], &scene.rooms, &scene.index, &scene.config);
        assert!(outcome.corridors.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_walls_around_straight_corridor() {
        let scene = scene();
        let grid = grid_for(&scene.config, &scene.footprints);
        let outcome = carve_corridors(&grid, &[edge()], &scene.rooms, &scene.index, &scene.config);

        let walls = derive_walls(&outcome.tiles, &scene.footprints, &scene.config);
        // Both long sides of 16 tiles; the two ends abut room walls.
        assert_eq!(walls.len(), 32);
        assert!(walls.iter().all(|w| w.position.y == scene.config.corridor_floor_height));
        assert!(walls
            .iter()
            .all(|w| matches!(w.facing, Facing::Up | Facing::Down)));
        assert!(walls.contains(&WallPlacement {
            position: Vec3::new(-7.5, -1.4, 1.0),
            facing: Facing::Up,
        }));
    }

    #[test]
    fn test_walls_close_open_ends() {
        let config = DungeonConfig::default();
        let mut tiles = CorridorTileSet::new();
        for x in [0.5, 1.5, 2.5] {
            tiles.insert(Vec3::new(x, -1.4, 0.5));
        }
        let walls = derive_walls(&tiles, &RoomFootprints::default(), &config);
        assert_eq!(walls.len(), 8);
        let ends: Vec<&WallPlacement> = walls
            .iter()
            .filter(|w| matches!(w.facing, Facing::Left | Facing::Right))
            .collect();
        assert_eq!(ends.len(), 2);
        assert_eq!(ends[0].position, Vec3::new(0.0, -1.4, 0.5));
        assert_eq!(ends[0].outward(), Vec3::NEG_X);
    }

    #[test]
    fn test_wall_height_from_room_floor() {
        struct RaisedFloor;
        impl RoomGeometry for RaisedFloor {
            fn is_blocked(&self, _: Vec3, _: f32) -> bool {
                false
            }
            fn ground_height(&self, _: Vec3) -> Option<f32> {
                Some(0.25)
            }
        }

        let mut tiles = CorridorTileSet::new();
        tiles.insert(Vec3::new(0.5, -1.4, 0.5));
        let walls = derive_walls(&tiles, &RaisedFloor, &DungeonConfig::default());
        assert_eq!(walls.len(), 4);
        assert!(walls.iter().all(|w| w.position.y == 0.25));
    }
}
