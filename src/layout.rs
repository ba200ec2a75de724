//! DungeonLayout main structure

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

use crate::config::DungeonConfig;
use crate::error::{LayoutError, Result};
use crate::generation::{
    carve_corridors, derive_walls, finalize_doors, place_rooms, plan_connections, Connectivity,
    Corridor, CorridorTileSet, DoorState, DoorStatus, FailedConnection, WallPlacement,
};
use crate::geometry::{Edge, Triangle};
use crate::grid::Grid;
use crate::oracle::{RoomFootprints, RoomGeometry, WalkabilityOracle};
use crate::room::{DoorId, Room, RoomCatalog, RoomHandle};
use crate::spatial::RoomIndex;

/// A complete generated dungeon level
///
/// Holds the placed rooms, the connectivity graph, the carved corridors and
/// their walls, and the final state of every door. Everything is plain data;
/// turning it into geometry is the host's job.
///
/// # Examples
///
/// ```
/// use rust_dungeon_layout::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(7)
///     .room_count(6)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let layout = DungeonLayout::generate(config, &RoomCatalog::uniform(4.0)).unwrap();
/// println!(
///     "{} rooms, {} corridor tiles",
///     layout.room_count(),
///     layout.corridor_tiles().len()
/// );
/// ```
#[derive(Clone)]
pub struct DungeonLayout {
    /// Configuration used to generate this layout
    config: DungeonConfig,

    /// Placed rooms in placement order (spawn room first)
    rooms: Vec<Room>,

    /// Rooms that could not be placed
    skipped_rooms: Vec<LayoutError>,

    /// Pathfinding grid the corridors were carved on
    grid: Grid,

    /// Triangulation, candidate edges and spanning tree
    connectivity: Connectivity,

    corridors: Vec<Corridor>,
    failed_connections: Vec<FailedConnection>,
    corridor_tiles: CorridorTileSet,
    walls: Vec<WallPlacement>,
    doors: Vec<DoorStatus>,

    /// Point-to-room lookup
    room_index: RoomIndex,
}

impl DungeonLayout {
    /// Generate a layout from a room catalog
    ///
    /// Rooms are placed with a `ChaCha8Rng` seeded from `config.seed`, and the
    /// placed footprints serve as both walkability oracle and wall geometry.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` if random rooms are requested from an empty pool.
    /// Rooms that do not fit and connections that cannot be carved are not
    /// errors; see [`skipped_rooms`](Self::skipped_rooms) and
    /// [`failed_connections`](Self::failed_connections).
    ///
    /// # Example
    ///
    /// ```
    /// use rust_dungeon_layout::*;
    ///
    /// let config = DungeonConfigBuilder::new().seed(1).build().unwrap();
    /// let layout = DungeonLayout::generate(config, &RoomCatalog::uniform(4.0)).unwrap();
    /// assert!(layout.spawn_room().is_some());
    /// ```
    pub fn generate(config: DungeonConfig, catalog: &RoomCatalog) -> Result<Self> {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let placement = place_rooms(&config, catalog, &mut rng)?;
        let footprints = RoomFootprints::new(&placement.rooms);

        let mut layout = Self::build(config, placement.rooms, &footprints, &footprints)?;
        layout.skipped_rooms = placement.skipped;

        layout.log_summary(start);
        Ok(layout)
    }

    /// Connect already placed rooms using host-provided world queries
    ///
    /// Use this when obstacles other than room footprints matter (props,
    /// terrain, a physics scene). Room handles must match their index in
    /// `rooms`.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if two room centres coincide.
    pub fn from_rooms<O, G>(config: DungeonConfig, rooms: Vec<Room>, oracle: &O, geometry: &G) -> Result<Self>
    where
        O: WalkabilityOracle + ?Sized,
        G: RoomGeometry + ?Sized,
    {
        let start = Instant::now();
        let layout = Self::build(config, rooms, oracle, geometry)?;
        layout.log_summary(start);
        Ok(layout)
    }

    fn build<O, G>(config: DungeonConfig, rooms: Vec<Room>, oracle: &O, geometry: &G) -> Result<Self>
    where
        O: WalkabilityOracle + ?Sized,
        G: RoomGeometry + ?Sized,
    {
        // Step 1: connectivity from room centres
        let centers: Vec<Vec2> = rooms.iter().map(Room::planar_center).collect();
        let connectivity = plan_connections(&centers)?;
        log::debug!(
            "{} triangles, {} candidate edges, {} spanning edges",
            connectivity.triangles.len(),
            connectivity.candidates.len(),
            connectivity.spanning.len()
        );

        // Step 2: grid sampled once against the oracle
        let grid = Grid::new(
            Vec3::new(0.0, config.corridor_floor_height, 0.0),
            config.grid_size(),
            config.corridor_width,
            oracle,
        );

        // Step 3: corridors along the spanning tree
        let room_index = RoomIndex::new(&rooms);
        let outcome = carve_corridors(&grid, &connectivity.spanning, &rooms, &room_index, &config);

        // Step 4: walls and doors
        let walls = derive_walls(&outcome.tiles, geometry, &config);
        let doors = finalize_doors(&rooms, &outcome.connected_doors);

        Ok(Self {
            config,
            rooms,
            skipped_rooms: Vec::new(),
            grid,
            connectivity,
            corridors: outcome.corridors,
            failed_connections: outcome.failures,
            corridor_tiles: outcome.tiles,
            walls,
            doors,
            room_index,
        })
    }

    fn log_summary(&self, start: Instant) {
        log::info!(
            "Generated dungeon: {} rooms ({} skipped), {} corridors ({} failed), {} tiles, {} walls in {:.2?}",
            self.rooms.len(),
            self.skipped_rooms.len(),
            self.corridors.len(),
            self.failed_connections.len(),
            self.corridor_tiles.len(),
            self.walls.len(),
            start.elapsed()
        );
    }

    /// Configuration used to generate this layout
    #[inline]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Number of placed rooms
    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Placed rooms in placement order
    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Get a room by handle
    #[inline]
    pub fn room(&self, handle: RoomHandle) -> Option<&Room> {
        self.rooms.get(handle.0)
    }

    /// The first placed room
    ///
    /// When generated from a catalog this is the spawn room, unless the spawn
    /// blueprint itself failed to place.
    pub fn spawn_room(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Room whose footprint contains a map-plane point
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_dungeon_layout::*;
    /// # let layout = DungeonLayout::generate(DungeonConfig::default(), &RoomCatalog::uniform(4.0)).unwrap();
    /// let room = &layout.rooms()[0];
    /// assert_eq!(layout.room_at(room.planar_center()), Some(room.handle));
    /// ```
    pub fn room_at(&self, point: Vec2) -> Option<RoomHandle> {
        self.room_index.room_at(point)
    }

    /// `PlacementExhausted` errors for rooms that did not fit
    #[inline]
    pub fn skipped_rooms(&self) -> &[LayoutError] {
        &self.skipped_rooms
    }

    /// The pathfinding grid
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Delaunay triangles over room centres
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.connectivity.triangles
    }

    /// Edges the spanning tree chose from
    #[inline]
    pub fn candidate_edges(&self) -> &[Edge] {
        &self.connectivity.candidates
    }

    /// Edges selected for corridors
    #[inline]
    pub fn spanning_edges(&self) -> &[Edge] {
        &self.connectivity.spanning
    }

    /// Carved corridors in edge order
    #[inline]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Spanning edges that could not be carved
    #[inline]
    pub fn failed_connections(&self) -> &[FailedConnection] {
        &self.failed_connections
    }

    /// Every corridor tile, deduplicated
    #[inline]
    pub fn corridor_tiles(&self) -> &CorridorTileSet {
        &self.corridor_tiles
    }

    /// Wall segments bordering corridors
    #[inline]
    pub fn walls(&self) -> &[WallPlacement] {
        &self.walls
    }

    /// Final state of every door of every room
    #[inline]
    pub fn door_states(&self) -> &[DoorStatus] {
        &self.doors
    }

    /// Final state of one door
    pub fn door_state(&self, id: DoorId) -> Option<DoorState> {
        self.doors.iter().find(|s| s.door == id).map(|s| s.state)
    }
}
