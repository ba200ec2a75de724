//! Procedural dungeon layout generation
//!
//! A standalone library that scatters rooms on a bounded map, links them with
//! a Delaunay-derived spanning tree and carves grid corridors between their
//! doors. The output is plain data (positions, facings, door states), suitable
//! for use with any game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust
//! use rust_dungeon_layout::*;
//!
//! let config = DungeonConfigBuilder::new()
//!     .seed(42)
//!     .map_size(Vec2::new(60.0, 60.0)).unwrap()
//!     .room_count(8).unwrap()
//!     .build().unwrap();
//!
//! let layout = DungeonLayout::generate(config, &RoomCatalog::uniform(4.0)).unwrap();
//!
//! for tile in layout.corridor_tiles().iter() {
//!     // spawn a floor piece at `tile`
//!     let _ = tile;
//! }
//! println!(
//!     "{} rooms, {} corridors, {} walls",
//!     layout.room_count(),
//!     layout.corridors().len(),
//!     layout.walls().len()
//! );
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree backed point-to-room lookups
//! - `serde`: Serialization support for configuration, rooms and layout records

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod room;
pub mod oracle;
pub mod grid;
pub mod pathfinding;
pub mod spatial;
pub mod generation;
pub mod layout;

// Re-export core types for convenience
pub use error::{LayoutError, Result};
pub use config::{DungeonConfig, DungeonConfigBuilder};
pub use geometry::{Edge, Triangle};
pub use room::{Door, DoorBlueprint, DoorId, Facing, Marker, MarkerRole, Room, RoomBlueprint, RoomCatalog, RoomHandle};
pub use oracle::{RoomFootprints, RoomGeometry, WalkabilityOracle};
pub use grid::{Cell, Grid, GridRevalidation};
pub use pathfinding::{find_path, GridPath, PathOptions};
pub use spatial::RoomIndex;
pub use generation::{Corridor, CorridorTileSet, DoorState, DoorStatus, FailedConnection, WallPlacement};
pub use layout::DungeonLayout;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
