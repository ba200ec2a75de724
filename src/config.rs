//! Dungeon Layout Configuration and Builder
//!
//! This module provides the flat parameter set that drives one generation run.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::pathfinding::PathOptions;

/// Configuration for deterministic dungeon layout generation
///
/// The same configuration and room catalog always produce the identical layout.
///
/// # Example
///
/// ```rust
/// use rust_dungeon_layout::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .room_count(5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DungeonConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DungeonConfig {
    /// Random seed for room placement and blueprint choice
    pub seed: u64,

    /// Width (x) and depth (z) of the map, centred on the world origin
    pub map_size: Vec2,

    /// Number of random rooms to attempt after the spawn room
    pub room_count: usize,

    /// Clearance added on every side of a room footprint for overlap and bounds tests
    pub room_padding: f32,

    /// Rejection samples drawn per room before giving up on it
    pub max_placement_attempts: usize,

    /// Edge length of a corridor tile; also the lattice room positions snap to
    pub corridor_tile_size: f32,

    /// Cell size of the pathfinding grid
    pub corridor_width: f32,

    /// Extra world units added to the map size when sizing the pathfinding grid
    pub grid_margin: f32,

    /// Height used for walls when the floor probe finds nothing
    pub corridor_floor_height: f32,

    /// Cosine similarity a step must exceed to count as aimed at the target
    pub turn_threshold: f32,

    /// Extra cost charged for a step that is not aimed at the target
    pub turn_penalty: i32,

    /// Maximum number of cell expansions per corridor search
    pub max_search_iterations: usize,

    /// Ring radius (in cells) used when snapping a position to a walkable cell
    pub nearest_walkable_radius: usize,

    /// Half extent of the probe box used to detect room geometry at wall slots
    pub wall_probe_half_extent: f32,
}

impl DungeonConfig {
    /// World-space footprint of the pathfinding grid
    #[inline]
    pub fn grid_size(&self) -> Vec2 {
        self.map_size + Vec2::splat(self.grid_margin)
    }

    /// Pathfinder parameters carried by this configuration
    #[inline]
    pub fn path_options(&self) -> PathOptions {
        PathOptions {
            turn_threshold: self.turn_threshold,
            turn_penalty: self.turn_penalty,
            max_iterations: self.max_search_iterations,
        }
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        DungeonConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating DungeonConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_dungeon_layout::*;
/// use glam::Vec2;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(7)
///     .map_size(Vec2::new(80.0, 50.0))
///     .unwrap()
///     .room_padding(2.0)
///     .unwrap()
///     .turn_penalty(40)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.turn_penalty, 40);
/// ```
#[derive(Debug, Clone)]
pub struct DungeonConfigBuilder {
    seed: Option<u64>,
    map_size: Vec2,
    room_count: usize,
    room_padding: f32,
    max_placement_attempts: usize,
    corridor_tile_size: f32,
    corridor_width: f32,
    grid_margin: f32,
    corridor_floor_height: f32,
    turn_threshold: f32,
    turn_penalty: i32,
    max_search_iterations: usize,
    nearest_walkable_radius: usize,
    wall_probe_half_extent: f32,
}

impl DungeonConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - map_size: 60 x 60
    /// - room_count: 10, room_padding: 1.0, max_placement_attempts: 100
    /// - corridor_tile_size: 1.0, corridor_width: 1.0, grid_margin: 4.0
    /// - corridor_floor_height: -1.4
    /// - turn_threshold: 0.9, turn_penalty: 25, max_search_iterations: 6000
    /// - nearest_walkable_radius: 3, wall_probe_half_extent: 0.2
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: Vec2::new(60.0, 60.0),
            room_count: 10,
            room_padding: 1.0,
            max_placement_attempts: 100,
            corridor_tile_size: 1.0,
            corridor_width: 1.0,
            grid_margin: 4.0,
            corridor_floor_height: -1.4,
            turn_threshold: 0.9,
            turn_penalty: 25,
            max_search_iterations: 6000,
            nearest_walkable_radius: 3,
            wall_probe_half_extent: 0.2,
        }
    }

    /// Set the random seed for layout generation
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map footprint
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive and finite
    pub fn map_size(mut self, size: Vec2) -> Result<Self> {
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Map size must be positive and finite (got {})",
                size
            )));
        }
        self.map_size = size;
        Ok(self)
    }

    /// Set how many random rooms to attempt after the spawn room
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count > 256
    pub fn room_count(mut self, count: usize) -> Result<Self> {
        if count > 256 {
            return Err(LayoutError::InvalidConfig(format!(
                "Room count must be <= 256 (got {})",
                count
            )));
        }
        self.room_count = count;
        Ok(self)
    }

    /// Set the clearance kept around each room
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if padding is negative or not finite
    pub fn room_padding(mut self, padding: f32) -> Result<Self> {
        if !(padding.is_finite() && padding >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Room padding must be finite and >= 0 (got {})",
                padding
            )));
        }
        self.room_padding = padding;
        Ok(self)
    }

    /// Set the rejection-sampling budget per room
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if attempts is zero
    pub fn max_placement_attempts(mut self, attempts: usize) -> Result<Self> {
        if attempts == 0 {
            return Err(LayoutError::InvalidConfig(
                "Placement attempts must be >= 1".to_string(),
            ));
        }
        self.max_placement_attempts = attempts;
        Ok(self)
    }

    /// Set the corridor tile edge length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is not positive and finite
    pub fn corridor_tile_size(mut self, size: f32) -> Result<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Corridor tile size must be positive (got {})",
                size
            )));
        }
        self.corridor_tile_size = size;
        Ok(self)
    }

    /// Set the pathfinding grid cell size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if width is not positive and finite
    pub fn corridor_width(mut self, width: f32) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Corridor width must be positive (got {})",
                width
            )));
        }
        self.corridor_width = width;
        Ok(self)
    }

    /// Set the extra margin around the map covered by the pathfinding grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if margin is negative or not finite
    pub fn grid_margin(mut self, margin: f32) -> Result<Self> {
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Grid margin must be finite and >= 0 (got {})",
                margin
            )));
        }
        self.grid_margin = margin;
        Ok(self)
    }

    /// Set the fallback wall height
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if height is not finite
    pub fn corridor_floor_height(mut self, height: f32) -> Result<Self> {
        if !height.is_finite() {
            return Err(LayoutError::InvalidConfig(format!(
                "Corridor floor height must be finite (got {})",
                height
            )));
        }
        self.corridor_floor_height = height;
        Ok(self)
    }

    /// Set the cosine threshold for "aimed at the target" steps
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is outside (-1, 1]
    pub fn turn_threshold(mut self, threshold: f32) -> Result<Self> {
        if !(threshold > -1.0 && threshold <= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Turn threshold must be in (-1, 1] (got {})",
                threshold
            )));
        }
        self.turn_threshold = threshold;
        Ok(self)
    }

    /// Set the cost added to steps not aimed at the target
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if penalty is negative
    pub fn turn_penalty(mut self, penalty: i32) -> Result<Self> {
        if penalty < 0 {
            return Err(LayoutError::InvalidConfig(format!(
                "Turn penalty must be >= 0 (got {})",
                penalty
            )));
        }
        self.turn_penalty = penalty;
        Ok(self)
    }

    /// Set the expansion cap of a single corridor search
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations is zero
    pub fn max_search_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(LayoutError::InvalidConfig(
                "Search iteration cap must be >= 1".to_string(),
            ));
        }
        self.max_search_iterations = iterations;
        Ok(self)
    }

    /// Set the ring radius used by nearest-walkable lookups
    pub fn nearest_walkable_radius(mut self, radius: usize) -> Self {
        self.nearest_walkable_radius = radius;
        self
    }

    /// Set the half extent of the wall-slot geometry probe
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if extent is negative or not finite
    pub fn wall_probe_half_extent(mut self, extent: f32) -> Result<Self> {
        if !(extent.is_finite() && extent >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "Wall probe extent must be finite and >= 0 (got {})",
                extent
            )));
        }
        self.wall_probe_half_extent = extent;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a room with zero padding could not fit a
    /// single corridor tile inside the map.
    pub fn build(self) -> Result<DungeonConfig> {
        let min_side = self.map_size.x.min(self.map_size.y);
        if self.corridor_tile_size > min_side {
            return Err(LayoutError::InvalidConfig(format!(
                "Corridor tile size {} exceeds the map's smaller side {}",
                self.corridor_tile_size, min_side
            )));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> DungeonConfig {
        DungeonConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            map_size: self.map_size,
            room_count: self.room_count,
            room_padding: self.room_padding,
            max_placement_attempts: self.max_placement_attempts,
            corridor_tile_size: self.corridor_tile_size,
            corridor_width: self.corridor_width,
            grid_margin: self.grid_margin,
            corridor_floor_height: self.corridor_floor_height,
            turn_threshold: self.turn_threshold,
            turn_penalty: self.turn_penalty,
            max_search_iterations: self.max_search_iterations,
            nearest_walkable_radius: self.nearest_walkable_radius,
            wall_probe_half_extent: self.wall_probe_half_extent,
        }
    }
}

impl Default for DungeonConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DungeonConfigBuilder::new().build().unwrap();
        assert_eq!(config.map_size, Vec2::new(60.0, 60.0));
        assert_eq!(config.room_count, 10);
        assert_eq!(config.max_placement_attempts, 100);
        assert_eq!(config.turn_penalty, 25);
        assert_eq!(config.max_search_iterations, 6000);
        assert!((config.turn_threshold - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_builder_custom() {
        let config = DungeonConfigBuilder::new()
            .seed(42)
            .room_count(5)
            .unwrap()
            .corridor_tile_size(2.0)
            .unwrap()
            .max_search_iterations(100)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.room_count, 5);
        assert_eq!(config.corridor_tile_size, 2.0);
        assert_eq!(config.max_search_iterations, 100);
    }

    #[test]
    fn test_grid_size_includes_margin() {
        let config = DungeonConfigBuilder::new().seed(1).build().unwrap();
        assert_eq!(config.grid_size(), Vec2::new(64.0, 64.0));
    }

    #[test]
    fn test_path_options_projection() {
        let config = DungeonConfigBuilder::new()
            .seed(1)
            .turn_penalty(7)
            .unwrap()
            .build()
            .unwrap();
        let options = config.path_options();
        assert_eq!(options.turn_penalty, 7);
        assert_eq!(options.max_iterations, 6000);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(DungeonConfigBuilder::new().map_size(Vec2::new(0.0, 10.0)).is_err());
        assert!(DungeonConfigBuilder::new().room_count(257).is_err());
        assert!(DungeonConfigBuilder::new().room_padding(-1.0).is_err());
        assert!(DungeonConfigBuilder::new().max_placement_attempts(0).is_err());
        assert!(DungeonConfigBuilder::new().corridor_tile_size(0.0).is_err());
        assert!(DungeonConfigBuilder::new().corridor_width(f32::NAN).is_err());
        assert!(DungeonConfigBuilder::new().turn_threshold(1.5).is_err());
        assert!(DungeonConfigBuilder::new().turn_penalty(-3).is_err());
        assert!(DungeonConfigBuilder::new().max_search_iterations(0).is_err());
    }

    #[test]
    fn test_builder_rejects_non_finite() {
        let builder = DungeonConfigBuilder::new;
        assert!(builder().map_size(Vec2::new(f32::INFINITY, 60.0)).is_err());
        assert!(builder().map_size(Vec2::new(60.0, f32::NAN)).is_err());
        assert!(builder().room_padding(f32::INFINITY).is_err());
        assert!(builder().corridor_tile_size(f32::INFINITY).is_err());
        assert!(builder().corridor_width(f32::INFINITY).is_err());
        assert!(builder().grid_margin(f32::INFINITY).is_err());
        assert!(builder().corridor_floor_height(f32::NEG_INFINITY).is_err());
        assert!(builder().corridor_floor_height(f32::NAN).is_err());
        assert!(builder().wall_probe_half_extent(f32::INFINITY).is_err());
        assert!(builder().corridor_floor_height(-2.0).is_ok());
    }

    #[test]
    fn test_tile_larger_than_map_rejected() {
        let result = DungeonConfigBuilder::new()
            .map_size(Vec2::new(4.0, 4.0))
            .unwrap()
            .corridor_tile_size(5.0)
            .unwrap()
            .build();
        assert!(matches!(result, Err(LayoutError::InvalidConfig(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DungeonConfigBuilder::new().seed(12345).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DungeonConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
