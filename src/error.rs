//! Error types for dungeon layout generation

use glam::Vec3;

/// Errors that can occur while laying out a dungeon
///
/// Builder setters report `InvalidConfig` and
/// [`DungeonLayout::generate`](crate::DungeonLayout::generate) reports
/// `EmptyCatalog`. The rest come from individual stages; the orchestrator
/// records them in the layout instead of aborting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The room catalog has no blueprints to place
    #[error("room catalog is empty")]
    EmptyCatalog,

    /// No valid position was found for a room within the attempt budget
    #[error("could not place room '{blueprint}' after {attempts} attempts")]
    PlacementExhausted {
        /// Name of the blueprint that failed to place
        blueprint: String,
        /// Number of rejection samples drawn
        attempts: usize,
    },

    /// The search exhausted its open set or its expansion cap
    #[error("no path from {start} to {target} ({expanded} cells expanded)")]
    NoPath {
        /// Requested start position
        start: Vec3,
        /// Requested target position
        target: Vec3,
        /// Number of cells expanded before giving up
        expanded: usize,
    },

    /// The start or target cell is not walkable
    #[error("path endpoint {position} is not walkable")]
    InvalidEndpoint {
        /// The offending endpoint
        position: Vec3,
    },

    /// Triangulation input violated its preconditions
    #[error("degenerate triangulation input: {0}")]
    DegenerateInput(String),
}

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
