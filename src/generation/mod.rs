//! Core dungeon layout pipeline
//!
//! Places rooms by rejection sampling, connects their centres with a
//! Delaunay triangulation reduced to a minimum spanning tree, then carves
//! corridors between the chosen doors.

mod corridors;
mod delaunay;
mod doors;
mod placement;
mod spanning_tree;

pub use corridors::{
    carve_corridors, derive_walls, CarveOutcome, Corridor, CorridorTileSet, FailedConnection,
    WallPlacement,
};
pub use delaunay::{triangulate, SUPER_TRIANGLE_MARGIN};
pub use doors::{
    connection_tile, door_score, finalize_doors, resolve_connection, select_door,
    ConnectionSource, DoorConnection, DoorState, DoorStatus,
};
pub use placement::{padded_footprint, place_rooms, try_place_room, Placement};
pub use spanning_tree::{candidate_edges, extract_edges, minimum_spanning_tree};

use glam::Vec2;

use crate::error::Result;
use crate::geometry::{Edge, Triangle};

/// Which rooms should be joined, as computed from their centres
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    /// Delaunay triangles over the centres
    pub triangles: Vec<Triangle>,
    /// Unique triangle edges (or all pairs when there are no triangles)
    pub candidates: Vec<Edge>,
    /// Minimum spanning forest of `candidates`
    pub spanning: Vec<Edge>,
}

/// Triangulate room centres and reduce the result to a spanning tree
///
/// # Errors
///
/// Returns `DegenerateInput` if two centres coincide.
pub fn plan_connections(centers: &[Vec2]) -> Result<Connectivity> {
    // Step 1: Delaunay triangulation of the room centres
    let triangles = triangulate(centers)?;

    // Step 2: candidate edges, with the all-pairs fallback
    let candidates = candidate_edges(centers, &triangles);

    // Step 3: Kruskal
    let spanning = minimum_spanning_tree(&candidates);

    Ok(Connectivity {
        triangles,
        candidates,
        spanning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_connections_tree_size() {
        let centers = [
            Vec2::new(-20.0, -18.0),
            Vec2::new(15.0, -12.0),
            Vec2::new(3.0, 9.0),
            Vec2::new(-11.0, 20.0),
            Vec2::new(21.0, 17.0),
        ];
        let plan = plan_connections(&centers).unwrap();
        assert!(plan.candidates.len() >= centers.len() - 1);
        assert_eq!(plan.spanning.len(), centers.len() - 1);
    }

    #[test]
    fn test_plan_connections_two_rooms() {
        let centers = [Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)];
        let plan = plan_connections(&centers).unwrap();
        assert!(plan.triangles.is_empty());
        assert_eq!(plan.spanning, vec![Edge::new(centers[0], centers[1])]);
    }

    #[test]
    fn test_plan_connections_single_room() {
        let plan = plan_connections(&[Vec2::ZERO]).unwrap();
        assert!(plan.candidates.is_empty());
        assert!(plan.spanning.is_empty());
    }
}
