//! Bowyer-Watson Delaunay triangulation of room centres
//!
//! Points are inserted one at a time into a triangulation seeded with a single
//! super-triangle. Every triangle whose circumcircle strictly contains the new
//! point is removed; the boundary of the resulting hole (edges belonging to
//! exactly one removed triangle) is re-triangulated against the point. Finally,
//! triangles still touching a super-triangle vertex are discarded.

use glam::Vec2;
use std::collections::HashSet;

use crate::error::{LayoutError, Result};
use crate::geometry::{Edge, PointKey, Triangle};

/// Margin of the super-triangle, as a multiple of the larger bounding-box side
pub const SUPER_TRIANGLE_MARGIN: f32 = 10.0;

/// Triangulate `points`
///
/// Returns triangles whose vertices are all input points. Fewer than three
/// points (or all-collinear input) yield no triangles.
///
/// # Errors
///
/// Returns `DegenerateInput` if two input points coincide.
///
/// # Example
///
/// ```
/// use rust_dungeon_layout::generation::triangulate;
/// use glam::Vec2;
///
/// let square = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(10.0, 0.0),
///     Vec2::new(10.0, 10.0),
///     Vec2::new(0.0, 11.0),
/// ];
/// let triangles = triangulate(&square).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate(points: &[Vec2]) -> Result<Vec<Triangle>> {
    let mut seen = HashSet::with_capacity(points.len());
    for &p in points {
        if !seen.insert(PointKey::new(p)) {
            return Err(LayoutError::DegenerateInput(format!(
                "coincident room centres at {}",
                p
            )));
        }
    }

    if points.len() < 3 {
        return Ok(Vec::new());
    }

    let super_triangle = super_triangle(points);
    let mut triangulation = vec![super_triangle];

    for &point in points {
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangulation
            .into_iter()
            .partition(|t| t.circumcircle_contains(point));

        let polygon = hole_boundary(&bad);

        triangulation = good;
        triangulation.extend(polygon.into_iter().map(|e| Triangle::new(e.a, e.b, point)));
    }

    triangulation.retain(|t| {
        !(t.is_degenerate()
            || t.has_vertex(super_triangle.a)
            || t.has_vertex(super_triangle.b)
            || t.has_vertex(super_triangle.c))
    });

    log::debug!(
        "Triangulated {} points into {} triangles",
        points.len(),
        triangulation.len()
    );

    Ok(triangulation)
}

/// Triangle enclosing every point with a generous margin
fn super_triangle(points: &[Vec2]) -> Triangle {
    let (min, max) = points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );

    let extent = max - min;
    // Keep the margin non-zero when every point shares one coordinate.
    let margin = extent.max_element().max(1.0) * SUPER_TRIANGLE_MARGIN;

    Triangle::new(
        Vec2::new(min.x - margin, min.y - margin),
        Vec2::new(max.x + margin, min.y - margin),
        Vec2::new(min.x + extent.x * 0.5, max.y + margin),
    )
}

/// Edges that belong to exactly one of `bad`, in first-seen order
fn hole_boundary(bad: &[Triangle]) -> Vec<Edge> {
    let mut polygon: Vec<Edge> = Vec::with_capacity(bad.len() * 3);
    for triangle in bad {
        for edge in triangle.edges() {
            if let Some(pos) = polygon.iter().position(|e| *e == edge) {
                polygon.remove(pos);
            } else {
                polygon.push(edge);
            }
        }
    }
    polygon
}
