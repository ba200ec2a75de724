//! Planar geometry primitives shared by the triangulator and spanning tree
//!
//! Points are `glam::Vec2` in the map's XZ plane. Equality is exact: the
//! triangulation and union-find both treat a point value as its own identity.

use glam::{Vec2, Vec3};
use std::hash::{Hash, Hasher};

/// Hashable exact-equality key for a 2-D point
///
/// Stores the raw bit patterns, with `-0.0` folded onto `0.0` so the key agrees
/// with `f32` equality for every non-NaN coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(u32, u32);

impl PointKey {
    /// Build the key for a point
    #[inline]
    pub fn new(point: Vec2) -> Self {
        Self((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
    }
}

impl From<Vec2> for PointKey {
    fn from(point: Vec2) -> Self {
        Self::new(point)
    }
}

/// An undirected segment between two points
///
/// `Edge::new(a, b) == Edge::new(b, a)`; hashing agrees with that.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// First endpoint
    pub a: Vec2,
    /// Second endpoint
    pub b: Vec2,
}

impl Edge {
    /// Create an edge between two points
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Euclidean length of the edge
    #[inline]
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// Whether either endpoint equals `point`
    #[inline]
    pub fn touches(&self, point: Vec2) -> bool {
        self.a == point || self.b == point
    }

    fn ordered_keys(&self) -> (PointKey, PointKey) {
        let (ka, kb) = (PointKey::new(self.a), PointKey::new(self.b));
        if ka <= kb {
            (ka, kb)
        } else {
            (kb, ka)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered_keys().hash(state);
    }
}

/// A triangle of the working triangulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec2,
    /// Second vertex
    pub b: Vec2,
    /// Third vertex
    pub c: Vec2,
}

impl Triangle {
    /// Create a triangle from three vertices (any winding)
    #[inline]
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    /// Whether `v` is one of the three vertices
    #[inline]
    pub fn has_vertex(&self, v: Vec2) -> bool {
        self.a == v || self.b == v || self.c == v
    }

    /// The three edges `ab`, `bc`, `ca`
    #[inline]
    pub fn edges(&self) -> [Edge; 3] {
        [
            Edge::new(self.a, self.b),
            Edge::new(self.b, self.c),
            Edge::new(self.c, self.a),
        ]
    }

    /// Whether `p` lies strictly inside the circumcircle
    ///
    /// Evaluates the in-circle determinant on the vertices translated so `p`
    /// is the origin, normalised by the triangle's orientation. Positive means
    /// inside for either winding; points on the circle report `false`.
    /// Accumulates in `f64` so integer-lattice inputs stay exact.
    pub fn circumcircle_contains(&self, p: Vec2) -> bool {
        let p = p.as_dvec2();
        let a = self.a.as_dvec2() - p;
        let b = self.b.as_dvec2() - p;
        let c = self.c.as_dvec2() - p;

        let det = a.x * (b.y * c.length_squared() - c.y * b.length_squared())
            - a.y * (b.x * c.length_squared() - c.x * b.length_squared())
            + a.length_squared() * (b.x * c.y - c.x * b.y);

        det * self.orientation() > 0.0
    }

    /// Whether the three vertices are collinear
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.orientation() == 0.0
    }

    /// Sign of the signed area: `1.0` counter-clockwise, `-1.0` clockwise, `0.0` degenerate
    fn orientation(&self) -> f64 {
        let a = self.a.as_dvec2();
        let cross = (self.b.as_dvec2() - a).perp_dot(self.c.as_dvec2() - a);
        if cross > 0.0 {
            1.0
        } else if cross < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Snap a position to the centre of its tile (floor division), keeping `y`
///
/// Used for corridor tiles: `floor(x / size) * size + size / 2`.
#[inline]
pub fn snap_floor(position: Vec3, tile_size: f32, y: f32) -> Vec3 {
    Vec3::new(
        (position.x / tile_size).floor() * tile_size + tile_size * 0.5,
        y,
        (position.z / tile_size).floor() * tile_size + tile_size * 0.5,
    )
}

/// Snap a position to the nearest lattice point (rounding), keeping `y`
///
/// Used for room positions and door fallback tiles.
#[inline]
pub fn snap_round(position: Vec3, tile_size: f32, y: f32) -> Vec3 {
    Vec3::new(
        (position.x / tile_size).round() * tile_size,
        y,
        (position.z / tile_size).round() * tile_size,
    )
}

/// Project a world position onto the map plane
#[inline]
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_edge_equality_is_symmetric() {
        let p = Vec2::new(1.0, 2.0);
        let q = Vec2::new(-3.0, 4.5);
        assert_eq!(Edge::new(p, q), Edge::new(q, p));

        let mut set = HashSet::new();
        set.insert(Edge::new(p, q));
        assert!(!set.insert(Edge::new(q, p)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_edge_length() {
        let edge = Edge::new(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((edge.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_key_folds_negative_zero() {
        assert_eq!(PointKey::new(Vec2::new(-0.0, 1.0)), PointKey::new(Vec2::new(0.0, 1.0)));
        assert_ne!(PointKey::new(Vec2::new(1.0, 1.0)), PointKey::new(Vec2::new(1.0, 1.0001)));
    }

    #[test]
    fn test_circumcircle_contains_both_windings() {
        let ccw = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        let cw = Triangle::new(ccw.a, ccw.c, ccw.b);
        let centre = Vec2::new(2.0, 2.0);
        let outside = Vec2::new(10.0, 10.0);

        assert!(ccw.circumcircle_contains(centre));
        assert!(cw.circumcircle_contains(centre));
        assert!(!ccw.circumcircle_contains(outside));
        assert!(!cw.circumcircle_contains(outside));
    }

    #[test]
    fn test_degenerate_triangle() {
        let flat = Triangle::new(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(5.0, 0.0));
        assert!(flat.is_degenerate());
        assert!(!flat.circumcircle_contains(Vec2::new(1.0, 0.1)));
    }

    #[test]
    fn test_point_on_circumcircle_is_not_inside() {
        let tri = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        // (4, 4) is cocircular with the three vertices.
        assert!(!tri.circumcircle_contains(Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_snap_floor_centres_on_tile() {
        let snapped = snap_floor(Vec3::new(2.3, 9.0, -0.2), 1.0, 0.0);
        assert_eq!(snapped, Vec3::new(2.5, 0.0, -0.5));

        let snapped = snap_floor(Vec3::new(3.9, 0.0, 4.0), 2.0, -1.0);
        assert_eq!(snapped, Vec3::new(3.0, -1.0, 5.0));
    }

    #[test]
    fn test_snap_round_to_lattice() {
        let snapped = snap_round(Vec3::new(2.4, 1.0, -2.6), 1.0, 0.0);
        assert_eq!(snapped, Vec3::new(2.0, 0.0, -3.0));
    }
}
