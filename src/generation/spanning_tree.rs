//! Connectivity edges and Kruskal's minimum spanning tree

use glam::Vec2;
use std::collections::{HashMap, HashSet};

use crate::geometry::{Edge, PointKey, Triangle};

/// Unique undirected edges of a triangulation, in first-seen order
pub fn extract_edges(triangles: &[Triangle]) -> Vec<Edge> {
    let mut seen = HashSet::with_capacity(triangles.len() * 2);
    let mut edges = Vec::with_capacity(triangles.len() * 2);
    for triangle in triangles {
        for edge in triangle.edges() {
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Edges the spanning tree may choose from
///
/// Normally the triangulation edges. When the triangulation is empty (two
/// rooms, or all centres collinear) every pair of points becomes a candidate
/// so the rooms can still be connected.
pub fn candidate_edges(points: &[Vec2], triangles: &[Triangle]) -> Vec<Edge> {
    if !triangles.is_empty() || points.len() < 2 {
        return extract_edges(triangles);
    }

    let mut edges = Vec::with_capacity(points.len() * (points.len() - 1) / 2);
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            edges.push(Edge::new(a, b));
        }
    }
    edges
}

/// Disjoint-set forest keyed by point value
#[derive(Debug, Default)]
struct UnionFind {
    parent: HashMap<PointKey, PointKey>,
}

impl UnionFind {
    fn find(&mut self, point: PointKey) -> PointKey {
        let mut root = point;
        while let Some(&next) = self.parent.get(&root) {
            if next == root {
                break;
            }
            root = next;
        }

        // Path compression
        let mut current = point;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`; `false` if they were already joined
    fn union(&mut self, a: PointKey, b: PointKey) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.parent.insert(root_b, root_a);
        true
    }
}

/// Kruskal's algorithm over `edges`
///
/// Edges are sorted by length with a stable sort, so equal-length edges keep
/// their input order. The result is a spanning forest: one tree per connected
/// component of the input.
pub fn minimum_spanning_tree(edges: &[Edge]) -> Vec<Edge> {
    let mut sorted: Vec<Edge> = edges.to_vec();
    sorted.sort_by(|a, b| a.length().total_cmp(&b.length()));

    let mut sets = UnionFind::default();
    let mut tree = Vec::new();

    for edge in sorted {
        if sets.union(PointKey::new(edge.a), PointKey::new(edge.b)) {
            tree.push(edge);
        }
    }

    log::debug!("Spanning tree kept {} of {} edges", tree.len(), edges.len());
    tree
}
