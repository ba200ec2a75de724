//! Turn-penalised A* over the corridor grid.
//!
//! Searches 4-connected cells with a uniform step cost of 10 per cell plus a
//! fixed penalty for any step that is not aimed at the target (cosine
//! similarity at or below the configured threshold). The heuristic is
//! 10 x Manhattan distance, except on the target cell itself where it is forced
//! to -1000 so the target is popped as soon as it enters the open set. That
//! bias is intentional: corridors end exactly on the requested door tile even
//! if a marginally cheaper expansion is still pending. Paths are therefore
//! "straight where possible", not guaranteed shortest.
//!
//! Per-search scores live in a scratch `Vec` indexed by dense cell index and
//! are dropped when the search returns, so parent links are plain indices and
//! no state leaks between searches on the same grid.
//!
//! Ordering ties (equal f) prefer the lower h, then the cell that entered the
//! open set first, which keeps results deterministic.

use glam::Vec3;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{LayoutError, Result};
use crate::grid::{Cell, Grid};

/// Cost of one orthogonal step
pub const STEP_COST: i32 = 10;

/// Heuristic value forced onto the target cell
pub const TARGET_HEURISTIC: i32 = -1000;

/// Tunables for a single search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOptions {
    /// Cosine similarity a step must exceed to avoid the turn penalty
    pub turn_threshold: f32,
    /// Cost added to steps that are not aimed at the target
    pub turn_penalty: i32,
    /// Expansion cap
    pub max_iterations: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            turn_threshold: 0.9,
            turn_penalty: 25,
            max_iterations: 6000,
        }
    }
}

/// A successful search
#[derive(Debug, Clone, PartialEq)]
pub struct GridPath {
    /// Cell centres from start to target (inclusive)
    pub positions: Vec<Vec3>,
    /// Dense cell indices matching `positions`
    pub cells: Vec<usize>,
    /// Accumulated g-cost at the target
    pub cost: i32,
    /// Number of cells expanded
    pub expanded: usize,
}

impl GridPath {
    /// Number of cells on the path
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the path is empty (never true for a returned path)
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    g: i32,
    h: i32,
    parent: Option<usize>,
    state: NodeState,
    open_order: u64,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            g: i32::MAX,
            h: 0,
            parent: None,
            state: NodeState::Unvisited,
            open_order: 0,
        }
    }
}

/// Entry in the open set (min-heap via reversed ordering).
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: i32,
    h: i32,
    order: u64,
    cell: usize,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f, then h, then order is "greatest".
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.order.cmp(&self.order))
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

/// Find a corridor path from `start` to `target` over `grid`.
///
/// Both positions are mapped to cells with [`Grid::cell_at`] (clamping).
///
/// # Errors
///
/// - `InvalidEndpoint` if either endpoint cell is unwalkable
/// - `NoPath` if the open set empties or `options.max_iterations` expansions
///   pass without reaching the target
pub fn find_path(grid: &Grid, start: Vec3, target: Vec3, options: &PathOptions) -> Result<GridPath> {
    let start_cell = grid.cell_at(start);
    let target_cell = grid.cell_at(target);

    for cell in [start_cell, target_cell] {
        if !cell.walkable {
            return Err(LayoutError::InvalidEndpoint {
                position: cell.world_position,
            });
        }
    }

    let start_index = grid.index_of(start_cell.column, start_cell.row);
    let target_index = grid.index_of(target_cell.column, target_cell.row);

    let mut records = vec![NodeRecord::default(); grid.len()];
    let mut open = BinaryHeap::new();
    let mut next_order: u64 = 0;

    let start_h = heuristic(start_cell, target_cell, start_index == target_index);
    records[start_index] = NodeRecord {
        g: 0,
        h: start_h,
        parent: None,
        state: NodeState::Open,
        open_order: next_order,
    };
    open.push(OpenEntry {
        f: start_h,
        h: start_h,
        order: next_order,
        cell: start_index,
    });
    next_order += 1;

    let mut expanded = 0;

    while let Some(entry) = open.pop() {
        let current_index = entry.cell;
        if records[current_index].state != NodeState::Open {
            // Stale entry for a cell that was already closed.
            continue;
        }
        if expanded >= options.max_iterations {
            break;
        }
        expanded += 1;

        records[current_index].state = NodeState::Closed;

        if current_index == target_index {
            let cells = reconstruct(&records, target_index);
            let positions = cells.iter().map(|&i| grid.cell(i).world_position).collect();
            return Ok(GridPath {
                positions,
                cells,
                cost: records[target_index].g,
                expanded,
            });
        }

        let current = grid.cell(current_index);
        let current_g = records[current_index].g;
        let to_target = (target_cell.world_position - current.world_position).normalize_or_zero();

        for neighbor in orthogonal_neighbors(grid, current) {
            let ni = grid.index_of(neighbor.column, neighbor.row);
            if !neighbor.walkable || records[ni].state == NodeState::Closed {
                continue;
            }

            let to_neighbor = (neighbor.world_position - current.world_position).normalize_or_zero();
            let mut step = STEP_COST * current.manhattan(neighbor) as i32;
            if to_target.dot(to_neighbor) <= options.turn_threshold {
                step += options.turn_penalty;
            }
            let tentative_g = current_g.saturating_add(step);

            let record = &mut records[ni];
            let newly_opened = record.state != NodeState::Open;
            if tentative_g < record.g || newly_opened {
                record.g = tentative_g;
                record.h = heuristic(neighbor, target_cell, ni == target_index);
                record.parent = Some(current_index);
                if newly_opened {
                    record.state = NodeState::Open;
                    record.open_order = next_order;
                    next_order += 1;
                }
                open.push(OpenEntry {
                    f: record.g.saturating_add(record.h),
                    h: record.h,
                    order: record.open_order,
                    cell: ni,
                });
            }
        }
    }

    Err(LayoutError::NoPath {
        start: start_cell.world_position,
        target: target_cell.world_position,
        expanded,
    })
}

fn heuristic(cell: &Cell, target: &Cell, is_target: bool) -> i32 {
    if is_target {
        TARGET_HEURISTIC
    } else {
        STEP_COST * cell.manhattan(target) as i32
    }
}

fn orthogonal_neighbors<'a>(grid: &'a Grid, cell: &Cell) -> impl Iterator<Item = &'a Cell> + 'a {
    const OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let (column, row) = (cell.column, cell.row);
    OFFSETS.into_iter().filter_map(move |(dc, dr)| {
        let c = column.checked_add_signed(dc)?;
        let r = row.checked_add_signed(dr)?;
        grid.get(c, r)
    })
}

fn reconstruct(records: &[NodeRecord], target: usize) -> Vec<usize> {
    let mut cells = vec![target];
    let mut current = target;
    while let Some(parent) = records[current].parent {
        cells.push(parent);
        current = parent;
    }
    cells.reverse();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn open_grid(size: f32) -> Grid {
        Grid::new(Vec3::ZERO, Vec2::splat(size), 1.0, &|_p: Vec3| true)
    }

    /// Centre of cell (column, row) on a grid of the given size at the origin.
    fn at(size: f32, column: usize, row: usize) -> Vec3 {
        Vec3::new(column as f32 + 0.5 - size * 0.5, 0.0, row as f32 + 0.5 - size * 0.5)
    }

    fn assert_contiguous(grid: &Grid, path: &GridPath) {
        for pair in path.cells.windows(2) {
            let (a, b) = (grid.cell(pair[0]), grid.cell(pair[1]));
            assert_eq!(a.manhattan(b), 1, "path must step between orthogonal neighbours");
        }
    }

    #[test]
    fn test_straight_run_has_no_penalty() {
        let grid = open_grid(20.0);
        let path = find_path(&grid, at(20.0, 2, 5), at(20.0, 12, 5), &PathOptions::default()).unwrap();

        assert_eq!(path.len(), 11);
        assert_eq!(path.cost, 100);
        assert_eq!(path.positions[0], at(20.0, 2, 5));
        assert_eq!(*path.positions.last().unwrap(), at(20.0, 12, 5));
        assert!(path.positions.iter().all(|p| p.z == at(20.0, 0, 5).z));
    }

    #[test]
    fn test_empty_grid_path_length_is_manhattan_plus_one() {
        let grid = open_grid(20.0);
        for (start, target) in [((3, 3), (3, 15)), ((10, 4), (1, 4)), ((4, 4), (7, 6)), ((12, 9), (9, 7))] {
            let path = find_path(
                &grid,
                at(20.0, start.0, start.1),
                at(20.0, target.0, target.1),
                &PathOptions::default(),
            )
            .unwrap();
            let manhattan = start.0.abs_diff(target.0) + start.1.abs_diff(target.1);
            assert_eq!(path.len(), manhattan + 1, "{:?} -> {:?}", start, target);
            assert_contiguous(&grid, &path);
        }
    }

    #[test]
    fn test_start_equals_target() {
        let grid = open_grid(10.0);
        let path = find_path(&grid, at(10.0, 4, 4), at(10.0, 4, 4), &PathOptions::default()).unwrap();
        assert_eq!(path.positions, vec![at(10.0, 4, 4)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn test_routes_around_wall() {
        // Wall across x = 0.5 with a gap at the top row.
        let grid = Grid::new(Vec3::ZERO, Vec2::splat(10.0), 1.0, &|p: Vec3| !(p.x == 0.5 && p.z < 4.0));
        let path = find_path(&grid, at(10.0, 2, 1), at(10.0, 8, 1), &PathOptions::default()).unwrap();

        assert_contiguous(&grid, &path);
        assert!(path.cells.iter().all(|&i| grid.cell(i).walkable));
        assert!(path.positions.iter().any(|p| p.x == 0.5 && p.z == 4.5));
    }

    #[test]
    fn test_unwalkable_endpoint_fails() {
        let grid = Grid::new(Vec3::ZERO, Vec2::splat(10.0), 1.0, &|p: Vec3| p.x != 4.5);
        let err = find_path(&grid, at(10.0, 0, 0), at(10.0, 9, 0), &PathOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidEndpoint { .. }));

        let err = find_path(&grid, at(10.0, 9, 3), at(10.0, 0, 0), &PathOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_enclosed_target_reports_no_path() {
        // Target cell (5, 5) is boxed in by its four neighbours.
        let blocked = [(4.5, 5.5), (6.5, 5.5), (5.5, 4.5), (5.5, 6.5)];
        let grid = Grid::new(Vec3::ZERO, Vec2::splat(20.0), 1.0, &move |p: Vec3| {
            !blocked.contains(&(p.x, p.z))
        });
        let reachable = find_path(&grid, at(20.0, 1, 1), at(20.0, 18, 18), &PathOptions::default());
        assert!(reachable.is_ok());

        let err = find_path(&grid, at(20.0, 1, 1), Vec3::new(5.5, 0.0, 5.5), &PathOptions::default()).unwrap_err();
        match err {
            LayoutError::NoPath { expanded, .. } => assert_eq!(expanded, 20 * 20 - 5),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_iteration_cap() {
        let grid = open_grid(40.0);
        let options = PathOptions {
            max_iterations: 5,
            ..PathOptions::default()
        };
        let err = find_path(&grid, at(40.0, 0, 0), at(40.0, 39, 39), &options).unwrap_err();
        assert!(matches!(err, LayoutError::NoPath { expanded: 5, .. }));
    }

    #[test]
    fn test_determinism() {
        let grid = Grid::new(Vec3::ZERO, Vec2::splat(30.0), 1.0, &|p: Vec3| {
            !((p.x - 2.5).abs() < 1.0 && p.z > -10.0)
        });
        let options = PathOptions::default();
        let a = find_path(&grid, at(30.0, 3, 20), at(30.0, 25, 22), &options).unwrap();
        let b = find_path(&grid, at(30.0, 3, 20), at(30.0, 25, 22), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_open_entry_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { f: 50, h: 20, order: 0, cell: 0 });
        heap.push(OpenEntry { f: 40, h: 30, order: 1, cell: 1 });
        heap.push(OpenEntry { f: 40, h: 10, order: 2, cell: 2 });
        heap.push(OpenEntry { f: 40, h: 10, order: 3, cell: 3 });
        let popped: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.cell)).collect();
        assert_eq!(popped, vec![2, 3, 1, 0]);
    }
}
