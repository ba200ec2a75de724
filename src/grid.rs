//! Uniform pathfinding lattice over the map footprint
//!
//! Cells are laid out column-major from the bottom-left corner (`-x`, `-z`) of
//! the footprint. Walkability is sampled once at construction and cached.

use glam::{Vec2, Vec3};

use crate::oracle::WalkabilityOracle;

/// A single lattice cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Cached walkability flag
    pub walkable: bool,
    /// World-space centre of the cell
    pub world_position: Vec3,
    /// Column index (`x` axis), in `[0, width)`
    pub column: usize,
    /// Row index (`z` axis), in `[0, height)`
    pub row: usize,
}

impl Cell {
    /// Manhattan distance in cells
    #[inline]
    pub fn manhattan(&self, other: &Cell) -> usize {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Outcome of re-running the walkability oracle over a grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRevalidation {
    /// Cells whose walkability differs from the cached flag, as `(column, row)`
    pub flipped: Vec<(usize, usize)>,
}

impl GridRevalidation {
    /// Number of inconsistent cells
    pub fn flipped_count(&self) -> usize {
        self.flipped.len()
    }

    /// Whether the cache agrees with the oracle everywhere
    pub fn is_consistent(&self) -> bool {
        self.flipped.is_empty()
    }
}

/// Pathfinding grid
///
/// # Example
///
/// ```
/// use rust_dungeon_layout::Grid;
/// use glam::{Vec2, Vec3};
///
/// let grid = Grid::new(Vec3::ZERO, Vec2::new(10.0, 10.0), 1.0, &|_p: Vec3| true);
/// assert_eq!((grid.width(), grid.height()), (10, 10));
///
/// let cell = grid.cell_at(Vec3::new(-4.7, 0.0, 3.2));
/// assert_eq!((cell.column, cell.row), (0, 8));
/// assert_eq!(cell.world_position, Vec3::new(-4.5, 0.0, 3.5));
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    cell_size: f32,
    bottom_left: Vec3,
    origin: Vec3,
    size: Vec2,
}

impl Grid {
    /// Build a grid centred on `origin` covering `size` (x by z), sampling `oracle` per cell
    ///
    /// Cell counts are `round(size / cell_size)` per axis, at least one.
    pub fn new<O>(origin: Vec3, size: Vec2, cell_size: f32, oracle: &O) -> Self
    where
        O: WalkabilityOracle + ?Sized,
    {
        let width = ((size.x / cell_size).round() as usize).max(1);
        let height = ((size.y / cell_size).round() as usize).max(1);
        let bottom_left = origin - Vec3::new(size.x * 0.5, 0.0, size.y * 0.5);

        let mut grid = Self {
            cells: Vec::with_capacity(width * height),
            width,
            height,
            cell_size,
            bottom_left,
            origin,
            size,
        };

        for column in 0..width {
            for row in 0..height {
                let world_position = grid.world_position(column, row);
                grid.cells.push(Cell {
                    walkable: oracle.is_walkable(world_position),
                    world_position,
                    column,
                    row,
                });
            }
        }

        grid
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells (never true for a constructed grid)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Edge length of a cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// All cells, column-major
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Dense index of `(column, row)`
    #[inline]
    pub fn index_of(&self, column: usize, row: usize) -> usize {
        column * self.height + row
    }

    /// Cell at `(column, row)`, or `None` out of range
    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Option<&Cell> {
        if column < self.width && row < self.height {
            self.cells.get(self.index_of(column, row))
        } else {
            None
        }
    }

    /// Cell by dense index
    #[inline]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// World-space centre of `(column, row)`
    pub fn world_position(&self, column: usize, row: usize) -> Vec3 {
        self.bottom_left
            + Vec3::new(
                (column as f32 + 0.5) * self.cell_size,
                0.0,
                (row as f32 + 0.5) * self.cell_size,
            )
    }

    /// Column and row containing `position`, clamped into range
    pub fn indices_at(&self, position: Vec3) -> (usize, usize) {
        let local = position - self.bottom_left;
        let column = clamp_index((local.x / self.cell_size).floor(), self.width);
        let row = clamp_index((local.z / self.cell_size).floor(), self.height);
        (column, row)
    }

    /// Cell containing `position`; out-of-range queries clamp to the nearest edge cell
    pub fn cell_at(&self, position: Vec3) -> &Cell {
        let (column, row) = self.indices_at(position);
        &self.cells[self.index_of(column, row)]
    }

    /// Closest walkable cell to `position` within a square ring of `radius` cells
    ///
    /// Returns the naive cell when it is walkable or when nothing walkable is
    /// found, so the result may be unwalkable.
    pub fn nearest_walkable(&self, position: Vec3, radius: usize) -> &Cell {
        let naive = self.cell_at(position);
        if naive.walkable {
            return naive;
        }

        let columns = naive.column.saturating_sub(radius)
            ..=naive.column.saturating_add(radius).min(self.width - 1);
        let rows = naive.row.saturating_sub(radius)..=naive.row.saturating_add(radius).min(self.height - 1);

        let mut best = naive;
        let mut best_distance = f32::INFINITY;
        for column in columns {
            for row in rows.clone() {
                let cell = &self.cells[self.index_of(column, row)];
                if !cell.walkable {
                    continue;
                }
                let distance = position.distance(cell.world_position);
                if distance < best_distance {
                    best_distance = distance;
                    best = cell;
                }
            }
        }

        best
    }

    /// Whether `position` lies strictly inside the grid footprint (map plane)
    pub fn contains_world(&self, position: Vec3) -> bool {
        let local = position - self.origin;
        local.x.abs() < self.size.x * 0.5 && local.z.abs() < self.size.y * 0.5
    }

    /// Re-run `oracle` over every cell and report cells whose flag would change
    ///
    /// The grid itself is not modified; call [`Grid::apply_revalidation`] to
    /// commit the new flags between searches.
    pub fn revalidate<O>(&self, oracle: &O) -> GridRevalidation
    where
        O: WalkabilityOracle + ?Sized,
    {
        let flipped: Vec<(usize, usize)> = self
            .cells
            .iter()
            .filter(|cell| oracle.is_walkable(cell.world_position) != cell.walkable)
            .map(|cell| (cell.column, cell.row))
            .collect();

        if !flipped.is_empty() {
            log::warn!(
                "Grid has {} walkability inconsistencies out of {} cells",
                flipped.len(),
                self.cells.len()
            );
        }

        GridRevalidation { flipped }
    }

    /// Toggle the walkability of every cell listed in `revalidation`
    pub fn apply_revalidation(&mut self, revalidation: &GridRevalidation) {
        for &(column, row) in &revalidation.flipped {
            let index = self.index_of(column, row);
            if let Some(cell) = self.cells.get_mut(index) {
                cell.walkable = !cell.walkable;
            }
        }
    }
}

fn clamp_index(value: f32, len: usize) -> usize {
    if value <= 0.0 || value.is_nan() {
        0
    } else {
        (value as usize).min(len - 1)
    }
}
