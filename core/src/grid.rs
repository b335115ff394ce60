//! Dense row-major cell storage.

use crate::GridSize;

/// Row-major grid of cells where the column index varies fastest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    size: GridSize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid by evaluating `cell` for every position in row-major order.
    pub fn from_fn(size: GridSize, mut cell: impl FnMut(u32, u32) -> T) -> Self {
        let mut cells = Vec::with_capacity(capacity_hint(size));
        for y in 0..size.height() {
            for x in 0..size.width() {
                cells.push(cell(x, y));
            }
        }
        Self { size, cells }
    }

    /// Builds a grid in row-major order, stopping at the first failing cell.
    pub fn try_from_fn<E>(
        size: GridSize,
        mut cell: impl FnMut(u32, u32) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut cells = Vec::with_capacity(capacity_hint(size));
        for y in 0..size.height() {
            for x in 0..size.width() {
                cells.push(cell(x, y)?);
            }
        }
        Ok(Self { size, cells })
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reports whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(x, y)`, if inside the grid.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).and_then(|index| self.cells.get(index))
    }

    /// Returns a mutable reference to the cell at `(x, y)`, if inside the grid.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        self.index(x, y).and_then(|index| self.cells.get_mut(index))
    }

    /// Replaces the cell at `(x, y)`, returning the previous value.
    ///
    /// Returns `None` without storing anything when the position lies outside
    /// the grid.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Option<T> {
        self.get_mut(x, y)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Iterates over `(x, y, cell)` triples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let width = self.size.width();
        (0..self.size.height())
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .zip(self.cells.iter())
            .map(|((x, y), cell)| (x, y, cell))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if !self.size.contains(x, y) {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        let width = usize::try_from(self.size.width()).ok()?;
        Some(row * width + column)
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid where every cell holds a copy of `fill`.
    pub fn filled(size: GridSize, fill: T) -> Self {
        Self::from_fn(size, |_, _| fill.clone())
    }

    /// Copies the grid into a new extent.
    ///
    /// Cells that exist in both extents keep their value; cells beyond the old
    /// extent receive `fill`.
    #[must_use]
    pub fn resized(&self, size: GridSize, fill: &T) -> Self {
        Self::from_fn(size, |x, y| self.get(x, y).unwrap_or(fill).clone())
    }
}

fn capacity_hint(size: GridSize) -> usize {
    let capacity_u64 = u64::from(size.width()) * u64::from(size.height());
    usize::try_from(capacity_u64).unwrap_or(0)
}
