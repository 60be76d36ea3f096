//! The cell arena and its coordinate lookup.

use indexmap::IndexSet;

use crate::area::Area;
use crate::cell::{CellDef, GridSource};
use crate::error::GridError;
use swimlane_core::{CellId, Coord};

/// A validated board grid.
///
/// Cells live in an arena sorted by anchor, so `CellId` order is the
/// row-major document order. A dense `rows × cols` lookup maps every
/// coordinate to the ID of the cell covering it; spanned coordinates
/// share one ID and never copy cell state.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<CellDef>,
    lookup: Vec<CellId>,
    rows: u32,
    cols: u32,
}

impl Grid {
    /// Build a grid from any [`GridSource`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyGrid`] for a source without cells,
    /// [`GridError::ZeroSpan`] for a cell with a zero span,
    /// [`GridError::Overlap`] when two cells claim one coordinate, and
    /// [`GridError::Uncovered`] when a coordinate inside the bounding
    /// rectangle belongs to no cell.
    pub fn from_source<S: GridSource + ?Sized>(source: &S) -> Result<Self, GridError> {
        Self::new(source.cell_defs()?)
    }

    /// Build a grid from positioned cells, in any order.
    pub fn new(mut cells: Vec<CellDef>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::EmptyGrid);
        }
        for cell in &cells {
            cell.check_span()?;
        }
        cells.sort_by_key(|c| c.anchor);

        let rows = cells.iter().map(|c| c.last_row() + 1).max().unwrap_or(0);
        let cols = cells.iter().map(|c| c.last_col() + 1).max().unwrap_or(0);

        let mut slots: Vec<Option<CellId>> = vec![None; rows as usize * cols as usize];
        for (i, cell) in cells.iter().enumerate() {
            let id = CellId(i as u32);
            for row in cell.anchor.row..=cell.last_row() {
                for col in cell.anchor.col..=cell.last_col() {
                    let slot = &mut slots[row as usize * cols as usize + col as usize];
                    if let Some(prev) = *slot {
                        return Err(GridError::Overlap {
                            coord: Coord::new(row, col),
                            first: cells[prev.index()].anchor,
                            second: cell.anchor,
                        });
                    }
                    *slot = Some(id);
                }
            }
        }

        let mut lookup = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(id) => lookup.push(id),
                None => {
                    return Err(GridError::Uncovered {
                        coord: Coord::new(i as u32 / cols, i as u32 % cols),
                    })
                }
            }
        }

        Ok(Self {
            cells,
            lookup,
            rows,
            cols,
        })
    }

    /// Number of grid rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of logical cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The cell covering `coord`, or `None` outside the grid.
    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        if coord.row >= self.rows || coord.col >= self.cols {
            return None;
        }
        Some(self.lookup[coord.row as usize * self.cols as usize + coord.col as usize])
    }

    /// The definition of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this grid.
    pub fn cell(&self, id: CellId) -> &CellDef {
        &self.cells[id.index()]
    }

    /// All cell IDs in document order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len() as u32).map(CellId)
    }

    /// All cells with their IDs, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &CellDef)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u32), c))
    }

    /// Content cells in document order.
    pub fn content_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.iter().filter(|(_, c)| !c.is_header()).map(|(id, _)| id)
    }

    /// Header cells in document order.
    pub fn header_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.iter().filter(|(_, c)| c.is_header()).map(|(id, _)| id)
    }

    /// The part of `area` that lies on the grid, or `None` when the two
    /// do not intersect.
    pub fn clip(&self, area: &Area) -> Option<Area> {
        let (from, to) = (area.from, area.to);
        if area.is_empty() || from.row >= self.rows || from.col >= self.cols {
            return None;
        }
        Some(Area::new(
            from,
            Coord::new(to.row.min(self.rows - 1), to.col.min(self.cols - 1)),
        ))
    }

    /// Distinct cells covering any coordinate of `area`, in the order the
    /// area's coordinates are first reached (row-major). Coordinates
    /// outside the grid are skipped.
    pub fn cells_in(&self, area: &Area) -> IndexSet<CellId> {
        self.coords_in(area).map(|(_, id)| id).collect()
    }

    /// Every covered coordinate of `area` with its cell, row-major.
    /// A spanning cell appears once per covered coordinate.
    pub fn coords_in<'a>(&'a self, area: &Area) -> impl Iterator<Item = (Coord, CellId)> + 'a {
        self.clip(area)
            .into_iter()
            .flat_map(|clipped| clipped.coords())
            .filter_map(move |coord| self.cell_at(coord).map(|id| (coord, id)))
    }
}
