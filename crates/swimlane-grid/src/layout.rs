//! Table-style placement of unpositioned cells.

use crate::cell::{CellDef, CellSpec, GridSource};
use crate::error::GridError;

/// Rows of unpositioned cells, placed the way a markup table places them.
///
/// Within a row each cell lands on the first column not already claimed
/// by a row-spanning cell from an earlier row. Column spans then claim
/// the following columns, row spans claim the same columns in the rows
/// below.
///
/// ```
/// use swimlane_grid::{CellSpec, GridSource, TableLayout};
/// use swimlane_core::Coord;
///
/// let layout = TableLayout::new()
///     .row(vec![CellSpec::header().rowspan(2), CellSpec::header()])
///     .row(vec![CellSpec::content()]);
/// let cells = layout.cell_defs().unwrap();
/// assert_eq!(cells[2].anchor, Coord::new(1, 1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TableLayout {
    rows: Vec<Vec<CellSpec>>,
}

impl TableLayout {
    /// An empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of cells.
    pub fn row(mut self, cells: Vec<CellSpec>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Number of rows appended so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Occupancy bitmap that grows on demand.
#[derive(Default)]
struct Occupancy {
    taken: Vec<Vec<bool>>,
}

impl Occupancy {
    fn is_taken(&self, row: usize, col: usize) -> bool {
        self.taken
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    fn take(&mut self, row: usize, col: usize) {
        if self.taken.len() <= row {
            self.taken.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.taken[row];
        if r.len() <= col {
            r.resize(col + 1, false);
        }
        r[col] = true;
    }
}

impl GridSource for TableLayout {
    fn cell_defs(&self) -> Result<Vec<CellDef>, GridError> {
        let mut occupancy = Occupancy::default();
        let mut cells = Vec::new();

        for (row, specs) in self.rows.iter().enumerate() {
            let mut col = 0usize;
            for spec in specs {
                while occupancy.is_taken(row, col) {
                    col += 1;
                }
                let cell = spec.clone().at(row as u32, col as u32);
                cell.check_span()?;
                for r in row..row + cell.rowspan as usize {
                    for c in col..col + cell.colspan as usize {
                        occupancy.take(r, c);
                    }
                }
                col += cell.colspan as usize;
                cells.push(cell);
            }
        }
        Ok(cells)
    }
}
