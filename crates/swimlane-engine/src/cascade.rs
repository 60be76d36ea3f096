//! Directional cascade search over the grid.
//!
//! Every resolved attribute is found by walking from a cell's anchor
//! along its column, then along its row, and asking a collector what to
//! do at each visited coordinate.

use swimlane_core::{CellId, Coord};
use swimlane_grid::Grid;

/// What a collector wants after visiting a coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seek {
    /// Keep walking.
    Continue,
    /// Stop the current pass; the row pass still runs after a column pass.
    Last,
    /// Stop the current pass and skip the row pass.
    LastBoth,
}

/// Which way the passes walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Up the column to row 0, then left along the row to column 0.
    /// Used to find the declarations governing a cell.
    TowardOrigin,
    /// Down the column to the last row, then right along the row to the
    /// last column. Used to find the cells a declaration governs.
    AwayFromOrigin,
}

/// One visited coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    /// The cell covering the coordinate.
    pub id: CellId,
    /// The visited coordinate.
    pub coord: Coord,
    /// Whether the coordinate belongs to the cell the search started
    /// from. Walking toward the origin only the anchor itself counts;
    /// walking away every coordinate of the span counts.
    pub is_self: bool,
}

/// Walk from `origin` in `direction`, handing each coordinate to `visit`.
///
/// A spanning cell is visited once per coordinate the walk crosses.
pub fn seek<F>(grid: &Grid, origin: CellId, direction: Direction, mut visit: F)
where
    F: FnMut(Visit) -> Seek,
{
    let cell = grid.cell(origin);
    let anchor = cell.anchor;
    let mut step = |coord: Coord, is_self: bool| match grid.cell_at(coord) {
        Some(id) => visit(Visit { id, coord, is_self }),
        None => Seek::Continue,
    };

    let mut signal = Seek::Continue;
    match direction {
        Direction::TowardOrigin => {
            for row in (0..=anchor.row).rev() {
                signal = step(Coord::new(row, anchor.col), row == anchor.row);
                if signal != Seek::Continue {
                    break;
                }
            }
            if signal == Seek::LastBoth {
                return;
            }
            for col in (0..anchor.col).rev() {
                if step(Coord::new(anchor.row, col), false) != Seek::Continue {
                    break;
                }
            }
        }
        Direction::AwayFromOrigin => {
            let span_end_row = anchor.row + cell.rowspan;
            let span_end_col = anchor.col + cell.colspan;
            for row in anchor.row..grid.rows() {
                signal = step(Coord::new(row, anchor.col), row < span_end_row);
                if signal != Seek::Continue {
                    break;
                }
            }
            if signal == Seek::LastBoth {
                return;
            }
            for col in anchor.col + 1..grid.cols() {
                if step(Coord::new(anchor.row, col), col < span_end_col) != Seek::Continue {
                    break;
                }
            }
        }
    }
}
