//! Error types for grid construction.

use std::fmt;
use swimlane_core::Coord;

/// Errors arising from grid construction or table layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// A cell declares a row or column span of zero.
    ZeroSpan {
        /// Anchor of the offending cell.
        anchor: Coord,
    },
    /// A cell's span reaches past the largest representable coordinate.
    SpanOverflow {
        /// Anchor of the offending cell.
        anchor: Coord,
    },
    /// Two cells claim the same coordinate.
    Overlap {
        /// The contested coordinate.
        coord: Coord,
        /// Anchor of the cell that claimed it first.
        first: Coord,
        /// Anchor of the cell that claimed it second.
        second: Coord,
    },
    /// A coordinate inside the grid bounds belongs to no cell.
    Uncovered {
        /// The uncovered coordinate.
        coord: Coord,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::ZeroSpan { anchor } => write!(f, "cell at {anchor} has a zero span"),
            Self::SpanOverflow { anchor } => {
                write!(f, "cell at {anchor} spans past the coordinate range")
            }
            Self::Overlap {
                coord,
                first,
                second,
            } => write!(
                f,
                "cells at {first} and {second} both cover coordinate {coord}"
            ),
            Self::Uncovered { coord } => write!(f, "coordinate {coord} is not covered by any cell"),
        }
    }
}

impl std::error::Error for GridError {}
