//! Strongly-typed identifiers and the [`Coord`] grid position.

use std::fmt;

/// Identifies a logical cell of a board grid.
///
/// Cells are stored in document (row-major anchor) order and `CellId(n)`
/// is the n-th cell in that order. A cell that spans several grid
/// coordinates has exactly one ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// The ID as an arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a rule registered in a rule catalog.
///
/// Built-in rules occupy the first IDs; caller rules follow in
/// registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    /// The ID as a catalog index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RuleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one rule reference bound on the cell that declared it.
///
/// Cells inheriting a declaration share its bindings, and with them
/// the per-cycle match memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    /// The ID as a binding-table index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a ticket in the population handed to a board.
///
/// The engine never clones tickets; every assignment, pool and match
/// memory refers to tickets by this index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketIndex(pub usize);

impl fmt::Display for TicketIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for TicketIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// A grid coordinate, zero-based from the top-left corner.
///
/// Ordering is row-major, which is also the document order of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    /// Row index.
    pub row: u32,
    /// Column index.
    pub col: u32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]", self.row, self.col)
    }
}

impl From<(u32, u32)> for Coord {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}
