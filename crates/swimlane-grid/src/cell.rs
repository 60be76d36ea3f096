//! Cell definitions: geometry, kind and raw attribute strings.

use crate::error::GridError;
use swimlane_core::Coord;

/// Whether a cell governs other cells or holds tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// A header cell. Declares attributes for the region it spans;
    /// never holds tickets.
    Header,
    /// A content cell. Receives tickets during classification.
    Content,
}

/// The raw attributes a cell may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// Comma-separated rule references, each optionally `!`-negated.
    Matcher,
    /// WIP limit: `"N"`, `"low,"`, `",high"` or `"low,high"`.
    Limit,
    /// Explicit area counted towards the limit.
    LimitArea,
    /// Comma-separated callback handler names.
    Callbacks,
    /// Explicit area handed to the callbacks.
    CallbacksArea,
    /// Opaque renderer template identifier.
    Template,
}

/// Raw attribute strings exactly as the grid description supplied them.
///
/// An attribute can be absent (`None`) or present with an empty value;
/// the cascade treats the two differently for limits and callbacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellAttrs {
    /// Rule references.
    pub matcher: Option<String>,
    /// WIP limit specification.
    pub limit: Option<String>,
    /// Explicit limit area.
    pub limit_area: Option<String>,
    /// Callback handler names.
    pub callbacks: Option<String>,
    /// Explicit callbacks area.
    pub callbacks_area: Option<String>,
    /// Template identifier.
    pub template: Option<String>,
}

impl CellAttrs {
    /// The raw attribute, present even when empty.
    pub fn raw(&self, kind: AttrKind) -> Option<&str> {
        match kind {
            AttrKind::Matcher => self.matcher.as_deref(),
            AttrKind::Limit => self.limit.as_deref(),
            AttrKind::LimitArea => self.limit_area.as_deref(),
            AttrKind::Callbacks => self.callbacks.as_deref(),
            AttrKind::CallbacksArea => self.callbacks_area.as_deref(),
            AttrKind::Template => self.template.as_deref(),
        }
    }

    /// Whether the attribute is declared at all.
    pub fn declares(&self, kind: AttrKind) -> bool {
        self.raw(kind).is_some()
    }

    /// The attribute's value, treating an empty string as absent.
    pub fn value(&self, kind: AttrKind) -> Option<&str> {
        self.raw(kind).filter(|v| !v.is_empty())
    }

    fn slot(&mut self, kind: AttrKind) -> &mut Option<String> {
        match kind {
            AttrKind::Matcher => &mut self.matcher,
            AttrKind::Limit => &mut self.limit,
            AttrKind::LimitArea => &mut self.limit_area,
            AttrKind::Callbacks => &mut self.callbacks,
            AttrKind::CallbacksArea => &mut self.callbacks_area,
            AttrKind::Template => &mut self.template,
        }
    }

    /// Set or clear an attribute.
    pub fn set(&mut self, kind: AttrKind, value: Option<String>) {
        *self.slot(kind) = value;
    }
}

/// A positioned cell: anchor coordinate, span, kind and attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellDef {
    /// Top-left coordinate of the cell.
    pub anchor: Coord,
    /// Number of rows covered (at least 1).
    pub rowspan: u32,
    /// Number of columns covered (at least 1).
    pub colspan: u32,
    /// Header or content.
    pub kind: CellKind,
    /// Raw attribute strings.
    pub attrs: CellAttrs,
}

impl CellDef {
    /// Whether this is a header cell.
    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }

    /// Last row covered, inclusive.
    pub fn last_row(&self) -> u32 {
        self.anchor.row.saturating_add(self.rowspan.saturating_sub(1))
    }

    /// Last column covered, inclusive.
    pub fn last_col(&self) -> u32 {
        self.anchor.col.saturating_add(self.colspan.saturating_sub(1))
    }

    /// Whether the cell's span covers `coord`.
    pub fn covers(&self, coord: Coord) -> bool {
        (self.anchor.row..=self.last_row()).contains(&coord.row)
            && (self.anchor.col..=self.last_col()).contains(&coord.col)
    }

    pub(crate) fn check_span(&self) -> Result<(), GridError> {
        if self.rowspan == 0 || self.colspan == 0 {
            return Err(GridError::ZeroSpan {
                anchor: self.anchor,
            });
        }
        // One past the last row and column must still fit.
        if self.anchor.row.checked_add(self.rowspan).is_none()
            || self.anchor.col.checked_add(self.colspan).is_none()
        {
            return Err(GridError::SpanOverflow {
                anchor: self.anchor,
            });
        }
        Ok(())
    }
}

/// An unpositioned cell, built fluently and placed with [`at`](Self::at)
/// or by a [`TableLayout`](crate::TableLayout).
///
/// ```
/// use swimlane_grid::CellSpec;
///
/// let wip = CellSpec::header().rules("wip").limit("2,5").at(0, 2);
/// assert!(wip.is_header());
/// assert_eq!(wip.attrs.limit.as_deref(), Some("2,5"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSpec {
    kind: CellKind,
    rowspan: u32,
    colspan: u32,
    attrs: CellAttrs,
}

impl CellSpec {
    fn new(kind: CellKind) -> Self {
        Self {
            kind,
            rowspan: 1,
            colspan: 1,
            attrs: CellAttrs::default(),
        }
    }

    /// A header cell spanning one coordinate.
    pub fn header() -> Self {
        Self::new(CellKind::Header)
    }

    /// A content cell spanning one coordinate.
    pub fn content() -> Self {
        Self::new(CellKind::Content)
    }

    /// Set the row span.
    pub fn rowspan(mut self, rows: u32) -> Self {
        self.rowspan = rows;
        self
    }

    /// Set the column span.
    pub fn colspan(mut self, cols: u32) -> Self {
        self.colspan = cols;
        self
    }

    /// Set an arbitrary attribute.
    pub fn attr(mut self, kind: AttrKind, value: impl Into<String>) -> Self {
        self.attrs.set(kind, Some(value.into()));
        self
    }

    /// Declare the rule references.
    pub fn rules(self, matcher: impl Into<String>) -> Self {
        self.attr(AttrKind::Matcher, matcher)
    }

    /// Declare a WIP limit.
    pub fn limit(self, limit: impl Into<String>) -> Self {
        self.attr(AttrKind::Limit, limit)
    }

    /// Declare an explicit limit area.
    pub fn limit_area(self, area: impl Into<String>) -> Self {
        self.attr(AttrKind::LimitArea, area)
    }

    /// Declare callback handler names.
    pub fn callbacks(self, names: impl Into<String>) -> Self {
        self.attr(AttrKind::Callbacks, names)
    }

    /// Declare an explicit callbacks area.
    pub fn callbacks_area(self, area: impl Into<String>) -> Self {
        self.attr(AttrKind::CallbacksArea, area)
    }

    /// Declare a template identifier.
    pub fn template(self, template: impl Into<String>) -> Self {
        self.attr(AttrKind::Template, template)
    }

    /// Row span of the cell.
    pub fn rows(&self) -> u32 {
        self.rowspan
    }

    /// Column span of the cell.
    pub fn cols(&self) -> u32 {
        self.colspan
    }

    /// Place the cell with its anchor at `(row, col)`.
    pub fn at(self, row: u32, col: u32) -> CellDef {
        CellDef {
            anchor: Coord::new(row, col),
            rowspan: self.rowspan,
            colspan: self.colspan,
            kind: self.kind,
            attrs: self.attrs,
        }
    }
}

/// A supplier of positioned cells.
///
/// Implemented for plain cell lists and for [`TableLayout`](crate::TableLayout).
/// Markup readers live outside the engine and implement this trait to
/// feed a board.
pub trait GridSource {
    /// Produce every cell of the grid, in any order.
    fn cell_defs(&self) -> Result<Vec<CellDef>, GridError>;
}

impl GridSource for [CellDef] {
    fn cell_defs(&self) -> Result<Vec<CellDef>, GridError> {
        Ok(self.to_vec())
    }
}

impl GridSource for Vec<CellDef> {
    fn cell_defs(&self) -> Result<Vec<CellDef>, GridError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_attribute_is_declared_but_valueless() {
        let cell = CellSpec::content().limit("").at(1, 1);
        assert!(cell.attrs.declares(AttrKind::Limit));
        assert_eq!(cell.attrs.value(AttrKind::Limit), None);
        assert!(!cell.attrs.declares(AttrKind::Callbacks));
    }

    #[test]
    fn covers_spanned_coordinates_only() {
        let cell = CellSpec::header().rowspan(2).colspan(3).at(1, 1);
        assert!(cell.covers(Coord::new(1, 1)));
        assert!(cell.covers(Coord::new(2, 3)));
        assert!(!cell.covers(Coord::new(3, 1)));
        assert!(!cell.covers(Coord::new(1, 4)));
        assert_eq!((cell.last_row(), cell.last_col()), (2, 3));
    }

    #[test]
    fn zero_span_is_rejected() {
        let cell = CellSpec::content().colspan(0).at(0, 0);
        match cell.check_span() {
            Err(GridError::ZeroSpan { anchor }) => assert_eq!(anchor, Coord::new(0, 0)),
            other => panic!("expected ZeroSpan, got {other:?}"),
        }
    }

    #[test]
    fn span_past_coordinate_range_is_rejected() {
        let cell = CellSpec::header().rowspan(2).at(u32::MAX, 0);
        assert_eq!(cell.last_row(), u32::MAX);
        match cell.check_span() {
            Err(GridError::SpanOverflow { anchor }) => {
                assert_eq!(anchor, Coord::new(u32::MAX, 0))
            }
            other => panic!("expected SpanOverflow, got {other:?}"),
        }
        assert!(CellSpec::content().colspan(3).at(0, u32::MAX - 3).check_span().is_ok());
    }
}
