//! WIP limit evaluation.

use std::fmt;

use tracing::warn;

use swimlane_core::{parse_int_prefix, CellId, Coord};
use swimlane_grid::Area;

use crate::matrix::RuleMatrix;

// ── LimitRange ─────────────────────────────────────────────────────

/// An inclusive `[low, high]` ticket-count range. `high = None` is
/// unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitRange {
    /// Lowest acceptable count.
    pub low: i64,
    /// Highest acceptable count, if bounded.
    pub high: Option<i64>,
}

impl LimitRange {
    /// Parse a limit specification.
    ///
    /// `"N"` means `[0, N]`; `"low,high"` allows either side to be
    /// missing or non-numeric, which yields `0` and unbounded
    /// respectively. Tokens beyond the second are ignored. Returns
    /// `None` for an empty specification.
    ///
    /// ```
    /// use swimlane_engine::LimitRange;
    ///
    /// assert_eq!(LimitRange::parse("3"), Some(LimitRange { low: 0, high: Some(3) }));
    /// assert_eq!(LimitRange::parse("2,"), Some(LimitRange { low: 2, high: None }));
    /// assert_eq!(LimitRange::parse(",5"), Some(LimitRange { low: 0, high: Some(5) }));
    /// ```
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }
        let mut tokens = spec.split(',');
        let first = tokens.next().unwrap_or_default();
        Some(match tokens.next() {
            None => Self {
                low: 0,
                high: parse_int_prefix(first),
            },
            Some(second) => Self {
                low: parse_int_prefix(first).unwrap_or(0),
                high: parse_int_prefix(second),
            },
        })
    }

    /// Where `count` falls relative to the range.
    pub fn classify(&self, count: usize) -> LimitState {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        if count < self.low {
            LimitState::Low
        } else if self.high.is_some_and(|high| count > high) {
            LimitState::High
        } else {
            LimitState::Ok
        }
    }
}

// ── LimitState ─────────────────────────────────────────────────────

/// Range state of a governed area's ticket count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimitState {
    /// Fewer tickets than the lower bound.
    Low,
    /// Within bounds.
    Ok,
    /// More tickets than the upper bound.
    High,
}

impl LimitState {
    /// Opaque style tag for presentation layers.
    pub fn style_class(self) -> &'static str {
        match self {
            Self::Low => "wip_low",
            Self::Ok => "wip_ok",
            Self::High => "wip_high",
        }
    }
}

impl fmt::Display for LimitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Ok => "ok",
            Self::High => "high",
        })
    }
}

// ── Statement ──────────────────────────────────────────────────────

/// Human-readable limit text, optionally prefixed with the current total.
///
/// ```
/// use swimlane_engine::limit_statement;
///
/// assert_eq!(limit_statement(Some("2,5"), Some(6)), "6 / [2 - 5]");
/// assert_eq!(limit_statement(Some("2,"), None), "[ >2]");
/// assert_eq!(limit_statement(None, Some(4)), "4");
/// assert_eq!(limit_statement(None, None), "");
/// ```
pub fn limit_statement(spec: Option<&str>, total: Option<usize>) -> String {
    let spec = match spec.filter(|s| !s.is_empty()) {
        Some(spec) => spec,
        None => return total.map(|t| t.to_string()).unwrap_or_default(),
    };
    let mut s = total.map(|t| format!("{t} / ")).unwrap_or_default();

    let tokens: Vec<&str> = spec.split(',').collect();
    if tokens.len() == 1 {
        s.push_str(spec);
        return s;
    }
    let low = parse_int_prefix(tokens[0]);
    let high = parse_int_prefix(tokens[1]);
    match (tokens.len(), low, high) {
        (2, None, Some(high)) => s.push_str(&high.to_string()),
        (2, Some(low), None) => s.push_str(&format!("[ >{low}]")),
        (2, Some(low), Some(high)) => s.push_str(&format!("[{low} - {high}]")),
        _ => s.push_str(spec),
    }
    s
}

// ── Evaluation ─────────────────────────────────────────────────────

/// The evaluated limit of one header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitReport {
    /// The limited header.
    pub cell: CellId,
    /// Anchor of the header.
    pub anchor: Coord,
    /// The area counted.
    pub area: Area,
    /// The parsed range.
    pub range: LimitRange,
    /// Distinct tickets across the area.
    pub count: usize,
    /// Where the count falls.
    pub state: LimitState,
    /// Display text, e.g. `"3 / [2 - 5]"`.
    pub statement: String,
}

/// Evaluate every header carrying a limit and a resolved limit area.
///
/// Violations are logged at `warn` level.
pub fn evaluate_limits<T>(matrix: &RuleMatrix<T>) -> Vec<LimitReport> {
    let grid = matrix.grid();
    grid.header_cells()
        .filter_map(|id| {
            let cell = matrix.cell(id);
            let area = cell.limit_area()?;
            let range = cell.limit_range()?;
            let count = matrix.tickets_in_area(&area).len();
            let state = range.classify(count);
            let anchor = grid.cell(id).anchor;
            if state != LimitState::Ok {
                warn!(
                    cell = %anchor,
                    count,
                    limit = cell.limit().unwrap_or_default(),
                    state = %state,
                    "WIP limit violated"
                );
            }
            Some(LimitReport {
                cell: id,
                anchor,
                area,
                range,
                count,
                state,
                statement: limit_statement(cell.limit(), Some(count)),
            })
        })
        .collect()
}

/// The at-rest statement of every limited header, as shown between
/// population cycles.
pub fn resting_statements<T>(matrix: &RuleMatrix<T>) -> Vec<(Coord, String)> {
    let grid = matrix.grid();
    grid.header_cells()
        .filter_map(|id| {
            let statement = limit_statement(matrix.cell(id).limit(), None);
            (!statement.is_empty()).then(|| (grid.cell(id).anchor, statement))
        })
        .collect()
}
