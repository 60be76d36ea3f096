//! Debug descriptions and compiled grids.

use std::fmt;

use swimlane_core::{CellId, Coord};
use swimlane_grid::{Area, AttrKind, CellDef};
use swimlane_rules::{Builtin, Rule};

use crate::matrix::{Binding, RuleMatrix};

// ── Description ────────────────────────────────────────────────────

/// The resolved attributes of one cell in readable form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellDescription {
    /// The cell.
    pub id: CellId,
    /// Anchor of the cell.
    pub anchor: Coord,
    /// Whether the cell is a header.
    pub header: bool,
    /// One descriptor per chain entry, e.g. `"!wip[lsc]"`.
    pub rules: Vec<String>,
    /// The cell's limit specification.
    pub limit: Option<String>,
    /// The area the limit counts.
    pub limit_area: Option<Area>,
    /// The resolved template.
    pub template: Option<String>,
    /// The resolved style tags.
    pub styles: Vec<String>,
}

impl fmt::Display for CellDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.header { "TH" } else { "TD" };
        write!(
            f,
            "DEBUG: {kind}({}|{}), RULES: [{}], LIMIT: {}",
            self.anchor.row,
            self.anchor.col,
            self.rules.join(","),
            self.limit.as_deref().unwrap_or("none"),
        )?;
        if let (Some(_), Some(area)) = (&self.limit, self.limit_area) {
            write!(f, " ({area})")?;
        }
        write!(
            f,
            ", TEMPLATE: {}, STYLES: [{}]",
            self.template.as_deref().unwrap_or("none"),
            self.styles.join(","),
        )
    }
}

/// Descriptor of one chain entry: the token, then flags for terminal
/// (`L`/`l`), sort (`S`/`s`) and conservation (`C=[tags]`/`c`).
///
/// ```
/// use swimlane_engine::inspect::rule_descriptor;
/// use swimlane_rules::Rule;
///
/// let rule = Rule::new("wip", |_: &u8| true).conserve("a,b").terminal();
/// assert_eq!(rule_descriptor(&rule, true), "!wip[LsC=[a,b]]");
/// ```
pub fn rule_descriptor<T>(rule: &Rule<T>, negate: bool) -> String {
    let conserve = match rule.conservation().tags() {
        Some(tags) => format!(
            "C=[{}]",
            tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",")
        ),
        None => "c".to_string(),
    };
    format!(
        "{}{}[{}{}{}]",
        if negate { "!" } else { "" },
        rule.name(),
        if rule.is_terminal() { 'L' } else { 'l' },
        if rule.has_sort() { 'S' } else { 's' },
        conserve,
    )
}

/// Describe one cell.
pub fn describe<T>(matrix: &RuleMatrix<T>, id: CellId) -> CellDescription {
    let def = matrix.grid().cell(id);
    let cell = matrix.cell(id);
    CellDescription {
        id,
        anchor: def.anchor,
        header: def.is_header(),
        rules: matrix
            .chain(id)
            .map(|(b, r): (&Binding, &Rule<T>)| rule_descriptor(r, b.negate))
            .collect(),
        limit: cell.limit().map(str::to_string),
        limit_area: cell.limit_area(),
        template: cell.template().map(str::to_string),
        styles: cell.styles().to_vec(),
    }
}

/// Describe every cell in document order.
pub fn describe_all<T>(matrix: &RuleMatrix<T>) -> Vec<CellDescription> {
    matrix.grid().ids().map(|id| describe(matrix, id)).collect()
}

// ── Compile ────────────────────────────────────────────────────────

/// Flatten the resolved matrix back into cell definitions.
///
/// Content cells carry their whole chain explicitly, closed with
/// `LAST` so nothing is inherited on rebuild, plus their template.
/// Headers keep only a limit and callbacks with absolute areas, and
/// only when both halves were resolved. Header rules and templates are
/// dropped.
pub fn compile<T>(matrix: &RuleMatrix<T>) -> Vec<CellDef> {
    let grid = matrix.grid();
    grid.iter()
        .map(|(id, def)| {
            let cell = matrix.cell(id);
            let mut out = def.clone();
            let set = |out: &mut CellDef, kind, value: Option<String>| out.attrs.set(kind, value);

            if def.is_header() {
                set(&mut out, AttrKind::Matcher, None);
                set(&mut out, AttrKind::Template, None);
                let limit = cell.limit().zip(cell.limit_area());
                set(&mut out, AttrKind::Limit, limit.map(|(l, _)| l.to_string()));
                set(&mut out, AttrKind::LimitArea, limit.map(|(_, a)| a.to_string()));
                let callbacks = cell.callbacks().zip(cell.callbacks_area());
                set(&mut out, AttrKind::Callbacks, callbacks.map(|(c, _)| c.to_string()));
                set(&mut out, AttrKind::CallbacksArea, callbacks.map(|(_, a)| a.to_string()));
            } else {
                let mut names = matrix.rule_names(id);
                if !matrix.ends_terminal(id) {
                    names.push(Builtin::Last.name().to_string());
                }
                set(&mut out, AttrKind::Matcher, Some(names.join(",")));
                set(&mut out, AttrKind::Template, cell.template().map(str::to_string));
                for kind in [
                    AttrKind::Limit,
                    AttrKind::LimitArea,
                    AttrKind::Callbacks,
                    AttrKind::CallbacksArea,
                ] {
                    set(&mut out, kind, None);
                }
            }
            out
        })
        .collect()
}
