//! Rule matrix construction: per-cell cascade resolution.
//!
//! [`RuleMatrixBuilder::build`] resolves, for every cell of a [`Grid`],
//! its rule chain, style list, template, limit area and callbacks area.
//! Declarations are made once on a header and inherited by every cell
//! the header governs; see [`seek`](crate::cascade::seek) for the walk.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, trace};

use swimlane_core::{BindingId, CellId, Coord, RuleId, TicketIndex};
use swimlane_grid::{Area, AttrKind, Grid};
use swimlane_rules::{parse_matcher, Lookup, Rule, RuleCatalog};

use crate::cascade::{seek, Direction, Seek};
use crate::limits::LimitRange;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from [`RuleMatrixBuilder::build`].
///
/// Construction is all-or-nothing: no partial matrix is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// A matcher string names a rule the catalog does not know.
    UnknownRule {
        /// The unknown name.
        name: String,
        /// Anchor of the declaring cell.
        cell: Coord,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRule { name, cell } => {
                write!(f, "rule does not exist <{name}>, see {cell}")
            }
        }
    }
}

impl Error for BuildError {}

// ── Binding ────────────────────────────────────────────────────────

/// A rule reference bound on the cell that declared it.
///
/// Every cell inheriting the declaration shares the binding and with it
/// the per-cycle match memory.
#[derive(Clone, Debug)]
pub struct Binding {
    /// The referenced rule.
    pub rule: RuleId,
    /// Whether the reference was `!`-negated.
    pub negate: bool,
    /// The declaring cell.
    pub declared_at: CellId,
    matched: IndexSet<TicketIndex>,
}

impl Binding {
    /// Tickets matched through this binding in the current cycle, in
    /// match order. Never holds a ticket twice.
    pub fn matched(&self) -> &IndexSet<TicketIndex> {
        &self.matched
    }

    pub(crate) fn has_matched(&self, ticket: TicketIndex) -> bool {
        self.matched.contains(&ticket)
    }

    pub(crate) fn remember(&mut self, ticket: TicketIndex) {
        self.matched.insert(ticket);
    }

    pub(crate) fn forget_all(&mut self) {
        self.matched.clear();
    }
}

// ── ResolvedCell ───────────────────────────────────────────────────

/// The resolved attributes of one cell, plus its current tickets.
#[derive(Clone, Debug, Default)]
pub struct ResolvedCell {
    pub(crate) rules: Vec<BindingId>,
    pub(crate) styles: Vec<String>,
    pub(crate) template: Option<String>,
    pub(crate) limit: Option<String>,
    pub(crate) limit_area: Option<Area>,
    pub(crate) limit_range: Option<LimitRange>,
    pub(crate) callbacks: Option<String>,
    pub(crate) callbacks_area: Option<Area>,
    pub(crate) tickets: Vec<TicketIndex>,
}

impl ResolvedCell {
    /// The effective rule chain, in evaluation order.
    pub fn rules(&self) -> &[BindingId] {
        &self.rules
    }

    /// Style tags of the non-negated rules in the chain, deduplicated.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// The nearest governing template, or the default for content cells.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// The cell's own limit specification.
    pub fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    /// The area counted towards the limit.
    pub fn limit_area(&self) -> Option<Area> {
        self.limit_area
    }

    /// The parsed limit range, present when both the limit and its area are.
    pub fn limit_range(&self) -> Option<LimitRange> {
        self.limit_range
    }

    /// The cell's own callback handler names.
    pub fn callbacks(&self) -> Option<&str> {
        self.callbacks.as_deref()
    }

    /// The area handed to the callbacks.
    pub fn callbacks_area(&self) -> Option<Area> {
        self.callbacks_area
    }

    /// Tickets assigned in the current cycle, in final (sorted) order.
    pub fn tickets(&self) -> &[TicketIndex] {
        &self.tickets
    }
}

// ── RuleMatrix ─────────────────────────────────────────────────────

/// A grid with every cell's attributes resolved against a catalog.
pub struct RuleMatrix<T> {
    pub(crate) grid: Grid,
    pub(crate) catalog: RuleCatalog<T>,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) cells: Vec<ResolvedCell>,
    pub(crate) default_template: Option<String>,
}

impl<T> RuleMatrix<T> {
    /// The underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The catalog the matrix was resolved against.
    pub fn catalog(&self) -> &RuleCatalog<T> {
        &self.catalog
    }

    /// The template content cells fall back to.
    pub fn default_template(&self) -> Option<&str> {
        self.default_template.as_deref()
    }

    /// The resolved cell with `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this matrix's grid.
    pub fn cell(&self, id: CellId) -> &ResolvedCell {
        &self.cells[id.index()]
    }

    /// The resolved cell covering `coord`.
    pub fn cell_at(&self, coord: Coord) -> Option<(CellId, &ResolvedCell)> {
        self.grid.cell_at(coord).map(|id| (id, self.cell(id)))
    }

    /// The binding with `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this matrix.
    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    /// Number of bindings created during resolution.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// The rule a binding refers to.
    pub fn rule(&self, id: BindingId) -> &Rule<T> {
        &self.catalog[self.binding(id).rule]
    }

    /// A cell's chain as `(binding, rule)` pairs.
    pub fn chain(&self, id: CellId) -> impl Iterator<Item = (&Binding, &Rule<T>)> + '_ {
        self.cell(id).rules.iter().map(move |&b| {
            let binding = self.binding(b);
            (binding, &self.catalog[binding.rule])
        })
    }

    /// A cell's chain as matcher tokens, e.g. `["wip", "!blocker"]`.
    pub fn rule_names(&self, id: CellId) -> Vec<String> {
        self.chain(id)
            .map(|(b, r)| format!("{}{}", if b.negate { "!" } else { "" }, r.name()))
            .collect()
    }

    /// Whether a cell's chain ends with a terminal rule.
    pub fn ends_terminal(&self, id: CellId) -> bool {
        ends_terminal(&self.catalog, &self.bindings, &self.cell(id).rules)
    }

    /// Distinct tickets assigned to any cell covering `area`, in
    /// row-major first-seen order.
    pub fn tickets_in_area(&self, area: &Area) -> IndexSet<TicketIndex> {
        self.grid
            .cells_in(area)
            .iter()
            .flat_map(|&id| self.cell(id).tickets.iter().copied())
            .collect()
    }

    /// Clear every cell's tickets and every binding's match memory.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.tickets.clear();
        }
        for binding in &mut self.bindings {
            binding.forget_all();
        }
    }
}

impl<T> fmt::Debug for RuleMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleMatrix")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("cells", &self.cells.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

fn ends_terminal<T>(catalog: &RuleCatalog<T>, bindings: &[Binding], chain: &[BindingId]) -> bool {
    chain
        .last()
        .is_some_and(|b| catalog[bindings[b.index()].rule].is_terminal())
}

// ── RuleMatrixBuilder ──────────────────────────────────────────────

/// Resolves a [`Grid`] against a [`RuleCatalog`].
///
/// ```
/// use swimlane_engine::RuleMatrixBuilder;
/// use swimlane_grid::{CellSpec, Grid, TableLayout};
/// use swimlane_rules::{Rule, RuleCatalog};
///
/// let mut catalog = RuleCatalog::new();
/// catalog.register(Rule::new("wip", |s: &&str| *s == "wip")).unwrap();
///
/// let layout = TableLayout::new()
///     .row(vec![CellSpec::header().rules("wip")])
///     .row(vec![CellSpec::content()]);
/// let grid = Grid::from_source(&layout).unwrap();
///
/// let matrix = RuleMatrixBuilder::new(grid, catalog)
///     .default_template("card")
///     .build()
///     .unwrap();
/// let (id, cell) = matrix.cell_at((1, 0).into()).unwrap();
/// assert_eq!(matrix.rule_names(id), ["wip"]);
/// assert_eq!(cell.template(), Some("card"));
/// ```
pub struct RuleMatrixBuilder<T> {
    grid: Grid,
    catalog: RuleCatalog<T>,
    default_template: Option<String>,
}

impl<T> RuleMatrixBuilder<T> {
    /// Start resolving `grid` against `catalog`.
    pub fn new(grid: Grid, catalog: RuleCatalog<T>) -> Self {
        Self {
            grid,
            catalog,
            default_template: None,
        }
    }

    /// Template for content cells no declaration governs.
    pub fn default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = Some(template.into());
        self
    }

    /// Resolve every cell.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownRule`] if any matcher names a rule
    /// missing from the catalog.
    pub fn build(self) -> Result<RuleMatrix<T>, BuildError> {
        let Self {
            grid,
            catalog,
            default_template,
        } = self;

        let mut bindings = Vec::new();
        let mut cells = vec![ResolvedCell::default(); grid.cell_count()];

        // Rule chains first, in document order: every cell a walk visits
        // lies above or left of the origin and is already resolved.
        for id in grid.ids() {
            let chain = resolve_chain(&grid, &catalog, &mut bindings, &cells, id)?;
            let (rules, styles) = finish_chain(&catalog, &bindings, chain);
            let cell = &mut cells[id.index()];
            cell.rules = rules;
            cell.styles = styles;
        }

        for id in grid.ids() {
            let def = grid.cell(id);
            let template = resolve_template(&grid, id).or_else(|| {
                if def.is_header() {
                    None
                } else {
                    default_template.clone()
                }
            });
            let limit_area = resolve_area(&grid, id, AttrKind::Limit, AttrKind::LimitArea);
            let callbacks_area =
                resolve_area(&grid, id, AttrKind::Callbacks, AttrKind::CallbacksArea);

            let cell = &mut cells[id.index()];
            cell.template = template;
            cell.limit = def.attrs.value(AttrKind::Limit).map(str::to_string);
            cell.limit_range = limit_area
                .and(cell.limit.as_deref())
                .and_then(LimitRange::parse);
            cell.limit_area = limit_area;
            cell.callbacks = def.attrs.value(AttrKind::Callbacks).map(str::to_string);
            cell.callbacks_area = callbacks_area;

            trace!(
                cell = %def.anchor,
                rules = cell.rules.len(),
                template = ?cell.template,
                limit_area = ?cell.limit_area.map(|a| a.to_string()),
                "cell resolved"
            );
        }

        debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            cells = cells.len(),
            bindings = bindings.len(),
            "rule matrix built"
        );

        Ok(RuleMatrix {
            grid,
            catalog,
            bindings,
            cells,
            default_template,
        })
    }
}

/// Bind the tokens of a declaring cell's matcher. Binding stops after
/// the first terminal rule.
fn bind_matcher<T>(
    catalog: &RuleCatalog<T>,
    bindings: &mut Vec<Binding>,
    declared_at: CellId,
    anchor: Coord,
    matcher: &str,
) -> Result<Vec<BindingId>, BuildError> {
    let mut own = Vec::new();
    for token in parse_matcher(matcher) {
        let (rule, terminal) = match catalog.lookup(token.name) {
            Lookup::Found(id, rule) => (id, rule.is_terminal()),
            Lookup::UnknownRule(name) => {
                return Err(BuildError::UnknownRule {
                    name: name.to_string(),
                    cell: anchor,
                })
            }
        };
        own.push(BindingId(bindings.len() as u32));
        bindings.push(Binding {
            rule,
            negate: token.negate,
            declared_at,
            matched: IndexSet::new(),
        });
        if terminal {
            break;
        }
    }
    Ok(own)
}

fn resolve_chain<T>(
    grid: &Grid,
    catalog: &RuleCatalog<T>,
    bindings: &mut Vec<Binding>,
    cells: &[ResolvedCell],
    id: CellId,
) -> Result<Vec<BindingId>, BuildError> {
    let mut chain: Vec<BindingId> = Vec::new();
    let mut appended: Vec<CellId> = Vec::new();
    let mut failure = None;

    seek(grid, id, Direction::TowardOrigin, |visit| {
        let def = grid.cell(visit.id);
        let matcher = def.attrs.value(AttrKind::Matcher);

        if visit.is_self {
            let Some(matcher) = matcher else {
                // Headers never inherit.
                return if def.is_header() {
                    Seek::LastBoth
                } else {
                    Seek::Continue
                };
            };
            match bind_matcher(catalog, bindings, visit.id, def.anchor, matcher) {
                Ok(own) => chain.extend(own),
                Err(e) => {
                    failure = Some(e);
                    return Seek::LastBoth;
                }
            }
            if def.is_header() || ends_terminal(catalog, bindings, &chain) {
                Seek::LastBoth
            } else {
                Seek::Continue
            }
        } else if def.is_header() {
            if matcher.is_none() {
                return Seek::Continue;
            }
            if !appended.contains(&visit.id) {
                appended.push(visit.id);
                chain.extend_from_slice(&cells[visit.id.index()].rules);
            }
            if ends_terminal(catalog, bindings, &chain) {
                Seek::Last
            } else {
                Seek::Continue
            }
        } else if matcher.is_some()
            && ends_terminal(catalog, bindings, &cells[visit.id.index()].rules)
        {
            Seek::Last
        } else {
            Seek::Continue
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(chain),
    }
}

/// Drop repeated references (built-ins are never repeats) and derive
/// the style list.
fn finish_chain<T>(
    catalog: &RuleCatalog<T>,
    bindings: &[Binding],
    chain: Vec<BindingId>,
) -> (Vec<BindingId>, Vec<String>) {
    let mut seen_names: Vec<&str> = Vec::new();
    let mut rules = Vec::with_capacity(chain.len());
    for b in chain {
        let rule = &catalog[bindings[b.index()].rule];
        if rule.builtin_kind().is_none() {
            if seen_names.contains(&rule.name()) {
                continue;
            }
            seen_names.push(rule.name());
        }
        rules.push(b);
    }

    let mut styles: Vec<String> = Vec::new();
    for &b in &rules {
        let binding = &bindings[b.index()];
        if binding.negate {
            continue;
        }
        if let Some(style) = catalog[binding.rule].style() {
            if !styles.iter().any(|s| s == style) {
                styles.push(style.to_string());
            }
        }
    }
    (rules, styles)
}

fn resolve_template(grid: &Grid, id: CellId) -> Option<String> {
    let mut found = None;
    seek(grid, id, Direction::TowardOrigin, |visit| {
        let def = grid.cell(visit.id);
        match def.attrs.value(AttrKind::Template) {
            Some(t) if visit.is_self || def.is_header() => {
                found = Some(t.to_string());
                Seek::LastBoth
            }
            _ if visit.is_self && def.is_header() => Seek::LastBoth,
            _ => Seek::Continue,
        }
    });
    found
}

/// Aggregate the rectangle a declaration of `governed` covers, walking
/// down and then right from the declaring cell.
fn resolve_area(grid: &Grid, id: CellId, governed: AttrKind, explicit: AttrKind) -> Option<Area> {
    let mut area: Option<Area> = None;
    seek(grid, id, Direction::AwayFromOrigin, |visit| {
        let def = grid.cell(visit.id);
        if visit.is_self {
            if let Some(spec) = def.attrs.value(explicit) {
                area = Area::parse(visit.coord, spec);
                return Seek::LastBoth;
            }
            if def.attrs.value(governed).is_none() {
                return Seek::LastBoth;
            }
        } else if def.attrs.declares(governed) {
            return Seek::Last;
        }
        if def.is_header() && (!visit.is_self || area.is_none()) {
            return Seek::Continue;
        }
        match area.as_mut() {
            Some(a) => a.extend_to(visit.coord),
            None => area = Some(Area::point(visit.coord)),
        }
        Seek::Continue
    });
    area
}
