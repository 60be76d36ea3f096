//! The per-board session object.
//!
//! A [`BoardContext`] owns the resolved matrix, the current ticket
//! population and every host collaborator (callbacks, drop action,
//! ticket selector). Each board instance has its own context; nothing is
//! shared between boards.

use std::error::Error;
use std::fmt;

use tracing::{debug, info};

use swimlane_core::{
    CallbackError, CellId, ClassifyError, Coord, RenderError, TicketIndex, TransitionError,
};
use swimlane_grid::{Area, CellDef, Grid};

use crate::callbacks::{reset_callbacks, trigger_callbacks, CallbackRegistry};
use crate::classify::{classify, Classification};
use crate::config::{BoardConfig, ConfigError};
use crate::inspect::{compile, describe, describe_all, CellDescription};
use crate::limits::{evaluate_limits, resting_statements, LimitReport};
use crate::matrix::{RuleMatrix, RuleMatrixBuilder};
use crate::render::{render_board, RenderedCell, TemplateSet};
use crate::transition::{check_move, DropAction, MoveDecision, TicketSelector};

// ── BoardError ─────────────────────────────────────────────────────

/// Errors from operating a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Classification failed.
    Classify(ClassifyError),
    /// A callback could not run.
    Callback(CallbackError),
    /// A move could not be checked.
    Transition(TransitionError),
    /// A ticket could not be rendered.
    Render(RenderError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classify(e) => write!(f, "classify: {e}"),
            Self::Callback(e) => write!(f, "callback: {e}"),
            Self::Transition(e) => write!(f, "transition: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Classify(e) => Some(e),
            Self::Callback(e) => Some(e),
            Self::Transition(e) => Some(e),
            Self::Render(e) => Some(e),
        }
    }
}

impl From<ClassifyError> for BoardError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e)
    }
}

impl From<CallbackError> for BoardError {
    fn from(e: CallbackError) -> Self {
        Self::Callback(e)
    }
}

impl From<TransitionError> for BoardError {
    fn from(e: TransitionError) -> Self {
        Self::Transition(e)
    }
}

impl From<RenderError> for BoardError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

// ── BoardContext ───────────────────────────────────────────────────

/// One board: matrix, tickets and collaborators.
///
/// ```
/// use swimlane_engine::{BoardConfig, BoardContext};
/// use swimlane_grid::{CellSpec, TableLayout};
/// use swimlane_rules::{Rule, RuleCatalog};
///
/// let catalog = RuleCatalog::new()
///     .with(Rule::new("todo", |s: &&str| *s == "todo"))
///     .unwrap();
/// let layout = TableLayout::new()
///     .row(vec![CellSpec::header().rules("todo"), CellSpec::header().rules("MATCH_NEVER")])
///     .row(vec![CellSpec::content(), CellSpec::content()]);
/// let mut board = BoardContext::new(BoardConfig::from_source(&layout, catalog).unwrap()).unwrap();
///
/// let outcome = board.populate(vec!["todo", "done"]).unwrap();
/// assert_eq!(outcome.unmatched.len(), 1);
/// assert_eq!(board.tickets_in_cell((1, 0).into()), [&"todo"]);
/// ```
pub struct BoardContext<T> {
    matrix: RuleMatrix<T>,
    tickets: Vec<T>,
    unmatched: Vec<TicketIndex>,
    limits: Vec<LimitReport>,
    validate_limits: bool,
    callbacks: Option<CallbackRegistry<T>>,
    drop_action: Option<Box<dyn DropAction<T>>>,
    selector: Option<Box<dyn TicketSelector<T>>>,
}

impl<T> BoardContext<T> {
    /// Validate `config`, lay out its grid and resolve every cell.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid configuration, invalid
    /// geometry or an unknown rule reference.
    pub fn new(config: BoardConfig<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        let BoardConfig {
            cells,
            catalog,
            default_template,
            validate_limits,
            callbacks,
        } = config;

        let grid = Grid::new(cells)?;
        let mut builder = RuleMatrixBuilder::new(grid, catalog);
        if let Some(template) = default_template {
            builder = builder.default_template(template);
        }
        let matrix = builder.build()?;
        info!(
            rows = matrix.grid().rows(),
            cols = matrix.grid().cols(),
            cells = matrix.grid().cell_count(),
            callbacks = callbacks.as_ref().map_or(0, CallbackRegistry::len),
            "board ready"
        );

        Ok(Self {
            matrix,
            tickets: Vec::new(),
            unmatched: Vec::new(),
            limits: Vec::new(),
            validate_limits,
            callbacks,
            drop_action: None,
            selector: None,
        })
    }

    // ── Population ────────────────────────────────────────────

    /// Drop the current population: callbacks reset, cells emptied,
    /// match memory cleared.
    pub fn reset(&mut self) {
        if let Some(registry) = self.callbacks.as_mut() {
            reset_callbacks(&self.matrix, registry);
        }
        self.matrix.reset();
        self.tickets.clear();
        self.unmatched.clear();
        self.limits.clear();
    }

    /// Replace the population with `tickets` and classify it, then
    /// evaluate limits (if configured) and fire callbacks (if any).
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Classify`] when a rule predicate fails and
    /// [`BoardError::Callback`] when a callback fails. The board keeps
    /// whatever was committed before the failure.
    pub fn populate(&mut self, tickets: Vec<T>) -> Result<Classification, BoardError> {
        self.reset();
        self.tickets = tickets;
        let outcome = classify(&mut self.matrix, &self.tickets)?;
        self.unmatched = outcome.unmatched.clone();
        if self.validate_limits {
            self.validate();
        }
        if let Some(registry) = self.callbacks.as_mut() {
            trigger_callbacks(&self.matrix, &self.tickets, registry)?;
        }
        info!(
            tickets = self.tickets.len(),
            placements = outcome.placements,
            unmatched = outcome.unmatched.len(),
            "board populated"
        );
        Ok(outcome)
    }

    /// The current population, in input order.
    pub fn tickets(&self) -> &[T] {
        &self.tickets
    }

    /// One ticket of the current population.
    pub fn ticket(&self, index: TicketIndex) -> Option<&T> {
        self.tickets.get(index.0)
    }

    /// Tickets no cell claimed in the last population.
    pub fn unmatched(&self) -> &[TicketIndex] {
        &self.unmatched
    }

    /// Tickets of the cell covering `coord`, in sorted order. Empty for
    /// headers and coordinates outside the grid.
    pub fn tickets_in_cell(&self, coord: Coord) -> Vec<&T> {
        self.matrix
            .cell_at(coord)
            .map(|(_, cell)| cell.tickets().iter().map(|t| &self.tickets[t.0]).collect())
            .unwrap_or_default()
    }

    /// Distinct tickets of every cell covering `area`.
    pub fn tickets_in_area(&self, area: &Area) -> Vec<&T> {
        self.matrix
            .tickets_in_area(area)
            .iter()
            .map(|t| &self.tickets[t.0])
            .collect()
    }

    // ── Limits ────────────────────────────────────────────────

    /// Evaluate every header limit against the current population.
    pub fn validate(&mut self) -> &[LimitReport] {
        self.limits = evaluate_limits(&self.matrix);
        &self.limits
    }

    /// Reports of the last [`validate`](Self::validate).
    pub fn limits(&self) -> &[LimitReport] {
        &self.limits
    }

    /// The limit text of every limited header with no count attached.
    pub fn resting_statements(&self) -> Vec<(Coord, String)> {
        resting_statements(&self.matrix)
    }

    // ── Callbacks ─────────────────────────────────────────────

    /// Fire every header's callbacks against the current population.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::NotConfigured`] when the board has no
    /// callback registry.
    pub fn trigger_callbacks(&mut self) -> Result<usize, CallbackError> {
        let registry = self
            .callbacks
            .as_mut()
            .ok_or(CallbackError::NotConfigured)?;
        trigger_callbacks(&self.matrix, &self.tickets, registry)
    }

    // ── Moves ─────────────────────────────────────────────────

    /// Install the action that commits accepted moves.
    pub fn set_drop_action(&mut self, action: impl DropAction<T> + 'static) {
        self.drop_action = Some(Box::new(action));
    }

    /// Remove the drop action; moves are refused until a new one is set.
    pub fn remove_drop_action(&mut self) {
        self.drop_action = None;
    }

    /// Install the selector that maps drag identifiers to tickets.
    pub fn set_ticket_selector(&mut self, selector: impl TicketSelector<T> + 'static) {
        self.selector = Some(Box::new(selector));
    }

    /// Handle the host dropping the ticket called `external_id` from
    /// `source` onto `target`.
    ///
    /// The first ticket the selector accepts is moved; see
    /// [`check_move`] for the gate itself.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::DropActionMissing`] or
    /// [`TransitionError::SelectorMissing`] when a collaborator is not
    /// installed, and the errors of [`check_move`].
    pub fn drop_ticket(
        &mut self,
        external_id: &str,
        source: Coord,
        target: Coord,
    ) -> Result<MoveDecision, BoardError> {
        let drop = self
            .drop_action
            .as_deref_mut()
            .ok_or(TransitionError::DropActionMissing)?;
        let selector = self
            .selector
            .as_deref()
            .ok_or(TransitionError::SelectorMissing)?;

        let grid = self.matrix.grid();
        if grid.cell_at(source).is_some() && grid.cell_at(source) == grid.cell_at(target) {
            return Ok(MoveDecision::SameCell);
        }
        let Some(index) = self
            .tickets
            .iter()
            .position(|t| selector.selects(external_id, t))
            .map(TicketIndex)
        else {
            debug!(external_id, "dropped ticket not found");
            return Ok(MoveDecision::TicketNotFound);
        };

        let decision = check_move(
            &self.matrix,
            source,
            target,
            index,
            &self.tickets[index.0],
            drop,
        )?;
        debug!(ticket = %index, source = %source, target = %target, ?decision, "drop handled");
        Ok(decision)
    }

    // ── Inspection ────────────────────────────────────────────

    /// Describe the cell covering `coord`.
    pub fn describe_cell(&self, coord: Coord) -> Option<CellDescription> {
        self.matrix
            .grid()
            .cell_at(coord)
            .map(|id| describe(&self.matrix, id))
    }

    /// Describe every cell in document order.
    pub fn describe(&self) -> Vec<CellDescription> {
        describe_all(&self.matrix)
    }

    /// Flatten the resolved board into cell definitions that rebuild
    /// without inheritance.
    pub fn compile(&self) -> Vec<CellDef> {
        compile(&self.matrix)
    }

    /// Render every content cell's tickets.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Render`] for the first failing ticket.
    pub fn render<F>(&self, templates: &TemplateSet<T, F>) -> Result<Vec<RenderedCell<F>>, BoardError> {
        Ok(render_board(&self.matrix, &self.tickets, templates)?)
    }

    /// The resolved matrix.
    pub fn matrix(&self) -> &RuleMatrix<T> {
        &self.matrix
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        self.matrix.grid()
    }

    /// The cell id covering `coord`.
    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        self.matrix.grid().cell_at(coord)
    }
}

impl<T> fmt::Debug for BoardContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardContext")
            .field("matrix", &self.matrix)
            .field("tickets", &self.tickets.len())
            .field("unmatched", &self.unmatched.len())
            .field("validate_limits", &self.validate_limits)
            .field("callbacks", &self.callbacks)
            .field("drop_action", &self.drop_action.is_some())
            .field("selector", &self.selector.is_some())
            .finish()
    }
}
