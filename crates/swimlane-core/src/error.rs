//! Error types for the Swimlane board engine.
//!
//! Organized by subsystem: rule predicates, classification, the
//! transition gate, callback dispatch, and rendering. Grid, catalog and
//! configuration errors live next to the types they validate.

use std::error::Error;
use std::fmt;

use crate::id::{Coord, TicketIndex};

/// Errors raised by a rule's `match` or `transition` predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// The predicate could not evaluate the ticket.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The ticket lacks a field the predicate depends on.
    MissingField {
        /// Name of the missing field.
        field: String,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "predicate failed: {reason}"),
            Self::MissingField { field } => write!(f, "ticket has no field '{field}'"),
        }
    }
}

impl Error for RuleError {}

/// Errors from a classification pass.
///
/// Classification aborts at the failing cell; cells that completed
/// earlier in the same pass keep their assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    /// A rule's `match` predicate failed.
    PredicateFailed {
        /// Anchor of the cell being classified.
        cell: Coord,
        /// Position of the rule in the cell's chain.
        position: usize,
        /// Name of the failing rule.
        rule: String,
        /// The ticket under evaluation.
        ticket: TicketIndex,
        /// The underlying predicate error.
        reason: RuleError,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PredicateFailed {
                cell,
                position,
                rule,
                ticket,
                reason,
            } => write!(
                f,
                "rule <{position}> '{rule}' at {cell} failed on ticket {ticket}: {reason}"
            ),
        }
    }
}

impl Error for ClassifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PredicateFailed { reason, .. } => Some(reason),
        }
    }
}

/// Errors from the transition gate while checking a proposed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// A rule's `transition` predicate failed.
    PredicateFailed {
        /// Anchor of the target cell.
        cell: Coord,
        /// Position of the rule in the target cell's chain.
        position: usize,
        /// Name of the failing rule.
        rule: String,
        /// The ticket being moved.
        ticket: TicketIndex,
        /// The underlying predicate error.
        reason: RuleError,
    },
    /// A coordinate lies outside the grid.
    OutOfGrid {
        /// The offending coordinate.
        coord: Coord,
    },
    /// The coordinate belongs to a header cell, which never holds tickets.
    NotContentCell {
        /// The offending coordinate.
        coord: Coord,
    },
    /// No drop action is installed on the board.
    DropActionMissing,
    /// No ticket selector is installed on the board.
    SelectorMissing,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PredicateFailed {
                cell,
                position,
                rule,
                ticket,
                reason,
            } => write!(
                f,
                "transition <{position}> '{rule}' at {cell} failed on ticket {ticket}: {reason}"
            ),
            Self::OutOfGrid { coord } => write!(f, "coordinate {coord} is outside the grid"),
            Self::NotContentCell { coord } => {
                write!(f, "coordinate {coord} is not a content cell")
            }
            Self::DropActionMissing => write!(f, "no drop action installed"),
            Self::SelectorMissing => write!(f, "no ticket selector installed"),
        }
    }
}

impl Error for TransitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PredicateFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Errors from callback dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackError {
    /// Callbacks were triggered but no handler registry is installed.
    NotConfigured,
    /// A header names a handler the registry does not know.
    UnknownHandler {
        /// The unknown handler name.
        name: String,
        /// Anchor of the declaring header.
        cell: Coord,
    },
    /// A handler reported a failure.
    HandlerFailed {
        /// Name of the failing handler.
        name: String,
        /// Anchor of the declaring header.
        cell: Coord,
        /// Description supplied by the handler.
        reason: String,
    },
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "callbacks not configured"),
            Self::UnknownHandler { name, cell } => {
                write!(f, "callback handler '{name}' at {cell} is not registered")
            }
            Self::HandlerFailed { name, cell, reason } => {
                write!(f, "callback handler '{name}' at {cell} failed: {reason}")
            }
        }
    }
}

impl Error for CallbackError {}

/// Errors from rendering a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A renderer failed on one ticket.
    RendererFailed {
        /// Anchor of the cell being rendered.
        cell: Coord,
        /// Position of the ticket within the cell.
        position: usize,
        /// The ticket being rendered.
        ticket: TicketIndex,
        /// Template the renderer was selected for, if any.
        template: Option<String>,
        /// Description supplied by the renderer.
        reason: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RendererFailed {
                cell,
                position,
                ticket,
                template,
                reason,
            } => {
                write!(f, "rendering ticket <{position}> ({ticket}) at {cell}")?;
                if let Some(t) = template {
                    write!(f, " with template '{t}'")?;
                }
                write!(f, " failed: {reason}")
            }
        }
    }
}

impl Error for RenderError {}
