//! Named callback handlers fired per header after population.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use swimlane_core::{CallbackError, CellId, Coord};
use swimlane_grid::Grid;

use crate::matrix::RuleMatrix;

/// The header a callback fires for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellHandle {
    /// Cell id in the board's grid.
    pub id: CellId,
    /// Anchor of the header.
    pub anchor: Coord,
}

/// A host hook invoked with the tickets in a header's callbacks area.
pub trait CallbackHandler<T> {
    /// React to the tickets of `cell`'s callbacks area.
    fn perform(&mut self, tickets: &[&T], cell: CellHandle, grid: &Grid) -> Result<(), String>;

    /// Undo whatever `perform` did to `cell`. Called when the board
    /// resets.
    fn reset(&mut self, cell: CellHandle, grid: &Grid) {
        let _ = (cell, grid);
    }
}

impl<T, F> CallbackHandler<T> for F
where
    F: FnMut(&[&T], CellHandle, &Grid) -> Result<(), String>,
{
    fn perform(&mut self, tickets: &[&T], cell: CellHandle, grid: &Grid) -> Result<(), String> {
        self(tickets, cell, grid)
    }
}

/// Callback handlers by name.
pub struct CallbackRegistry<T> {
    handlers: IndexMap<String, Box<dyn CallbackHandler<T>>>,
}

impl<T> CallbackRegistry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: impl CallbackHandler<T> + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, handler: impl CallbackHandler<T> + 'static) -> Self {
        self.register(name, handler);
        self
    }

    /// The handler called `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn CallbackHandler<T> + 'static)> {
        self.handlers.get_mut(name).map(|h| &mut **h)
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallbackRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Split a callbacks attribute into handler names.
pub(crate) fn handler_names(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|n| !n.is_empty())
}

/// Headers that declare callbacks, with their names and resolved area.
fn callback_headers<T>(matrix: &RuleMatrix<T>) -> impl Iterator<Item = (CellHandle, &str)> + '_ {
    let grid = matrix.grid();
    grid.header_cells().filter_map(move |id| {
        let cell = matrix.cell(id);
        cell.callbacks_area()?;
        let names = cell.callbacks()?;
        Some((
            CellHandle {
                id,
                anchor: grid.cell(id).anchor,
            },
            names,
        ))
    })
}

/// Fire every header's callbacks with the distinct tickets of its
/// callbacks area. Returns the number of handler invocations.
///
/// # Errors
///
/// Returns [`CallbackError::UnknownHandler`] for a name missing from
/// `registry` and [`CallbackError::HandlerFailed`] when a handler fails.
/// Invocations before the failing one have already happened.
pub fn trigger_callbacks<T>(
    matrix: &RuleMatrix<T>,
    tickets: &[T],
    registry: &mut CallbackRegistry<T>,
) -> Result<usize, CallbackError> {
    let mut fired = 0;
    for (cell, names) in callback_headers(matrix) {
        let Some(area) = matrix.cell(cell.id).callbacks_area() else {
            continue;
        };
        let members: Vec<&T> = matrix
            .tickets_in_area(&area)
            .iter()
            .map(|t| &tickets[t.0])
            .collect();
        for name in handler_names(names) {
            let handler = registry
                .get_mut(name)
                .ok_or_else(|| CallbackError::UnknownHandler {
                    name: name.to_string(),
                    cell: cell.anchor,
                })?;
            trace!(cell = %cell.anchor, handler = name, tickets = members.len(), "callback");
            handler
                .perform(&members, cell, matrix.grid())
                .map_err(|reason| CallbackError::HandlerFailed {
                    name: name.to_string(),
                    cell: cell.anchor,
                    reason,
                })?;
            fired += 1;
        }
    }
    debug!(fired, "callbacks triggered");
    Ok(fired)
}

/// Let every handler named by a header undo its effect on that header.
/// Names missing from `registry` are skipped.
pub fn reset_callbacks<T>(matrix: &RuleMatrix<T>, registry: &mut CallbackRegistry<T>) {
    for (cell, names) in callback_headers(matrix) {
        for name in handler_names(names) {
            if let Some(handler) = registry.get_mut(name) {
                handler.reset(cell, matrix.grid());
            }
        }
    }
}
