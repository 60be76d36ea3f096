//! Board engine for Swimlane.
//!
//! Resolves a [`Grid`](swimlane_grid::Grid) of header and content cells
//! against a [`RuleCatalog`](swimlane_rules::RuleCatalog), then sorts
//! tickets into the content cells:
//!
//! - [`cascade`]: the directional walk every resolved attribute uses.
//! - [`matrix`]: [`RuleMatrixBuilder`] and the resolved [`RuleMatrix`].
//! - [`classify`]: ticket assignment with conservation pools.
//! - [`limits`]: WIP limit ranges, states and statements.
//! - [`transition`]: the gate a ticket move passes before it is committed.
//! - [`callbacks`]: named handlers fired per header after population.
//! - [`render`]: renderer selection by template.
//! - [`inspect`]: debug descriptions and compiled grids.
//! - [`board`]: [`BoardContext`], one board session tying it together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod callbacks;
pub mod cascade;
pub mod classify;
pub mod config;
pub mod inspect;
pub mod limits;
pub mod matrix;
pub mod render;
pub mod transition;

pub use board::{BoardContext, BoardError};
pub use callbacks::{reset_callbacks, trigger_callbacks, CallbackHandler, CallbackRegistry, CellHandle};
pub use cascade::{seek, Direction, Seek, Visit};
pub use classify::{classify, Classification, ConservationPools, PoolKey};
pub use config::{BoardConfig, ConfigError};
pub use inspect::{compile, describe, describe_all, CellDescription};
pub use limits::{
    evaluate_limits, limit_statement, resting_statements, LimitRange, LimitReport, LimitState,
};
pub use matrix::{Binding, BuildError, ResolvedCell, RuleMatrix, RuleMatrixBuilder};
pub use render::{render_board, RenderedCell, Renderer, TemplateSet};
pub use transition::{check_move, DropAction, MoveDecision, TicketSelector};
