//! Swimlane: a rule-matrix kanban board engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Swimlane sub-crates. For most users, adding `swimlane` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use swimlane::prelude::*;
//!
//! struct Ticket {
//!     status: &'static str,
//!     urgent: bool,
//! }
//!
//! let catalog = RuleCatalog::new()
//!     .with(Rule::new("todo", |t: &Ticket| t.status == "todo"))
//!     .unwrap()
//!     .with(Rule::new("doing", |t: &Ticket| t.status == "doing"))
//!     .unwrap()
//!     .with(Rule::new("urgent", |t: &Ticket| t.urgent).styled("table-danger"))
//!     .unwrap();
//!
//! // Two status columns crossed with an urgent lane and a catch-all lane.
//! let layout = TableLayout::new()
//!     .row(vec![
//!         CellSpec::header(),
//!         CellSpec::header().rules("todo"),
//!         CellSpec::header().rules("doing").limit("1,2"),
//!     ])
//!     .row(vec![CellSpec::header().rules("urgent"), CellSpec::content(), CellSpec::content()])
//!     .row(vec![CellSpec::header().rules("!urgent"), CellSpec::content(), CellSpec::content()]);
//!
//! let config = BoardConfig::from_source(&layout, catalog).unwrap();
//! let mut board = BoardContext::new(config).unwrap();
//! let outcome = board
//!     .populate(vec![
//!         Ticket { status: "todo", urgent: true },
//!         Ticket { status: "doing", urgent: false },
//!         Ticket { status: "done", urgent: false },
//!     ])
//!     .unwrap();
//!
//! assert_eq!(outcome.unmatched, [TicketIndex(2)]);
//! assert_eq!(board.tickets_in_cell(Coord::new(1, 1)).len(), 1);
//! assert_eq!(board.limits()[0].state, LimitState::Ok);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `swimlane-core` | IDs, coordinates, lenient integer parsing, error types |
//! | [`grid`] | `swimlane-grid` | Cell definitions, table layout, spanning grid, areas |
//! | [`rules`] | `swimlane-rules` | Rule records, catalog, matcher tokens, transitions |
//! | [`engine`] | `swimlane-engine` | Cascade resolution, classification, limits, board sessions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`swimlane-core`).
///
/// Contains [`types::Coord`], the typed IDs, [`types::parse_int_prefix`]
/// and the per-subsystem error enums.
pub use swimlane_core as types;

/// Grid geometry (`swimlane-grid`).
///
/// Provides [`grid::CellSpec`] and [`grid::TableLayout`] for describing
/// boards, [`grid::Grid`] for coordinate lookup over spanning cells, and
/// [`grid::Area`] for inclusive rectangles.
pub use swimlane_grid as grid;

/// Rules and the rule catalog (`swimlane-rules`).
///
/// The [`rules::Rule`] record is the main extension point for
/// user-defined board logic.
pub use swimlane_rules as rules;

/// Board engine (`swimlane-engine`).
///
/// [`engine::BoardContext`] ties a resolved [`engine::RuleMatrix`] to a
/// ticket population and the host's callbacks, drop action and
/// renderers.
pub use swimlane_engine as engine;

/// Common imports for typical Swimlane usage.
///
/// ```rust
/// use swimlane::prelude::*;
/// ```
///
/// This imports the most frequently used types: board configuration and
/// sessions, layout builders, rules, and the error types.
pub mod prelude {
    // Core types
    pub use swimlane_core::{CellId, Coord, TicketIndex};

    // Errors
    pub use swimlane_core::{
        CallbackError, ClassifyError, RenderError, RuleError, TransitionError,
    };

    // Grid
    pub use swimlane_grid::{Area, CellDef, CellSpec, Grid, GridError, GridSource, TableLayout};

    // Rules
    pub use swimlane_rules::{Rule, RuleCatalog, Transitions};

    // Engine
    pub use swimlane_engine::{
        BoardConfig, BoardContext, BoardError, CallbackRegistry, CellHandle, ConfigError,
        LimitState, MoveDecision, TemplateSet,
    };
}
