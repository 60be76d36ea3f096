//! Core types for the Swimlane board engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: typed IDs, grid
//! coordinates, the lenient integer parsing used by board attributes,
//! and the per-subsystem error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod parse;

pub use error::{CallbackError, ClassifyError, RenderError, RuleError, TransitionError};
pub use id::{BindingId, CellId, Coord, RuleId, TicketIndex};
pub use parse::parse_int_prefix;
