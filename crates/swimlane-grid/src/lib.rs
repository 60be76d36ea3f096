//! Grid geometry for Swimlane boards.
//!
//! A board is a two-dimensional grid of header and content cells, where
//! one logical cell may span several rows and columns. This crate owns
//! that geometry:
//!
//! - [`CellDef`] / [`CellSpec`]: one cell's anchor, span, kind and raw
//!   attribute strings.
//! - [`GridSource`]: anything that can supply cell definitions.
//! - [`TableLayout`]: places rows of unpositioned cells using the
//!   table free-slot rule.
//! - [`Grid`]: the cell arena plus a coordinate lookup in which every
//!   spanned coordinate resolves to the same [`CellId`](swimlane_core::CellId).
//! - [`Area`]: inclusive rectangles with anchor-relative parsing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod area;
pub mod cell;
pub mod error;
pub mod grid;
pub mod layout;

pub use area::Area;
pub use cell::{AttrKind, CellAttrs, CellDef, CellKind, CellSpec, GridSource};
pub use error::GridError;
pub use grid::Grid;
pub use layout::TableLayout;
