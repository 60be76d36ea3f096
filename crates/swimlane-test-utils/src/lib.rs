//! Test fixtures for Swimlane development.
//!
//! Provides a ticket type ([`TestTicket`]), a rule catalog over it
//! ([`standard_catalog`]) and sample board layouts, so that engine
//! tests and benchmarks share one vocabulary.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    lane_board, sample_tickets, standard_board, standard_catalog, ticket, TestTicket,
};
