//! Rules for Swimlane boards.
//!
//! A [`Rule`] is a capability record: a match predicate, an optional
//! transition predicate, an optional sort comparator, plus typed cascade
//! and conservation settings. Rules are registered by name in a
//! [`RuleCatalog`], which also carries the built-in `MATCH_ALWAYS`,
//! `MATCH_NEVER` and `LAST` rules under reserved names.
//!
//! Cells refer to rules through matcher strings such as `"wip,!blocker"`,
//! split into [`RuleToken`]s by [`parse_matcher`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod matcher;
pub mod rule;
pub mod tag;
pub mod transitions;

pub use catalog::{CatalogError, Lookup, RuleCatalog};
pub use matcher::{parse_matcher, RuleToken};
pub use rule::{Builtin, Cascade, Conservation, Rule};
pub use tag::{parse_tags, ConserveTag, TagSet};
pub use transitions::Transitions;
