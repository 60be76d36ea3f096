//! Conservation tags.

use smallvec::SmallVec;
use std::fmt;

/// A conservation tag: the name of a carry-over pool a matched ticket
/// is re-queued into.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConserveTag(String);

impl ConserveTag {
    /// Create a tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConserveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConserveTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The tags carried by one rule. Rules rarely carry more than two.
pub type TagSet = SmallVec<[ConserveTag; 2]>;

/// Split a comma-separated tag list. Tokens are trimmed, empty tokens
/// and repeats are dropped.
///
/// ```
/// use swimlane_rules::parse_tags;
///
/// let tags = parse_tags("review, qa,,review");
/// let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
/// assert_eq!(names, ["review", "qa"]);
/// ```
pub fn parse_tags(list: &str) -> TagSet {
    let mut tags = TagSet::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let tag = ConserveTag::from(token);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
