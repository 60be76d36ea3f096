//! The accumulator transition predicates write into.

use indexmap::IndexMap;

/// Field changes proposed by transition predicates while a ticket is
/// moved into a cell.
///
/// Predicates run from the last rule of the target chain to the first;
/// a later write to the same key replaces the earlier value but keeps
/// its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transitions {
    effects: IndexMap<String, String>,
}

impl Transitions {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Propose `key = value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.effects.insert(key.into(), value.into());
    }

    /// The value proposed for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.effects.get(key).map(String::as_str)
    }

    /// Whether any predicate proposed a value for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.effects.contains_key(key)
    }

    /// Number of proposed changes.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether nothing was proposed.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Proposed changes in first-proposed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.effects.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
