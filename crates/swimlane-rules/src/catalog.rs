//! The rule catalog: name → rule registry with reserved built-ins.

use std::error::Error;
use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use swimlane_core::RuleId;

use crate::rule::{Builtin, Rule};

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from [`RuleCatalog::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The name belongs to a built-in rule.
    ReservedName {
        /// The reserved name.
        name: String,
    },
    /// A rule with this name is already registered.
    DuplicateName {
        /// The duplicated name.
        name: String,
    },
    /// The name cannot be referenced from a matcher string: it is empty,
    /// has surrounding whitespace, starts with `!` or contains `,`.
    InvalidName {
        /// The rejected name.
        name: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedName { name } => write!(f, "rule name '{name}' is reserved"),
            Self::DuplicateName { name } => write!(f, "rule '{name}' is already registered"),
            Self::InvalidName { name } => write!(f, "rule name '{name}' cannot be referenced"),
        }
    }
}

impl Error for CatalogError {}

// ── Lookup ─────────────────────────────────────────────────────────

/// Result of resolving a name against the catalog.
#[derive(Debug)]
pub enum Lookup<'a, T> {
    /// The name resolved.
    Found(RuleId, &'a Rule<T>),
    /// No rule carries this name.
    UnknownRule(&'a str),
}

// ── RuleCatalog ────────────────────────────────────────────────────

/// Registry of the rules one board refers to.
///
/// Every catalog starts with the built-ins `MATCH_ALWAYS`, `MATCH_NEVER`
/// and `LAST`. Rules are immutable once registered.
///
/// ```
/// use swimlane_rules::{Lookup, Rule, RuleCatalog};
///
/// let mut catalog = RuleCatalog::new();
/// catalog.register(Rule::new("wip", |s: &&str| *s == "wip")).unwrap();
///
/// assert!(matches!(catalog.lookup("wip"), Lookup::Found(..)));
/// assert!(matches!(catalog.lookup("LAST"), Lookup::Found(..)));
/// assert!(matches!(catalog.lookup("nope"), Lookup::UnknownRule("nope")));
/// ```
pub struct RuleCatalog<T> {
    rules: Vec<Rule<T>>,
    index: IndexMap<String, RuleId>,
}

impl<T> RuleCatalog<T> {
    /// A catalog holding only the built-ins.
    pub fn new() -> Self {
        let mut catalog = Self {
            rules: Vec::new(),
            index: IndexMap::new(),
        };
        for kind in Builtin::ALL {
            catalog.insert(Rule::builtin(kind));
        }
        catalog
    }

    fn insert(&mut self, rule: Rule<T>) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.index.insert(rule.name().to_string(), id);
        self.rules.push(rule);
        id
    }

    /// Register a rule under its name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ReservedName`] for a built-in name,
    /// [`CatalogError::DuplicateName`] for a name already taken, and
    /// [`CatalogError::InvalidName`] for a name no matcher string could
    /// refer to.
    pub fn register(&mut self, rule: Rule<T>) -> Result<RuleId, CatalogError> {
        let name = rule.name();
        if Builtin::from_name(name).is_some() {
            return Err(CatalogError::ReservedName { name: name.into() });
        }
        if name.is_empty() || name.trim() != name || name.starts_with('!') || name.contains(',')
        {
            return Err(CatalogError::InvalidName { name: name.into() });
        }
        if self.index.contains_key(name) {
            return Err(CatalogError::DuplicateName { name: name.into() });
        }
        Ok(self.insert(rule))
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, rule: Rule<T>) -> Result<Self, CatalogError> {
        self.register(rule)?;
        Ok(self)
    }

    /// Resolve a name.
    pub fn lookup<'a>(&'a self, name: &'a str) -> Lookup<'a, T> {
        match self.index.get(name) {
            Some(&id) => Lookup::Found(id, &self.rules[id.index()]),
            None => Lookup::UnknownRule(name),
        }
    }

    /// The rule with `id`, if it exists.
    pub fn get(&self, id: RuleId) -> Option<&Rule<T>> {
        self.rules.get(id.index())
    }

    /// Number of rules including built-ins.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always `false`: the built-ins are always present.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names in registration order, built-ins first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }
}

impl<T> Default for RuleCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<RuleId> for RuleCatalog<T> {
    type Output = Rule<T>;

    fn index(&self, id: RuleId) -> &Rule<T> {
        &self.rules[id.index()]
    }
}

impl<T> fmt::Debug for RuleCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RuleCatalog<u32> {
        let mut c = RuleCatalog::new();
        c.register(Rule::new("even", |v: &u32| v % 2 == 0)).unwrap();
        c.register(Rule::new("big", |v: &u32| *v > 10)).unwrap();
        c
    }

    #[test]
    fn builtins_are_preregistered() {
        let c = RuleCatalog::<u32>::new();
        assert_eq!(c.len(), 3);
        let names: Vec<&str> = c.names().collect();
        assert_eq!(names, ["MATCH_ALWAYS", "MATCH_NEVER", "LAST"]);
    }

    #[test]
    fn lookup_found_and_unknown() {
        let c = catalog();
        match c.lookup("big") {
            Lookup::Found(id, rule) => {
                assert_eq!(id, RuleId(4));
                assert_eq!(rule.name(), "big");
                assert_eq!(c[id].name(), "big");
            }
            other => panic!("expected Found, got {other:?}"),
        }
        match c.lookup("odd") {
            Lookup::UnknownRule(name) => assert_eq!(name, "odd"),
            other => panic!("expected UnknownRule, got {other:?}"),
        }
    }

    #[test]
    fn reserved_name_rejected() {
        let mut c = catalog();
        match c.register(Rule::new("LAST", |_: &u32| false)) {
            Err(CatalogError::ReservedName { name }) => assert_eq!(name, "LAST"),
            other => panic!("expected ReservedName, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut c = catalog();
        match c.register(Rule::new("even", |_: &u32| false)) {
            Err(CatalogError::DuplicateName { name }) => assert_eq!(name, "even"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn unreferenceable_names_rejected() {
        let mut c = catalog();
        for bad in ["", "!neg", "a,b", " padded"] {
            match c.register(Rule::new(bad, |_: &u32| true)) {
                Err(CatalogError::InvalidName { .. }) => {}
                other => panic!("expected InvalidName for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn with_chains_registration() {
        let c = RuleCatalog::new()
            .with(Rule::new("a", |_: &u32| true))
            .and_then(|c| c.with(Rule::new("b", |_: &u32| true)))
            .unwrap();
        assert_eq!(c.len(), 5);
        assert!(c.get(RuleId(4)).is_some());
        assert!(c.get(RuleId(5)).is_none());
    }
}
