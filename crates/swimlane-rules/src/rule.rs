//! The rule capability record.

use std::cmp::Ordering;
use std::fmt;

use swimlane_core::RuleError;

use crate::tag::{parse_tags, ConserveTag, TagSet};
use crate::transitions::Transitions;

type MatchFn<T> = Box<dyn Fn(&T) -> Result<bool, RuleError>>;
type TransitionFn<T> = Box<dyn Fn(&T, &mut Transitions, bool) -> Result<bool, RuleError>>;
type SortFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Whether a rule ends the cascade that resolves a cell's chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cascade {
    /// Rules from governing headers further away are still collected.
    #[default]
    Continue,
    /// Resolution stops once the chain ends with this rule.
    Terminal,
}

/// Whether a rule lets a matched ticket be counted again elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Conservation {
    /// A ticket matched by this rule is consumed.
    #[default]
    None,
    /// A ticket matched by this rule is re-queued under each tag, and
    /// the rule accepts each ticket at most once per population cycle.
    Tags(TagSet),
}

impl Conservation {
    /// The tags, if the rule conserves.
    pub fn tags(&self) -> Option<&TagSet> {
        match self {
            Self::None => None,
            Self::Tags(tags) => Some(tags),
        }
    }
}

/// The rules every catalog carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Matches every ticket and accepts every transition.
    MatchAlways,
    /// Matches no ticket and vetoes every transition.
    MatchNever,
    /// Matches every ticket and terminates the cascade.
    Last,
}

impl Builtin {
    /// All built-ins, in catalog order.
    pub const ALL: [Builtin; 3] = [Builtin::MatchAlways, Builtin::MatchNever, Builtin::Last];

    /// The reserved name.
    pub fn name(self) -> &'static str {
        match self {
            Self::MatchAlways => "MATCH_ALWAYS",
            Self::MatchNever => "MATCH_NEVER",
            Self::Last => "LAST",
        }
    }

    /// The built-in registered under `name`, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// A named classification rule.
///
/// Built with a match predicate and refined with the builder methods:
///
/// ```
/// use swimlane_rules::{Cascade, Rule};
///
/// struct Ticket { status: &'static str, rank: u32 }
///
/// let done = Rule::new("done", |t: &Ticket| t.status == "done")
///     .terminal()
///     .conserve("archive")
///     .sorted_by(|a: &Ticket, b: &Ticket| a.rank.cmp(&b.rank))
///     .styled("table-success");
///
/// assert_eq!(done.cascade(), Cascade::Terminal);
/// assert!(done.matches(&Ticket { status: "done", rank: 1 }).unwrap());
/// ```
pub struct Rule<T> {
    name: String,
    matcher: MatchFn<T>,
    transition: Option<TransitionFn<T>>,
    cascade: Cascade,
    conservation: Conservation,
    sort: Option<SortFn<T>>,
    style: Option<String>,
    builtin: Option<Builtin>,
}

impl<T> Rule<T> {
    /// A rule with an infallible match predicate.
    pub fn new(name: impl Into<String>, matcher: impl Fn(&T) -> bool + 'static) -> Self {
        Self::fallible(name, move |t| Ok(matcher(t)))
    }

    /// A rule whose match predicate can fail.
    pub fn fallible(
        name: impl Into<String>,
        matcher: impl Fn(&T) -> Result<bool, RuleError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            transition: None,
            cascade: Cascade::Continue,
            conservation: Conservation::None,
            sort: None,
            style: None,
            builtin: None,
        }
    }

    pub(crate) fn builtin(kind: Builtin) -> Self {
        let rule = match kind {
            Builtin::MatchAlways => {
                Self::new(kind.name(), |_| true).with_transition(|_, _, _| Ok(true))
            }
            Builtin::MatchNever => {
                Self::new(kind.name(), |_| false).with_transition(|_, _, _| Ok(false))
            }
            Builtin::Last => Self::new(kind.name(), |_| true).terminal(),
        };
        Self {
            builtin: Some(kind),
            ..rule
        }
    }

    /// Set the transition predicate, called as
    /// `transition(ticket, accumulator, negated)`.
    pub fn with_transition(
        mut self,
        transition: impl Fn(&T, &mut Transitions, bool) -> Result<bool, RuleError> + 'static,
    ) -> Self {
        self.transition = Some(Box::new(transition));
        self
    }

    /// Make the rule terminate the cascade.
    pub fn terminal(mut self) -> Self {
        self.cascade = Cascade::Terminal;
        self
    }

    /// Conserve matched tickets under a comma-separated tag list.
    /// An empty list leaves the rule non-conserving.
    pub fn conserve(self, tags: &str) -> Self {
        self.conserve_tags(parse_tags(tags))
    }

    /// Conserve matched tickets under the given tags.
    pub fn conserve_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ConserveTag>,
    {
        let mut set = TagSet::new();
        for tag in tags {
            let tag = tag.into();
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        self.conservation = if set.is_empty() {
            Conservation::None
        } else {
            Conservation::Tags(set)
        };
        self
    }

    /// Order the tickets of cells governed by this rule.
    ///
    /// `sort` must be a total order. Cells sort with `slice::sort_by`,
    /// which may panic when the comparator is inconsistent.
    pub fn sorted_by(mut self, sort: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.sort = Some(Box::new(sort));
        self
    }

    /// Attach an opaque style tag.
    pub fn styled(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// The rule's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the match predicate.
    pub fn matches(&self, ticket: &T) -> Result<bool, RuleError> {
        (self.matcher)(ticket)
    }

    /// Evaluate the transition predicate. Rules without one accept.
    pub fn transition(
        &self,
        ticket: &T,
        transitions: &mut Transitions,
        negated: bool,
    ) -> Result<bool, RuleError> {
        match &self.transition {
            Some(f) => f(ticket, transitions, negated),
            None => Ok(true),
        }
    }

    /// Cascade behaviour.
    pub fn cascade(&self) -> Cascade {
        self.cascade
    }

    /// Whether the rule terminates the cascade.
    pub fn is_terminal(&self) -> bool {
        self.cascade == Cascade::Terminal
    }

    /// Conservation behaviour.
    pub fn conservation(&self) -> &Conservation {
        &self.conservation
    }

    /// Whether the rule carries a sort comparator.
    pub fn has_sort(&self) -> bool {
        self.sort.is_some()
    }

    /// Compare two tickets, if the rule carries a comparator.
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        self.sort.as_ref().map(|f| f(a, b))
    }

    /// The style tag, if any.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Which built-in this is, if any.
    pub fn builtin_kind(&self) -> Option<Builtin> {
        self.builtin
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("cascade", &self.cascade)
            .field("conservation", &self.conservation)
            .field("transition", &self.transition.is_some())
            .field("sort", &self.sort.is_some())
            .field("style", &self.style)
            .field("builtin", &self.builtin)
            .finish()
    }
}
