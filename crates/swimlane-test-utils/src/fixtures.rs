//! Reusable board fixtures.
//!
//! - [`TestTicket`]: a small ticket record with a builder.
//! - [`standard_catalog`]: `todo`, `wip`, `done`, `blocker`, `urgent`,
//!   `by_priority` and `owned` over [`TestTicket`].
//! - [`standard_board`]: status columns crossed with a blocker lane.
//! - [`lane_board`]: one spanning header over per-assignee lanes.

use std::cmp::Reverse;

use swimlane_core::RuleError;
use swimlane_grid::{CellSpec, TableLayout};
use swimlane_rules::{Rule, RuleCatalog};

/// A ticket as the fixtures see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestTicket {
    pub id: String,
    pub status: String,
    pub priority: u8,
    pub assignee: Option<String>,
    pub blocked: bool,
}

/// A ticket with `id` and `status`, priority 0, unassigned, unblocked.
pub fn ticket(id: &str, status: &str) -> TestTicket {
    TestTicket {
        id: id.to_string(),
        status: status.to_string(),
        priority: 0,
        assignee: None,
        blocked: false,
    }
}

impl TestTicket {
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn assigned(mut self, who: &str) -> Self {
        self.assignee = Some(who.to_string());
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }
}

fn status_rule(name: &'static str) -> Rule<TestTicket> {
    Rule::new(name, move |t: &TestTicket| t.status == name).with_transition(move |t, acc, _| {
        acc.set("status", name);
        Ok(!t.blocked)
    })
}

/// The catalog every fixture board refers to.
///
/// - `todo`, `wip`, `done`: status equality; moving a ticket into one
///   records the new status and is refused for blocked tickets. `done`
///   is terminal.
/// - `blocker`: blocked tickets, styled `table-danger`.
/// - `urgent`: priority 3 or higher, conserved under the `urgent` tag.
/// - `by_priority`: matches everything, highest priority first.
/// - `owned`: fails with [`RuleError::MissingField`] for unassigned
///   tickets.
pub fn standard_catalog() -> RuleCatalog<TestTicket> {
    let mut c = RuleCatalog::new();
    let rules = [
        status_rule("todo"),
        status_rule("wip"),
        status_rule("done").terminal(),
        Rule::new("blocker", |t: &TestTicket| t.blocked).styled("table-danger"),
        Rule::new("urgent", |t: &TestTicket| t.priority >= 3).conserve("urgent"),
        Rule::new("by_priority", |_: &TestTicket| true)
            .sorted_by(|a: &TestTicket, b: &TestTicket| Reverse(a.priority).cmp(&Reverse(b.priority))),
        Rule::fallible("owned", |t: &TestTicket| match &t.assignee {
            Some(_) => Ok(true),
            None => Err(RuleError::MissingField {
                field: "assignee".to_string(),
            }),
        }),
    ];
    for rule in rules {
        if let Err(e) = c.register(rule) {
            panic!("fixture catalog: {e}");
        }
    }
    c
}

/// Status columns crossed with a blocker lane.
///
/// ```text
///          | todo        | wip (2,5)   | done
/// !blocker | (1,1)       | (1,2)       | (1,3)
/// blocker  | (2,1)       | (2,2)       | (2,3)
/// ```
///
/// The `wip` header limits its whole column and sorts by priority.
pub fn standard_board() -> TableLayout {
    TableLayout::new()
        .row(vec![
            CellSpec::header(),
            CellSpec::header().rules("todo"),
            CellSpec::header().rules("wip,by_priority").limit("2,5"),
            CellSpec::header().rules("done"),
        ])
        .row(vec![
            CellSpec::header().rules("!blocker"),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
        ])
        .row(vec![
            CellSpec::header().rules("blocker"),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
        ])
}

/// A spanning `wip` header over two lanes, the first for urgent work.
///
/// ```text
///         | wip (colspan 2)
/// urgent  | (1,1)  | (1,2)
/// any     | (2,1)  | (2,2)
/// ```
pub fn lane_board() -> TableLayout {
    TableLayout::new()
        .row(vec![
            CellSpec::header(),
            CellSpec::header().rules("wip").colspan(2).limit("3").callbacks("count"),
        ])
        .row(vec![
            CellSpec::header().rules("urgent"),
            CellSpec::content(),
            CellSpec::content().rules("MATCH_NEVER"),
        ])
        .row(vec![
            CellSpec::header().rules("MATCH_ALWAYS"),
            CellSpec::content(),
            CellSpec::content(),
        ])
}

/// A population touching every cell of [`standard_board`].
pub fn sample_tickets() -> Vec<TestTicket> {
    vec![
        ticket("T-1", "todo"),
        ticket("T-2", "wip").priority(1),
        ticket("T-3", "wip").priority(4),
        ticket("T-4", "wip").priority(2).blocked(),
        ticket("T-5", "done"),
        ticket("T-6", "todo").blocked(),
        ticket("T-7", "review"),
    ]
}
