//! Swimlane Quickstart: a small kanban board from scratch.
//!
//! Demonstrates:
//!   1. Registering rules (status matchers, a sort, a conserving lane)
//!   2. Laying out header and content cells with a spanning header
//!   3. Populating the board and reading WIP limit reports
//!   4. Describing resolved cells
//!   5. Checking a drag-and-drop move against the target cell's rules
//!
//! Run with:
//!   cargo run --example quickstart
//!
//! Set `RUST_LOG=swimlane_engine=debug` to see the engine's tracing.

use std::cmp::Reverse;

use swimlane_core::Coord;
use swimlane_engine::{BoardConfig, BoardContext, CallbackRegistry, CellHandle, MoveDecision};
use swimlane_grid::{CellSpec, Grid, TableLayout};
use swimlane_rules::{Rule, RuleCatalog, Transitions};
use tracing_subscriber::EnvFilter;

// ─── Tickets ────────────────────────────────────────────────────

#[derive(Debug)]
struct Issue {
    key: &'static str,
    status: &'static str,
    points: u8,
    expedite: bool,
}

fn issue(key: &'static str, status: &'static str, points: u8) -> Issue {
    Issue {
        key,
        status,
        points,
        expedite: false,
    }
}

// ─── Rules ──────────────────────────────────────────────────────

fn status(name: &'static str) -> Rule<Issue> {
    Rule::new(name, move |i: &Issue| i.status == name).with_transition(move |_, acc, _| {
        acc.set("status", name);
        Ok(true)
    })
}

fn catalog() -> RuleCatalog<Issue> {
    let mut catalog = RuleCatalog::new();
    let rules = [
        status("backlog"),
        status("doing"),
        status("review").with_transition(|i: &Issue, acc, _| {
            acc.set("status", "review");
            // Nothing unestimated goes to review.
            Ok(i.points > 0)
        }),
        status("done").terminal(),
        Rule::new("expedite", |i: &Issue| i.expedite)
            .conserve("expedite")
            .styled("lane-expedite"),
        Rule::new("largest_first", |_: &Issue| true)
            .sorted_by(|a: &Issue, b: &Issue| Reverse(a.points).cmp(&Reverse(b.points))),
    ];
    for rule in rules {
        if let Err(e) = catalog.register(rule) {
            panic!("quickstart catalog: {e}");
        }
    }
    catalog
}

// ─── Layout ─────────────────────────────────────────────────────
//
//            | backlog | in progress (colspan 2, WIP 1-3) | done
//            |         | doing        | review            |
// expedite   | (2,1)   | (2,2)        | (2,3)             | (2,4)
// standard   | (3,1)   | (3,2)        | (3,3)             | (3,4)

fn layout() -> TableLayout {
    TableLayout::new()
        .row(vec![
            CellSpec::header().rowspan(2),
            CellSpec::header().rules("backlog").rowspan(2),
            CellSpec::header()
                .rules("largest_first")
                .colspan(2)
                .limit("1,3")
                .callbacks("summary"),
            CellSpec::header().rules("done").rowspan(2),
        ])
        .row(vec![
            CellSpec::header().rules("doing"),
            CellSpec::header().rules("review"),
        ])
        .row(vec![
            CellSpec::header().rules("expedite"),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
        ])
        .row(vec![
            CellSpec::header().rules("MATCH_ALWAYS"),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
        ])
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ─── Build ──────────────────────────────────────────────────

    let callbacks = CallbackRegistry::new().with(
        "summary",
        |issues: &[&Issue], cell: CellHandle, _: &Grid| -> Result<(), String> {
            let points: u32 = issues.iter().map(|i| u32::from(i.points)).sum();
            println!("  summary at {}: {} issues, {points} points", cell.anchor, issues.len());
            Ok(())
        },
    );
    let config = match BoardConfig::from_source(&layout(), catalog()) {
        Ok(config) => config.with_default_template("card").with_callbacks(callbacks),
        Err(e) => panic!("layout: {e}"),
    };
    let mut board = match BoardContext::new(config) {
        Ok(board) => board,
        Err(e) => panic!("board: {e}"),
    };
    println!(
        "Board: {} rows x {} cols, {} cells",
        board.grid().rows(),
        board.grid().cols(),
        board.grid().cell_count()
    );

    // ─── Populate ───────────────────────────────────────────────

    let mut hotfix = issue("OPS-7", "doing", 2);
    hotfix.expedite = true;
    let issues = vec![
        issue("WEB-1", "backlog", 0),
        issue("WEB-2", "doing", 3),
        issue("WEB-3", "doing", 8),
        issue("WEB-4", "review", 5),
        issue("WEB-5", "done", 1),
        hotfix,
        issue("WEB-6", "parked", 2),
    ];

    println!("\nPopulating:");
    let outcome = match board.populate(issues) {
        Ok(outcome) => outcome,
        Err(e) => panic!("populate: {e}"),
    };
    println!(
        "  {} placements, {} unmatched",
        outcome.placements,
        outcome.unmatched.len()
    );
    for &index in board.unmatched() {
        if let Some(issue) = board.ticket(index) {
            println!("  unmatched: {}", issue.key);
        }
    }

    for row in 2..4 {
        for col in 1..5 {
            let keys: Vec<&str> = board
                .tickets_in_cell(Coord::new(row, col))
                .iter()
                .map(|i| i.key)
                .collect();
            println!("  {}: {keys:?}", Coord::new(row, col));
        }
    }

    // ─── Limits ─────────────────────────────────────────────────

    println!("\nWIP limits:");
    for report in board.limits() {
        println!(
            "  {} -> {} ({})",
            report.anchor,
            report.statement,
            report.state.style_class()
        );
    }

    // ─── Describe ───────────────────────────────────────────────

    println!("\nResolved cells:");
    for description in board.describe().iter().filter(|d| !d.header) {
        println!("  {description}");
    }

    // ─── Move ───────────────────────────────────────────────────

    board.set_ticket_selector(|key: &str, i: &Issue| i.key == key);
    board.set_drop_action(|i: &Issue, acc: &Transitions| {
        for (field, value) in acc.iter() {
            println!("  commit {}: {field} = {value}", i.key);
        }
        true
    });

    println!("\nMoves:");
    for (key, from, to) in [
        ("WEB-2", Coord::new(3, 2), Coord::new(3, 3)),
        ("WEB-1", Coord::new(3, 1), Coord::new(3, 3)),
    ] {
        match board.drop_ticket(key, from, to) {
            Ok(MoveDecision::Vetoed { rule, .. }) => {
                println!("  {key}: refused by '{rule}'");
            }
            Ok(decision) => println!("  {key}: {decision:?}"),
            Err(e) => println!("  {key}: error: {e}"),
        }
    }
}
