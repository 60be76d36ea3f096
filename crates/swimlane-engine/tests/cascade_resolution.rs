//! Integration test: cascade resolution on full boards.
//!
//! Checks nearest-wins inheritance of rules and templates, terminal
//! cut-offs, spanning headers and the compile/rebuild cycle.

use swimlane_core::Coord;
use swimlane_engine::{BoardConfig, BoardContext, BuildError, ConfigError, RuleMatrix};
use swimlane_grid::{Area, CellSpec, TableLayout};
use swimlane_test_utils::{
    lane_board, sample_tickets, standard_board, standard_catalog, TestTicket,
};

fn board(layout: &TableLayout) -> BoardContext<TestTicket> {
    let config = BoardConfig::from_source(layout, standard_catalog())
        .unwrap()
        .with_default_template("card");
    BoardContext::new(config).unwrap()
}

fn names(m: &RuleMatrix<TestTicket>, row: u32, col: u32) -> Vec<String> {
    let (id, _) = m.cell_at(Coord::new(row, col)).unwrap();
    m.rule_names(id)
}

// ── Inheritance ──────────────────────────────────────────────────────

#[test]
fn standard_board_chains() {
    let b = board(&standard_board());
    let m = b.matrix();
    assert_eq!(names(m, 1, 1), ["todo", "!blocker"]);
    assert_eq!(names(m, 1, 2), ["wip", "by_priority", "!blocker"]);
    assert_eq!(names(m, 2, 2), ["wip", "by_priority", "blocker"]);
    // A terminal column header stops the column pass only.
    assert_eq!(names(m, 1, 3), ["done", "!blocker"]);
    // Headers keep exactly their own declaration.
    assert_eq!(names(m, 0, 2), ["wip", "by_priority"]);
    assert!(names(m, 0, 0).is_empty());
}

#[test]
fn intervening_terminal_cell_cuts_off_distant_headers() {
    let layout = TableLayout::new()
        .row(vec![CellSpec::header().rules("todo").template("far")])
        .row(vec![CellSpec::content().rules("done").template("near")])
        .row(vec![CellSpec::content()]);
    let b = board(&layout);
    let m = b.matrix();
    assert_eq!(names(m, 1, 0), ["done"]);
    assert!(names(m, 2, 0).is_empty());

    // Templates only come from the cell itself or headers.
    let (_, cell) = m.cell_at(Coord::new(2, 0)).unwrap();
    assert_eq!(cell.template(), Some("far"));
}

#[test]
fn spanning_header_governs_every_spanned_column() {
    let b = board(&lane_board());
    let m = b.matrix();
    assert_eq!(names(m, 1, 1), ["wip", "urgent"]);
    assert_eq!(names(m, 1, 2), ["MATCH_NEVER", "wip", "urgent"]);
    assert_eq!(names(m, 2, 2), ["wip", "MATCH_ALWAYS"]);

    let (_, header) = m.cell_at(Coord::new(0, 2)).unwrap();
    assert_eq!(
        header.limit_area(),
        Some(Area::new(Coord::new(1, 1), Coord::new(2, 2)))
    );
    assert_eq!(header.callbacks_area(), header.limit_area());
}

#[test]
fn styles_follow_non_negated_rules() {
    let b = board(&standard_board());
    let (_, lane) = b.matrix().cell_at(Coord::new(2, 1)).unwrap();
    assert_eq!(lane.styles(), ["table-danger"]);
    let (_, normal) = b.matrix().cell_at(Coord::new(1, 1)).unwrap();
    assert!(normal.styles().is_empty());
}

#[test]
fn unknown_rule_aborts_construction() {
    let layout = TableLayout::new()
        .row(vec![CellSpec::header(), CellSpec::header().rules("wip,shipped")])
        .row(vec![CellSpec::content(), CellSpec::content()]);
    let config = BoardConfig::from_source(&layout, standard_catalog()).unwrap();
    match BoardContext::new(config) {
        Err(ConfigError::Build(BuildError::UnknownRule { name, cell })) => {
            assert_eq!(name, "shipped");
            assert_eq!(cell, Coord::new(0, 1));
        }
        other => panic!("expected Build(UnknownRule), got {other:?}"),
    }
}

// ── Compile ──────────────────────────────────────────────────────────

#[test]
fn compiled_board_rebuilds_with_explicit_chains() {
    let original = board(&standard_board());
    let rebuilt =
        BoardContext::new(BoardConfig::new(original.compile(), standard_catalog())).unwrap();

    for id in original.grid().content_cells() {
        // An explicit chain binds up to its first terminal rule, so a
        // terminal inherited mid-chain truncates the rebuilt chain.
        let mut expected = Vec::new();
        let mut closed = false;
        for (binding, rule) in original.matrix().chain(id) {
            expected.push(format!("{}{}", if binding.negate { "!" } else { "" }, rule.name()));
            if rule.is_terminal() {
                closed = true;
                break;
            }
        }
        if !closed {
            expected.push("LAST".to_string());
        }
        assert_eq!(rebuilt.matrix().rule_names(id), expected);
        assert_eq!(
            rebuilt.matrix().cell(id).template(),
            original.matrix().cell(id).template()
        );
    }
    let (done, _) = rebuilt.matrix().cell_at(Coord::new(1, 3)).unwrap();
    assert_eq!(rebuilt.matrix().rule_names(done), ["done"]);
    for id in rebuilt.grid().header_cells() {
        assert!(rebuilt.matrix().rule_names(id).is_empty());
    }
}

#[test]
fn compiled_board_classifies_sample_identically() {
    let mut original = board(&standard_board());
    let mut rebuilt = BoardContext::new(
        BoardConfig::new(original.compile(), standard_catalog()).with_default_template("card"),
    )
    .unwrap();

    let a = original.populate(sample_tickets()).unwrap();
    let b = rebuilt.populate(sample_tickets()).unwrap();
    assert_eq!(a.unmatched, b.unmatched);
    for id in original.grid().content_cells() {
        assert_eq!(
            original.matrix().cell(id).tickets(),
            rebuilt.matrix().cell(id).tickets()
        );
    }
    assert_eq!(original.limits(), rebuilt.limits());
}
