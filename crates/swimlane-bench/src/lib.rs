//! Benchmark profiles and utilities for the Swimlane board engine.
//!
//! Provides pre-built [`BoardConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 8 status columns x 16 lanes (128 content cells)
//! - [`stress_profile`]: 32 status columns x 64 lanes (~2K content cells)
//! - [`generate_tickets`]: deterministic ticket population via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cmp::Reverse;

use swimlane_engine::BoardConfig;
use swimlane_grid::{CellSpec, TableLayout};
use swimlane_rules::{Rule, RuleCatalog};

/// A ticket as the benchmarks see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchTicket {
    /// Unique identifier, `"B-{n}"`.
    pub id: String,
    /// Status column index.
    pub status: u16,
    /// Lane index.
    pub lane: u16,
    /// Sort key; higher ranks sort first.
    pub rank: u32,
}

/// Build a reference benchmark profile: 8 statuses x 16 lanes.
///
/// Every status header sorts by rank and carries a `"0,{lanes}"` WIP
/// limit over its column.
pub fn reference_profile() -> BoardConfig<BenchTicket> {
    board_profile(8, 16)
}

/// Build a stress benchmark profile: 32 statuses x 64 lanes.
///
/// Same shape as [`reference_profile`] at 16x the content cell count.
pub fn stress_profile() -> BoardConfig<BenchTicket> {
    board_profile(32, 64)
}

/// A board with one header row of statuses and one header column of
/// lanes over a fully populated content block.
pub fn board_profile(statuses: u16, lanes: u16) -> BoardConfig<BenchTicket> {
    let mut header = vec![CellSpec::header()];
    header.extend((0..statuses).map(|s| {
        CellSpec::header()
            .rules(format!("status_{s},by_rank"))
            .limit(format!("0,{lanes}"))
    }));
    let mut layout = TableLayout::new().row(header);
    for l in 0..lanes {
        let mut row = vec![CellSpec::header().rules(format!("lane_{l}"))];
        row.extend((0..statuses).map(|_| CellSpec::content()));
        layout = layout.row(row);
    }

    let cells = match swimlane_grid::GridSource::cell_defs(&layout) {
        Ok(cells) => cells,
        Err(e) => panic!("bench layout: {e}"),
    };
    BoardConfig::new(cells, catalog(statuses, lanes)).with_default_template("card")
}

fn catalog(statuses: u16, lanes: u16) -> RuleCatalog<BenchTicket> {
    let mut c = RuleCatalog::new();
    let status_rules = (0..statuses).map(|s| {
        Rule::new(format!("status_{s}"), move |t: &BenchTicket| t.status == s)
    });
    let lane_rules =
        (0..lanes).map(|l| Rule::new(format!("lane_{l}"), move |t: &BenchTicket| t.lane == l));
    let sort = Rule::new("by_rank", |_: &BenchTicket| true)
        .sorted_by(|a: &BenchTicket, b: &BenchTicket| Reverse(a.rank).cmp(&Reverse(b.rank)));
    for rule in status_rules.chain(lane_rules).chain([sort]) {
        if let Err(e) = c.register(rule) {
            panic!("bench catalog: {e}");
        }
    }
    c
}

/// Generate `n` deterministic tickets spread over `statuses` x `lanes`.
pub fn generate_tickets(n: usize, statuses: u16, lanes: u16, seed: u64) -> Vec<BenchTicket> {
    (0..n as u64)
        .map(|i| {
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            BenchTicket {
                id: format!("B-{i}"),
                status: ((h >> 16) % u64::from(statuses)) as u16,
                lane: ((h >> 32) % u64::from(lanes)) as u16,
                rank: (h >> 40) as u32,
            }
        })
        .collect()
}
