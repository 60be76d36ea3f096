//! Ticket classification with conservation pools.
//!
//! Content cells are visited in document order. Tickets still eligible
//! for later cells travel in pools keyed by conservation tag; the default
//! pool starts with the whole population. A ticket matched from the
//! default pool is recorded in the cell and fanned out into the pools of
//! every conservation tag its matching rules carry. A ticket riding a
//! tag pool only counts where a matching rule claims that tag, and stays
//! in its pool either way. Unmatched tickets stay where they were.

use std::cmp::Ordering;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::debug;

use swimlane_core::{BindingId, ClassifyError, Coord, TicketIndex};
use swimlane_rules::{ConserveTag, RuleCatalog};

use crate::matrix::{Binding, RuleMatrix};

// ── Pools ──────────────────────────────────────────────────────────

/// Key of a conservation pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PoolKey {
    /// The pool every ticket starts in. Displays as `"0"`.
    Default,
    /// The pool of one conservation tag.
    Tag(ConserveTag),
}

impl PoolKey {
    /// The pool a conservation tag re-queues into. The reserved tag
    /// `"0"` names the default pool.
    pub fn for_tag(tag: &ConserveTag) -> Self {
        if tag.as_str() == "0" {
            Self::Default
        } else {
            Self::Tag(tag.clone())
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("0"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Tickets still eligible for upcoming cells, per pool.
///
/// Iteration yields the default pool first, then tag pools in creation
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConservationPools {
    pools: IndexMap<PoolKey, Vec<TicketIndex>>,
}

impl ConservationPools {
    /// Pools holding `tickets` in the default pool only.
    pub fn seeded(tickets: impl IntoIterator<Item = TicketIndex>) -> Self {
        let mut pools = IndexMap::new();
        pools.insert(PoolKey::Default, tickets.into_iter().collect());
        Self { pools }
    }

    /// Queue a ticket into a pool, creating the pool on first use.
    pub fn push(&mut self, key: PoolKey, ticket: TicketIndex) {
        self.pools.entry(key).or_default().push(ticket);
    }

    /// The tickets of one pool.
    pub fn get(&self, key: &PoolKey) -> Option<&[TicketIndex]> {
        self.pools.get(key).map(Vec::as_slice)
    }

    /// Pools in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (&PoolKey, &[TicketIndex])> {
        self.pools
            .get_key_value(&PoolKey::Default)
            .into_iter()
            .chain(self.pools.iter().filter(|(k, _)| **k != PoolKey::Default))
            .map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool exists.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Consume the pools, keeping the default pool.
    pub fn into_default(mut self) -> Vec<TicketIndex> {
        self.pools.shift_remove(&PoolKey::Default).unwrap_or_default()
    }
}

// ── Classification ─────────────────────────────────────────────────

/// Outcome of a classification pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Tickets no cell claimed from the default pool.
    pub unmatched: Vec<TicketIndex>,
    /// Total cell placements, counting a ticket once per cell.
    pub placements: usize,
    /// Pools still alive after the last cell, including the default one.
    pub pools: usize,
}

/// Assign `tickets` to the content cells of `matrix`.
///
/// Cell ticket lists and binding memories must be clear; call
/// [`RuleMatrix::reset`] first.
///
/// # Errors
///
/// Returns [`ClassifyError::PredicateFailed`] when a `match` predicate
/// fails. Cells completed before the failing one keep their tickets.
pub fn classify<T>(
    matrix: &mut RuleMatrix<T>,
    tickets: &[T],
) -> Result<Classification, ClassifyError> {
    let RuleMatrix {
        grid,
        catalog,
        bindings,
        cells,
        ..
    } = matrix;

    let mut pools = ConservationPools::seeded((0..tickets.len()).map(TicketIndex));
    let mut placements = 0;

    for id in grid.content_cells() {
        let anchor = grid.cell(id).anchor;
        let chain = &cells[id.index()].rules;
        let mut next = ConservationPools::default();
        let mut matched: Vec<TicketIndex> = Vec::new();
        let cx = FireContext {
            catalog,
            chain,
            cell: anchor,
        };

        for (pool, members) in pools.iter() {
            for &index in members {
                if cx.fire(bindings, index, &tickets[index.0], pool, &mut next)? {
                    matched.push(index);
                }
            }
        }

        let mut seen = IndexSet::with_capacity(matched.len());
        matched.retain(|t| seen.insert(*t));
        sort_by_chain(catalog, bindings, chain, tickets, &mut matched);

        placements += matched.len();
        cells[id.index()].tickets = matched;
        pools = next;
    }

    let pool_count = pools.len();
    let unmatched = pools.into_default();
    debug!(
        tickets = tickets.len(),
        placements,
        unmatched = unmatched.len(),
        pools = pool_count,
        "classification complete"
    );
    Ok(Classification {
        unmatched,
        placements,
        pools: pool_count,
    })
}

struct FireContext<'a, T> {
    catalog: &'a RuleCatalog<T>,
    chain: &'a [BindingId],
    cell: Coord,
}

impl<T> FireContext<'_, T> {
    /// Run one ticket through the chain and queue it for the next cell.
    fn fire(
        &self,
        bindings: &mut [Binding],
        index: TicketIndex,
        ticket: &T,
        pool: &PoolKey,
        next: &mut ConservationPools,
    ) -> Result<bool, ClassifyError> {
        let mut matched = true;
        let mut claims_pool = false;
        let mut fan_out: SmallVec<[&ConserveTag; 4]> = SmallVec::new();

        for (position, &b) in self.chain.iter().enumerate() {
            let binding = &mut bindings[b.index()];
            let rule = &self.catalog[binding.rule];
            let says = rule
                .matches(ticket)
                .map_err(|reason| ClassifyError::PredicateFailed {
                    cell: self.cell,
                    position,
                    rule: rule.name().to_string(),
                    ticket: index,
                    reason,
                })?;
            matched = binding.negate != says;

            let tags = rule.conservation().tags();
            if matched && tags.is_some() && binding.has_matched(index) {
                matched = false;
            }
            if !matched {
                break;
            }

            for tag in tags.into_iter().flatten() {
                if matches!(pool, PoolKey::Tag(t) if t == tag) {
                    claims_pool = true;
                }
                if !fan_out.contains(&tag) {
                    fan_out.push(tag);
                }
            }
            binding.remember(index);
        }

        if matches!(pool, PoolKey::Tag(_)) {
            matched = matched && claims_pool;
        }

        if !matched || *pool != PoolKey::Default {
            next.push(pool.clone(), index);
        } else {
            for tag in fan_out {
                next.push(PoolKey::for_tag(tag), index);
            }
        }
        Ok(matched)
    }
}

/// Stable-sort by each comparator from the last rule to the first, so
/// the earliest comparator in the chain decides the final order.
fn sort_by_chain<T>(
    catalog: &RuleCatalog<T>,
    bindings: &[Binding],
    chain: &[BindingId],
    tickets: &[T],
    matched: &mut [TicketIndex],
) {
    for &b in chain.iter().rev() {
        let rule = &catalog[bindings[b.index()].rule];
        if rule.has_sort() {
            matched.sort_by(|x, y| {
                rule.compare(&tickets[x.0], &tickets[y.0])
                    .unwrap_or(Ordering::Equal)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::RuleMatrixBuilder;
    use swimlane_grid::{CellSpec, Grid, TableLayout};
    use swimlane_rules::Rule;

    #[derive(Debug)]
    struct Item {
        kind: &'static str,
        rank: u32,
        name: &'static str,
    }

    fn item(kind: &'static str, rank: u32, name: &'static str) -> Item {
        Item { kind, rank, name }
    }

    fn catalog() -> RuleCatalog<Item> {
        let mut c = RuleCatalog::new();
        c.register(Rule::new("a", |t: &Item| t.kind == "a")).unwrap();
        c.register(Rule::new("b", |t: &Item| t.kind == "b")).unwrap();
        c.register(
            Rule::new("ab", |t: &Item| t.kind == "a" || t.kind == "b").conserve("echo"),
        )
        .unwrap();
        c.register(Rule::new("echo", |_: &Item| true).conserve("echo"))
            .unwrap();
        c.register(Rule::new("keep", |t: &Item| t.kind == "a").conserve("0"))
            .unwrap();
        c.register(
            Rule::new("by_rank", |_: &Item| true)
                .sorted_by(|x: &Item, y: &Item| x.rank.cmp(&y.rank)),
        )
        .unwrap();
        c.register(
            Rule::new("by_name", |_: &Item| true)
                .sorted_by(|x: &Item, y: &Item| x.name.cmp(y.name)),
        )
        .unwrap();
        c.register(Rule::fallible("strict", |t: &Item| {
            if t.kind == "bad" {
                Err(swimlane_core::RuleError::Failed {
                    reason: "bad ticket".into(),
                })
            } else {
                Ok(true)
            }
        }))
        .unwrap();
        c
    }

    /// A single header row over one row of content cells.
    fn columns(rules: &[&str]) -> RuleMatrix<Item> {
        let headers = rules.iter().map(|r| CellSpec::header().rules(*r)).collect();
        let content = rules.iter().map(|_| CellSpec::content()).collect();
        let grid =
            Grid::from_source(&TableLayout::new().row(headers).row(content)).unwrap();
        RuleMatrixBuilder::new(grid, catalog()).build().unwrap()
    }

    fn assigned(m: &RuleMatrix<Item>, col: u32) -> Vec<usize> {
        let (_, cell) = m.cell_at(Coord::new(1, col)).unwrap();
        cell.tickets().iter().map(|t| t.0).collect()
    }

    #[test]
    fn plain_rules_consume_tickets() {
        let mut m = columns(&["a", "b", "MATCH_ALWAYS"]);
        let tickets = vec![item("a", 0, ""), item("b", 0, ""), item("c", 0, "")];
        let result = classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [0]);
        assert_eq!(assigned(&m, 1), [1]);
        assert_eq!(assigned(&m, 2), [2]);
        assert!(result.unmatched.is_empty());
        assert_eq!(result.placements, 3);
    }

    #[test]
    fn unmatched_tickets_remain_in_default_pool() {
        let mut m = columns(&["a"]);
        let tickets = vec![item("b", 0, ""), item("a", 0, ""), item("c", 0, "")];
        let result = classify(&mut m, &tickets).unwrap();
        assert_eq!(result.unmatched, [TicketIndex(0), TicketIndex(2)]);
    }

    #[test]
    fn conserved_ticket_is_counted_again_under_its_tag() {
        let mut m = columns(&["ab", "echo"]);
        let tickets = vec![item("a", 0, ""), item("z", 0, "")];
        let result = classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [0]);
        // Ticket 0 rides the "echo" pool and is claimed there; ticket 1
        // comes straight from the default pool.
        assert_eq!(assigned(&m, 1), [1, 0]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn tag_pool_requires_a_claiming_rule() {
        let mut m = columns(&["ab", "MATCH_ALWAYS"]);
        let tickets = vec![item("a", 0, "")];
        let result = classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [0]);
        assert!(assigned(&m, 1).is_empty());
        assert!(result.unmatched.is_empty());
        assert_eq!(result.pools, 1, "only the echo pool survives");
    }

    #[test]
    fn conserving_binding_matches_a_ticket_once() {
        // Both cells inherit one "ab" binding from a spanning header.
        let grid = Grid::from_source(
            &TableLayout::new()
                .row(vec![CellSpec::header().rules("ab").colspan(2)])
                .row(vec![CellSpec::content(), CellSpec::content()]),
        )
        .unwrap();
        let mut m = RuleMatrixBuilder::new(grid, catalog()).build().unwrap();
        let tickets = vec![item("a", 0, "")];
        classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [0]);
        assert!(assigned(&m, 1).is_empty());
        let (_, cell) = m.cell_at(Coord::new(1, 0)).unwrap();
        let binding = m.binding(cell.rules()[0]);
        assert_eq!(binding.matched().len(), 1);
    }

    #[test]
    fn negated_reference_inverts() {
        let mut m = columns(&["!a"]);
        let tickets = vec![item("a", 0, ""), item("b", 0, "")];
        classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [1]);
    }

    #[test]
    fn earliest_comparator_decides_order() {
        let mut m = columns(&["by_rank,by_name"]);
        let tickets = vec![
            item("x", 2, "a"),
            item("x", 1, "c"),
            item("x", 3, "b"),
            item("x", 1, "a"),
        ];
        classify(&mut m, &tickets).unwrap();
        // Rank decides; ties keep the by-name order from the earlier pass.
        assert_eq!(assigned(&m, 0), [3, 1, 0, 2]);
    }

    #[test]
    fn empty_chain_matches_everything() {
        let grid = Grid::from_source(
            &TableLayout::new()
                .row(vec![CellSpec::header()])
                .row(vec![CellSpec::content()]),
        )
        .unwrap();
        let mut m = RuleMatrixBuilder::new(grid, catalog()).build().unwrap();
        let tickets = vec![item("a", 0, ""), item("q", 0, "")];
        let result = classify(&mut m, &tickets).unwrap();
        assert_eq!(assigned(&m, 0), [0, 1]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn predicate_failure_keeps_earlier_cells() {
        let mut m = columns(&["a", "strict"]);
        let tickets = vec![item("a", 0, ""), item("bad", 0, "")];
        match classify(&mut m, &tickets) {
            Err(ClassifyError::PredicateFailed {
                cell,
                position,
                rule,
                ticket,
                ..
            }) => {
                assert_eq!(cell, Coord::new(1, 1));
                assert_eq!(position, 0);
                assert_eq!(rule, "strict");
                assert_eq!(ticket, TicketIndex(1));
            }
            other => panic!("expected PredicateFailed, got {other:?}"),
        }
        assert_eq!(assigned(&m, 0), [0]);
        assert!(assigned(&m, 1).is_empty());
    }

    #[test]
    fn pools_iterate_default_first() {
        let mut pools = ConservationPools::default();
        pools.push(PoolKey::Tag("x".into()), TicketIndex(1));
        pools.push(PoolKey::Default, TicketIndex(2));
        pools.push(PoolKey::Tag("y".into()), TicketIndex(3));
        let keys: Vec<String> = pools.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["0", "x", "y"]);
        assert_eq!(pools.into_default(), [TicketIndex(2)]);
    }

    #[test]
    fn conserving_zero_requeues_into_the_default_pool() {
        let mut m = columns(&["keep", "b"]);
        let result = classify(&mut m, &[item("a", 0, "")]).unwrap();
        assert_eq!(assigned(&m, 0), [0]);
        assert_eq!(result.unmatched, [TicketIndex(0)]);
        assert_eq!(result.pools, 1);

        let mut m = columns(&["keep", "a"]);
        let result = classify(&mut m, &[item("a", 0, "")]).unwrap();
        assert_eq!(assigned(&m, 1), [0]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn tag_named_zero_is_the_default_pool() {
        assert_eq!(PoolKey::for_tag(&"0".into()), PoolKey::Default);
        assert_eq!(
            PoolKey::for_tag(&"review".into()),
            PoolKey::Tag("review".into())
        );
    }
}
