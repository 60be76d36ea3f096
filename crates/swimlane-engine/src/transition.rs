//! The transition gate: checks a proposed ticket move against the
//! target cell's rule chain before handing it to the drop action.

use tracing::debug;

use swimlane_core::{Coord, TicketIndex, TransitionError};
use swimlane_rules::Transitions;

use crate::matrix::RuleMatrix;

/// Commits an accepted move. Returns whether the move took effect.
pub trait DropAction<T> {
    /// Apply `transitions` to `ticket`.
    fn perform(&mut self, ticket: &T, transitions: &Transitions) -> bool;
}

impl<T, F> DropAction<T> for F
where
    F: FnMut(&T, &Transitions) -> bool,
{
    fn perform(&mut self, ticket: &T, transitions: &Transitions) -> bool {
        self(ticket, transitions)
    }
}

/// Identifies the ticket behind an externally reported drag identifier.
pub trait TicketSelector<T> {
    /// Whether `ticket` is the one called `external_id`.
    fn selects(&self, external_id: &str, ticket: &T) -> bool;
}

impl<T, F> TicketSelector<T> for F
where
    F: Fn(&str, &T) -> bool,
{
    fn selects(&self, external_id: &str, ticket: &T) -> bool {
        self(external_id, ticket)
    }
}

/// Outcome of a move check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveDecision {
    /// Source and target are the same cell; nothing was evaluated.
    SameCell,
    /// No ticket in the current population carries the identifier.
    TicketNotFound,
    /// A transition predicate refused the move. The drop action was not
    /// called.
    Vetoed {
        /// Position of the refusing rule in the target chain.
        position: usize,
        /// Name of the refusing rule.
        rule: String,
    },
    /// The drop action accepted the move.
    Committed {
        /// The effects handed to the drop action.
        transitions: Transitions,
    },
    /// The drop action declined the move.
    Declined {
        /// The effects handed to the drop action.
        transitions: Transitions,
    },
}

impl MoveDecision {
    /// Whether the move took effect.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Check moving `ticket` from `source` to `target`.
///
/// Transition predicates of the target chain run from the last rule to
/// the first and share one [`Transitions`] accumulator; the first `false`
/// vetoes the move. Otherwise `drop` decides.
///
/// # Errors
///
/// Returns [`TransitionError::OutOfGrid`] for coordinates outside the
/// grid, [`TransitionError::NotContentCell`] when either end is a
/// header, and [`TransitionError::PredicateFailed`] when a predicate
/// fails.
pub fn check_move<T>(
    matrix: &RuleMatrix<T>,
    source: Coord,
    target: Coord,
    index: TicketIndex,
    ticket: &T,
    drop: &mut dyn DropAction<T>,
) -> Result<MoveDecision, TransitionError> {
    let grid = matrix.grid();
    let locate = |coord: Coord| {
        let id = grid
            .cell_at(coord)
            .ok_or(TransitionError::OutOfGrid { coord })?;
        if grid.cell(id).is_header() {
            return Err(TransitionError::NotContentCell { coord });
        }
        Ok(id)
    };
    let from = locate(source)?;
    let to = locate(target)?;
    if from == to {
        return Ok(MoveDecision::SameCell);
    }

    let anchor = grid.cell(to).anchor;
    let chain = matrix.cell(to).rules();
    let mut transitions = Transitions::new();
    for (position, &b) in chain.iter().enumerate().rev() {
        let binding = matrix.binding(b);
        let rule = matrix.rule(b);
        let accepted = rule
            .transition(ticket, &mut transitions, binding.negate)
            .map_err(|reason| TransitionError::PredicateFailed {
                cell: anchor,
                position,
                rule: rule.name().to_string(),
                ticket: index,
                reason,
            })?;
        if !accepted {
            debug!(
                ticket = %index,
                target = %anchor,
                rule = rule.name(),
                position,
                "move vetoed"
            );
            return Ok(MoveDecision::Vetoed {
                position,
                rule: rule.name().to_string(),
            });
        }
    }

    if drop.perform(ticket, &transitions) {
        Ok(MoveDecision::Committed { transitions })
    } else {
        Ok(MoveDecision::Declined { transitions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::RuleMatrixBuilder;
    use std::cell::RefCell;
    use std::rc::Rc;
    use swimlane_core::RuleError;
    use swimlane_grid::{CellSpec, Grid, TableLayout};
    use swimlane_rules::{Rule, RuleCatalog};

    fn matrix(target_rules: &str) -> RuleMatrix<u32> {
        let mut c = RuleCatalog::new();
        c.register(Rule::new("open", |_: &u32| true).with_transition(|_, t, _| {
            t.set("status", "open");
            Ok(true)
        }))
        .unwrap();
        c.register(Rule::new("small", |_: &u32| true).with_transition(|v, _, negated| {
            Ok((*v < 10) != negated)
        }))
        .unwrap();
        c.register(Rule::new("broken", |_: &u32| true).with_transition(|_, _, _| {
            Err(RuleError::Failed {
                reason: "offline".into(),
            })
        }))
        .unwrap();
        let grid = Grid::from_source(
            &TableLayout::new()
                .row(vec![CellSpec::header(), CellSpec::header().rules(target_rules)])
                .row(vec![CellSpec::content(), CellSpec::content()]),
        )
        .unwrap();
        RuleMatrixBuilder::new(grid, c).build().unwrap()
    }

    const SRC: Coord = Coord::new(1, 0);
    const DST: Coord = Coord::new(1, 1);

    #[test]
    fn accepted_move_reaches_drop_action() {
        let m = matrix("open,small");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut drop = move |v: &u32, t: &Transitions| {
            log.borrow_mut().push((*v, t.get("status").map(str::to_string)));
            true
        };
        let decision = check_move(&m, SRC, DST, TicketIndex(0), &3, &mut drop).unwrap();
        assert!(decision.is_committed());
        assert_eq!(*seen.borrow(), vec![(3, Some("open".to_string()))]);
    }

    #[test]
    fn last_rule_veto_skips_earlier_rules_and_drop() {
        let m = matrix("open,small");
        let mut called = false;
        let mut drop = |_: &u32, _: &Transitions| {
            called = true;
            true
        };
        let decision = check_move(&m, SRC, DST, TicketIndex(0), &42, &mut drop).unwrap();
        assert_eq!(
            decision,
            MoveDecision::Vetoed {
                position: 1,
                rule: "small".into()
            }
        );
        assert!(!called);
    }

    #[test]
    fn negation_flag_reaches_predicate() {
        let m = matrix("!small");
        let mut drop = |_: &u32, _: &Transitions| true;
        let decision = check_move(&m, SRC, DST, TicketIndex(0), &42, &mut drop).unwrap();
        assert!(decision.is_committed());
    }

    #[test]
    fn declined_by_drop_action() {
        let m = matrix("open");
        let mut drop = |_: &u32, _: &Transitions| false;
        match check_move(&m, SRC, DST, TicketIndex(0), &1, &mut drop).unwrap() {
            MoveDecision::Declined { transitions } => {
                assert_eq!(transitions.get("status"), Some("open"))
            }
            other => panic!("expected Declined, got {other:?}"),
        }
    }

    #[test]
    fn same_cell_is_rejected_trivially() {
        let m = matrix("broken");
        let mut drop = |_: &u32, _: &Transitions| true;
        assert_eq!(
            check_move(&m, DST, DST, TicketIndex(0), &1, &mut drop).unwrap(),
            MoveDecision::SameCell
        );
    }

    #[test]
    fn predicate_error_is_wrapped() {
        let m = matrix("broken");
        let mut drop = |_: &u32, _: &Transitions| true;
        match check_move(&m, SRC, DST, TicketIndex(7), &1, &mut drop) {
            Err(TransitionError::PredicateFailed { rule, ticket, .. }) => {
                assert_eq!(rule, "broken");
                assert_eq!(ticket, TicketIndex(7));
            }
            other => panic!("expected PredicateFailed, got {other:?}"),
        }
    }

    #[test]
    fn bad_coordinates() {
        let m = matrix("open");
        let mut drop = |_: &u32, _: &Transitions| true;
        assert!(matches!(
            check_move(&m, SRC, Coord::new(5, 5), TicketIndex(0), &1, &mut drop),
            Err(TransitionError::OutOfGrid { .. })
        ));
        assert!(matches!(
            check_move(&m, SRC, Coord::new(0, 1), TicketIndex(0), &1, &mut drop),
            Err(TransitionError::NotContentCell { .. })
        ));
    }
}
