//! Emerson-Lei emptiness check.
//!
//! Starting from the reachable states, every pass over the acceptance sets
//! keeps only the states that can reach, inside the current candidate set, a
//! predecessor of an accepting state of that set. The candidate set shrinks
//! until a whole pass leaves it unchanged; what remains are the states that
//! lie on or lead to a fair cycle.

use super::fixpoint::{StateSet, backward_bfs, backward_bfs_within, pre};
use crate::automaton::{Automaton, InverseAutomaton};
use tracing::debug;

pub fn is_empty(automaton: &Automaton) -> bool {
    is_empty_inverse(&InverseAutomaton::new(automaton))
}

pub fn is_empty_inverse(inverse: &InverseAutomaton<'_>) -> bool {
    let source = inverse.source();
    let mut fair = source.reachable_states();
    let mut passes = 0usize;

    loop {
        passes += 1;
        let before = fair.len();

        for set in source.accepting_sets() {
            let hits: StateSet = fair.intersection(set).copied().collect();
            let targets: StateSet = pre(inverse, &hits).intersection(&fair).copied().collect();
            fair = backward_bfs_within(inverse, &targets, &fair);
        }

        if fair.len() == before {
            break;
        }
    }

    let empty = !backward_bfs(inverse, &fair).contains(&source.initial_state());
    debug!(passes, fair_states = fair.len(), empty, "emerson-lei finished");
    empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emptiness::fixpoint::StateSet;

    #[test]
    fn test_nonempty_simple() {
        let automaton = Automaton::new(3, [(0, 1), (1, 2), (2, 0)], vec![vec![1]]).unwrap();
        assert!(!is_empty(&automaton));
    }

    #[test]
    fn test_accepting_state_must_lie_on_a_cycle() {
        // 0 -> 1 -> 2 -> 2, only 1 accepting
        let automaton = Automaton::new(3, [(0, 1), (1, 2), (2, 2)], vec![vec![1]]).unwrap();
        assert!(is_empty(&automaton));
    }

    #[test]
    fn test_generalized_needs_one_cycle_for_all_sets() {
        // Two separate loops, each covering a different set.
        let automaton = Automaton::new(
            3,
            [(0, 1), (0, 2), (1, 1), (2, 2)],
            vec![vec![1], vec![2]],
        )
        .unwrap();
        assert!(is_empty(&automaton));

        let joined = Automaton::new(
            3,
            [(0, 1), (0, 2), (1, 2), (2, 1)],
            vec![vec![1], vec![2]],
        )
        .unwrap();
        assert!(!is_empty(&joined));
    }

    #[test]
    fn test_ignores_unreachable_fair_cycle() {
        let automaton = Automaton::new(3, [(0, 0), (1, 2), (2, 1)], vec![vec![2]]).unwrap();
        let inverse = InverseAutomaton::new(&automaton);
        assert_eq!(inverse.endpoint_states(), &StateSet::from([0, 1, 2]));
        assert!(is_empty_inverse(&inverse));
    }
}
