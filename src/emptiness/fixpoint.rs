//! Set primitives shared by the Emerson-Lei engines.

use crate::automaton::{InverseAutomaton, StateId};
use std::collections::{BTreeSet, VecDeque};

pub type StateSet = BTreeSet<StateId>;

/// States with at least one successor in `states`.
pub fn pre(inverse: &InverseAutomaton<'_>, states: &StateSet) -> StateSet {
    states
        .iter()
        .filter_map(|&state| inverse.transitions_into(state))
        .flatten()
        .copied()
        .collect()
}

/// Smallest superset of `states` closed under [`pre`].
pub fn backward_bfs(inverse: &InverseAutomaton<'_>, states: &StateSet) -> StateSet {
    backward_closure(inverse, states, None)
}

/// Like [`backward_bfs`], but only walks through states of `universe`.
/// `states` itself is expected to lie inside `universe`.
pub fn backward_bfs_within(
    inverse: &InverseAutomaton<'_>,
    states: &StateSet,
    universe: &StateSet,
) -> StateSet {
    backward_closure(inverse, states, Some(universe))
}

/// Greatest subset of `states` in which every state has a successor inside
/// the subset, i.e. the states that can stay in `states` forever.
pub fn inf(inverse: &InverseAutomaton<'_>, states: &StateSet) -> StateSet {
    let mut current = states.clone();
    loop {
        let predecessors = pre(inverse, &current);
        let next: StateSet = current.intersection(&predecessors).copied().collect();
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn backward_closure(
    inverse: &InverseAutomaton<'_>,
    states: &StateSet,
    universe: Option<&StateSet>,
) -> StateSet {
    let mut closure = states.clone();
    let mut queue: VecDeque<StateId> = states.iter().copied().collect();

    while let Some(state) = queue.pop_front() {
        let Some(predecessors) = inverse.transitions_into(state) else {
            continue;
        };
        for &pred in predecessors {
            if universe.is_some_and(|u| !u.contains(&pred)) {
                continue;
            }
            if closure.insert(pred) {
                queue.push_back(pred);
            }
        }
    }

    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;

    // 0 -> 1 -> 2 -> 1, 3 -> 0, 4 (isolated)
    fn sample() -> Automaton {
        Automaton::new(5, [(0, 1), (1, 2), (2, 1), (3, 0)], vec![vec![2]]).unwrap()
    }

    #[test]
    fn test_pre() {
        let automaton = sample();
        let inverse = InverseAutomaton::new(&automaton);
        assert_eq!(pre(&inverse, &StateSet::from([1])), StateSet::from([0, 2]));
        assert_eq!(pre(&inverse, &StateSet::from([3, 4])), StateSet::new());
    }

    #[test]
    fn test_backward_bfs() {
        let automaton = sample();
        let inverse = InverseAutomaton::new(&automaton);
        assert_eq!(
            backward_bfs(&inverse, &StateSet::from([2])),
            StateSet::from([0, 1, 2, 3])
        );
        assert_eq!(
            backward_bfs(&inverse, &StateSet::from([4])),
            StateSet::from([4])
        );
    }

    #[test]
    fn test_backward_bfs_within() {
        let automaton = sample();
        let inverse = InverseAutomaton::new(&automaton);
        let universe = StateSet::from([1, 2, 3]);
        assert_eq!(
            backward_bfs_within(&inverse, &StateSet::from([2]), &universe),
            StateSet::from([1, 2])
        );
    }

    #[test]
    fn test_inf_keeps_only_looping_states() {
        let automaton = sample();
        let inverse = InverseAutomaton::new(&automaton);
        assert_eq!(
            inf(&inverse, &StateSet::from([0, 1, 2, 3, 4])),
            StateSet::from([0, 1, 2, 3])
        );
        assert_eq!(inf(&inverse, &StateSet::from([0, 3])), StateSet::new());
    }
}
