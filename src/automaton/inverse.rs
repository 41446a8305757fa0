use super::{Automaton, StateId};
use std::collections::{BTreeMap, BTreeSet};

/// Reverse view of an [`Automaton`], used by the fixpoint engines.
///
/// The view borrows the source for its whole lifetime, so it can never
/// disagree with it.
#[derive(Debug)]
pub struct InverseAutomaton<'a> {
    source: &'a Automaton,
    predecessors: BTreeMap<StateId, BTreeSet<StateId>>,
    endpoints: BTreeSet<StateId>,
}

impl<'a> InverseAutomaton<'a> {
    pub fn new(source: &'a Automaton) -> Self {
        let mut predecessors: BTreeMap<StateId, BTreeSet<StateId>> = BTreeMap::new();
        let mut endpoints = BTreeSet::new();
        for (from, to) in source.edges() {
            predecessors.entry(to).or_default().insert(from);
            endpoints.insert(from);
            endpoints.insert(to);
        }

        Self {
            source,
            predecessors,
            endpoints,
        }
    }

    pub fn source(&self) -> &'a Automaton {
        self.source
    }

    /// States with an edge into `state`, or `None` when there is none.
    pub fn transitions_into(&self, state: StateId) -> Option<&BTreeSet<StateId>> {
        self.predecessors.get(&state)
    }

    /// Every state that is the source or target of at least one edge.
    pub fn endpoint_states(&self) -> &BTreeSet<StateId> {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_relation() {
        let automaton = Automaton::new(5, [(0, 1), (2, 1), (1, 2), (3, 3)], vec![vec![1]]).unwrap();
        let inverse = InverseAutomaton::new(&automaton);

        assert_eq!(inverse.transitions_into(1), Some(&BTreeSet::from([0, 2])));
        assert_eq!(inverse.transitions_into(3), Some(&BTreeSet::from([3])));
        assert!(inverse.transitions_into(0).is_none());
        assert!(inverse.transitions_into(4).is_none());
        assert_eq!(inverse.endpoint_states(), &BTreeSet::from([0, 1, 2, 3]));
        assert_eq!(inverse.source().state_count(), 5);
    }
}
