//! Emptiness checks for Büchi automata.
//!
//! Every engine answers the same question: is there a run from the initial
//! state that visits the acceptance condition infinitely often? `true` means
//! the language is empty.
//!
//! - [`nested_dfs`]: simple acceptance only
//! - [`two_stack`]: simple or generalized acceptance
//! - [`emerson_lei`] and [`modified_emerson_lei`]: set-based fixpoints over the
//!   inverse transition relation

pub mod emerson_lei;
pub mod fixpoint;
pub mod modified_emerson_lei;
pub mod nested_dfs;
pub mod two_stack;

use crate::automaton::Automaton;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    NestedDfs,
    TwoStack,
    EmersonLei,
    ModifiedEmersonLei,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::NestedDfs,
        Algorithm::TwoStack,
        Algorithm::EmersonLei,
        Algorithm::ModifiedEmersonLei,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::NestedDfs => "nested-dfs",
            Algorithm::TwoStack => "two-stack",
            Algorithm::EmersonLei => "emerson-lei",
            Algorithm::ModifiedEmersonLei => "modified-emerson-lei",
        }
    }

    /// Whether the engine accepts automata with more than one acceptance set.
    pub fn supports_generalized(self) -> bool {
        !matches!(self, Algorithm::NestedDfs)
    }

    /// Run the engine. Fails only when the automaton violates the engine's
    /// precondition.
    pub fn is_empty(self, automaton: &Automaton) -> Result<bool> {
        match self {
            Algorithm::NestedDfs => nested_dfs::is_empty(automaton),
            Algorithm::TwoStack => Ok(two_stack::is_empty(automaton)),
            Algorithm::EmersonLei => Ok(emerson_lei::is_empty(automaton)),
            Algorithm::ModifiedEmersonLei => Ok(modified_emerson_lei::is_empty(automaton)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Algorithm::ALL.iter().map(|a| a.name()).collect();
                format!("unknown algorithm '{s}', expected one of: {}", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::to_simple;
    use std::thread;

    fn verdicts(automaton: &Automaton) -> Vec<bool> {
        Algorithm::ALL
            .into_iter()
            .filter(|algorithm| algorithm.supports_generalized() || !automaton.is_generalized())
            .map(|algorithm| algorithm.is_empty(automaton).unwrap())
            .collect()
    }

    fn assert_all(automaton: &Automaton, empty: bool) {
        let results = verdicts(automaton);
        assert!(!results.is_empty());
        assert!(
            results.iter().all(|&verdict| verdict == empty),
            "expected empty={empty}, got {results:?}"
        );
    }

    #[test]
    fn test_three_cycle_with_accepting_state_is_nonempty() {
        let automaton = Automaton::new(3, [(0, 1), (1, 2), (2, 0)], vec![vec![1]]).unwrap();
        assert_eq!(verdicts(&automaton).len(), 4);
        assert_all(&automaton, false);
    }

    #[test]
    fn test_accepting_self_loop_is_nonempty() {
        let automaton = Automaton::new(1, [(0, 0)], vec![vec![0]]).unwrap();
        assert_all(&automaton, false);
    }

    #[test]
    fn test_unreachable_accepting_state_is_empty() {
        let automaton = Automaton::new(2, [(0, 0)], vec![vec![1]]).unwrap();
        assert_all(&automaton, true);
    }

    #[test]
    fn test_generalized_two_cycle() {
        let nonempty = Automaton::new(2, [(0, 1), (1, 0)], vec![vec![0], vec![1]]).unwrap();
        assert_all(&nonempty, false);

        let empty =
            Automaton::new(3, [(0, 1), (1, 0)], vec![vec![0], vec![1], vec![2]]).unwrap();
        assert_all(&empty, true);

        for automaton in [&nonempty, &empty] {
            let simple = to_simple(automaton).unwrap().into_option().unwrap();
            assert_eq!(verdicts(&simple).len(), 4);
            assert_all(&simple, verdicts(automaton)[0]);
        }
    }

    #[test]
    fn test_only_unreachable_state_accepting_is_empty() {
        let automaton = Automaton::new(
            6,
            [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3), (5, 5), (5, 0)],
            vec![vec![5]],
        )
        .unwrap();
        assert_all(&automaton, true);
    }

    #[test]
    fn test_accepting_state_off_the_cycle_is_empty() {
        // 0 is accepting but only 1 -> 2 -> 1 loops.
        let automaton = Automaton::new(3, [(0, 1), (1, 2), (2, 1)], vec![vec![0]]).unwrap();
        assert_all(&automaton, true);
    }

    #[test]
    fn test_initial_state_without_edges_is_empty() {
        let automaton = Automaton::new(3, [(1, 2), (2, 1)], vec![vec![0, 1, 2]]).unwrap();
        assert_all(&automaton, true);
    }

    #[test]
    fn test_nested_dfs_rejects_generalized() {
        let automaton = Automaton::new(2, [(0, 1), (1, 0)], vec![vec![0], vec![1]]).unwrap();
        assert!(Algorithm::NestedDfs.is_empty(&automaton).is_err());
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert!("dijkstra".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_engines_share_an_automaton_across_threads() {
        let automaton = Automaton::new(
            4,
            [(0, 1), (1, 2), (2, 3), (3, 1)],
            vec![vec![2], vec![3]],
        )
        .unwrap();

        let results: Vec<bool> = thread::scope(|scope| {
            let handles: Vec<_> = Algorithm::ALL
                .into_iter()
                .filter(|algorithm| algorithm.supports_generalized())
                .map(|algorithm| {
                    let automaton = &automaton;
                    scope.spawn(move || algorithm.is_empty(automaton).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results, vec![false, false, false]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::convert::to_simple;
    use proptest::prelude::*;

    fn arb_automaton(max_sets: usize) -> impl Strategy<Value = Automaton> {
        (1u32..10).prop_flat_map(move |states| {
            (
                prop::collection::vec((0..states, 0..states), 0..30),
                prop::collection::vec(
                    prop::collection::btree_set(0..states, 1..3),
                    1..=max_sets,
                ),
            )
                .prop_map(move |(edges, sets)| Automaton::new(states, edges, sets).unwrap())
        })
    }

    proptest! {
        /// Both DFS engines agree on simple acceptance.
        #[test]
        fn nested_dfs_matches_two_stack(automaton in arb_automaton(1)) {
            let nested = nested_dfs::is_empty(&automaton).unwrap();
            prop_assert_eq!(nested, two_stack::is_empty(&automaton));
        }

        /// Both fixpoint engines agree with each other and with Two-Stack.
        #[test]
        fn fixpoints_match_two_stack(automaton in arb_automaton(3)) {
            let expected = two_stack::is_empty(&automaton);
            prop_assert_eq!(emerson_lei::is_empty(&automaton), expected);
            prop_assert_eq!(modified_emerson_lei::is_empty(&automaton), expected);
        }

        /// Converting to simple acceptance preserves emptiness.
        #[test]
        fn conversion_preserves_emptiness(automaton in arb_automaton(3)) {
            let expected = two_stack::is_empty(&automaton);
            match to_simple(&automaton).unwrap().into_option() {
                Some(simple) => {
                    prop_assert!(!simple.is_generalized());
                    for algorithm in Algorithm::ALL {
                        prop_assert_eq!(algorithm.is_empty(&simple).unwrap(), expected);
                    }
                }
                None => prop_assert!(!automaton.is_generalized()),
            }
        }
    }
}
