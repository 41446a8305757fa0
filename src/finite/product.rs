use super::{Dfa, Symbol};
use crate::automaton::StateId;
use anyhow::{Context, Result, ensure};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Set operation computed by [`product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Words accepted by either operand.
    Union,
    /// Words accepted by both operands.
    Intersection,
    /// Words accepted by the left operand but not the right one.
    Difference,
}

impl Operator {
    pub const ALL: [Operator; 3] = [
        Operator::Union,
        Operator::Intersection,
        Operator::Difference,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operator::Union => "union",
            Operator::Intersection => "intersection",
            Operator::Difference => "difference",
        }
    }

    /// Whether a product state is accepting, given whether each component is.
    pub fn accepts(self, left: bool, right: bool) -> bool {
        match self {
            Operator::Union => left || right,
            Operator::Intersection => left && right,
            Operator::Difference => left && !right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|operator| operator.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Operator::ALL.iter().map(|o| o.name()).collect();
                format!("unknown operator '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// Combine two DFAs over the same alphabet into one recognising
/// `operator(L(left), L(right))`.
///
/// Only pairs reachable from `(0, 0)` are built, each exactly once, numbered in
/// breadth-first discovery order so the start pair becomes state 0.
pub fn product(left: &Dfa, right: &Dfa, operator: Operator) -> Result<Dfa> {
    let alphabet = left.alphabet_size();
    ensure!(
        alphabet == right.alphabet_size(),
        "operands have different alphabets ({alphabet} and {} symbols)",
        right.alphabet_size()
    );

    let start = (left.initial_state(), right.initial_state());
    let mut numbering: HashMap<(StateId, StateId), StateId> = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    let mut accepting = Vec::new();
    let mut table = Vec::new();

    // Pairs leave the queue in the order they were numbered, so rows are
    // appended in id order.
    while let Some(pair) = queue.pop_front() {
        let (l, r) = pair;
        if operator.accepts(left.is_accepting(l), right.is_accepting(r)) {
            accepting.push(numbering[&pair]);
        }

        for symbol in 0..alphabet {
            let next = (step(left, l, symbol)?, step(right, r, symbol)?);
            let fresh = StateId::try_from(numbering.len())
                .context("product automaton exceeds the state id range")?;
            let next_id = match numbering.entry(next) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    queue.push_back(next);
                    *entry.insert(fresh)
                }
            };
            table.push(next_id);
        }
    }

    let state_count = StateId::try_from(numbering.len())
        .context("product automaton exceeds the state id range")?;
    debug!(
        %operator,
        left_states = left.state_count(),
        right_states = right.state_count(),
        product_states = state_count,
        accepting = accepting.len(),
        "built product automaton"
    );

    Dfa::new(state_count, alphabet, accepting, table)
}

fn step(dfa: &Dfa, state: StateId, symbol: Symbol) -> Result<StateId> {
    dfa.step(state, symbol)
        .with_context(|| format!("no transition from state {state} on symbol {symbol}"))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_dfa(alphabet: u32) -> impl Strategy<Value = Dfa> {
        (1u32..6).prop_flat_map(move |states| {
            (
                prop::collection::vec(0..states, (states * alphabet) as usize),
                prop::collection::vec(any::<bool>(), states as usize),
            )
                .prop_map(move |(table, flags)| {
                    let accepting = (0..states).filter(|&state| flags[state as usize]);
                    Dfa::new(states, alphabet, accepting, table).unwrap()
                })
        })
    }

    proptest! {
        /// The product agrees with the operator applied to both operands.
        #[test]
        fn product_recognises_operator(
            left in arb_dfa(2),
            right in arb_dfa(2),
            word in prop::collection::vec(0u32..2, 0..12),
        ) {
            for operator in Operator::ALL {
                let result = product(&left, &right, operator).unwrap();
                let expected = operator.accepts(
                    left.accepts(&word).unwrap(),
                    right.accepts(&word).unwrap(),
                );
                prop_assert_eq!(result.accepts(&word).unwrap(), expected);
                prop_assert!(result.state_count() <= left.state_count() * right.state_count());
            }
        }
    }
}
