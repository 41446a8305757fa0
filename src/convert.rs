use crate::automaton::{Automaton, StateId};
use anyhow::{Context, Result};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Outcome of [`to_simple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The input already had a single acceptance set; nothing was built.
    Unchanged,
    Converted(Automaton),
}

impl Conversion {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Conversion::Unchanged)
    }

    pub fn into_option(self) -> Option<Automaton> {
        match self {
            Conversion::Unchanged => None,
            Conversion::Converted(automaton) => Some(automaton),
        }
    }
}

/// Translate a generalized Büchi automaton into a simple one with the same
/// language, using the counting product.
///
/// Product states are `(state, counter)` pairs. Leaving a state that belongs to
/// the acceptance set the counter is waiting for moves the counter to the next
/// set, so a product cycle passes through `(s, 0)` with `s ∈ F0` exactly when
/// the original cycle visits every set. Pairs are numbered in discovery order,
/// which keeps the start pair at state 0.
pub fn to_simple(automaton: &Automaton) -> Result<Conversion> {
    if !automaton.is_generalized() {
        return Ok(Conversion::Unchanged);
    }

    let sets = automaton.acceptance_count();
    let start = (automaton.initial_state(), 0usize);

    let mut numbering: HashMap<(StateId, usize), StateId> = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    let mut edges = Vec::new();
    let mut accepting = Vec::new();

    while let Some(pair) = queue.pop_front() {
        let (state, counter) = pair;
        let id = numbering[&pair];

        if counter == 0 && automaton.is_accepting(state, Some(0)) {
            accepting.push(id);
        }

        let next_counter = if automaton.is_accepting(state, Some(counter)) {
            (counter + 1) % sets
        } else {
            counter
        };

        for next in automaton.successors(state) {
            let next_pair = (next, next_counter);
            let fresh = product_id(numbering.len())?;
            let next_id = match numbering.entry(next_pair) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    queue.push_back(next_pair);
                    *entry.insert(fresh)
                }
            };
            edges.push((id, next_id));
        }
    }

    let mut state_count = product_id(numbering.len())?;
    if accepting.is_empty() {
        // No reachable accepting pair: park the acceptance set on an isolated
        // state so the result stays well formed and its language stays empty.
        accepting.push(state_count);
        state_count = product_id(numbering.len() + 1)?;
    }

    debug!(
        sets,
        source_states = automaton.state_count(),
        product_states = state_count,
        product_edges = edges.len(),
        "converted generalized automaton"
    );

    Automaton::new(state_count, edges, vec![accepting]).map(Conversion::Converted)
}

/// Id of the next product state, or an error once the product outgrows the
/// state id range.
fn product_id(count: usize) -> Result<StateId> {
    StateId::try_from(count)
        .with_context(|| format!("counting product exceeds {} states", StateId::MAX))
}
