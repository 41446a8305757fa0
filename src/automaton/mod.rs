pub mod inverse;
pub mod text;

pub use inverse::InverseAutomaton;
pub use text::parse_automaton;

use anyhow::{Result, anyhow, ensure};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Identifier of an automaton state, always in `[0, state_count)`.
pub type StateId = u32;

/// Iterator over the direct successors of a state, ascending.
pub type Successors<'a> =
    std::iter::Copied<std::iter::Flatten<std::option::IntoIter<&'a BTreeSet<StateId>>>>;

/// A (simple or generalized) Büchi automaton.
///
/// The automaton is immutable once built: every emptiness check and the
/// acceptance converter only read it, and transformations always produce a new
/// instance. State `0` is the initial state.
///
/// The number of acceptance sets decides the flavour:
/// - one set: simple Büchi automaton (NBA)
/// - more than one set: generalized Büchi automaton (NGA), where every set has
///   to be visited infinitely often
///
/// `==` also compares the declared state count. Text round trips infer the
/// count from the largest id mentioned, so compare those with
/// [`Automaton::same_structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    state_count: u32,
    transitions: BTreeMap<StateId, BTreeSet<StateId>>,
    accepting: Vec<BTreeSet<StateId>>,
}

impl Automaton {
    pub const INITIAL_STATE: StateId = 0;

    /// Build an automaton over states `[0, state_count)`.
    ///
    /// Fails when `state_count` is zero, when there is no acceptance set, when
    /// any acceptance set is empty or when an edge or accepting state refers to
    /// a state outside the declared range.
    pub fn new<E, S>(state_count: u32, edges: E, accepting_sets: Vec<S>) -> Result<Self>
    where
        E: IntoIterator<Item = (StateId, StateId)>,
        S: IntoIterator<Item = StateId>,
    {
        ensure!(state_count > 0, "automaton must have at least one state");
        ensure!(
            !accepting_sets.is_empty(),
            "automaton must have at least one acceptance set"
        );

        let mut accepting = Vec::with_capacity(accepting_sets.len());
        for (index, set) in accepting_sets.into_iter().enumerate() {
            let set: BTreeSet<StateId> = set.into_iter().collect();
            ensure!(!set.is_empty(), "acceptance set {index} is empty");
            if let Some(&max) = set.last() {
                ensure!(
                    max < state_count,
                    "acceptance set {index} refers to state {max}, but the automaton has {state_count} states"
                );
            }
            accepting.push(set);
        }

        let mut transitions: BTreeMap<StateId, BTreeSet<StateId>> = BTreeMap::new();
        for (from, to) in edges {
            if from >= state_count || to >= state_count {
                return Err(anyhow!(
                    "edge {from} -> {to} leaves the state range [0, {state_count})"
                ));
            }
            transitions.entry(from).or_default().insert(to);
        }

        Ok(Self {
            state_count,
            transitions,
            accepting,
        })
    }

    /// Build an automaton whose state count is `1 + max id` over every edge
    /// endpoint and accepting state.
    pub fn with_inferred_states<E, S>(edges: E, accepting_sets: Vec<S>) -> Result<Self>
    where
        E: IntoIterator<Item = (StateId, StateId)>,
        S: IntoIterator<Item = StateId>,
    {
        let edges: Vec<(StateId, StateId)> = edges.into_iter().collect();
        let accepting_sets: Vec<Vec<StateId>> = accepting_sets
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();

        let max_id = edges
            .iter()
            .flat_map(|&(from, to)| [from, to])
            .chain(accepting_sets.iter().flatten().copied())
            .max()
            .unwrap_or(Self::INITIAL_STATE);
        let state_count = max_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("state id {max_id} is too large"))?;

        Self::new(state_count, edges, accepting_sets)
    }

    /// Number of states N; ids run over `[0, N)`.
    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    /// The initial state, always `0`.
    pub fn initial_state(&self) -> StateId {
        Self::INITIAL_STATE
    }

    /// Number of acceptance sets (K).
    pub fn acceptance_count(&self) -> usize {
        self.accepting.len()
    }

    /// Acceptance sets `F0..F(K-1)` in declaration order.
    pub fn accepting_sets(&self) -> &[BTreeSet<StateId>] {
        &self.accepting
    }

    /// Whether there is more than one acceptance set.
    pub fn is_generalized(&self) -> bool {
        self.accepting.len() > 1
    }

    /// Destination set of `state`, or `None` when it has no outgoing edge.
    pub fn transitions_from(&self, state: StateId) -> Option<&BTreeSet<StateId>> {
        self.transitions.get(&state)
    }

    /// Direct successors of `state`, ascending; empty for a dead end.
    pub fn successors(&self, state: StateId) -> Successors<'_> {
        self.transitions.get(&state).into_iter().flatten().copied()
    }

    /// Every edge as a `(from, to)` pair, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.transitions.values().map(BTreeSet::len).sum()
    }

    /// Same acceptance sets and edges, ignoring the declared state count.
    pub fn same_structure(&self, other: &Automaton) -> bool {
        self.accepting == other.accepting && self.transitions == other.transitions
    }

    /// With `set_index == None`, whether `state` belongs to any acceptance
    /// set; otherwise whether it belongs to that exact set. An out-of-range
    /// index is never accepting.
    pub fn is_accepting(&self, state: StateId, set_index: Option<usize>) -> bool {
        match set_index {
            Some(index) => self
                .accepting
                .get(index)
                .is_some_and(|set| set.contains(&state)),
            None => self.accepting.iter().any(|set| set.contains(&state)),
        }
    }

    /// Indices of the acceptance sets containing `state`, ascending.
    pub fn accepting_set_indices(&self, state: StateId) -> Vec<usize> {
        self.accepting
            .iter()
            .enumerate()
            .filter(|(_, set)| set.contains(&state))
            .map(|(index, _)| index)
            .collect()
    }

    /// States reachable from the initial state, including it.
    pub fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut seen = BTreeSet::from([Self::INITIAL_STATE]);
        let mut queue = VecDeque::from([Self::INITIAL_STATE]);
        while let Some(state) = queue.pop_front() {
            for next in self.successors(state) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}
