//! Deterministic finite automata over a numbered alphabet.
//!
//! Unlike [`crate::automaton::Automaton`], every edge carries a symbol label,
//! and the transition function is total: each `(state, symbol)` pair has
//! exactly one target. State `0` is the initial state and symbols run over
//! `[0, alphabet_size)`.

pub mod product;
pub mod text;

pub use product::{Operator, product};
pub use text::parse_dfa;

use crate::automaton::StateId;
use anyhow::{Result, anyhow, bail, ensure};
use std::collections::{BTreeSet, VecDeque};

/// Index of an alphabet symbol, always in `[0, alphabet_size)`.
pub type Symbol = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    state_count: u32,
    alphabet: u32,
    accepting: BTreeSet<StateId>,
    /// Row-major `state_count x alphabet` table of targets.
    table: Vec<StateId>,
}

impl Dfa {
    pub const INITIAL_STATE: StateId = 0;

    /// Build a DFA from its transition table, where the target of
    /// `(state, symbol)` sits at `state * alphabet_size + symbol`.
    pub fn new<A>(state_count: u32, alphabet: u32, accepting: A, table: Vec<StateId>) -> Result<Self>
    where
        A: IntoIterator<Item = StateId>,
    {
        ensure!(state_count > 0, "finite automaton must have at least one state");
        ensure!(alphabet > 0, "finite automaton must have a non-empty alphabet");

        let expected = state_count as usize * alphabet as usize;
        ensure!(
            table.len() == expected,
            "transition table has {} entries, expected {state_count} states x {alphabet} symbols",
            table.len()
        );
        if let Some(&bad) = table.iter().find(|&&to| to >= state_count) {
            bail!("transition table refers to state {bad}, but the automaton has {state_count} states");
        }

        let accepting: BTreeSet<StateId> = accepting.into_iter().collect();
        if let Some(&max) = accepting.last() {
            ensure!(
                max < state_count,
                "accepting state {max} is outside the state range [0, {state_count})"
            );
        }

        Ok(Self {
            state_count,
            alphabet,
            accepting,
            table,
        })
    }

    /// Build a DFA from labelled `(from, to, symbol)` edges.
    ///
    /// Every label must belong to the alphabet, and the edges must define
    /// exactly one target per `(state, symbol)` pair. Repeating an identical
    /// edge is allowed.
    pub fn from_edges<A, E>(state_count: u32, alphabet: u32, accepting: A, edges: E) -> Result<Self>
    where
        A: IntoIterator<Item = StateId>,
        E: IntoIterator<Item = (StateId, StateId, Symbol)>,
    {
        ensure!(state_count > 0, "finite automaton must have at least one state");
        ensure!(alphabet > 0, "finite automaton must have a non-empty alphabet");

        let edges: Vec<(StateId, StateId, Symbol)> = edges.into_iter().collect();
        let required = u64::from(state_count) * u64::from(alphabet);
        ensure!(
            edges.len() as u64 >= required,
            "{} edges cannot cover {state_count} states x {alphabet} symbols",
            edges.len()
        );

        let mut slots: Vec<Option<StateId>> = vec![None; state_count as usize * alphabet as usize];
        for (from, to, symbol) in edges {
            if from >= state_count || to >= state_count {
                bail!("edge {from} -> {to} leaves the state range [0, {state_count})");
            }
            if symbol >= alphabet {
                bail!("edge {from} -> {to} is labelled {symbol}, outside the alphabet [0, {alphabet})");
            }
            let slot = &mut slots[from as usize * alphabet as usize + symbol as usize];
            match *slot {
                Some(existing) if existing != to => bail!(
                    "state {from} has two targets ({existing} and {to}) on symbol {symbol}"
                ),
                _ => *slot = Some(to),
            }
        }

        let table = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    let index = index as u64;
                    let alphabet = u64::from(alphabet);
                    anyhow!(
                        "state {} has no transition on symbol {}",
                        index / alphabet,
                        index % alphabet
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(state_count, alphabet, accepting, table)
    }

    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    pub fn alphabet_size(&self) -> u32 {
        self.alphabet
    }

    pub fn initial_state(&self) -> StateId {
        Self::INITIAL_STATE
    }

    /// Accepting states, ascending. May be empty.
    pub fn accepting_states(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    /// Target of `state` on `symbol`, or `None` when either is out of range.
    pub fn step(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        if state >= self.state_count || symbol >= self.alphabet {
            return None;
        }
        Some(self.table[state as usize * self.alphabet as usize + symbol as usize])
    }

    /// Every edge as `(from, to, symbol)`, ordered by source then symbol.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, StateId, Symbol)> + '_ {
        let alphabet = self.alphabet as usize;
        self.table.iter().enumerate().map(move |(index, &to)| {
            ((index / alphabet) as StateId, to, (index % alphabet) as Symbol)
        })
    }

    /// Run the automaton on `word` from the initial state.
    pub fn accepts(&self, word: &[Symbol]) -> Result<bool> {
        let mut state = Self::INITIAL_STATE;
        for &symbol in word {
            state = self.step(state, symbol).ok_or_else(|| {
                anyhow!("symbol {symbol} is outside the alphabet [0, {})", self.alphabet)
            })?;
        }
        Ok(self.is_accepting(state))
    }

    /// States reachable from the initial state, including it.
    pub fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut seen = BTreeSet::from([Self::INITIAL_STATE]);
        let mut queue = VecDeque::from([Self::INITIAL_STATE]);
        while let Some(state) = queue.pop_front() {
            let row = state as usize * self.alphabet as usize;
            for &next in &self.table[row..row + self.alphabet as usize] {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Whether no accepting state is reachable, i.e. no finite word is accepted.
    pub fn is_language_empty(&self) -> bool {
        self.reachable_states().is_disjoint(&self.accepting)
    }
}
