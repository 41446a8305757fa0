use crate::automaton::{Automaton, StateId, Successors};
use anyhow::{Result, bail};
use std::collections::HashSet;
use tracing::debug;

/// Nested depth-first emptiness check for simple Büchi automata.
///
/// The outer search explores every reachable state once. When an accepting
/// state is finished, an inner search starts from it and looks for any state
/// still on the outer path; reaching one closes a cycle through the accepting
/// state. Inner marks persist between launches, so the whole check visits each
/// state at most twice.
///
/// Generalized automata are rejected; convert them first.
pub fn is_empty(automaton: &Automaton) -> Result<bool> {
    if automaton.is_generalized() {
        bail!(
            "nested DFS needs a single acceptance set, got {}",
            automaton.acceptance_count()
        );
    }

    let mut search = NestedSearch::new(automaton);
    let found = search.outer(automaton.initial_state());
    debug!(
        outer_visited = search.outer_visited.len(),
        inner_visited = search.inner_visited.len(),
        empty = !found,
        "nested dfs finished"
    );
    Ok(!found)
}

struct Frame<'a> {
    state: StateId,
    successors: Successors<'a>,
}

struct NestedSearch<'a> {
    automaton: &'a Automaton,
    outer_visited: HashSet<StateId>,
    inner_visited: HashSet<StateId>,
    on_path: HashSet<StateId>,
}

impl<'a> NestedSearch<'a> {
    fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            outer_visited: HashSet::new(),
            inner_visited: HashSet::new(),
            on_path: HashSet::new(),
        }
    }

    fn frame(&self, state: StateId) -> Frame<'a> {
        Frame {
            state,
            successors: self.automaton.successors(state),
        }
    }

    /// Returns `true` as soon as an accepting cycle is found.
    fn outer(&mut self, start: StateId) -> bool {
        self.outer_visited.insert(start);
        self.on_path.insert(start);
        let mut stack = vec![self.frame(start)];

        while let Some(top) = stack.last_mut() {
            if let Some(next) = top.successors.next() {
                if self.outer_visited.insert(next) {
                    self.on_path.insert(next);
                    stack.push(self.frame(next));
                }
                continue;
            }

            let state = top.state;
            if self.automaton.is_accepting(state, None) && self.inner(state) {
                return true;
            }
            self.on_path.remove(&state);
            stack.pop();
        }

        false
    }

    /// Searches from `seed` for a state on the outer path. The seed itself is
    /// on the path, so a self-loop counts.
    fn inner(&mut self, seed: StateId) -> bool {
        self.inner_visited.insert(seed);
        let mut stack = vec![self.automaton.successors(seed)];

        while let Some(successors) = stack.last_mut() {
            let Some(next) = successors.next() else {
                stack.pop();
                continue;
            };
            if self.on_path.contains(&next) {
                return true;
            }
            if self.inner_visited.insert(next) {
                stack.push(self.automaton.successors(next));
            }
        }

        false
    }
}
