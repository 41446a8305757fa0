use crate::automaton::{Automaton, StateId, Successors};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Two-stack depth-first emptiness check for simple and generalized Büchi
/// automata.
///
/// One DFS keeps the current path (`path`) and a stack of cycle candidates
/// (`candidates`), each carrying the acceptance sets seen in its group. A back
/// edge to a state on the path collapses the candidates above that state into
/// one group; the automaton is non-empty as soon as a collapsed group covers
/// every acceptance set. With one set this reduces to "an accepting state was
/// collapsed into a cycle".
pub fn is_empty(automaton: &Automaton) -> bool {
    let mut search = TwoStackSearch::new(automaton);
    let found = search.run();
    debug!(
        discovered = search.discovery.len(),
        empty = !found,
        "two-stack dfs finished"
    );
    !found
}

struct Frame<'a> {
    state: StateId,
    successors: Successors<'a>,
}

struct TwoStackSearch<'a> {
    automaton: &'a Automaton,
    set_count: usize,
    discovery: HashMap<StateId, u64>,
    clock: u64,
    path: Vec<StateId>,
    on_path: HashSet<StateId>,
    candidates: Vec<(StateId, Vec<usize>)>,
}

impl<'a> TwoStackSearch<'a> {
    fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            set_count: automaton.acceptance_count(),
            discovery: HashMap::new(),
            clock: 0,
            path: Vec::new(),
            on_path: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn discover(&mut self, state: StateId) -> Frame<'a> {
        self.candidates
            .push((state, self.automaton.accepting_set_indices(state)));
        self.path.push(state);
        self.on_path.insert(state);
        self.clock += 1;
        self.discovery.insert(state, self.clock);
        Frame {
            state,
            successors: self.automaton.successors(state),
        }
    }

    fn run(&mut self) -> bool {
        let start = self.automaton.initial_state();
        let mut stack = vec![self.discover(start)];

        while let Some(top) = stack.last_mut() {
            if let Some(next) = top.successors.next() {
                if !self.discovery.contains_key(&next) {
                    let frame = self.discover(next);
                    stack.push(frame);
                } else if self.on_path.contains(&next) && self.collapse(next) {
                    return true;
                }
                continue;
            }

            let state = top.state;
            stack.pop();
            self.finish(state);
        }

        false
    }

    /// Merges every candidate discovered after `target` into one group rooted
    /// at the oldest popped candidate. Returns `true` when the merged group
    /// covers all acceptance sets.
    fn collapse(&mut self, target: StateId) -> bool {
        let target_time = self.discovery[&target];
        let mut covered: Vec<usize> = Vec::new();

        while let Some((root, indices)) = self.candidates.pop() {
            covered = union_sorted(&covered, &indices);
            if covered.len() == self.set_count {
                return true;
            }
            // strict comparison: stop at the first candidate no younger than target
            if self.discovery[&root] <= target_time {
                self.candidates.push((root, covered));
                return false;
            }
        }

        false
    }

    fn finish(&mut self, state: StateId) {
        if self.candidates.last().map(|(root, _)| *root) != Some(state) {
            return;
        }
        self.candidates.pop();
        while let Some(top) = self.path.pop() {
            self.on_path.remove(&top);
            if top == state {
                break;
            }
        }
    }
}

fn union_sorted(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => {
                out.push(left[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(right[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}
