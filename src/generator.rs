//! Random Büchi automata for benchmarking and testing.
//!
//! The transition relation is the union of several random trees over a
//! shuffled order of the states. The first tree is rooted at the initial state
//! and spans every state, so the whole automaton is reachable; later trees span
//! a random prefix of their own order and add the extra edges that close
//! cycles.

use crate::automaton::{Automaton, StateId};
use anyhow::{Result, ensure};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct GeneratorConfig {
    pub states: u32,
    /// Number of random trees merged into the transition relation.
    pub trees: u32,
    /// Number of acceptance sets; 1 gives a simple Büchi automaton.
    pub sets: u32,
    /// Out-edges per tree node, not counting the self-loop.
    pub edges: u32,
    /// Fixed seed for reproducible output; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            states: 10,
            trees: 2,
            sets: 1,
            edges: 2,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.states > 0, "generator needs at least one state");
        ensure!(self.trees > 0, "generator needs at least one tree");
        ensure!(self.sets > 0, "generator needs at least one acceptance set");
        ensure!(self.edges > 0, "generator needs at least one edge per node");
        Ok(())
    }
}

pub struct AutomatonGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl AutomatonGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&mut self) -> Result<Automaton> {
        let mut edges = Vec::new();
        for tree in 0..self.config.trees {
            self.push_tree(tree == 0, &mut edges);
        }
        let accepting = self.accepting_sets();
        Automaton::new(self.config.states, edges, accepting)
    }

    fn push_tree(&mut self, rooted_at_initial: bool, edges: &mut Vec<(StateId, StateId)>) {
        let states = self.config.states as usize;
        let mut order: Vec<StateId> = (0..self.config.states).collect();
        if rooted_at_initial {
            order[1..].shuffle(&mut self.rng);
        } else {
            order.shuffle(&mut self.rng);
        }

        let turns = if rooted_at_initial {
            states
        } else {
            self.rng.gen_range(1..=states)
        };

        let fan_out = self.config.edges as usize;
        for turn in 0..turns {
            let last = (turn + fan_out).min(states - 1);
            for target in turn..=last {
                edges.push((order[turn], order[target]));
            }
        }
    }

    fn accepting_sets(&mut self) -> Vec<Vec<StateId>> {
        let states = self.config.states;
        let per_set_limit = (states / self.config.sets / self.config.edges).max(1);
        let rng = &mut self.rng;
        (0..self.config.sets)
            .map(|_| {
                let size = rng.gen_range(1..=per_set_limit);
                (0..size).map(|_| rng.gen_range(0..states)).collect()
            })
            .collect()
    }
}

/// Convenience wrapper generating a single automaton.
pub fn generate_automaton(config: &GeneratorConfig) -> Result<Automaton> {
    AutomatonGenerator::new(config.clone())?.generate()
}
