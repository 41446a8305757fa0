//! Timing harness comparing the emptiness engines on random automata.
//!
//! For every size step the harness generates fresh automata, converts them to
//! simple acceptance when needed and runs each engine, recording how long every
//! phase took and which verdicts came back. Engines are expected to agree;
//! repetitions where they do not are kept verbatim in the report.

use crate::automaton::Automaton;
use crate::convert::to_simple;
use crate::emptiness::Algorithm;
use crate::generator::{AutomatonGenerator, GeneratorConfig};
use anyhow::{Result, ensure};
use crossbeam_channel::unbounded;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Clone, Debug, Serialize)]
pub struct BenchConfig {
    /// Sizes run are 10^0, 10^1, ..., 10^max_power states.
    pub max_power: u32,
    pub repetitions: u32,
    pub trees: u32,
    pub sets: u32,
    pub edges: u32,
    /// Threads sharing the repetitions of a step (1 = run inline).
    pub workers: usize,
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            max_power: 3,
            repetitions: 10,
            trees: 2,
            sets: 2,
            edges: 2,
            workers: 1,
            seed: None,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.repetitions > 0, "bench needs at least one repetition");
        ensure!(self.workers > 0, "bench needs at least one worker");
        ensure!(
            self.max_power <= 9,
            "max power {} overflows the state id range",
            self.max_power
        );
        Ok(())
    }

    fn generator_config(&self, states: u32, seed: Option<u64>) -> GeneratorConfig {
        GeneratorConfig {
            states,
            trees: self.trees,
            sets: self.sets,
            edges: self.edges,
            seed,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    pub runs: u32,
    pub empty: u32,
    pub mean_micros: f64,
}

/// Verdicts of one repetition where the engines disagreed.
#[derive(Clone, Debug, Serialize)]
pub struct Disagreement {
    pub simple: Vec<(Algorithm, bool)>,
    pub generalized: Vec<(Algorithm, bool)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub states: u32,
    pub repetitions: u32,
    pub mean_generation_micros: f64,
    pub conversions: u32,
    pub mean_conversion_micros: f64,
    /// Engines run on the simple form (converted or original).
    pub simple: Vec<AlgorithmStats>,
    /// Engines run directly on generalized inputs.
    pub generalized: Vec<AlgorithmStats>,
    pub disagreements: Vec<Disagreement>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchReport {
    pub config: BenchConfig,
    pub steps: Vec<StepReport>,
}

impl BenchReport {
    pub fn disagreement_count(&self) -> usize {
        self.steps.iter().map(|step| step.disagreements.len()).sum()
    }
}

struct Timed {
    algorithm: Algorithm,
    duration: Duration,
    empty: bool,
}

struct Repetition {
    generation: Duration,
    conversion: Option<Duration>,
    simple: Vec<Timed>,
    generalized: Vec<Timed>,
}

impl Repetition {
    fn disagreement(&self) -> Option<Disagreement> {
        let mut verdicts = self.simple.iter().chain(&self.generalized).map(|t| t.empty);
        let first = verdicts.next()?;
        if verdicts.all(|empty| empty == first) {
            return None;
        }
        let collect = |runs: &[Timed]| -> Vec<(Algorithm, bool)> {
            runs.iter().map(|t| (t.algorithm, t.empty)).collect()
        };
        Some(Disagreement {
            simple: collect(&self.simple),
            generalized: collect(&self.generalized),
        })
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (Duration, T) {
    let start = Instant::now();
    let value = f();
    (start.elapsed(), value)
}

fn run_engines(
    automaton: &Automaton,
    algorithms: impl Iterator<Item = Algorithm>,
) -> Result<Vec<Timed>> {
    algorithms
        .map(|algorithm| -> Result<Timed> {
            let (duration, empty) = timed(|| algorithm.is_empty(automaton));
            Ok(Timed {
                algorithm,
                duration,
                empty: empty?,
            })
        })
        .collect()
}

fn run_repetition(generator: &mut AutomatonGenerator) -> Result<Repetition> {
    let (generation, automaton) = timed(|| generator.generate());
    let automaton = automaton?;

    let (conversion_time, converted) = timed(|| to_simple(&automaton));
    let converted = converted?.into_option();

    let simple_form = converted.as_ref().unwrap_or(&automaton);
    let simple = run_engines(simple_form, Algorithm::ALL.into_iter())?;

    let generalized = if converted.is_some() {
        run_engines(
            &automaton,
            Algorithm::ALL
                .into_iter()
                .filter(|algorithm| algorithm.supports_generalized()),
        )?
    } else {
        Vec::new()
    };

    Ok(Repetition {
        generation,
        conversion: converted.as_ref().map(|_| conversion_time),
        simple,
        generalized,
    })
}

fn derive_seed(seed: Option<u64>, power: u32, worker: usize) -> Option<u64> {
    seed.map(|s| {
        s.wrapping_add(u64::from(power) << 32)
            .wrapping_add(worker as u64)
    })
}

fn collect_repetitions(config: &BenchConfig, power: u32, states: u32) -> Result<Vec<Repetition>> {
    let workers = config.workers.min(config.repetitions as usize);

    if workers <= 1 {
        let seed = derive_seed(config.seed, power, 0);
        let mut generator = AutomatonGenerator::new(config.generator_config(states, seed))?;
        return (0..config.repetitions)
            .map(|_| run_repetition(&mut generator))
            .collect();
    }

    let (tx, rx) = unbounded();
    thread::scope(|scope| -> Result<()> {
        for worker in 0..workers {
            let share = (config.repetitions as usize + workers - 1 - worker) / workers;
            let seed = derive_seed(config.seed, power, worker);
            let mut generator = AutomatonGenerator::new(config.generator_config(states, seed))?;
            let tx = tx.clone();
            scope.spawn(move || {
                for _ in 0..share {
                    if tx.send(run_repetition(&mut generator)).is_err() {
                        break;
                    }
                }
            });
        }
        Ok(())
    })?;
    drop(tx);

    rx.iter().collect()
}

fn mean_micros(total: Duration, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total.as_secs_f64() * 1_000_000.0 / f64::from(count)
    }
}

fn aggregate<'a>(runs: impl Iterator<Item = &'a [Timed]>) -> Vec<AlgorithmStats> {
    let mut totals: Vec<(Algorithm, u32, u32, Duration)> = Vec::new();
    for run in runs {
        for entry in run {
            let index = match totals.iter().position(|(a, ..)| *a == entry.algorithm) {
                Some(index) => index,
                None => {
                    totals.push((entry.algorithm, 0, 0, Duration::ZERO));
                    totals.len() - 1
                }
            };
            let slot = &mut totals[index];
            slot.1 += 1;
            slot.2 += u32::from(entry.empty);
            slot.3 += entry.duration;
        }
    }
    totals
        .into_iter()
        .map(|(algorithm, runs, empty, total)| AlgorithmStats {
            algorithm,
            runs,
            empty,
            mean_micros: mean_micros(total, runs),
        })
        .collect()
}

fn summarize(states: u32, repetitions: &[Repetition]) -> StepReport {
    let count = repetitions.len() as u32;
    let generation: Duration = repetitions.iter().map(|r| r.generation).sum();
    let conversions: Vec<Duration> = repetitions.iter().filter_map(|r| r.conversion).collect();
    let conversion_total: Duration = conversions.iter().sum();

    StepReport {
        states,
        repetitions: count,
        mean_generation_micros: mean_micros(generation, count),
        conversions: conversions.len() as u32,
        mean_conversion_micros: mean_micros(conversion_total, conversions.len() as u32),
        simple: aggregate(repetitions.iter().map(|r| r.simple.as_slice())),
        generalized: aggregate(repetitions.iter().map(|r| r.generalized.as_slice())),
        disagreements: repetitions
            .iter()
            .filter_map(Repetition::disagreement)
            .collect(),
    }
}

pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;

    let mut steps = Vec::with_capacity(config.max_power as usize + 1);
    for power in 0..=config.max_power {
        let states = 10u32.pow(power);
        info!(states, repetitions = config.repetitions, "benchmark step started");

        let repetitions = collect_repetitions(config, power, states)?;
        let step = summarize(states, &repetitions);
        if !step.disagreements.is_empty() {
            warn!(
                states,
                disagreements = step.disagreements.len(),
                "emptiness engines disagree"
            );
        }
        steps.push(step);
    }

    Ok(BenchReport {
        config: config.clone(),
        steps,
    })
}
