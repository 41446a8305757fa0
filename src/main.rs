use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use omegacheck::bench::{BenchConfig, BenchReport, run_benchmark};
use omegacheck::convert::{Conversion, to_simple};
use omegacheck::emptiness::Algorithm;
use omegacheck::finite::{Dfa, Operator, parse_dfa, product};
use omegacheck::generator::{GeneratorConfig, generate_automaton};
use omegacheck::{Automaton, parse_automaton};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "omegacheck")]
#[command(about = "Emptiness checking for simple and generalized Büchi automata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug)]
struct ShapeArgs {
    /// Random trees merged into the transition relation
    #[arg(long, default_value_t = 2)]
    trees: u32,
    /// Acceptance sets (1 = simple Büchi automaton)
    #[arg(long, default_value_t = 1)]
    sets: u32,
    /// Out-edges per tree node, not counting the self-loop
    #[arg(long, default_value_t = 2)]
    edges: u32,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide emptiness of an automaton read from a file
    Check {
        #[arg(long)]
        input: PathBuf,
        /// Engine to run; every applicable engine when omitted
        #[arg(long)]
        algorithm: Option<Algorithm>,
        /// Convert to simple acceptance before checking
        #[arg(long, default_value_t = false)]
        simple: bool,
        /// Write the automaton handed to the engines here (the converted form
        /// when a conversion happened, the input otherwise)
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Convert a generalized automaton to simple acceptance
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Combine two deterministic finite automata with a set operation
    Binop {
        #[arg(long)]
        left: PathBuf,
        #[arg(long)]
        right: PathBuf,
        /// union, intersection or difference
        #[arg(long)]
        operator: Operator,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a random automaton
    Generate {
        #[arg(long, default_value_t = 10)]
        states: u32,
        #[command(flatten)]
        shape: ShapeArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Time every engine on random automata of growing size
    Bench {
        /// Largest size is 10^max_power states
        #[arg(long, default_value_t = 3)]
        max_power: u32,
        #[arg(long, default_value_t = 10)]
        repetitions: u32,
        #[arg(long, default_value_t = 1)]
        workers: usize,
        #[command(flatten)]
        shape: ShapeArgs,
        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn build_generator_config(states: u32, shape: &ShapeArgs) -> GeneratorConfig {
    GeneratorConfig {
        states,
        trees: shape.trees,
        sets: shape.sets,
        edges: shape.edges,
        seed: shape.seed,
    }
}

fn build_bench_config(
    max_power: u32,
    repetitions: u32,
    workers: usize,
    shape: &ShapeArgs,
) -> BenchConfig {
    BenchConfig {
        max_power,
        repetitions,
        trees: shape.trees,
        sets: shape.sets,
        edges: shape.edges,
        workers,
        seed: shape.seed,
    }
}

fn read_automaton(path: &Path) -> Result<Automaton> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading automaton from {}", path.display()))?;
    parse_automaton(&text).with_context(|| format!("malformed automaton in {}", path.display()))
}

fn write_automaton(path: &Path, automaton: &Automaton) -> Result<()> {
    std::fs::write(path, automaton.to_text())
        .with_context(|| format!("failed writing automaton to {}", path.display()))
}

fn read_dfa(path: &Path) -> Result<Dfa> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading automaton from {}", path.display()))?;
    parse_dfa(&text).with_context(|| format!("malformed finite automaton in {}", path.display()))
}

fn print_summary(automaton: &Automaton) {
    println!("states={}", automaton.state_count());
    println!("edges={}", automaton.edge_count());
    println!("acceptance_sets={}", automaton.acceptance_count());
    println!("generalized={}", automaton.is_generalized());
}

fn run_check(
    input: &Path,
    algorithm: Option<Algorithm>,
    simple: bool,
    dump: Option<&Path>,
) -> Result<()> {
    let automaton = read_automaton(input)?;
    print_summary(&automaton);

    let needs_simple = simple || algorithm == Some(Algorithm::NestedDfs);
    let converted = if needs_simple {
        to_simple(&automaton)?.into_option()
    } else {
        None
    };
    if let Some(simple_form) = &converted {
        println!("converted_states={}", simple_form.state_count());
    }
    let target = converted.as_ref().unwrap_or(&automaton);
    if let Some(path) = dump {
        write_automaton(path, target)?;
        println!("dumped={}", path.display());
        println!("dumped_converted={}", converted.is_some());
    }

    let algorithms: Vec<Algorithm> = match algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::ALL
            .into_iter()
            .filter(|a| a.supports_generalized() || !target.is_generalized())
            .collect(),
    };

    let mut verdicts = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        let empty = algorithm.is_empty(target)?;
        println!("algorithm={} empty={}", algorithm, empty);
        verdicts.push(empty);
    }

    if verdicts.windows(2).any(|pair| pair[0] != pair[1]) {
        bail!("emptiness engines disagree on {}", input.display());
    }
    Ok(())
}

fn run_convert(input: &Path, output: Option<&Path>) -> Result<()> {
    let automaton = read_automaton(input)?;
    match to_simple(&automaton)? {
        Conversion::Unchanged => println!("unchanged=true"),
        Conversion::Converted(simple) => match output {
            Some(path) => {
                write_automaton(path, &simple)?;
                println!("unchanged=false");
                println!("states={}", simple.state_count());
                println!("written={}", path.display());
            }
            None => print!("{simple}"),
        },
    }
    Ok(())
}

fn run_binop(left: &Path, right: &Path, operator: Operator, output: Option<&Path>) -> Result<()> {
    let result = product(&read_dfa(left)?, &read_dfa(right)?, operator)?;
    match output {
        Some(path) => {
            std::fs::write(path, result.to_text())
                .with_context(|| format!("failed writing automaton to {}", path.display()))?;
            println!("operator={operator}");
            println!("states={}", result.state_count());
            println!("accepting={}", result.accepting_states().len());
            println!("language_empty={}", result.is_language_empty());
            println!("written={}", path.display());
        }
        None => print!("{result}"),
    }
    Ok(())
}

fn print_report(report: &BenchReport) {
    for step in &report.steps {
        println!("states={}", step.states);
        println!("repetitions={}", step.repetitions);
        println!("generation_us={:.2}", step.mean_generation_micros);
        println!("conversions={}", step.conversions);
        println!("conversion_us={:.2}", step.mean_conversion_micros);
        for (label, stats) in [("simple", &step.simple), ("generalized", &step.generalized)] {
            for entry in stats {
                println!(
                    "{}.{}.empty={}/{}",
                    label, entry.algorithm, entry.empty, entry.runs
                );
                println!("{}.{}.mean_us={:.2}", label, entry.algorithm, entry.mean_micros);
            }
        }
        println!("disagreements={}", step.disagreements.len());
        println!();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            input,
            algorithm,
            simple,
            dump,
        } => run_check(&input, algorithm, simple, dump.as_deref())?,
        Command::Convert { input, output } => run_convert(&input, output.as_deref())?,
        Command::Binop {
            left,
            right,
            operator,
            output,
        } => run_binop(&left, &right, operator, output.as_deref())?,
        Command::Generate {
            states,
            shape,
            output,
        } => {
            let config = build_generator_config(states, &shape);
            let automaton = generate_automaton(&config)?;
            match output {
                Some(path) => {
                    write_automaton(&path, &automaton)?;
                    print_summary(&automaton);
                    println!("written={}", path.display());
                }
                None => print!("{automaton}"),
            }
        }
        Command::Bench {
            max_power,
            repetitions,
            workers,
            shape,
            json,
        } => {
            let config = build_bench_config(max_power, repetitions, workers, &shape);
            let report = run_benchmark(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if report.disagreement_count() > 0 {
                bail!(
                    "{} repetitions produced disagreeing verdicts",
                    report.disagreement_count()
                );
            }
        }
    }

    Ok(())
}
