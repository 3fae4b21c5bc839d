use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use maxflow_stress::instance::{MAX_EDGES, MAX_NODES, MAX_WEIGHT};
use maxflow_stress::{
    Config, Driver, GraphInstance, InstanceLimits, ProcessExecutor, RandomGenerator, StressError,
};
use rand::Rng;

/// Compares a max-flow program against a reference solution on random graphs.
///
/// Both executables read an instance from standard input and print the
/// maximum flow from node 1 to the last node. A run succeeds silently when
/// every trial produces identical output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of random trials to run
    #[arg(short, long, default_value_t = 100)]
    iterations: usize,

    /// Candidate program under test
    #[arg(short, long)]
    program: PathBuf,

    /// Trusted reference solution
    #[arg(short, long)]
    solution: PathBuf,

    /// Seed of the instance generator, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Largest number of nodes of an instance
    #[arg(long, default_value_t = MAX_NODES)]
    max_nodes: usize,

    /// Largest number of edges of an instance
    #[arg(long, default_value_t = MAX_EDGES)]
    max_edges: usize,

    /// Largest capacity of an edge
    #[arg(long, default_value_t = MAX_WEIGHT)]
    max_weight: u64,

    /// Directory to write a failing instance to
    #[arg(long, value_name = "DIR")]
    failure_dir: Option<PathBuf>,

    /// Run a single trial on the instance stored in FILE instead of random ones
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["seed", "max_nodes", "max_edges", "max_weight", "failure_dir"]
    )]
    replay: Option<PathBuf>,
}

fn setup_logging() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    if let Ok(filter) = EnvFilter::try_from_env("MAXFLOW_STRESS_LOG") {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::IsTerminal::is_terminal(&io::stderr()))
            .with_filter(filter);

        tracing_subscriber::registry().with(layer).init();
    }
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();

    let config = Config::new(args.iterations, &args.program, &args.solution);
    if let Some(path) = &args.replay {
        return replay(config, path);
    }

    let limits = InstanceLimits::new(args.max_nodes, args.max_edges, args.max_weight)?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, iterations = config.iterations, ?limits, "starting stress run");

    let generator = RandomGenerator::with_limits(seed, limits);
    match Driver::new(config, generator, ProcessExecutor::new()).run() {
        Ok(_) => Ok(()),
        Err(err) => {
            report(&err);
            if let Some(dir) = &args.failure_dir {
                match dump_failure(dir, seed, &err) {
                    Ok(path) => eprintln!("failing instance written to {}", path.display()),
                    Err(dump_err) => eprintln!("could not save the failing instance: {dump_err:#}"),
                }
            }
            Err(err).with_context(|| format!("stress run failed (seed {seed})"))
        }
    }
}

/// Runs both programs once on a stored instance.
fn replay(config: Config, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read instance {}", path.display()))?;
    let instance: GraphInstance = text
        .parse()
        .with_context(|| format!("Failed to parse instance {}", path.display()))?;
    tracing::info!(path = %path.display(), "replaying instance");

    let config = Config {
        iterations: 1,
        ..config
    };
    let source = move || instance.clone();
    Driver::new(config, source, ProcessExecutor::new())
        .run()
        .map(|_| ())
        .map_err(|err| {
            report(&err);
            err
        })
        .with_context(|| format!("replay of {} failed", path.display()))
}

fn report(err: &StressError) {
    eprintln!("failing instance (trial {}):", err.trial());
    eprintln!("{}", err.instance());
}

fn dump_failure(dir: &Path, seed: u64, err: &StressError) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(format!("failure_seed{seed}_trial{}.txt", err.trial()));
    fs::write(&path, format!("{}\n", err.instance()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
