//! Cache simulator CLI.
//!
//! This binary drives one cache session from the command line. It provides:
//! 1. **Trace run:** Replay an inline trace or a trace file and print every outcome.
//! 2. **Interactive:** Read one address per line from stdin.
//! 3. **Scenarios:** Replay the sample scenarios generated for the geometry.
//! 4. **Info:** Print the normalized geometry.

mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::{AddressWidth, ConfigError, SimError};
use cachesim_core::config::{Associativity, CacheConfig, ConfigureRequest};
use cachesim_core::scenarios::{self, ScenarioStep};
use cachesim_core::trace::{self, TraceOp};
use cachesim_core::Cache;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache simulator",
    long_about = "Simulate a cache with configurable size, block size, associativity and \
                  replacement policy, and watch where each address lands.\n\nExamples:\n  \
                  cachesim run --trace 0,4,8,0\n  \
                  cachesim --size 16B --block-size 4B --associativity 2 run -t 0,4,8,0,12,4\n  \
                  cachesim --associativity fully --policy FIFO interactive\n  \
                  cachesim --json scenarios"
)]
struct Cli {
    #[command(flatten)]
    cache: CacheArgs,

    /// Emit JSON records instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Log engine activity at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Cache geometry options shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct CacheArgs {
    /// Total cache size, e.g. 1KB, 16B, 4096.
    #[arg(long, default_value = "1KB", global = true)]
    size: String,

    /// Block (line) size, e.g. 64B.
    #[arg(long, default_value = "64B", global = true)]
    block_size: String,

    /// Ways per set, or "fully" for a single set.
    #[arg(short, long, default_value = "1", global = true)]
    associativity: Associativity,

    /// Replacement policy (LRU or FIFO).
    #[arg(short, long, default_value = "LRU", global = true)]
    policy: String,

    /// Address width in bits (32 or 64).
    #[arg(long, default_value_t = 32, global = true)]
    address_width: u32,
}

impl CacheArgs {
    fn to_config(&self) -> Result<CacheConfig, ConfigError> {
        ConfigureRequest {
            size: self.size.clone(),
            block_size: self.block_size.clone(),
            associativity: self.associativity,
            policy: self.policy.clone(),
            address_width: AddressWidth::try_from(self.address_width)?,
        }
        .to_config()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print every access, the final state and statistics.
    Run {
        /// Inline trace, e.g. "0,4,0x8,w:12".
        #[arg(short, long, conflicts_with = "file")]
        trace: Option<String>,

        /// Trace file (same syntax; `#` starts a comment).
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Read addresses from stdin, one per line. Empty line or EOF exits.
    Interactive,

    /// Replay the sample scenarios generated for this geometry.
    Scenarios,

    /// Print the normalized geometry.
    Info,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("failed to read trace file {path}: {source}")]
    TraceFile { path: String, source: io::Error },

    #[error("no trace given: pass --trace or --file")]
    MissingTrace,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Sim(e.into())
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    if let Err(e) = run(&cli, stdin.lock(), &mut stdout) {
        let _ = stdout.flush();
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, input: impl BufRead, out: &mut impl Write) -> Result<(), CliError> {
    let config = cli.cache.to_config()?;
    let mut cache = Cache::with_config(&config)?;

    match &cli.command {
        Commands::Run { trace, file } => {
            let ops = load_trace(trace.as_deref(), file.as_deref())?;
            cmd_run(&mut cache, &ops, cli.json, out)
        }
        Commands::Interactive => cmd_interactive(&mut cache, input, cli.json, out),
        Commands::Scenarios => cmd_scenarios(&mut cache, cli.json, out),
        Commands::Info => cmd_info(&cache, cli.json, out),
    }
}

/// Parses the inline trace, or reads and parses the trace file.
fn load_trace(inline: Option<&str>, file: Option<&Path>) -> Result<Vec<TraceOp>, CliError> {
    let ops = match (inline, file) {
        (Some(text), _) => trace::parse_trace(text)?,
        (None, Some(path)) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::TraceFile {
                path: path.display().to_string(),
                source,
            })?;
            trace::parse_trace(&text)?
        }
        (None, None) => return Err(CliError::MissingTrace),
    };
    debug!(accesses = ops.len(), "loaded trace");
    Ok(ops)
}

/// Replays `ops`, then prints the final state and statistics.
fn cmd_run(
    cache: &mut Cache,
    ops: &[TraceOp],
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for op in ops {
        let result = cache.access(op.address, op.kind.is_write())?;
        if json {
            writeln!(out, "{}", result.to_json()?)?;
        } else {
            writeln!(out, "{}", render::access_line(&result))?;
        }
    }

    let state = cache.snapshot_state()?;
    let stats = cache.snapshot_stats()?;
    if json {
        writeln!(out, "{}", serde_json::to_string(&state)?)?;
        writeln!(out, "{}", serde_json::to_string(&stats)?)?;
    } else {
        writeln!(out, "\nFinal state:")?;
        write!(out, "{}", render::state_table(&state, true))?;
        writeln!(out, "\nStatistics:\n{stats}")?;
    }
    Ok(())
}

/// Line-oriented session on `input`.
///
/// Besides addresses (`w:` prefix for writes) it understands `reset`, `stats`
/// and `state`. A bad line prints an error and the session continues.
fn cmd_interactive(
    cache: &mut Cache,
    input: impl BufRead,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !json {
        if let Some(geometry) = cache.geometry() {
            writeln!(out, "{geometry}")?;
        }
        writeln!(
            out,
            "Enter addresses (decimal or 0x hex, w: for writes), or reset, stats, state. \
             Empty line exits."
        )?;
    }

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        match command {
            "" => break,
            "reset" => {
                cache.reset()?;
                if !json {
                    writeln!(out, "cache reset")?;
                }
            }
            "stats" => {
                let stats = cache.snapshot_stats()?;
                if json {
                    writeln!(out, "{}", serde_json::to_string(&stats)?)?;
                } else {
                    writeln!(out, "{stats}")?;
                }
            }
            "state" => {
                let state = cache.snapshot_state()?;
                if json {
                    writeln!(out, "{}", serde_json::to_string(&state)?)?;
                } else {
                    write!(out, "{}", render::state_table(&state, true))?;
                }
            }
            token => match trace::parse_op(token)
                .and_then(|op| cache.access(op.address, op.kind.is_write()))
            {
                Ok(result) if json => writeln!(out, "{}", result.to_json()?)?,
                Ok(result) => writeln!(out, "{}", render::access_line(&result))?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
        }
    }
    Ok(())
}

/// JSON record of one replayed scenario.
#[derive(Debug, Serialize)]
struct ScenarioReport<'a> {
    name: &'static str,
    description: &'a str,
    steps: &'a [ScenarioStep],
    observed: Vec<bool>,
    matches: bool,
}

/// Replays each generated scenario on a freshly reset cache.
fn cmd_scenarios(cache: &mut Cache, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let Some(geometry) = cache.geometry().copied() else {
        return Err(SimError::NotConfigured.into());
    };

    for scenario in scenarios::generate(&geometry) {
        cache.reset()?;
        let results = cache.run_trace(&scenario.ops())?;
        let observed: Vec<bool> = results.iter().map(|r| r.hit).collect();
        let matches = observed == scenario.expected_hits();

        if json {
            let report = ScenarioReport {
                name: scenario.name,
                description: &scenario.description,
                steps: &scenario.steps,
                observed,
                matches,
            };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
            continue;
        }

        writeln!(out, "== {} ==\n{}", scenario.name, scenario.description)?;
        for (step, hit) in scenario.steps.iter().zip(&observed) {
            let mark = if *hit == step.expect_hit { ' ' } else { '!' };
            writeln!(out, "{mark} {}", step.note)?;
        }
        writeln!(out)?;
    }
    cache.reset()?;
    Ok(())
}

fn cmd_info(cache: &Cache, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let Some(geometry) = cache.geometry() else {
        return Err(SimError::NotConfigured.into());
    };
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(geometry)?)?;
    } else {
        writeln!(out, "{geometry}\n")?;
        write!(out, "{}", render::geometry_block(geometry))?;
    }
    Ok(())
}
