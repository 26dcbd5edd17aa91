#![warn(missing_docs)]
//! Lapbench CLI
//!
//! CLI infrastructure for benchmark binaries. Call [`run`] from your
//! binary's `main()` to get the full lapbench experience with your
//! registered benchmarks:
//!
//! ```ignore
//! #[lapbench::bench]
//! fn bench_push() {
//!     // workload
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     lapbench_cli::run()
//! }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use lapbench_core::{CountRunner, Filter, Registry, Session, TimeRunner};
use lapbench_report::{generate_json_report, ConsoleReporter, StringReporter, SuiteReport};
use tracing::info;

/// Lapbench CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lapbench")]
#[command(author, version, about = "Lapbench - hierarchical test and micro-benchmark harness")]
pub struct Cli {
    /// Filter benchmarks by regex pattern (tests match on full path)
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Fixed repetition count for the default runner
    #[arg(long, conflicts_with = "time")]
    pub count: Option<u64>,

    /// Wall-clock budget in milliseconds for the default runner
    #[arg(long)]
    pub time: Option<f64>,

    /// List discovered benchmarks without executing
    #[arg(long)]
    pub list: bool,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the deoptimization pre-pass
    #[arg(long)]
    pub no_deopt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse CLI arguments and run the registered suite.
pub fn run() -> anyhow::Result<()> {
    run_with_cli(Cli::parse())
}

/// Run the suite with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("lapbench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("lapbench=info")
            .init();
    }

    let mut registry =
        Registry::from_inventory().context("collecting registered benchmarks")?;

    if cli.list {
        return list_benchmarks(&cli, &registry);
    }

    let to_json = match cli.format.as_str() {
        "json" => true,
        "human" | "text" => false,
        other => anyhow::bail!("unknown output format: {}", other),
    };

    let filter = Filter::new(&cli.filter).context("compiling filter pattern")?;
    let mut session = Session::new()
        .with_filter(filter)
        .with_deopt_pass(!cli.no_deopt);

    if let Some(count) = cli.count {
        session = session.with_default_runner(CountRunner::new(count)?);
    } else if let Some(time_ms) = cli.time {
        session = session.with_default_runner(TimeRunner::new(time_ms)?);
    }

    // Human output goes through a live reporter: straight to stdout, or
    // into a buffer when a file was requested.
    let string_reporter = StringReporter::new();
    if !to_json {
        if cli.output.is_some() {
            session = session.with_reporter(string_reporter.clone());
        } else {
            session = session.with_reporter(ConsoleReporter);
        }
    }

    info!(
        benchmarks = registry.bench_count(),
        tests = registry.test_count(),
        "running suite"
    );
    let runs = session.run_suite(&mut registry)?;
    info!(completed = runs.len(), "suite complete");

    if to_json {
        let report = SuiteReport::from_runs(&runs);
        let json = generate_json_report(&report)?;
        write_output(cli.output.as_deref(), &json)?;
    } else if cli.output.is_some() {
        write_output(cli.output.as_deref(), &string_reporter.contents())?;
    }

    Ok(())
}

/// List the benchmarks the filter selects, without executing anything.
fn list_benchmarks(cli: &Cli, registry: &Registry) -> anyhow::Result<()> {
    let filter = Filter::new(&cli.filter).context("compiling filter pattern")?;

    println!("Lapbench plan:");
    let mut total = 0;
    for bench in registry.benches() {
        if !filter.matches_name(bench.name()) {
            continue;
        }
        println!("├── {}", bench.name());
        total += 1;
    }
    println!("{} benchmarks found.", total);
    Ok(())
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            file.write_all(content.as_bytes())?;
            println!("Report written to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
