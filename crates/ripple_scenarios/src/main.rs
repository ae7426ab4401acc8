//! Scenario runner CLI
//!
//! Usage:
//!   ripple-scenarios                  # Run every scenario
//!   ripple-scenarios --filter pinch   # Run scenarios matching "pinch"
//!   ripple-scenarios --list           # List scenarios

use anyhow::Result;
use clap::Parser;
use ripple_scenarios::{all_suites, ScenarioRunner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ripple-scenarios")]
#[command(version, about = "Play scripted gesture scenarios against the Ripple event manager")]
struct Cli {
    /// List scenarios without running them
    #[arg(long)]
    list: bool,

    /// Only run scenarios whose name or suite contains PATTERN
    #[arg(long, value_name = "PATTERN")]
    filter: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.list {
        println!("Available scenario suites:");
        for suite in all_suites() {
            println!("\n  {}:", suite.name);
            for case in &suite.cases {
                println!("    - {}", case.name);
            }
        }
        return Ok(());
    }

    println!("╔══════════════════════════════════════════╗");
    println!("║          RIPPLE GESTURE SCENARIOS        ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut runner = ScenarioRunner::new();
    for suite in all_suites() {
        runner.add_suite(suite);
    }

    if let Some(ref pattern) = cli.filter {
        println!("Running scenarios matching: {}\n", pattern);
        runner.filter(pattern);
    }

    let report = runner.run();
    report.print_summary();

    if report.all_passed() {
        println!("\nAll scenarios passed!");
        Ok(())
    } else {
        std::process::exit(1);
    }
}
