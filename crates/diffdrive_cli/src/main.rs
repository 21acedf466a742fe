//! Diffdrive CLI
//!
//! Headless runner for scenario files and preset inspection.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "diffdrive_cli")]
#[command(about = "Run differential-drive scenarios without a display", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file (YAML or JSON)
    Run {
        /// Scenario file path
        #[arg(long)]
        scenario: PathBuf,

        /// Write the per-tick trace as JSON
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Print a preset configuration
    Preset {
        /// Preset name (autonomous, manual); defaults to $DIFFDRIVE_PRESET
        name: Option<String>,

        /// Print JSON instead of YAML
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, trace, ticks } => {
            println!("🚗 Running scenario...");
            println!("   Input: {}", scenario.display());

            let report = diffdrive_cli::run_scenario_file(&scenario, ticks)?;
            print!("{}", diffdrive_cli::summarize(&report));

            if let Some(trace_path) = trace {
                diffdrive_cli::write_trace(&trace_path, &report)?;
                println!("\n📄 Trace saved to: {}", trace_path.display());
            }

            if report.passed() {
                println!("\n✅ All expectations met");
            } else {
                for failure in &report.assertion_failures {
                    println!("   - {}", failure);
                }
                anyhow::bail!(
                    "❌ {} expectation(s) failed in scenario {}",
                    report.assertion_failures.len(),
                    report.id
                );
            }
        }

        Commands::Preset { name, json } => {
            print!("{}", diffdrive_cli::render_preset(name.as_deref(), json)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("diffdrive_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
