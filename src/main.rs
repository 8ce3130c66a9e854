//! devprov - developer environment provisioner.
//!
//! Creates OS accounts for a list of developers, grants each passwordless
//! sudo, generates per-account SSH credentials, and links a shared project
//! workspace into every developer's home directory.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use devprov::config::ProvisionSpec;
use devprov::context::ProvisionContext;
use devprov::orchestrator;
use devprov::preflight;
use devprov::runner::HostRunner;

#[derive(Parser)]
#[command(name = "devprov")]
#[command(about = "Provision developer accounts, sudo grants, SSH keys, and a shared project")]
#[command(
    after_help = "QUICK START:\n  devprov preflight  Check required host tools\n  devprov provision  Provision everything from config.yml"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision developers and the shared project from a YAML config
    Provision {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config.yml")]
        config: PathBuf,

        /// Print the final summary as JSON (private keys are never included)
        #[arg(long)]
        json: bool,
    },

    /// Check that the required host tools are installed
    Preflight,
}

fn main() -> Result<()> {
    // .env never overrides variables already set in the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Provision { config, json } => cmd_provision(&config, json),
        Commands::Preflight => cmd_preflight(),
    }
}

fn cmd_provision(config: &Path, json: bool) -> Result<()> {
    let spec = ProvisionSpec::load(config)?;
    if spec.developers.is_empty() {
        println!("No developers specified in {}", config.display());
        return Ok(());
    }

    let ctx = ProvisionContext::load();
    let runner = HostRunner::new();
    let report = orchestrator::run(&runner, &ctx, &spec.developers, spec.project.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\nSummary of operations:");
        for dev in &report.developers {
            println!("{}: {}", dev.name, dev.outcome);
        }
        if let Some(project) = &report.shared_project {
            println!("shared project {}: {}", project.name, project.outcome);
        }
    }

    // Individual failures are reported, not escalated to a non-zero exit.
    Ok(())
}

fn cmd_preflight() -> Result<()> {
    let report = preflight::run_preflight();
    report.print();
    if !report.all_passed() {
        bail!("Missing required host tools; install them and re-run");
    }
    println!("All checks passed.");
    Ok(())
}
