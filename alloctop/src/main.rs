//! # alloctop - Main Entry Point
//!
//! Dispatches exactly one action per run:
//! - `--activate[=top=N,verbose=V]` / `--deactivate` — control the sampler
//! - `--settings[=json=1]` — print the current configuration
//! - `--report` — one-shot dump rendered as a table
//! - `--log=sls=PATH,syslog=1` — continuous export until interrupted
//!
//! Failures are reported in the printed output; the exit status is always 0
//! for compatibility with existing diagnose-tools wrappers.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use alloctop::cli::Args;
use alloctop::commands;
use alloctop::transport::{self, DiagRegistry, TransportMode};

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("error: {err}");
    }
}

async fn run() -> Result<()> {
    // Unrecognized or malformed options fall back to usage; the exit status
    // stays 0 either way (--help and --version land here too)
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().context("failed to print usage")?;
            return Ok(());
        }
    };

    let mode = if args.syscall { TransportMode::Syscall } else { TransportMode::Ioctl };
    let transport = transport::create(mode);
    let registry = DiagRegistry::new();

    if let Some(arg) = args.activate {
        commands::activate(&*transport, &registry, &arg);
    } else if args.deactivate {
        commands::deactivate(&registry);
    } else if let Some(arg) = args.settings {
        commands::settings(&*transport, &arg);
    } else if args.report {
        commands::report(&*transport);
    } else if let Some(arg) = args.log {
        commands::log(transport, &arg).await;
    } else {
        // No action requested: show usage, touch nothing
        Args::command()
            .print_long_help()
            .context("failed to print usage")?;
    }

    Ok(())
}
