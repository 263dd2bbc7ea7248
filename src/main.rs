// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! flowdef - Payment Flow Definitions
//!
//! Validate, seed and edit multi-step payment flow definitions.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowdef::cli::{seed::SeedArgs, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "flowdef=debug"
    } else {
        "flowdef=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let reference = cli.reference.as_deref();

    // Dispatch to command handlers
    match cli.command {
        Commands::Validate { draft, format } => {
            flowdef::cli::validate::run(draft, format, reference, cli.verbose).await
        }
        Commands::Seed {
            crypto,
            chain,
            target,
            registry,
            output,
        } => {
            let args = SeedArgs {
                crypto,
                chain,
                target,
                registry,
                output,
            };
            flowdef::cli::seed::run(args, reference, cli.verbose).await
        }
        Commands::SwitchProvider {
            draft,
            payout,
            pricing,
            in_place,
        } => flowdef::cli::switch::run(draft, payout, pricing, in_place, reference).await,
        Commands::Diff { draft, baseline } => flowdef::cli::diff::run(draft, baseline).await,
        Commands::Providers => flowdef::cli::providers::run(reference).await,
        Commands::Corridors { registry } => {
            flowdef::cli::corridors::run(registry, cli.verbose).await
        }
    }
}
