// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Seed command - write a starting draft for a corridor

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::load_reference;
use crate::pipeline::Corridor;
use crate::registry::{CorridorEntry, CorridorRegistry, InMemoryCorridorRegistry};
use crate::session::EditingSession;
use crate::utils::document;

/// Corridor named on the command line
pub struct SeedArgs {
    pub crypto: String,
    pub chain: String,
    pub target: String,
    pub registry: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Run the seed command
pub async fn run(args: SeedArgs, reference: Option<&Path>, verbose: bool) -> Result<()> {
    let reference = Arc::new(load_reference(reference)?);
    let corridor = Corridor::new(args.crypto, &args.chain, args.target);

    let entry = match &args.registry {
        Some(path) => {
            InMemoryCorridorRegistry::from_file(path)?
                .require(&corridor)
                .await?
        }
        None => CorridorEntry::new(corridor),
    };
    let existing = entry.has_definition();

    let session = EditingSession::open(entry, reference)?;
    let draft = session.draft();

    match &args.output {
        Some(path) => {
            document::save(draft, path)?;
            let origin = if existing {
                "from active definition"
            } else {
                "from provider defaults"
            };
            println!(
                "  {} Wrote draft for {} to {} {}",
                "✓".green(),
                draft.corridor,
                path.display(),
                origin.dimmed()
            );
            if verbose {
                println!("  Payout provider: {}", draft.payout_provider);
                println!("  Pricing provider: {}", draft.pricing_provider);
            }
        }
        None => print!("{}", draft.to_yaml()?),
    }

    Ok(())
}
