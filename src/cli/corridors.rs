// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Corridors command - list what a registry knows

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::registry::{CorridorRegistry, InMemoryCorridorRegistry};
use crate::utils::print_header;

/// Run the corridors command
pub async fn run(registry_path: PathBuf, verbose: bool) -> Result<()> {
    let registry = InMemoryCorridorRegistry::from_file(&registry_path)?;
    let entries = registry.entries().await?;

    print_header(&format!("Corridors ({})", entries.len()));

    for entry in &entries {
        let status = if !entry.supported {
            "unsupported".red()
        } else if entry.has_definition() {
            "defined".green()
        } else {
            "no definition".yellow()
        };
        println!("  {}  {}", entry.corridor, status);

        if verbose {
            if let Some(definition) = &entry.definition {
                println!(
                    "    {} {} step(s), {}",
                    definition.name.dimmed(),
                    definition.steps.len(),
                    if definition.enabled { "enabled" } else { "disabled" }
                );
            }
        }
    }

    Ok(())
}
