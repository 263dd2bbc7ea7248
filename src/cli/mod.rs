// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for flowdef.

pub mod corridors;
pub mod diff;
pub mod providers;
pub mod seed;
pub mod switch;
pub mod validate;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::errors::{FlowdefError, FlowdefResult};
use crate::pipeline::PipelineDraft;
use crate::reference::{ReferenceData, REFERENCE_ENV};

/// Payment flow definition toolkit
///
/// Validate, seed and edit the step pipelines that move funds across corridors.
#[derive(Parser, Debug)]
#[clap(
    name = "flowdef",
    version,
    about = "Validate and edit payment flow definitions",
    long_about = None,
    after_help = "Examples:\n\
        flowdef seed --crypto USDC --chain STELLAR --target COP -o cop.yaml\n\
        flowdef validate cop.yaml                 Check a draft\n\
        flowdef switch-provider cop.yaml --payout TRANSFERO --in-place\n\
        flowdef diff cop.yaml saved.yaml          Show unsaved changes\n\n\
        See 'flowdef <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Reference data file (providers, fiat currencies, venues)
    #[clap(long, global = true, value_name = "FILE", env = REFERENCE_ENV)]
    pub reference: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a draft and print the normalized definition
    Validate {
        /// Draft file to validate
        draft: PathBuf,

        /// Output format
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a starting draft for a corridor
    Seed {
        /// Crypto asset received (e.g. USDC)
        #[clap(long)]
        crypto: String,

        /// Blockchain the asset arrives on (e.g. STELLAR)
        #[clap(long)]
        chain: String,

        /// Fiat currency paid out (e.g. COP)
        #[clap(long)]
        target: String,

        /// Corridor registry; its active definition is used when present
        #[clap(short, long)]
        registry: Option<PathBuf>,

        /// Output file (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Switch provider and cascade its default fees and limits
    #[clap(group(ArgGroup::new("provider").required(true).args(&["payout", "pricing"])))]
    SwitchProvider {
        /// Draft file to edit
        draft: PathBuf,

        /// New payout provider
        #[clap(long)]
        payout: Option<String>,

        /// New pricing provider
        #[clap(long)]
        pricing: Option<String>,

        /// Rewrite the draft file instead of printing
        #[clap(long)]
        in_place: bool,
    },

    /// Show fields that differ from a saved baseline
    Diff {
        /// Edited draft
        draft: PathBuf,

        /// Saved draft or definition to compare against
        baseline: PathBuf,
    },

    /// Show provider defaults and reference data
    Providers,

    /// List corridors known to a registry
    Corridors {
        /// Corridor registry file
        #[clap(short, long)]
        registry: PathBuf,
    },
}

/// Output format for validation results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Resolve reference data for a command
pub fn load_reference(explicit: Option<&Path>) -> FlowdefResult<ReferenceData> {
    ReferenceData::discover(explicit)
}

/// Load a draft, reporting a missing file as such
pub fn load_draft(path: &Path) -> FlowdefResult<PipelineDraft> {
    if !path.exists() {
        return Err(FlowdefError::DraftNotFound {
            path: path.to_path_buf(),
        });
    }
    PipelineDraft::from_file(path)
}
