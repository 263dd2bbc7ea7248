// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Diff command - report unsaved changes against a baseline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_draft;
use crate::pipeline::DraftDiff;
use crate::utils::{print_success, print_warning};

/// Run the diff command. Fails when the draft is dirty, so scripts can
/// check for unsaved changes by exit status.
pub async fn run(draft_path: PathBuf, baseline_path: PathBuf) -> Result<()> {
    let draft = load_draft(&draft_path)?;
    let baseline = load_draft(&baseline_path)?;

    let diff = DraftDiff::between(&draft, &baseline);

    if !diff.dirty {
        print_success("No unsaved changes");
        return Ok(());
    }

    println!("{}:", "Unsaved changes".yellow().bold());
    for field in &diff.changed {
        print_warning(field.label());
    }
    if diff.identity_changed {
        print_warning("definition id or corridor");
    }

    Err(miette::miette!(
        "{} differs from {}",
        draft_path.display(),
        baseline_path.display()
    ))
}
