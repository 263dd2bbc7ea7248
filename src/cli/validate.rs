// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Validate command - check a draft and show its normalized definition

use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use super::{load_draft, load_reference, OutputFormat};
use crate::pipeline::{
    PipelineDefinition, PipelineDraft, PipelineValidator, StepSequenceValidator,
    ValidationErrors, ValidationResult,
};
use crate::reference::ReferenceData;
use crate::utils::{print_error, print_section, print_success};

/// Run the validate command
pub async fn run(
    draft_path: PathBuf,
    format: OutputFormat,
    reference: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let reference = load_reference(reference)?;
    let draft = load_draft(&draft_path)?;

    let result = PipelineValidator::validate(&draft, &reference)?;

    match format {
        OutputFormat::Text => print_text(&draft_path, &draft, &reference, &result, verbose),
        OutputFormat::Json => print_json(&result)?,
    }

    result.into_definition()?;
    Ok(())
}

fn print_text(
    path: &Path,
    draft: &PipelineDraft,
    reference: &ReferenceData,
    result: &ValidationResult,
    verbose: bool,
) {
    println!("{} {}", "Validating".bold(), path.display());
    println!("  Corridor: {}", draft.corridor);

    if verbose {
        print_walk(draft, reference);
    }

    match result {
        ValidationResult::Valid(definition) => {
            print_section("Definition");
            print_definition(definition);
            println!();
            println!("{}", "Draft is valid!".green().bold());
        }
        ValidationResult::Invalid(errors) => {
            print_errors(errors);
            println!();
        }
    }
}

fn print_errors(errors: &ValidationErrors) {
    println!();
    println!("{}:", "Errors".red().bold());
    for (key, violation) in errors.iter() {
        print_error(&format!("{}: {}", key.to_string().bold(), violation));
    }
}

/// Trace of where funds sit after each step
fn print_walk(draft: &PipelineDraft, reference: &ReferenceData) {
    let walk = StepSequenceValidator::new(&draft.corridor, reference).walk(&draft.steps);

    print_section("Execution trace");
    for (index, (step, state)) in draft.steps.iter().zip(&walk.states).enumerate() {
        println!(
            "  {}. {} {}",
            index,
            step,
            format!("→ {} at {}", state.asset, state.location).dimmed()
        );
    }
}

fn print_definition(definition: &PipelineDefinition) {
    fn bound(value: Option<rust_decimal::Decimal>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".into())
    }

    print_success(&format!("Name: {}", definition.name));
    print_success(&format!("Enabled: {}", definition.enabled));
    print_success(&format!(
        "Providers: payout {}, pricing {}",
        definition.payout_provider, definition.pricing_provider
    ));
    print_success(&format!(
        "Fees: {}% + {} fixed",
        definition.exchange_fee_pct, definition.fixed_fee
    ));
    print_success(&format!(
        "Limits: {} to {}",
        bound(definition.min_amount),
        bound(definition.max_amount)
    ));
    print_success(&format!("Steps: {}", definition.steps.len()));
}

fn print_json(result: &ValidationResult) -> Result<()> {
    let body = match result {
        ValidationResult::Valid(definition) => serde_json::json!({
            "valid": true,
            "definition": definition,
        }),
        ValidationResult::Invalid(errors) => serde_json::json!({
            "valid": false,
            "errors": errors,
        }),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&body).into_diagnostic()?
    );
    Ok(())
}
