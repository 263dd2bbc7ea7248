// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Switch-provider command - change provider and cascade its defaults

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{load_draft, load_reference};
use crate::pipeline::{
    cascade_provider_defaults, changed_fields, DraftField, PayoutProvider, PipelineDraft,
    PricingProvider, ProviderChange,
};
use crate::utils::document;

/// Run the switch-provider command
pub async fn run(
    draft_path: PathBuf,
    payout: Option<String>,
    pricing: Option<String>,
    in_place: bool,
    reference: Option<&Path>,
) -> Result<()> {
    let reference = load_reference(reference)?;
    let draft = load_draft(&draft_path)?;

    let change = match (payout, pricing) {
        (Some(provider), _) => ProviderChange::Payout(PayoutProvider::new(provider)),
        (None, Some(provider)) => ProviderChange::Pricing(PricingProvider::new(provider)),
        (None, None) => return Err(miette::miette!("Pass --payout or --pricing")),
    };

    let known = match &change {
        ProviderChange::Payout(p) => reference.payout_defaults(p).is_some(),
        ProviderChange::Pricing(p) => reference.pricing_defaults(p).is_some(),
    };
    if !known {
        tracing::warn!(
            ?change,
            "provider has no reference defaults, fees and limits left as they were"
        );
    }

    let next = cascade_provider_defaults(&draft, &change, &reference);

    if !in_place {
        print!("{}", next.to_yaml()?);
        return Ok(());
    }

    document::save(&next, &draft_path)?;

    println!("{} {}", "Updated".bold(), draft_path.display());
    for field in changed_fields(&next, &draft) {
        println!(
            "  {} {}: {} → {}",
            "→".blue(),
            field.label(),
            field_value(&draft, field),
            field_value(&next, field)
        );
    }

    Ok(())
}

fn field_value(draft: &PipelineDraft, field: DraftField) -> String {
    match field {
        DraftField::PayoutProvider => draft.payout_provider.to_string(),
        DraftField::PricingProvider => draft.pricing_provider.to_string(),
        other => match draft.numeric_field(other) {
            Some("") => "(blank)".to_string(),
            Some(value) => value.to_string(),
            None => String::new(),
        },
    }
}
