// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Providers command - show reference data in use

use colored::Colorize;
use miette::Result;
use std::path::Path;

use super::load_reference;
use crate::utils::{print_header, print_section};

/// Run the providers command
pub async fn run(reference: Option<&Path>) -> Result<()> {
    let reference = load_reference(reference)?;

    print_header("Reference data");

    print_section("Payout providers");
    for (provider, defaults) in &reference.payout_providers {
        let marker = if provider == &reference.default_payout_provider {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}{}  fixed fee {}, min {}, max {}",
            provider.to_string().cyan(),
            marker,
            blank_as_none(&defaults.fixed_fee),
            blank_as_none(&defaults.min_amount),
            blank_as_none(&defaults.max_amount),
        );
    }

    print_section("Pricing providers");
    for (provider, defaults) in &reference.pricing_providers {
        let marker = if provider == &reference.default_pricing_provider {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}{}  exchange fee {}%",
            provider.to_string().cyan(),
            marker,
            blank_as_none(&defaults.exchange_fee_pct),
        );
    }

    print_section("Venues");
    println!("  Fiat off-ramp: {}", reference.fiat_off_ramp_venue);
    println!(
        "  Transfer sources: {}",
        reference.transfer_sources_display()
    );

    print_section("Fiat currencies");
    let fiat: Vec<&str> = reference.fiat_currencies.iter().map(|c| c.as_str()).collect();
    println!("  {}", fiat.join(", "));

    Ok(())
}

fn blank_as_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "none"
    } else {
        value
    }
}
