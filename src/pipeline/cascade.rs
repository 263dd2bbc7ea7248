// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Provider default cascading
//!
//! Switching the payout or pricing provider re-derives the fee and limit
//! fields that depend on it. A field is only replaced when it still holds
//! the previous provider's default verbatim; anything else is treated as an
//! operator override and kept. An operator who retyped the exact default
//! gets it replaced, which leaves the value unchanged anyway.

use std::collections::BTreeSet;

use super::definition::{DraftField, PayoutProvider, PipelineDraft, PricingProvider};
use crate::reference::ReferenceData;

/// A provider selection made by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChange {
    Payout(PayoutProvider),
    Pricing(PricingProvider),
}

impl ProviderChange {
    /// Fields whose defaults come from this kind of provider
    pub fn dependent_fields(&self) -> &'static [DraftField] {
        match self {
            Self::Payout(_) => &[
                DraftField::FixedFee,
                DraftField::MinAmount,
                DraftField::MaxAmount,
            ],
            Self::Pricing(_) => &[DraftField::ExchangeFeePct],
        }
    }
}

/// Switch provider and cascade its defaults into untouched fields
pub fn cascade_provider_defaults(
    draft: &PipelineDraft,
    change: &ProviderChange,
    reference: &ReferenceData,
) -> PipelineDraft {
    cascade_preserving(draft, change, reference, &BTreeSet::new())
}

/// Like [`cascade_provider_defaults`], but never overwrites a field listed in
/// `touched`, even when it equals the previous default.
pub fn cascade_preserving(
    draft: &PipelineDraft,
    change: &ProviderChange,
    reference: &ReferenceData,
    touched: &BTreeSet<DraftField>,
) -> PipelineDraft {
    let mut next = draft.clone();

    let pairs: Vec<(DraftField, Option<String>, Option<String>)> = match change {
        ProviderChange::Payout(provider) => {
            let old = reference.payout_defaults(&draft.payout_provider);
            let new = reference.payout_defaults(provider);
            next.payout_provider = provider.clone();
            vec![
                (
                    DraftField::FixedFee,
                    old.map(|d| d.fixed_fee.clone()),
                    new.map(|d| d.fixed_fee.clone()),
                ),
                (
                    DraftField::MinAmount,
                    old.map(|d| d.min_amount.clone()),
                    new.map(|d| d.min_amount.clone()),
                ),
                (
                    DraftField::MaxAmount,
                    old.map(|d| d.max_amount.clone()),
                    new.map(|d| d.max_amount.clone()),
                ),
            ]
        }
        ProviderChange::Pricing(provider) => {
            let old = reference.pricing_defaults(&draft.pricing_provider);
            let new = reference.pricing_defaults(provider);
            next.pricing_provider = provider.clone();
            vec![(
                DraftField::ExchangeFeePct,
                old.map(|d| d.exchange_fee_pct.clone()),
                new.map(|d| d.exchange_fee_pct.clone()),
            )]
        }
    };

    for (field, old_default, new_default) in pairs {
        let (Some(old_default), Some(new_default)) = (old_default, new_default) else {
            continue;
        };
        if touched.contains(&field) {
            continue;
        }
        if let Some(value) = next.numeric_field_mut(field) {
            if *value == old_default {
                tracing::debug!(field = %field, from = %old_default, to = %new_default, "cascaded provider default");
                *value = new_default;
            }
        }
    }

    next
}
