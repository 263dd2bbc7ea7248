// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Draft change tracking
//!
//! Compares a draft with its last saved baseline. Comparison is on the raw
//! form values, so `"5000"` and `"5000.0"` count as a change.

use serde::Serialize;

use super::definition::{DraftField, PipelineDraft};

/// Whether `draft` differs from `baseline` in any way
pub fn is_dirty(draft: &PipelineDraft, baseline: &PipelineDraft) -> bool {
    draft != baseline
}

/// Editable fields that differ, in form order
pub fn changed_fields(draft: &PipelineDraft, baseline: &PipelineDraft) -> Vec<DraftField> {
    DraftField::ALL
        .into_iter()
        .filter(|field| field_differs(*field, draft, baseline))
        .collect()
}

fn field_differs(field: DraftField, a: &PipelineDraft, b: &PipelineDraft) -> bool {
    match field {
        DraftField::Name => a.name != b.name,
        DraftField::Enabled => a.enabled != b.enabled,
        DraftField::PayoutProvider => a.payout_provider != b.payout_provider,
        DraftField::PricingProvider => a.pricing_provider != b.pricing_provider,
        DraftField::Steps => a.steps != b.steps,
        DraftField::ExchangeFeePct
        | DraftField::FixedFee
        | DraftField::MinAmount
        | DraftField::MaxAmount => a.numeric_field(field) != b.numeric_field(field),
    }
}

/// Summary of how a draft differs from its baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDiff {
    pub dirty: bool,
    pub changed: Vec<DraftField>,
    /// Differences outside the editable fields (id or corridor)
    pub identity_changed: bool,
}

impl DraftDiff {
    pub fn between(draft: &PipelineDraft, baseline: &PipelineDraft) -> Self {
        Self {
            dirty: is_dirty(draft, baseline),
            changed: changed_fields(draft, baseline),
            identity_changed: draft.id != baseline.id || draft.corridor != baseline.corridor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Corridor, Step};
    use crate::reference::ReferenceData;

    fn draft() -> PipelineDraft {
        PipelineDraft::seed(
            Corridor::new("USDC", "STELLAR", "COP"),
            &ReferenceData::builtin(),
        )
    }

    #[test]
    fn test_identical_is_clean() {
        let d = draft();
        assert!(!is_dirty(&d, &d));
        assert!(changed_fields(&d, &d).is_empty());
    }

    #[test]
    fn test_single_edit_is_dirty() {
        let baseline = draft();
        let mut d = baseline.clone();
        d.max_amount = "6000000".into();

        assert!(is_dirty(&d, &baseline));
        assert_eq!(changed_fields(&d, &baseline), vec![DraftField::MaxAmount]);
    }

    #[test]
    fn test_equivalent_number_spelling_is_dirty() {
        let baseline = draft();
        let mut d = baseline.clone();
        d.min_amount = format!("{}.0", baseline.min_amount);
        assert!(is_dirty(&d, &baseline));
    }

    #[test]
    fn test_step_order_matters() {
        let mut baseline = draft();
        baseline.steps = vec![
            Step::Payout,
            Step::move_to_exchange("BINANCE"),
            Step::convert("BINANCE", "USDC", "COP"),
        ];
        let mut d = baseline.clone();
        d.steps.swap(1, 2);

        assert!(is_dirty(&d, &baseline));
        assert_eq!(changed_fields(&d, &baseline), vec![DraftField::Steps]);
    }

    #[test]
    fn test_identity_change_is_dirty_without_field_changes() {
        let baseline = draft();
        let mut d = baseline.clone();
        d.id = Some("def-9".into());

        let diff = DraftDiff::between(&d, &baseline);
        assert!(diff.dirty);
        assert!(diff.changed.is_empty());
        assert!(diff.identity_changed);
    }
}
