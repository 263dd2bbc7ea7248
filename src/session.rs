// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Editing sessions
//!
//! An `EditingSession` owns the draft for exactly one corridor together with
//! the baseline it was loaded from. All corridor context travels with the
//! session; nothing is kept in global state.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{FlowdefError, FlowdefResult};
use crate::pipeline::{
    cascade_preserving, changed_fields, is_dirty, Corridor, DraftField, PipelineDefinition,
    PipelineDraft, PipelineValidator, ProviderChange, Step, ValidationErrors, ValidationResult,
};
use crate::reference::ReferenceData;
use crate::registry::CorridorEntry;

/// What the caller should send to persistence
#[derive(Debug, Clone, PartialEq)]
pub enum SavePlan {
    /// No id yet: create a new definition
    Create(PipelineDefinition),
    /// Existing id: update in place
    Update(PipelineDefinition),
    /// The draft has errors and must not be sent
    Rejected(ValidationErrors),
}

/// A single operator's edit of one corridor's flow definition
#[derive(Debug, Clone)]
pub struct EditingSession {
    corridor: Corridor,
    reference: Arc<ReferenceData>,
    baseline: PipelineDraft,
    draft: PipelineDraft,
    touched: BTreeSet<DraftField>,
}

impl EditingSession {
    /// Open a session from a registry entry. The draft starts as the active
    /// definition, or as a seeded draft when the corridor has none.
    pub fn open(entry: CorridorEntry, reference: Arc<ReferenceData>) -> FlowdefResult<Self> {
        if !entry.supported {
            return Err(FlowdefError::UnsupportedCorridor {
                corridor: entry.corridor.to_string(),
            });
        }

        let baseline = match &entry.definition {
            Some(definition) => PipelineDraft::from(definition),
            None => PipelineDraft::seed(entry.corridor.clone(), &reference),
        };

        tracing::info!(
            corridor = %entry.corridor,
            existing = entry.has_definition(),
            "opened editing session"
        );

        Ok(Self {
            corridor: entry.corridor,
            reference,
            draft: baseline.clone(),
            baseline,
            touched: BTreeSet::new(),
        })
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn draft(&self) -> &PipelineDraft {
        &self.draft
    }

    pub fn baseline(&self) -> &PipelineDraft {
        &self.baseline
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Fields the operator has edited since the last save or discard
    pub fn touched(&self) -> &BTreeSet<DraftField> {
        &self.touched
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.touched.insert(DraftField::Name);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.draft.enabled = enabled;
        self.touched.insert(DraftField::Enabled);
    }

    /// Set a fee or amount field to a raw form value
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) -> FlowdefResult<()> {
        let slot = self
            .draft
            .numeric_field_mut(field)
            .ok_or_else(|| FlowdefError::InvalidEdit {
                reason: format!("'{}' is not a fee or amount field", field),
            })?;
        *slot = value.into();
        self.touched.insert(field);
        Ok(())
    }

    /// Replace the whole step list
    pub fn set_steps(&mut self, steps: Vec<Step>) {
        self.draft.steps = steps;
        self.touched.insert(DraftField::Steps);
    }

    pub fn push_step(&mut self, step: Step) {
        self.draft.steps.push(step);
        self.touched.insert(DraftField::Steps);
    }

    /// Remove a step. The leading payout cannot be removed.
    pub fn remove_step(&mut self, index: usize) -> FlowdefResult<Step> {
        if index == 0 {
            return Err(FlowdefError::InvalidEdit {
                reason: "the leading payout step cannot be removed".into(),
            });
        }
        if index >= self.draft.steps.len() {
            return Err(FlowdefError::InvalidEdit {
                reason: format!(
                    "step {} does not exist (pipeline has {} steps)",
                    index,
                    self.draft.steps.len()
                ),
            });
        }

        self.touched.insert(DraftField::Steps);
        Ok(self.draft.steps.remove(index))
    }

    /// Switch provider, cascading its defaults into fields the operator has
    /// neither touched nor moved away from the previous default
    pub fn change_provider(&mut self, change: ProviderChange) {
        self.draft = cascade_preserving(&self.draft, &change, &self.reference, &self.touched);
        self.touched.insert(match change {
            ProviderChange::Payout(_) => DraftField::PayoutProvider,
            ProviderChange::Pricing(_) => DraftField::PricingProvider,
        });
    }

    pub fn is_dirty(&self) -> bool {
        is_dirty(&self.draft, &self.baseline)
    }

    pub fn changed_fields(&self) -> Vec<DraftField> {
        changed_fields(&self.draft, &self.baseline)
    }

    /// Throw away edits and return to the baseline
    pub fn discard(&mut self) {
        self.draft = self.baseline.clone();
        self.touched.clear();
    }

    pub fn validate(&self) -> FlowdefResult<ValidationResult> {
        PipelineValidator::validate(&self.draft, &self.reference)
    }

    /// Decide what to send to persistence
    pub fn prepare_save(&self) -> FlowdefResult<SavePlan> {
        Ok(match self.validate()? {
            ValidationResult::Invalid(errors) => SavePlan::Rejected(errors),
            ValidationResult::Valid(definition) if definition.id.is_some() => {
                SavePlan::Update(definition)
            }
            ValidationResult::Valid(definition) => SavePlan::Create(definition),
        })
    }

    /// Adopt the definition persistence confirmed as the new baseline
    pub fn confirm_saved(&mut self, saved: &PipelineDefinition) -> FlowdefResult<()> {
        if saved.corridor != self.corridor {
            return Err(FlowdefError::InvalidEdit {
                reason: format!(
                    "saved definition belongs to {}, not {}",
                    saved.corridor, self.corridor
                ),
            });
        }

        self.baseline = PipelineDraft::from(saved);
        self.draft = self.baseline.clone();
        self.touched.clear();

        tracing::info!(corridor = %self.corridor, id = ?saved.id, "definition saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ErrorKey, PayoutProvider};
    use rust_decimal_macros::dec;

    fn cop() -> Corridor {
        Corridor::new("USDC", "STELLAR", "COP")
    }

    fn open_fresh() -> EditingSession {
        EditingSession::open(
            CorridorEntry::new(cop()),
            Arc::new(ReferenceData::builtin()),
        )
        .unwrap()
    }

    #[test]
    fn test_unsupported_corridor() {
        let mut entry = CorridorEntry::new(cop());
        entry.supported = false;
        let result = EditingSession::open(entry, Arc::new(ReferenceData::builtin()));
        assert!(matches!(
            result,
            Err(FlowdefError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn test_fresh_session_is_seeded_and_clean() {
        let session = open_fresh();
        assert_eq!(session.draft().steps, vec![Step::Payout]);
        assert_eq!(session.draft().min_amount, "5000");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_edit_marks_dirty_and_discard_restores() {
        let mut session = open_fresh();
        session.set_field(DraftField::FixedFee, "2").unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.changed_fields(), vec![DraftField::FixedFee]);

        session.discard();
        assert!(!session.is_dirty());
        assert!(session.touched().is_empty());
    }

    #[test]
    fn test_set_field_rejects_non_numeric_fields() {
        let mut session = open_fresh();
        assert!(matches!(
            session.set_field(DraftField::Name, "x"),
            Err(FlowdefError::InvalidEdit { .. })
        ));
    }

    #[test]
    fn test_leading_payout_cannot_be_removed() {
        let mut session = open_fresh();
        assert!(session.remove_step(0).is_err());
        assert!(session.remove_step(5).is_err());

        session.push_step(Step::move_to_exchange("BINANCE"));
        assert_eq!(
            session.remove_step(1).unwrap(),
            Step::move_to_exchange("BINANCE")
        );
    }

    #[test]
    fn test_provider_change_respects_touched_fields() {
        let mut session = open_fresh();
        // Retype the exact default: still counts as an intentional value
        session.set_field(DraftField::FixedFee, "0").unwrap();
        session.change_provider(ProviderChange::Payout(PayoutProvider::new("TRANSFERO")));

        assert_eq!(session.draft().fixed_fee, "0");
        assert_eq!(session.draft().min_amount, "50");
        assert_eq!(
            session.draft().payout_provider,
            PayoutProvider::new("TRANSFERO")
        );
    }

    #[test]
    fn test_save_cycle() {
        let mut session = open_fresh();
        session.set_steps(vec![
            Step::Payout,
            Step::move_to_exchange("BINANCE"),
            Step::convert("BINANCE", "USDC", "COP"),
        ]);

        let definition = match session.prepare_save().unwrap() {
            SavePlan::Create(definition) => definition,
            other => panic!("expected create, got {other:?}"),
        };
        assert_eq!(definition.min_amount, Some(dec!(5000)));

        // Persistence assigns an id
        let saved = PipelineDefinition {
            id: Some("def-42".into()),
            ..definition
        };
        session.confirm_saved(&saved).unwrap();
        assert!(!session.is_dirty());

        session.set_name("renamed");
        assert!(session.is_dirty());
        assert!(matches!(
            session.prepare_save().unwrap(),
            SavePlan::Update(_)
        ));
    }

    #[test]
    fn test_invalid_draft_is_rejected() {
        let mut session = open_fresh();
        session.set_field(DraftField::MinAmount, "100").unwrap();
        session.set_field(DraftField::MaxAmount, "50").unwrap();

        match session.prepare_save().unwrap() {
            SavePlan::Rejected(errors) => assert!(errors.contains(ErrorKey::MaxAmount)),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_confirm_saved_for_other_corridor() {
        let mut session = open_fresh();
        let other = PipelineDraft::seed(
            Corridor::new("USDC", "STELLAR", "BRL"),
            &ReferenceData::builtin(),
        );
        let saved = crate::pipeline::DraftNormalizer::normalize(&other).unwrap();
        assert!(session.confirm_saved(&saved).is_err());
    }

    #[test]
    fn test_existing_definition_is_baseline() {
        let mut entry = CorridorEntry::new(cop());
        let mut draft = PipelineDraft::seed(cop(), &ReferenceData::builtin());
        draft.id = Some("def-1".into());
        draft.fixed_fee = "4.25".into();
        entry.definition = Some(crate::pipeline::DraftNormalizer::normalize(&draft).unwrap());

        let session = EditingSession::open(entry, Arc::new(ReferenceData::builtin())).unwrap();
        assert_eq!(session.draft().id.as_deref(), Some("def-1"));
        assert_eq!(session.draft().fixed_fee, "4.25");
        assert!(!session.is_dirty());
    }
}
