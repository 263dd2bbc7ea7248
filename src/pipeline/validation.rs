// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Pipeline validation
//!
//! Validates a flow definition draft before it is persisted. The step
//! sequence is checked by walking it once, left to right, while tracking
//! where the funds are and which asset they are held in.
//!
//! A step always moves the tracked state to what it declares, even when the
//! step itself is invalid. One bad step is therefore reported once, and the
//! steps after it are judged against the intended flow rather than against a
//! state that stopped advancing.

use super::definition::{
    Corridor, Currency, Location, PipelineDefinition, PipelineDraft, Step, Venue,
};
use super::fields::FieldValidator;
use super::normalize::DraftNormalizer;
use super::report::{ErrorKey, ValidationErrors, Violation};
use crate::errors::{FlowdefError, FlowdefResult};
use crate::reference::ReferenceData;

/// Where the funds are and what they are, as seen by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionState {
    pub location: Location,
    pub asset: Currency,
}

impl ExecutionState {
    /// Funds start in the hot wallet as the corridor's crypto asset
    pub fn initial(corridor: &Corridor) -> Self {
        Self {
            location: Location::HotWallet,
            asset: corridor.crypto_currency.clone(),
        }
    }
}

/// Result of walking a step sequence
#[derive(Debug, Clone, Default)]
pub struct StepWalk {
    pub errors: ValidationErrors,
    /// State after each step, one entry per step
    pub states: Vec<ExecutionState>,
}

/// Checks step order and the location/asset preconditions of each step
pub struct StepSequenceValidator<'a> {
    corridor: &'a Corridor,
    reference: &'a ReferenceData,
}

impl<'a> StepSequenceValidator<'a> {
    pub fn new(corridor: &'a Corridor, reference: &'a ReferenceData) -> Self {
        Self {
            corridor,
            reference,
        }
    }

    /// Errors for a step sequence
    pub fn check(&self, steps: &[Step]) -> ValidationErrors {
        self.walk(steps).errors
    }

    /// Walk the sequence, collecting every error and the state after each step
    pub fn walk(&self, steps: &[Step]) -> StepWalk {
        let mut walk = StepWalk::default();

        match steps.first() {
            None => {
                walk.errors.add(ErrorKey::Steps, Violation::EmptyPipeline);
                return walk;
            }
            Some(Step::Payout) => {}
            Some(_) => walk
                .errors
                .add(ErrorKey::Steps, Violation::MissingLeadingPayout),
        }

        let mut state = ExecutionState::initial(self.corridor);

        for (index, step) in steps.iter().enumerate() {
            let key = ErrorKey::Step(index);

            if index == 0 && *step != Step::Payout {
                walk.errors.add(key, Violation::FirstStepNotPayout);
            }

            for violation in self.apply(step, index, &mut state) {
                walk.errors.add(key, violation);
            }

            walk.states.push(state.clone());
        }

        tracing::debug!(
            steps = steps.len(),
            errors = walk.errors.len(),
            "walked step sequence"
        );

        walk
    }

    /// Check one step against `state`, then advance `state` to the step's
    /// declared effect. Violations are returned in precedence order.
    fn apply(&self, step: &Step, index: usize, state: &mut ExecutionState) -> Vec<Violation> {
        let mut violations = Vec::new();

        match step {
            Step::Payout => {
                if index > 0 {
                    violations.push(Violation::PayoutNotFirst);
                }
            }

            Step::MoveToExchange { venue } => {
                if state.location != Location::HotWallet {
                    violations.push(Violation::FundsNotInHotWallet);
                }
                state.location = Location::Venue(venue.clone());
            }

            Step::Convert {
                venue,
                from_asset,
                to_asset,
            } => {
                if !state.location.is_at(venue) {
                    violations.push(Violation::ConversionVenueMismatch {
                        venue: venue.clone(),
                    });
                }
                if &state.asset != from_asset {
                    violations.push(Violation::ConversionAssetMismatch {
                        expected: state.asset.clone(),
                    });
                }
                if from_asset == to_asset {
                    violations.push(Violation::SameAssets);
                }
                if self.reference.is_fiat_off_ramp(venue) {
                    violations.extend(self.off_ramp_violations(venue, from_asset, to_asset));
                }
                state.asset = to_asset.clone();
            }

            Step::TransferVenue {
                from_venue,
                to_venue,
                asset,
            } => {
                if !state.location.is_at(from_venue) {
                    violations.push(Violation::TransferVenueMismatch {
                        venue: from_venue.clone(),
                    });
                }
                if from_venue == to_venue {
                    violations.push(Violation::SameVenues);
                }
                if !self.reference.may_originate_transfer(from_venue) {
                    violations.push(Violation::TransferSourceNotAllowed {
                        allowed: self.reference.transfer_sources_display(),
                    });
                }
                if &state.asset != asset {
                    violations.push(Violation::TransferAssetMismatch {
                        expected: state.asset.clone(),
                    });
                }
                state.location = Location::Venue(to_venue.clone());
            }
        }

        violations
    }

    /// The off-ramp only turns crypto into the corridor's own fiat
    fn off_ramp_violations(
        &self,
        venue: &Venue,
        from_asset: &Currency,
        to_asset: &Currency,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.reference.is_fiat(from_asset) {
            violations.push(Violation::OffRampSourceIsFiat {
                venue: venue.clone(),
            });
        }
        if !self.reference.is_fiat(to_asset) {
            violations.push(Violation::OffRampTargetNotFiat {
                venue: venue.clone(),
            });
        } else if to_asset != &self.corridor.target_currency {
            violations.push(Violation::OffRampWrongTarget {
                venue: venue.clone(),
                target: self.corridor.target_currency.clone(),
            });
        }

        violations
    }
}

/// Result of validating a whole draft
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Ready to persist
    Valid(PipelineDefinition),
    /// At least one problem; nothing may be persisted
    Invalid(ValidationErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn definition(&self) -> Option<&PipelineDefinition> {
        match self {
            Self::Valid(definition) => Some(definition),
            Self::Invalid(_) => None,
        }
    }

    /// The definition, or the errors as a [`FlowdefError::ValidationFailed`]
    pub fn into_definition(self) -> FlowdefResult<PipelineDefinition> {
        match self {
            Self::Valid(definition) => Ok(definition),
            Self::Invalid(errors) => Err(FlowdefError::ValidationFailed { errors }),
        }
    }

    /// Errors of an invalid result; empty for a valid one
    pub fn errors(&self) -> ValidationErrors {
        match self {
            Self::Valid(_) => ValidationErrors::new(),
            Self::Invalid(errors) => errors.clone(),
        }
    }
}

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a draft: fields first, then the step sequence. Only a draft
    /// with no errors at all is normalized.
    pub fn validate(
        draft: &PipelineDraft,
        reference: &ReferenceData,
    ) -> FlowdefResult<ValidationResult> {
        let errors = Self::collect_errors(draft, reference);

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), corridor = %draft.corridor, "draft rejected");
            return Ok(ValidationResult::Invalid(errors));
        }

        let definition = DraftNormalizer::normalize(draft)?;
        tracing::debug!(corridor = %draft.corridor, "draft accepted");
        Ok(ValidationResult::Valid(definition))
    }

    /// Every field and step error in a draft
    pub fn collect_errors(draft: &PipelineDraft, reference: &ReferenceData) -> ValidationErrors {
        let mut errors = FieldValidator::validate(draft);
        errors.merge(StepSequenceValidator::new(&draft.corridor, reference).check(&draft.steps));
        errors
    }
}
