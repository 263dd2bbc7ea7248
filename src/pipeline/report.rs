// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Validation report types
//!
//! Every problem found in a draft becomes a [`Violation`] filed under an
//! [`ErrorKey`]. Nothing here is an `Err`: an invalid draft is a normal,
//! well-typed input and the report is the answer.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

use super::definition::{Currency, DraftField, Venue};

/// Where an error is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Name,
    ExchangeFeePct,
    FixedFee,
    MinAmount,
    MaxAmount,
    /// The step sequence as a whole
    Steps,
    /// A single step by position
    Step(usize),
}

impl ErrorKey {
    /// Key for a field, if the field can carry errors
    pub fn for_field(field: DraftField) -> Option<Self> {
        match field {
            DraftField::Name => Some(Self::Name),
            DraftField::ExchangeFeePct => Some(Self::ExchangeFeePct),
            DraftField::FixedFee => Some(Self::FixedFee),
            DraftField::MinAmount => Some(Self::MinAmount),
            DraftField::MaxAmount => Some(Self::MaxAmount),
            DraftField::Steps => Some(Self::Steps),
            DraftField::Enabled | DraftField::PayoutProvider | DraftField::PricingProvider => {
                None
            }
        }
    }
}

impl std::fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::ExchangeFeePct => write!(f, "exchangeFeePct"),
            Self::FixedFee => write!(f, "fixedFee"),
            Self::MinAmount => write!(f, "minAmount"),
            Self::MaxAmount => write!(f, "maxAmount"),
            Self::Steps => write!(f, "steps"),
            Self::Step(index) => write!(f, "step-{}", index),
        }
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Broad class of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    /// Malformed or missing scalar input
    Field,
    /// First-step or payout-position problem
    SequenceShape,
    /// Location or asset precondition not met at a step
    StepTransition,
    /// Relationship between two fields
    CrossField,
}

/// A single problem in a draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Name is required")]
    NameRequired,

    #[error("{} must be a valid number", .field.label())]
    NotANumber { field: DraftField },

    #[error("Maximum amount must be greater than minimum amount")]
    MinExceedsMax,

    #[error("Pipeline must contain at least one step")]
    EmptyPipeline,

    #[error("Pipeline must start with a payout step")]
    MissingLeadingPayout,

    #[error("first step must be payout")]
    FirstStepNotPayout,

    #[error("payout can only be first")]
    PayoutNotFirst,

    #[error("funds must be in hot wallet to move to an exchange")]
    FundsNotInHotWallet,

    #[error("conversion requires funds at {venue}")]
    ConversionVenueMismatch { venue: Venue },

    #[error("conversion source asset must be {expected}")]
    ConversionAssetMismatch { expected: Currency },

    #[error("assets must be different")]
    SameAssets,

    #[error("{venue} can only convert to fiat")]
    OffRampTargetNotFiat { venue: Venue },

    #[error("{venue} must convert to {target}")]
    OffRampWrongTarget { venue: Venue, target: Currency },

    #[error("{venue} cannot convert from fiat")]
    OffRampSourceIsFiat { venue: Venue },

    #[error("transfer requires funds at {venue}")]
    TransferVenueMismatch { venue: Venue },

    #[error("venues must be different")]
    SameVenues,

    #[error("transfers can only originate from {allowed}")]
    TransferSourceNotAllowed { allowed: String },

    #[error("transfer asset must be {expected}")]
    TransferAssetMismatch { expected: Currency },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::NameRequired | Self::NotANumber { .. } => ViolationKind::Field,
            Self::MinExceedsMax => ViolationKind::CrossField,
            Self::EmptyPipeline
            | Self::MissingLeadingPayout
            | Self::FirstStepNotPayout
            | Self::PayoutNotFirst => ViolationKind::SequenceShape,
            Self::FundsNotInHotWallet
            | Self::ConversionVenueMismatch { .. }
            | Self::ConversionAssetMismatch { .. }
            | Self::SameAssets
            | Self::OffRampTargetNotFiat { .. }
            | Self::OffRampWrongTarget { .. }
            | Self::OffRampSourceIsFiat { .. }
            | Self::TransferVenueMismatch { .. }
            | Self::SameVenues
            | Self::TransferSourceNotAllowed { .. }
            | Self::TransferAssetMismatch { .. } => ViolationKind::StepTransition,
        }
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// All problems found in a draft, keyed by where they belong.
///
/// Keys are ordered fields first, then the sequence, then steps by index.
/// The first violation recorded for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<ErrorKey, Violation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation unless the key already has one
    pub fn add(&mut self, key: ErrorKey, violation: Violation) {
        self.errors.entry(key).or_insert(violation);
    }

    /// Fold another report in, keeping existing entries
    pub fn merge(&mut self, other: ValidationErrors) {
        for (key, violation) in other.errors {
            self.add(key, violation);
        }
    }

    pub fn get(&self, key: ErrorKey) -> Option<&Violation> {
        self.errors.get(&key)
    }

    /// Rendered message for a key
    pub fn message(&self, key: ErrorKey) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.errors.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &Violation)> {
        self.errors.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.errors.keys().copied()
    }

    /// Plain `key → message` map
    pub fn to_messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(ErrorKey::FixedFee.to_string(), "fixedFee");
        assert_eq!(ErrorKey::Step(3).to_string(), "step-3");
    }

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![
            ErrorKey::Step(10),
            ErrorKey::Steps,
            ErrorKey::Step(2),
            ErrorKey::Name,
            ErrorKey::MaxAmount,
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ErrorKey::Name,
                ErrorKey::MaxAmount,
                ErrorKey::Steps,
                ErrorKey::Step(2),
                ErrorKey::Step(10),
            ]
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let mut errors = ValidationErrors::new();
        errors.add(ErrorKey::Step(1), Violation::FundsNotInHotWallet);
        errors.add(ErrorKey::Step(1), Violation::SameAssets);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(ErrorKey::Step(1)),
            Some(&Violation::FundsNotInHotWallet)
        );
    }

    #[test]
    fn test_messages_and_kinds() {
        let v = Violation::NotANumber {
            field: DraftField::FixedFee,
        };
        assert_eq!(v.to_string(), "Fixed fee must be a valid number");
        assert_eq!(v.kind(), ViolationKind::Field);

        let v = Violation::ConversionVenueMismatch {
            venue: Venue::new("BINANCE"),
        };
        assert_eq!(v.to_string(), "conversion requires funds at BINANCE");
        assert_eq!(v.kind(), ViolationKind::StepTransition);

        assert_eq!(Violation::PayoutNotFirst.kind(), ViolationKind::SequenceShape);
        assert_eq!(Violation::MinExceedsMax.kind(), ViolationKind::CrossField);
    }

    #[test]
    fn test_every_step_violation_is_a_transition() {
        let transitions = [
            Violation::FundsNotInHotWallet,
            Violation::ConversionAssetMismatch {
                expected: Currency::new("USDC"),
            },
            Violation::SameAssets,
            Violation::OffRampTargetNotFiat {
                venue: Venue::new("TRANSFERO"),
            },
            Violation::OffRampWrongTarget {
                venue: Venue::new("TRANSFERO"),
                target: Currency::new("COP"),
            },
            Violation::OffRampSourceIsFiat {
                venue: Venue::new("TRANSFERO"),
            },
            Violation::TransferVenueMismatch {
                venue: Venue::new("BINANCE"),
            },
            Violation::SameVenues,
            Violation::TransferSourceNotAllowed {
                allowed: "BINANCE".into(),
            },
            Violation::TransferAssetMismatch {
                expected: Currency::new("USDC"),
            },
        ];
        for v in transitions {
            assert_eq!(v.kind(), ViolationKind::StepTransition, "{v}");
        }

        for v in [
            Violation::EmptyPipeline,
            Violation::MissingLeadingPayout,
            Violation::FirstStepNotPayout,
        ] {
            assert_eq!(v.kind(), ViolationKind::SequenceShape, "{v}");
        }
        assert_eq!(Violation::NameRequired.kind(), ViolationKind::Field);
    }

    #[test]
    fn test_serializes_as_message_map() {
        let mut errors = ValidationErrors::new();
        errors.add(ErrorKey::Name, Violation::NameRequired);
        errors.add(ErrorKey::Step(0), Violation::FirstStepNotPayout);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], "Name is required");
        assert_eq!(json["step-0"], "first step must be payout");
    }
}
