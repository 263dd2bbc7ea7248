// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Field validation
//!
//! Order-independent checks on the scalar fields of a draft.

use super::definition::{DraftField, PipelineDraft};
use super::normalize::{parse_number, Parsed};
use super::report::{ErrorKey, ValidationErrors, Violation};

const NUMERIC_FIELDS: [DraftField; 4] = [
    DraftField::ExchangeFeePct,
    DraftField::FixedFee,
    DraftField::MinAmount,
    DraftField::MaxAmount,
];

/// Field validator
pub struct FieldValidator;

impl FieldValidator {
    /// Validate the scalar fields of a draft
    pub fn validate(draft: &PipelineDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if draft.name.trim().is_empty() {
            errors.add(ErrorKey::Name, Violation::NameRequired);
        }

        for field in NUMERIC_FIELDS {
            let raw = draft.numeric_field(field).unwrap_or_default();
            if parse_number(raw) == Parsed::Invalid {
                if let Some(key) = ErrorKey::for_field(field) {
                    errors.add(key, Violation::NotANumber { field });
                }
            }
        }

        if let (Parsed::Number(min), Parsed::Number(max)) = (
            parse_number(&draft.min_amount),
            parse_number(&draft.max_amount),
        ) {
            if min > max {
                errors.add(ErrorKey::MaxAmount, Violation::MinExceedsMax);
            }
        }

        errors
    }
}
