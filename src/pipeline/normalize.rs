// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Draft normalization
//!
//! Turns the string-typed form values of a draft into the numeric payload
//! persistence expects.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::definition::{DraftField, PipelineDefinition, PipelineDraft};
use crate::errors::{FlowdefError, FlowdefResult};

/// Outcome of reading one numeric form value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// Empty or whitespace only
    Blank,
    Number(Decimal),
    Invalid,
}

/// Read a numeric form value. Plain decimals and scientific notation are
/// accepted; surrounding whitespace is ignored. Digit separators (`1_000`)
/// are not.
pub fn parse_number(raw: &str) -> Parsed {
    let value = raw.trim();
    if value.is_empty() {
        return Parsed::Blank;
    }
    if value.contains('_') {
        return Parsed::Invalid;
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Parsed::Number)
        .unwrap_or(Parsed::Invalid)
}

/// Converts drafts into persistable definitions
pub struct DraftNormalizer;

impl DraftNormalizer {
    /// Build the normalized definition.
    ///
    /// Only call this on drafts whose fields passed validation; an
    /// unparsable value is reported as [`FlowdefError::InvalidNumber`]
    /// instead of being coerced.
    pub fn normalize(draft: &PipelineDraft) -> FlowdefResult<PipelineDefinition> {
        Ok(PipelineDefinition {
            id: draft.id.clone(),
            corridor: draft.corridor.clone(),
            name: draft.name.trim().to_string(),
            enabled: draft.enabled,
            payout_provider: draft.payout_provider.clone(),
            pricing_provider: draft.pricing_provider.clone(),
            exchange_fee_pct: Self::fee(draft, DraftField::ExchangeFeePct)?,
            fixed_fee: Self::fee(draft, DraftField::FixedFee)?,
            min_amount: Self::optional(draft, DraftField::MinAmount)?,
            max_amount: Self::optional(draft, DraftField::MaxAmount)?,
            steps: draft.steps.clone(),
        })
    }

    /// Fee fields fall back to zero when blank
    fn fee(draft: &PipelineDraft, field: DraftField) -> FlowdefResult<Decimal> {
        Ok(Self::optional(draft, field)?.unwrap_or(Decimal::ZERO))
    }

    /// Bounds stay absent when blank
    fn optional(draft: &PipelineDraft, field: DraftField) -> FlowdefResult<Option<Decimal>> {
        let raw = draft.numeric_field(field).unwrap_or_default();
        match parse_number(raw) {
            Parsed::Blank => Ok(None),
            Parsed::Number(n) => Ok(Some(n)),
            Parsed::Invalid => Err(FlowdefError::InvalidNumber {
                field: field.key().to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Corridor;
    use crate::reference::ReferenceData;
    use rust_decimal_macros::dec;

    fn draft() -> PipelineDraft {
        PipelineDraft::seed(
            Corridor::new("USDC", "STELLAR", "COP"),
            &ReferenceData::builtin(),
        )
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(""), Parsed::Blank);
        assert_eq!(parse_number("   "), Parsed::Blank);
        assert_eq!(parse_number(" 5000 "), Parsed::Number(dec!(5000)));
        assert_eq!(parse_number("-1.25"), Parsed::Number(dec!(-1.25)));
        assert_eq!(parse_number("1e3"), Parsed::Number(dec!(1000)));
        assert_eq!(parse_number("abc"), Parsed::Invalid);
        assert_eq!(parse_number("NaN"), Parsed::Invalid);
        assert_eq!(parse_number("inf"), Parsed::Invalid);
    }

    #[test]
    fn test_digit_separators_are_invalid() {
        assert_eq!(parse_number("1_000"), Parsed::Invalid);
        assert_eq!(parse_number("1_0"), Parsed::Invalid);

        let mut d = draft();
        d.min_amount = "1_0".into();
        assert!(matches!(
            DraftNormalizer::normalize(&d),
            Err(FlowdefError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let mut d = draft();
        d.exchange_fee_pct = "".into();
        d.fixed_fee = "  ".into();
        d.min_amount = "".into();
        d.max_amount = "".into();

        let def = DraftNormalizer::normalize(&d).unwrap();
        assert_eq!(def.exchange_fee_pct, Decimal::ZERO);
        assert_eq!(def.fixed_fee, Decimal::ZERO);
        assert_eq!(def.min_amount, None);
        assert_eq!(def.max_amount, None);
    }

    #[test]
    fn test_numbers_are_parsed() {
        let mut d = draft();
        d.name = "  COP payouts ".into();
        d.fixed_fee = "2.50".into();
        d.min_amount = "5000".into();
        d.max_amount = "5000000".into();

        let def = DraftNormalizer::normalize(&d).unwrap();
        assert_eq!(def.name, "COP payouts");
        assert_eq!(def.fixed_fee, dec!(2.50));
        assert_eq!(def.min_amount, Some(dec!(5000)));
        assert_eq!(def.max_amount, Some(dec!(5000000)));
    }

    #[test]
    fn test_invalid_number_fails_loudly() {
        let mut d = draft();
        d.fixed_fee = "ten".into();

        let err = DraftNormalizer::normalize(&d).unwrap_err();
        match err {
            FlowdefError::InvalidNumber { field, value } => {
                assert_eq!(field, "fixedFee");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
