// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Flow definition structures
//!
//! Defines the step model, the string-typed editing draft, and the normalized
//! definition that is handed to persistence.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::errors::FlowdefResult;
use crate::reference::ReferenceData;
use crate::utils::document;

macro_rules! code_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(code: impl AsRef<str>) -> Self {
                Self(code.as_ref().trim().to_uppercase())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self::new(code)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self::new(code)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> Self {
                code.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

code_newtype!(
    /// Asset code, crypto (`USDC`) or fiat (`COP`)
    Currency
);
code_newtype!(
    /// Execution venue where funds can be converted or transferred
    Venue
);
code_newtype!(
    /// Provider that delivers the fiat payout
    PayoutProvider
);
code_newtype!(
    /// Provider that quotes the exchange rate
    PricingProvider
);

/// One supported payment route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corridor {
    pub crypto_currency: Currency,
    #[serde(deserialize_with = "uppercase")]
    pub blockchain: String,
    pub target_currency: Currency,
}

impl Corridor {
    pub fn new(
        crypto_currency: impl Into<Currency>,
        blockchain: &str,
        target_currency: impl Into<Currency>,
    ) -> Self {
        Self {
            crypto_currency: crypto_currency.into(),
            blockchain: blockchain.trim().to_uppercase(),
            target_currency: target_currency.into(),
        }
    }
}

fn uppercase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_uppercase())
}

impl std::fmt::Display for Corridor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {} → {}",
            self.crypto_currency, self.blockchain, self.target_currency
        )
    }
}

/// A single business step of a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Step {
    /// Payout intent; always the first step
    Payout,

    /// Move funds from the hot wallet into a venue
    MoveToExchange { venue: Venue },

    /// Exchange one asset for another at a venue
    Convert {
        venue: Venue,
        from_asset: Currency,
        to_asset: Currency,
    },

    /// Move funds between two venues
    TransferVenue {
        from_venue: Venue,
        to_venue: Venue,
        asset: Currency,
    },
}

impl Step {
    pub fn move_to_exchange(venue: impl Into<Venue>) -> Self {
        Self::MoveToExchange {
            venue: venue.into(),
        }
    }

    pub fn convert(
        venue: impl Into<Venue>,
        from_asset: impl Into<Currency>,
        to_asset: impl Into<Currency>,
    ) -> Self {
        Self::Convert {
            venue: venue.into(),
            from_asset: from_asset.into(),
            to_asset: to_asset.into(),
        }
    }

    pub fn transfer(
        from_venue: impl Into<Venue>,
        to_venue: impl Into<Venue>,
        asset: impl Into<Currency>,
    ) -> Self {
        Self::TransferVenue {
            from_venue: from_venue.into(),
            to_venue: to_venue.into(),
            asset: asset.into(),
        }
    }

    /// Wire tag of this step
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Payout => "PAYOUT",
            Self::MoveToExchange { .. } => "MOVE_TO_EXCHANGE",
            Self::Convert { .. } => "CONVERT",
            Self::TransferVenue { .. } => "TRANSFER_VENUE",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payout => write!(f, "payout"),
            Self::MoveToExchange { venue } => write!(f, "move to {}", venue),
            Self::Convert {
                venue,
                from_asset,
                to_asset,
            } => write!(f, "convert {} → {} at {}", from_asset, to_asset, venue),
            Self::TransferVenue {
                from_venue,
                to_venue,
                asset,
            } => write!(f, "transfer {} {} → {}", asset, from_venue, to_venue),
        }
    }
}

/// Where funds currently sit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    HotWallet,
    Venue(Venue),
}

impl Location {
    pub fn is_at(&self, venue: &Venue) -> bool {
        matches!(self, Self::Venue(v) if v == venue)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HotWallet => write!(f, "hot wallet"),
            Self::Venue(v) => write!(f, "{}", v),
        }
    }
}

/// Editable scalar fields of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Name,
    Enabled,
    PayoutProvider,
    PricingProvider,
    ExchangeFeePct,
    FixedFee,
    MinAmount,
    MaxAmount,
    Steps,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        Self::Name,
        Self::Enabled,
        Self::PayoutProvider,
        Self::PricingProvider,
        Self::ExchangeFeePct,
        Self::FixedFee,
        Self::MinAmount,
        Self::MaxAmount,
        Self::Steps,
    ];

    /// Key used in documents and error maps
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Enabled => "enabled",
            Self::PayoutProvider => "payoutProvider",
            Self::PricingProvider => "pricingProvider",
            Self::ExchangeFeePct => "exchangeFeePct",
            Self::FixedFee => "fixedFee",
            Self::MinAmount => "minAmount",
            Self::MaxAmount => "maxAmount",
            Self::Steps => "steps",
        }
    }

    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Enabled => "Enabled",
            Self::PayoutProvider => "Payout provider",
            Self::PricingProvider => "Pricing provider",
            Self::ExchangeFeePct => "Exchange fee",
            Self::FixedFee => "Fixed fee",
            Self::MinAmount => "Minimum amount",
            Self::MaxAmount => "Maximum amount",
            Self::Steps => "Steps",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The in-progress, string-typed form of a flow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDraft {
    /// Identifier of the persisted definition being edited, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub corridor: Corridor,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub enabled: bool,

    pub payout_provider: PayoutProvider,

    pub pricing_provider: PricingProvider,

    /// Exchange fee percentage
    #[serde(default, deserialize_with = "lenient_string")]
    pub exchange_fee_pct: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub fixed_fee: String,

    /// Lower payout bound in the corridor's target currency
    #[serde(default, deserialize_with = "lenient_string")]
    pub min_amount: String,

    /// Upper payout bound in the corridor's target currency
    #[serde(default, deserialize_with = "lenient_string")]
    pub max_amount: String,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Accept numbers where a form field is expected, so hand-written files can
/// use `minAmount: 5000` as well as `minAmount: "5000"`.
///
/// An unquoted number is re-rendered, not kept as written: `fixedFee: 1.50`
/// loads as `"1.5"`. Provider defaults are compared verbatim, so quote a
/// value whenever its exact spelling matters.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        None => String::new(),
        Some(Lenient::Text(s)) => s,
        Some(Lenient::Int(n)) => n.to_string(),
        Some(Lenient::UInt(n)) => n.to_string(),
        Some(Lenient::Float(n)) => n.to_string(),
    })
}

impl PipelineDraft {
    /// Fresh draft for a corridor with no definition yet
    pub fn seed(corridor: Corridor, reference: &ReferenceData) -> Self {
        let payout_provider = reference.default_payout_provider.clone();
        let pricing_provider = reference.default_pricing_provider.clone();
        let payout = reference.payout_defaults(&payout_provider).cloned().unwrap_or_default();
        let pricing = reference
            .pricing_defaults(&pricing_provider)
            .cloned()
            .unwrap_or_default();

        Self {
            id: None,
            name: format!(
                "{} {} → {}",
                corridor.crypto_currency, corridor.blockchain, corridor.target_currency
            ),
            corridor,
            enabled: false,
            payout_provider,
            pricing_provider,
            exchange_fee_pct: pricing.exchange_fee_pct,
            fixed_fee: payout.fixed_fee,
            min_amount: payout.min_amount,
            max_amount: payout.max_amount,
            steps: vec![Step::Payout],
        }
    }

    /// Current string value of a numeric field
    pub fn numeric_field(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::ExchangeFeePct => Some(&self.exchange_fee_pct),
            DraftField::FixedFee => Some(&self.fixed_fee),
            DraftField::MinAmount => Some(&self.min_amount),
            DraftField::MaxAmount => Some(&self.max_amount),
            _ => None,
        }
    }

    pub(crate) fn numeric_field_mut(&mut self, field: DraftField) -> Option<&mut String> {
        match field {
            DraftField::ExchangeFeePct => Some(&mut self.exchange_fee_pct),
            DraftField::FixedFee => Some(&mut self.fixed_fee),
            DraftField::MinAmount => Some(&mut self.min_amount),
            DraftField::MaxAmount => Some(&mut self.max_amount),
            _ => None,
        }
    }

    /// Load a draft from a YAML or JSON file
    pub fn from_file(path: &Path) -> FlowdefResult<Self> {
        document::load(path)
    }

    /// Parse a draft from a YAML string
    pub fn from_yaml(yaml: &str) -> FlowdefResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize the draft to YAML
    pub fn to_yaml(&self) -> FlowdefResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }
}

impl From<&PipelineDefinition> for PipelineDraft {
    fn from(definition: &PipelineDefinition) -> Self {
        fn render(value: Option<Decimal>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            id: definition.id.clone(),
            corridor: definition.corridor.clone(),
            name: definition.name.clone(),
            enabled: definition.enabled,
            payout_provider: definition.payout_provider.clone(),
            pricing_provider: definition.pricing_provider.clone(),
            exchange_fee_pct: definition.exchange_fee_pct.to_string(),
            fixed_fee: definition.fixed_fee.to_string(),
            min_amount: render(definition.min_amount),
            max_amount: render(definition.max_amount),
            steps: definition.steps.clone(),
        }
    }
}

/// A validated, persistable flow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub corridor: Corridor,

    pub name: String,

    pub enabled: bool,

    pub payout_provider: PayoutProvider,

    pub pricing_provider: PricingProvider,

    #[serde(with = "number")]
    pub exchange_fee_pct: Decimal,

    #[serde(with = "number")]
    pub fixed_fee: Decimal,

    #[serde(default, with = "number::option")]
    pub min_amount: Option<Decimal>,

    #[serde(default, with = "number::option")]
    pub max_amount: Option<Decimal>,

    pub steps: Vec<Step>,
}

/// Decimals travel as JSON/YAML numbers when a number carries them exactly:
/// integers when whole and within `i64`, floats when the shortest `f64`
/// rendering reads back as the same decimal. Anything more precise is
/// written as decimal text. Both numbers and numeric strings are accepted
/// on input; send text when every digit matters, since a float literal is
/// read through `f64`.
mod number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Raw {
        Int(i64),
        UInt(u64),
        Float(f64),
        Text(String),
    }

    impl Raw {
        pub(super) fn into_decimal(self) -> Result<Decimal, String> {
            match self {
                Raw::Int(n) => Ok(Decimal::from(n)),
                Raw::UInt(n) => Ok(Decimal::from(n)),
                // f64 Display is the shortest round-trip form, so 0.1 stays 0.1
                Raw::Float(n) => Decimal::from_str(&n.to_string()).map_err(|e| e.to_string()),
                Raw::Text(s) => Decimal::from_str(s.trim()).map_err(|e| e.to_string()),
            }
        }
    }

    /// `f` reads back as exactly `value`
    fn is_exact(f: f64, value: &Decimal) -> bool {
        f.is_finite() && Decimal::from_str(&f.to_string()).is_ok_and(|d| d == *value)
    }

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let value = value.normalize();

        if value.scale() == 0 {
            if let Some(n) = value.to_i64() {
                return serializer.serialize_i64(n);
            }
        } else if let Some(f) = value.to_f64().filter(|f| is_exact(*f, &value)) {
            return serializer.serialize_f64(f);
        }

        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        Raw::deserialize(deserializer)?
            .into_decimal()
            .map_err(D::Error::custom)
    }

    pub mod option {
        use super::Raw;
        use rust_decimal::Decimal;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<Raw>::deserialize(deserializer)?
                .map(|raw| raw.into_decimal().map_err(D::Error::custom))
                .transpose()
        }
    }
}

impl PipelineDefinition {
    /// Serialize to the JSON payload accepted by persistence
    pub fn to_json(&self) -> FlowdefResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_draft_yaml() {
        let yaml = r#"
cryptoCurrency: usdc
blockchain: stellar
targetCurrency: COP
name: "USDC to COP"
enabled: true
payoutProvider: MOVII
pricingProvider: BINANCE
exchangeFeePct: "1.5"
fixedFee: 0
minAmount: 5000
maxAmount: ""
steps:
  - type: PAYOUT
  - type: MOVE_TO_EXCHANGE
    venue: BINANCE
  - type: CONVERT
    venue: BINANCE
    fromAsset: USDC
    toAsset: COP
"#;

        let draft = PipelineDraft::from_yaml(yaml).unwrap();
        assert_eq!(draft.corridor, Corridor::new("USDC", "STELLAR", "COP"));
        assert_eq!(draft.fixed_fee, "0");
        assert_eq!(draft.min_amount, "5000");
        assert_eq!(draft.max_amount, "");
        assert_eq!(draft.steps.len(), 3);
        assert_eq!(draft.steps[2], Step::convert("BINANCE", "USDC", "COP"));
    }

    #[test]
    fn test_unknown_step_tag_is_rejected() {
        let yaml = r#"
cryptoCurrency: USDC
blockchain: STELLAR
targetCurrency: COP
payoutProvider: MOVII
pricingProvider: BINANCE
steps:
  - type: PAYOUT
  - type: TELEPORT
"#;
        assert!(PipelineDraft::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_step_wire_format() {
        let step = Step::transfer("BINANCE", "KRAKEN", "USDC");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "TRANSFER_VENUE");
        assert_eq!(json["fromVenue"], "BINANCE");
        assert_eq!(json["toVenue"], "KRAKEN");
        assert_eq!(step.kind(), "TRANSFER_VENUE");
    }

    #[test]
    fn test_definition_serializes_numbers_and_nulls() {
        let definition = PipelineDefinition {
            id: None,
            corridor: Corridor::new("USDC", "STELLAR", "COP"),
            name: "test".into(),
            enabled: true,
            payout_provider: "MOVII".into(),
            pricing_provider: "BINANCE".into(),
            exchange_fee_pct: dec!(1.5),
            fixed_fee: dec!(0),
            min_amount: Some(dec!(5000)),
            max_amount: None,
            steps: vec![Step::Payout],
        };

        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["minAmount"], serde_json::json!(5000));
        assert_eq!(json["exchangeFeePct"], serde_json::json!(1.5));
        assert!(json["maxAmount"].is_null());
        assert_eq!(json["targetCurrency"], "COP");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_precise_amounts_survive_serialization() {
        let mut draft = PipelineDraft::seed(
            Corridor::new("USDC", "STELLAR", "COP"),
            &ReferenceData::builtin(),
        );
        draft.exchange_fee_pct = "0.12345678901234567891".into();
        draft.fixed_fee = "0.1".into();
        draft.max_amount = "12345678901234567891".into();

        let definition = crate::pipeline::DraftNormalizer::normalize(&draft).unwrap();
        assert_eq!(definition.exchange_fee_pct, dec!(0.12345678901234567891));
        assert_eq!(definition.max_amount, Some(dec!(12345678901234567891)));

        let wire = definition.to_json().unwrap();
        let json: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(json["exchangeFeePct"], "0.12345678901234567891");
        assert_eq!(json["maxAmount"], "12345678901234567891");
        assert_eq!(json["fixedFee"], serde_json::json!(0.1));
        assert_eq!(json["minAmount"], serde_json::json!(5000));

        let back: PipelineDefinition = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, definition);

        let yaml = serde_yaml::to_string(&definition).unwrap();
        let back: PipelineDefinition = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, definition);
    }

    #[test]
    fn test_unquoted_numbers_are_rerendered() {
        let yaml = r#"
cryptoCurrency: USDC
blockchain: STELLAR
targetCurrency: COP
payoutProvider: TRANSFERO
pricingProvider: BINANCE
fixedFee: 1.50
minAmount: "1.50"
maxAmount: 18446744073709551615
"#;
        let draft = PipelineDraft::from_yaml(yaml).unwrap();
        assert_eq!(draft.fixed_fee, "1.5");
        assert_eq!(draft.min_amount, "1.50");
        assert_eq!(draft.max_amount, "18446744073709551615");
    }

    #[test]
    fn test_draft_from_definition() {
        let definition = PipelineDefinition {
            id: Some("def-1".into()),
            corridor: Corridor::new("USDC", "STELLAR", "COP"),
            name: "test".into(),
            enabled: false,
            payout_provider: "MOVII".into(),
            pricing_provider: "BINANCE".into(),
            exchange_fee_pct: dec!(1.5),
            fixed_fee: dec!(0),
            min_amount: Some(dec!(5000)),
            max_amount: None,
            steps: vec![Step::Payout],
        };

        let draft = PipelineDraft::from(&definition);
        assert_eq!(draft.id.as_deref(), Some("def-1"));
        assert_eq!(draft.exchange_fee_pct, "1.5");
        assert_eq!(draft.min_amount, "5000");
        assert_eq!(draft.max_amount, "");
    }

    #[test]
    fn test_codes_are_uppercased() {
        assert_eq!(Currency::new(" usdc ").as_str(), "USDC");
        let venue: Venue = serde_json::from_str("\"binance\"").unwrap();
        assert_eq!(venue, Venue::new("BINANCE"));
    }
}
