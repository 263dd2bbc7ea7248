// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Provider reference data
//!
//! Static, operator-independent tables the validator and the provider cascade
//! consult: per-provider fee and limit defaults, which currencies are fiat,
//! which venue is the fiat off-ramp, and which venues may originate a
//! transfer. Loaded from `reference.yaml` (or `.toml`) and injected; the
//! built-in table is only a fallback.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{FlowdefError, FlowdefResult};
use crate::pipeline::{Currency, PayoutProvider, PricingProvider, Venue};
use crate::utils::document;

/// Environment variable naming a reference data file
pub const REFERENCE_ENV: &str = "FLOWDEF_REFERENCE";

/// Default file name inside the user config directory
pub const REFERENCE_FILE: &str = "reference.yaml";

/// Fee and limit defaults for a payout provider.
///
/// Values are kept as the exact strings an operator would see in the form,
/// because the provider cascade compares them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDefaults {
    #[serde(default)]
    pub fixed_fee: String,
    #[serde(default)]
    pub min_amount: String,
    #[serde(default)]
    pub max_amount: String,
}

/// Fee defaults for a pricing provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDefaults {
    #[serde(default)]
    pub exchange_fee_pct: String,
}

/// Reference data consulted by validation and cascading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub payout_providers: BTreeMap<PayoutProvider, PayoutDefaults>,

    pub pricing_providers: BTreeMap<PricingProvider, PricingDefaults>,

    /// Provider preselected for freshly seeded drafts
    pub default_payout_provider: PayoutProvider,

    pub default_pricing_provider: PricingProvider,

    pub fiat_currencies: BTreeSet<Currency>,

    /// Venue that converts crypto into the corridor's fiat
    pub fiat_off_ramp_venue: Venue,

    /// Venues allowed as the source of a venue-to-venue transfer
    pub transfer_source_venues: BTreeSet<Venue>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData {
    /// Compiled-in reference table
    pub fn builtin() -> Self {
        let payout_providers = BTreeMap::from([
            (
                PayoutProvider::new("MOVII"),
                PayoutDefaults {
                    fixed_fee: "0".into(),
                    min_amount: "5000".into(),
                    max_amount: "5000000".into(),
                },
            ),
            (
                PayoutProvider::new("TRANSFERO"),
                PayoutDefaults {
                    fixed_fee: "1.5".into(),
                    min_amount: "50".into(),
                    max_amount: "50000".into(),
                },
            ),
        ]);

        let pricing_providers = BTreeMap::from([
            (
                PricingProvider::new("BINANCE"),
                PricingDefaults {
                    exchange_fee_pct: "1".into(),
                },
            ),
            (
                PricingProvider::new("TRANSFERO"),
                PricingDefaults {
                    exchange_fee_pct: "1.5".into(),
                },
            ),
        ]);

        Self {
            payout_providers,
            pricing_providers,
            default_payout_provider: PayoutProvider::new("MOVII"),
            default_pricing_provider: PricingProvider::new("BINANCE"),
            fiat_currencies: ["BRL", "COP", "EUR", "MXN", "USD"]
                .into_iter()
                .map(Currency::new)
                .collect(),
            fiat_off_ramp_venue: Venue::new("TRANSFERO"),
            transfer_source_venues: BTreeSet::from([Venue::new("BINANCE")]),
        }
    }

    /// Load and check reference data from a YAML or TOML file
    pub fn load(path: &Path) -> FlowdefResult<Self> {
        let data: Self = document::load(path)?;
        data.check()?;
        tracing::debug!(path = %path.display(), "loaded reference data");
        Ok(data)
    }

    /// Locate reference data: an explicit path, then `$FLOWDEF_REFERENCE`,
    /// then the user config directory, then the built-in table.
    pub fn discover(explicit: Option<&Path>) -> FlowdefResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(REFERENCE_ENV).map(PathBuf::from) {
            return Self::load(&path);
        }

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            return Self::load(&path);
        }

        tracing::warn!("no reference data file found, using built-in provider defaults");
        Ok(Self::builtin())
    }

    /// `reference.yaml` inside the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "flowdef", "flowdef")
            .map(|dirs| dirs.config_dir().join(REFERENCE_FILE))
    }

    /// Verify internal consistency
    pub fn check(&self) -> FlowdefResult<()> {
        if !self
            .payout_providers
            .contains_key(&self.default_payout_provider)
        {
            return Err(FlowdefError::invalid_reference(
                format!(
                    "default payout provider '{}' has no defaults",
                    self.default_payout_provider
                ),
                "Add it under payoutProviders or pick another defaultPayoutProvider",
            ));
        }

        if !self
            .pricing_providers
            .contains_key(&self.default_pricing_provider)
        {
            return Err(FlowdefError::invalid_reference(
                format!(
                    "default pricing provider '{}' has no defaults",
                    self.default_pricing_provider
                ),
                "Add it under pricingProviders or pick another defaultPricingProvider",
            ));
        }

        if self.transfer_source_venues.is_empty() {
            return Err(FlowdefError::invalid_reference(
                "transferSourceVenues is empty",
                "List at least one venue that may originate transfers",
            ));
        }

        let code = code_pattern()?;
        let codes = self
            .fiat_currencies
            .iter()
            .map(Currency::as_str)
            .chain(self.transfer_source_venues.iter().map(Venue::as_str))
            .chain(std::iter::once(self.fiat_off_ramp_venue.as_str()))
            .chain(self.payout_providers.keys().map(PayoutProvider::as_str))
            .chain(self.pricing_providers.keys().map(PricingProvider::as_str));

        for value in codes {
            if !code.is_match(value) {
                return Err(FlowdefError::invalid_reference(
                    format!("'{}' is not a valid code", value),
                    "Codes are 2-16 characters of A-Z, 0-9 and '_'",
                ));
            }
        }

        Ok(())
    }

    pub fn payout_defaults(&self, provider: &PayoutProvider) -> Option<&PayoutDefaults> {
        self.payout_providers.get(provider)
    }

    pub fn pricing_defaults(&self, provider: &PricingProvider) -> Option<&PricingDefaults> {
        self.pricing_providers.get(provider)
    }

    pub fn is_fiat(&self, currency: &Currency) -> bool {
        self.fiat_currencies.contains(currency)
    }

    pub fn is_fiat_off_ramp(&self, venue: &Venue) -> bool {
        &self.fiat_off_ramp_venue == venue
    }

    pub fn may_originate_transfer(&self, venue: &Venue) -> bool {
        self.transfer_source_venues.contains(venue)
    }

    /// Allow-list rendered for messages
    pub fn transfer_sources_display(&self) -> String {
        self.transfer_source_venues
            .iter()
            .map(Venue::as_str)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

fn code_pattern() -> FlowdefResult<Regex> {
    Regex::new(r"^[A-Z0-9_]{2,16}$").map_err(|e| FlowdefError::InvalidReference {
        reason: format!("code pattern failed to compile: {}", e),
        help: None,
    })
}
