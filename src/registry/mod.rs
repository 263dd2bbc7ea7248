// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Corridor registry
//!
//! The registry says which corridors exist, whether each is supported, and
//! what definition (if any) is currently active for it. In production it is
//! backed by the orchestration backend; flowdef only consumes it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{FlowdefError, FlowdefResult};
use crate::pipeline::{Corridor, PipelineDefinition};
use crate::utils::document;

/// What the registry knows about one corridor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorEntry {
    #[serde(flatten)]
    pub corridor: Corridor,

    #[serde(default = "default_true")]
    pub supported: bool,

    /// Active definition snapshot
    #[serde(default)]
    pub definition: Option<PipelineDefinition>,
}

fn default_true() -> bool {
    true
}

impl CorridorEntry {
    pub fn new(corridor: Corridor) -> Self {
        Self {
            corridor,
            supported: true,
            definition: None,
        }
    }

    pub fn has_definition(&self) -> bool {
        self.definition.is_some()
    }
}

/// Source of corridor entries
#[async_trait]
pub trait CorridorRegistry: Send + Sync {
    /// Entry for one corridor
    async fn entry(&self, corridor: &Corridor) -> FlowdefResult<Option<CorridorEntry>>;

    /// All known corridors
    async fn entries(&self) -> FlowdefResult<Vec<CorridorEntry>>;

    /// Entry for one corridor, failing if it is not registered
    async fn require(&self, corridor: &Corridor) -> FlowdefResult<CorridorEntry> {
        self.entry(corridor)
            .await?
            .ok_or_else(|| FlowdefError::UnknownCorridor {
                corridor: corridor.to_string(),
            })
    }
}

/// Registry held in memory, optionally seeded from a file.
///
/// Uses `Arc<RwLock<HashMap<..>>>` so clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorridorRegistry {
    entries: Arc<RwLock<HashMap<Corridor, CorridorEntry>>>,
}

impl InMemoryCorridorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = CorridorEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|entry| (entry.corridor.clone(), entry))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a YAML or JSON list of corridor entries
    pub fn from_file(path: &Path) -> FlowdefResult<Self> {
        let entries: Vec<CorridorEntry> = document::load(path)?;
        tracing::debug!(path = %path.display(), corridors = entries.len(), "loaded corridor registry");
        Ok(Self::with_entries(entries))
    }

    /// Insert or replace an entry
    pub async fn upsert(&self, entry: CorridorEntry) {
        let mut entries = self.entries.write().await;
        entries.insert(entry.corridor.clone(), entry);
    }

    /// Record a server-confirmed definition as the corridor's active one
    pub async fn record_definition(&self, definition: PipelineDefinition) {
        let corridor = definition.corridor.clone();
        let mut entries = self.entries.write().await;
        entries
            .entry(corridor.clone())
            .or_insert_with(|| CorridorEntry::new(corridor))
            .definition = Some(definition);
    }
}

#[async_trait]
impl CorridorRegistry for InMemoryCorridorRegistry {
    async fn entry(&self, corridor: &Corridor) -> FlowdefResult<Option<CorridorEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(corridor).cloned())
    }

    async fn entries(&self) -> FlowdefResult<Vec<CorridorEntry>> {
        let entries = self.entries.read().await;
        let mut all: Vec<CorridorEntry> = entries.values().cloned().collect();
        all.sort_by_key(|e| e.corridor.to_string());
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Step;
    use rust_decimal::Decimal;
    use std::io::Write;

    fn cop() -> Corridor {
        Corridor::new("USDC", "STELLAR", "COP")
    }

    #[tokio::test]
    async fn test_lookup() {
        let registry = InMemoryCorridorRegistry::with_entries([CorridorEntry::new(cop())]);

        let entry = registry.entry(&cop()).await.unwrap().unwrap();
        assert!(entry.supported);
        assert!(!entry.has_definition());

        let missing = Corridor::new("USDC", "STELLAR", "BRL");
        assert!(registry.entry(&missing).await.unwrap().is_none());
        assert!(matches!(
            registry.require(&missing).await,
            Err(FlowdefError::UnknownCorridor { .. })
        ));
    }

    #[tokio::test]
    async fn test_record_definition() {
        let registry = InMemoryCorridorRegistry::new();
        let definition = PipelineDefinition {
            id: Some("def-1".into()),
            corridor: cop(),
            name: "COP".into(),
            enabled: true,
            payout_provider: "MOVII".into(),
            pricing_provider: "BINANCE".into(),
            exchange_fee_pct: Decimal::ONE,
            fixed_fee: Decimal::ZERO,
            min_amount: None,
            max_amount: None,
            steps: vec![Step::Payout],
        };

        registry.record_definition(definition.clone()).await;

        let entry = registry.require(&cop()).await.unwrap();
        assert_eq!(entry.definition, Some(definition));
        assert_eq!(registry.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
- cryptoCurrency: USDC
  blockchain: STELLAR
  targetCurrency: COP
  definition:
    id: def-7
    cryptoCurrency: USDC
    blockchain: STELLAR
    targetCurrency: COP
    name: COP payouts
    enabled: true
    payoutProvider: MOVII
    pricingProvider: BINANCE
    exchangeFeePct: 1
    fixedFee: 0
    minAmount: 5000
    maxAmount: null
    steps:
      - type: PAYOUT
- cryptoCurrency: USDC
  blockchain: STELLAR
  targetCurrency: ARS
  supported: false
"#
        )
        .unwrap();

        let registry = InMemoryCorridorRegistry::from_file(file.path()).unwrap();
        let entries = registry.entries().await.unwrap();
        assert_eq!(entries.len(), 2);

        let cop_entry = registry.require(&cop()).await.unwrap();
        let definition = cop_entry.definition.unwrap();
        assert_eq!(definition.id.as_deref(), Some("def-7"));
        assert_eq!(definition.min_amount, Some(Decimal::from(5000)));
        assert_eq!(definition.max_amount, None);

        let ars = registry
            .require(&Corridor::new("USDC", "STELLAR", "ARS"))
            .await
            .unwrap();
        assert!(!ars.supported);
    }
}
