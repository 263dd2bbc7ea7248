// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! # flowdef - Payment Flow Definitions
//!
//! `flowdef` checks the step pipelines that move funds from an incoming
//! crypto deposit to a fiat payout before they are saved.
//!
//! ## Features
//!
//! - **Step validation** - Walks the pipeline tracking where funds sit and in
//!   which asset, and reports every misplaced step
//! - **Field validation** - Names, fees and payout limits
//! - **Provider defaults** - Switching provider re-derives untouched fees
//! - **Change tracking** - Knows when a draft has unsaved edits
//!
//! ## Quick Start
//!
//! ```bash
//! # Start a draft for a corridor
//! flowdef seed --crypto USDC --chain STELLAR --target COP -o cop.yaml
//!
//! # Check it
//! flowdef validate cop.yaml
//!
//! # Use another payout provider
//! flowdef switch-provider cop.yaml --payout TRANSFERO --in-place
//! ```

pub mod cli;
pub mod errors;
pub mod pipeline;
pub mod reference;
pub mod registry;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use errors::{FlowdefError, FlowdefResult};
pub use pipeline::{
    Corridor, PipelineDefinition, PipelineDraft, PipelineValidator, Step, ValidationErrors,
    ValidationResult,
};
pub use reference::ReferenceData;
pub use registry::{CorridorEntry, CorridorRegistry, InMemoryCorridorRegistry};
pub use session::{EditingSession, SavePlan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
