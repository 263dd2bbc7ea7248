// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Flow definitions and their validation
//!
//! This module defines the step model, the editable draft and the persisted
//! definition, together with the validators, the normalizer, the provider
//! default cascade and draft change tracking.

mod cascade;
mod definition;
mod diff;
mod fields;
mod normalize;
mod report;
mod validation;

pub use cascade::{cascade_preserving, cascade_provider_defaults, ProviderChange};
pub use definition::*;
pub use diff::{changed_fields, is_dirty, DraftDiff};
pub use fields::FieldValidator;
pub use normalize::{parse_number, DraftNormalizer, Parsed};
pub use report::{ErrorKey, ValidationErrors, Violation, ViolationKind};
pub use validation::{
    ExecutionState, PipelineValidator, StepSequenceValidator, StepWalk, ValidationResult,
};
