// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Utility modules
//!
//! Common utilities for the flowdef CLI and library.

pub mod colors;
pub mod document;

pub use colors::*;
