// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Error types
//!
//! Operator mistakes in a draft are not errors at this level: they are
//! collected into [`ValidationErrors`](crate::pipeline::ValidationErrors) and
//! returned as data. `FlowdefError` covers everything else: unreadable files,
//! malformed documents, bad reference data, and misuse of the library.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::ValidationErrors;

/// Result type for flowdef operations
pub type FlowdefResult<T> = Result<T, FlowdefError>;

/// Main error type for flowdef
#[derive(Error, Debug, Diagnostic)]
pub enum FlowdefError {
    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Draft file not found: {path}")]
    #[diagnostic(
        code(flowdef::draft_not_found),
        help("Create a draft with 'flowdef seed --crypto <C> --chain <B> --target <T>'")
    )]
    DraftNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(flowdef::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(flowdef::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Draft Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Field '{field}' holds '{value}', which is not a number")]
    #[diagnostic(
        code(flowdef::invalid_number),
        help("Run field validation before normalizing a draft")
    )]
    InvalidNumber { field: String, value: String },

    #[error("Invalid edit: {reason}")]
    #[diagnostic(code(flowdef::invalid_edit))]
    InvalidEdit { reason: String },

    #[error("Pipeline definition is invalid ({} problem(s))", errors.len())]
    #[diagnostic(
        code(flowdef::validation_failed),
        help("Fix the reported fields and steps, then validate again")
    )]
    ValidationFailed { errors: ValidationErrors },

    // ─────────────────────────────────────────────────────────────────────────
    // Reference Data Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid reference data: {reason}")]
    #[diagnostic(code(flowdef::invalid_reference))]
    InvalidReference {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Corridor Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Corridor {corridor} is not supported")]
    #[diagnostic(
        code(flowdef::unsupported_corridor),
        help("Flow definitions can only be authored for supported corridors")
    )]
    UnsupportedCorridor { corridor: String },

    #[error("Corridor {corridor} is not registered")]
    #[diagnostic(
        code(flowdef::unknown_corridor),
        help("List registered corridors with 'flowdef corridors --registry <FILE>'")
    )]
    UnknownCorridor { corridor: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(flowdef::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(flowdef::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(flowdef::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(flowdef::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for FlowdefError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for FlowdefError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for FlowdefError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for FlowdefError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl FlowdefError {
    /// Create an invalid reference error with a fix-it hint
    pub fn invalid_reference(reason: impl Into<String>, help: &str) -> Self {
        Self::InvalidReference {
            reason: reason.into(),
            help: Some(help.to_string()),
        }
    }

    /// Create a file read error for `path`
    pub fn read_failed(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileReadError {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_number_message() {
        let err = FlowdefError::InvalidNumber {
            field: "fixedFee".into(),
            value: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "Field 'fixedFee' holds 'abc', which is not a number"
        );
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("[not a number").unwrap_err();
        let err: FlowdefError = yaml_err.into();
        assert!(matches!(err, FlowdefError::Yaml { .. }));
    }
}
