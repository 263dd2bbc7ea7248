// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowdef contributors

//! Document loading
//!
//! Drafts, registries and reference tables can be written as YAML, JSON or
//! TOML. The format is picked from the file extension; anything unknown is
//! read as YAML, which also accepts JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::errors::{FlowdefError, FlowdefResult};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Read and parse a document
pub fn load<T: DeserializeOwned>(path: &Path) -> FlowdefResult<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| FlowdefError::read_failed(path, e))?;

    parse(&content, DocumentFormat::from_path(path))
}

/// Parse document text in the given format
pub fn parse<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> FlowdefResult<T> {
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(Into::into),
        DocumentFormat::Json => serde_json::from_str(content).map_err(Into::into),
        DocumentFormat::Toml => toml::from_str(content).map_err(Into::into),
    }
}

/// Serialize a value and write it to `path`
pub fn save<T: Serialize>(value: &T, path: &Path) -> FlowdefResult<()> {
    let content = render(value, DocumentFormat::from_path(path))?;

    std::fs::write(path, content).map_err(|e| FlowdefError::FileWriteError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Serialize a value in the given format
pub fn render<T: Serialize>(value: &T, format: DocumentFormat) -> FlowdefResult<String> {
    match format {
        DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(Into::into),
        DocumentFormat::Json => serde_json::to_string_pretty(value).map_err(Into::into),
        DocumentFormat::Toml => toml::to_string_pretty(value).map_err(|e| FlowdefError::Toml {
            message: e.to_string(),
        }),
    }
}
