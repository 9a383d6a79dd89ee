// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for parameter-driven export runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading inputs or driving an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    // === Parameter table ===
    /// Parameter table does not exist.
    #[error("parameter table not found: {}", path.display())]
    TableNotFound { path: PathBuf },

    /// Parameter table exists but could not be opened or read.
    #[error("failed to read parameter table {}: {source}", path.display())]
    TableUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the table content.
    #[error("failed to parse parameter table {source_name}: {source}")]
    TableParse {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// A row does not have the `target,parameter,value...` shape.
    #[error("malformed row {line} in {source_name}: {reason}")]
    MalformedRow {
        source_name: String,
        line: u64,
        reason: String,
    },

    // === Export run ===
    /// A table parameter does not exist on the model (strict mode only).
    #[error("parameter '{parameter}' not found on the model (target '{target}')")]
    ParameterNotFound { target: String, parameter: String },

    /// The host refused a parameter expression.
    #[error("host rejected {parameter} = '{value}' for target '{target}': {source}")]
    ParameterRejected {
        target: String,
        parameter: String,
        value: String,
        #[source]
        source: HostError,
    },

    /// The host export call failed for one file.
    #[error("export of target '{target}' to {} failed: {source}", path.display())]
    ExportFailed {
        target: String,
        path: PathBuf,
        #[source]
        source: HostError,
    },

    /// An original expression could not be written back.
    #[error("failed to restore {parameter} = '{expression}' after target '{target}': {source}")]
    RestoreFailed {
        target: String,
        parameter: String,
        expression: String,
        #[source]
        source: HostError,
    },

    // === Configuration ===
    /// Required inputs have not been chosen yet.
    #[error("configuration incomplete: missing {}", missing.join(", "))]
    ConfigurationIncomplete { missing: Vec<&'static str> },

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

/// Errors reported by a host adapter.
#[derive(Debug, Error)]
pub enum HostError {
    /// The expression does not evaluate in the host's parameter system.
    #[error("invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// No parameter with this name exists.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// The body handle no longer resolves.
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// The export destination could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other host-side failure.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading a design document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read design document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid design JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid design TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate component id '{0}'")]
    DuplicateComponent(String),

    #[error("component '{parent}' places unknown component '{component}'")]
    UnknownComponent { parent: String, component: String },

    #[error("component '{component}' places itself through its occurrences")]
    CyclicOccurrence { component: String },

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),

    #[error("parameter '{name}': {source}")]
    InvalidParameter {
        name: String,
        #[source]
        source: HostError,
    },
}

impl ExportError {
    /// True for errors that leave the model in an unknown state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::RestoreFailed { .. })
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
