// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export run report (JSON)

use crate::params::ParameterAssignment;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one export attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExportStatus {
    Exported,
    Failed { message: String },
}

/// One attempted export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub target: String,
    pub body: String,
    pub path: PathBuf,
    pub assignments: Vec<ParameterAssignment>,
    #[serde(flatten)]
    pub status: ExportStatus,
}

impl ExportRecord {
    pub fn is_exported(&self) -> bool {
        self.status == ExportStatus::Exported
    }
}

/// Non-fatal conditions worth a second look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RunWarning {
    /// A table parameter does not exist on the model; its value was ignored
    MissingParameter { target: String, parameter: String },
    /// Two exports in one run wrote the same file
    DuplicateOutput { path: PathBuf },
}

/// Complete record of an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub targets: usize,
    pub records: Vec<ExportRecord>,
    pub warnings: Vec<RunWarning>,
    pub restored_parameters: usize,
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn new(targets: usize) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            targets,
            records: Vec::new(),
            warnings: Vec::new(),
            restored_parameters: 0,
            aborted: None,
        }
    }

    pub fn add_record(&mut self, record: ExportRecord) {
        self.records.push(record);
    }

    /// Add a warning unless an identical one is already present
    pub fn add_warning(&mut self, warning: RunWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn abort(&mut self, reason: String) {
        self.aborted = Some(reason);
    }

    pub fn exported(&self) -> usize {
        self.records.iter().filter(|r| r.is_exported()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.exported()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExportRecord> {
        self.records.iter().filter(|r| !r.is_exported())
    }

    pub fn is_success(&self) -> bool {
        self.aborted.is_none() && self.failed() == 0
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        Ok(())
    }
}
