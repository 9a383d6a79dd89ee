// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export run options

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default output file extension
pub const DEFAULT_EXTENSION: &str = "stl";

/// Tessellation coarseness requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeshRefinement {
    #[default]
    High,
    Medium,
    Low,
}

impl MeshRefinement {
    pub const ALL: [MeshRefinement; 3] = [Self::High, Self::Medium, Self::Low];

    /// Position in the host's refinement list
    pub fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for MeshRefinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MeshRefinement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "0" => Ok(Self::High),
            "medium" | "1" => Ok(Self::Medium),
            "low" | "2" => Ok(Self::Low),
            other => Err(format!("unknown mesh refinement '{}'", other)),
        }
    }
}

/// What happens after one combination fails to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure and keep exporting
    #[default]
    BestEffort,
    /// Restore the target's parameters and stop the run
    FailFast,
}

/// What happens when a table parameter does not exist on the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingParameterPolicy {
    /// Skip the assignment and record a warning
    #[default]
    Warn,
    /// Fail the combination
    Error,
}

/// Settings consumed by [`super::ExportDriver`]
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub output_dir: PathBuf,
    pub extension: String,
    pub refinement: MeshRefinement,
    pub failure_policy: FailurePolicy,
    pub missing_parameters: MissingParameterPolicy,
}

impl DriverOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            refinement: MeshRefinement::default(),
            failure_policy: FailurePolicy::default(),
            missing_parameters: MissingParameterPolicy::default(),
        }
    }

    pub fn with_refinement(mut self, refinement: MeshRefinement) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_missing_parameters(mut self, policy: MissingParameterPolicy) -> Self {
        self.missing_parameters = policy;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
