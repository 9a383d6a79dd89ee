// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Run configuration

use crate::error::{ExportError, Result};
use crate::export::{
    DriverOptions, FailurePolicy, MeshRefinement, MissingParameterPolicy, DEFAULT_EXTENSION,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "paramexport.toml";

/// Inputs of one export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Parameter table (CSV)
    pub table: Option<PathBuf>,
    /// Directory receiving the mesh files
    pub output_dir: Option<PathBuf>,
    pub refinement: MeshRefinement,
    /// Output file extension, without the dot
    pub extension: String,
    pub failure_policy: FailurePolicy,
    pub missing_parameters: MissingParameterPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            table: None,
            output_dir: None,
            refinement: MeshRefinement::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            failure_policy: FailurePolicy::default(),
            missing_parameters: MissingParameterPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `paramexport.toml` when present, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_with(None, |key| std::env::var(key).ok())
    }

    /// Load `path`, or `paramexport.toml` when present, then apply the
    /// `PARAMEXPORT_*` overrides read through `lookup`
    pub fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Apply `PARAMEXPORT_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(table) = lookup("PARAMEXPORT_TABLE") {
            self.table = Some(PathBuf::from(table));
        }

        if let Some(output_dir) = lookup("PARAMEXPORT_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(output_dir));
        }

        if let Some(refinement) = lookup("PARAMEXPORT_REFINEMENT") {
            self.refinement = refinement.parse().map_err(|reason| ExportError::Config {
                path: PathBuf::from("PARAMEXPORT_REFINEMENT"),
                reason,
            })?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Names of required inputs that have not been chosen
    pub fn missing_inputs(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.table.is_none() {
            missing.push("parameter table");
        }
        if self.output_dir.is_none() {
            missing.push("output directory");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_inputs().is_empty()
    }

    /// Required inputs, or `ConfigurationIncomplete`
    pub fn validate(&self) -> Result<(&Path, &Path)> {
        match (&self.table, &self.output_dir) {
            (Some(table), Some(output_dir)) => Ok((table.as_path(), output_dir.as_path())),
            _ => Err(ExportError::ConfigurationIncomplete {
                missing: self.missing_inputs(),
            }),
        }
    }

    pub fn driver_options(&self, output_dir: &Path) -> DriverOptions {
        DriverOptions::new(output_dir)
            .with_refinement(self.refinement)
            .with_failure_policy(self.failure_policy)
            .with_missing_parameters(self.missing_parameters)
            .with_extension(self.extension.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_incomplete() {
        let config = RunConfig::default();
        assert!(!config.is_complete());

        match config.validate() {
            Err(ExportError::ConfigurationIncomplete { missing }) => {
                assert_eq!(missing, vec!["parameter table", "output directory"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_toml_round_trip() -> anyhow::Result<()> {
        let config = RunConfig {
            table: Some(PathBuf::from("params.csv")),
            output_dir: Some(PathBuf::from("out")),
            refinement: MeshRefinement::Low,
            failure_policy: FailurePolicy::FailFast,
            ..RunConfig::default()
        };

        let file = tempfile::NamedTempFile::with_suffix(".toml")?;
        config.save(file.path())?;
        let content = std::fs::read_to_string(file.path())?;
        assert!(content.contains("refinement = \"low\""));
        assert!(content.contains("failure_policy = \"fail-fast\""));

        assert_eq!(RunConfig::from_file(file.path())?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RunConfig = toml::from_str("table = \"p.csv\"").unwrap();
        assert_eq!(config.table, Some(PathBuf::from("p.csv")));
        assert_eq!(config.extension, "stl");
        assert_eq!(config.refinement, MeshRefinement::High);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RunConfig::default();
        config
            .apply_env(|key| match key {
                "PARAMEXPORT_OUTPUT_DIR" => Some("/tmp/out".into()),
                "PARAMEXPORT_REFINEMENT" => Some("medium".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.refinement, MeshRefinement::Medium);
        assert!(config.table.is_none());
    }

    #[test]
    fn test_env_overrides_explicit_file() -> anyhow::Result<()> {
        let file = tempfile::NamedTempFile::with_suffix(".toml")?;
        std::fs::write(
            file.path(),
            "table = \"file.csv\"\noutput_dir = \"file-out\"\nrefinement = \"low\"\n",
        )?;

        let config = RunConfig::load_with(Some(file.path()), |key| match key {
            "PARAMEXPORT_TABLE" => Some("env.csv".into()),
            _ => None,
        })?;

        assert_eq!(config.table, Some(PathBuf::from("env.csv")));
        assert_eq!(config.output_dir, Some(PathBuf::from("file-out")));
        assert_eq!(config.refinement, MeshRefinement::Low);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = RunConfig::load_with(Some(Path::new("/nonexistent/paramexport.toml")), |_| None);
        assert!(matches!(result, Err(ExportError::Config { .. })));
    }

    #[test]
    fn test_bad_refinement_override_is_rejected() {
        let mut config = RunConfig::default();
        let result = config.apply_env(|key| (key == "PARAMEXPORT_REFINEMENT").then(|| "ultra".into()));
        assert!(matches!(result, Err(ExportError::Config { .. })));
    }
}
