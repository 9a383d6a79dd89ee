// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parameter table reader
//!
//! Each row is `target,parameter,value1,value2,...` with no header. Rows are
//! grouped per target; a target's parameters keep the order in which they
//! first appear.

use super::combination::CombinationSet;
use crate::error::{ExportError, Result};
use ahash::AHashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Declared parameters of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetParameters {
    pub target: String,
    /// `(parameter, candidate values)` in first-seen order
    pub columns: Vec<(String, Vec<String>)>,
    lines: Vec<u64>,
}

impl TargetParameters {
    fn new(target: String) -> Self {
        Self {
            target,
            columns: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Insert or replace a parameter column. Returns the line that declared
    /// the replaced column, if any.
    fn upsert(&mut self, parameter: String, values: Vec<String>, line: u64) -> Option<u64> {
        if let Some(pos) = self.columns.iter().position(|(name, _)| *name == parameter) {
            self.columns[pos].1 = values;
            Some(std::mem::replace(&mut self.lines[pos], line))
        } else {
            self.columns.push((parameter, values));
            self.lines.push(line);
            None
        }
    }

    pub fn combination_count(&self) -> usize {
        self.columns.iter().map(|(_, values)| values.len()).product()
    }
}

/// Rows of a parameter table grouped by target
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    targets: Vec<TargetParameters>,
    index: AHashMap<String, usize>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a table from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ExportError::TableNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ExportError::TableUnreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse table text held in memory
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes(), "<memory>")
    }

    /// Parse a table from any reader. `source_name` is used in error messages.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut table = Self::new();

        for result in reader.records() {
            let record = result.map_err(|source| ExportError::TableParse {
                source_name: source_name.to_string(),
                source,
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            // A lone empty field is what a whitespace-only line trims down to
            if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
                continue;
            }

            let malformed = |reason: &str| ExportError::MalformedRow {
                source_name: source_name.to_string(),
                line,
                reason: reason.to_string(),
            };

            // An unterminated quote runs on into the following lines
            if record.iter().any(|field| field.contains(|c: char| c == '\n' || c == '\r')) {
                return Err(malformed("unterminated quote: field spans several lines"));
            }

            if record.len() < 3 {
                return Err(malformed(&format!(
                    "expected target,parameter,value... but found {} field(s)",
                    record.len()
                )));
            }

            let target = &record[0];
            let parameter = &record[1];
            if target.is_empty() {
                return Err(malformed("empty target name"));
            }
            if parameter.is_empty() {
                return Err(malformed("empty parameter name"));
            }

            let values: Vec<String> = record
                .iter()
                .skip(2)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                return Err(malformed(&format!("parameter '{}' has no values", parameter)));
            }

            table.insert(target, parameter, values, line);
        }

        debug!(
            source = source_name,
            targets = table.len(),
            "parameter table loaded"
        );
        Ok(table)
    }

    /// Declare `parameter` for `target`. A repeated `(target, parameter)`
    /// pair replaces the earlier values but keeps the earlier position.
    pub fn insert(&mut self, target: &str, parameter: &str, values: Vec<String>, line: u64) {
        let slot = match self.index.get(target) {
            Some(&slot) => slot,
            None => {
                self.targets.push(TargetParameters::new(target.to_string()));
                self.index.insert(target.to_string(), self.targets.len() - 1);
                self.targets.len() - 1
            }
        };

        if let Some(previous) = self.targets[slot].upsert(parameter.to_string(), values, line) {
            warn!(
                target_name = target,
                parameter = parameter,
                previous_line = previous,
                line = line,
                "duplicate parameter row; later values replace earlier ones"
            );
        }
    }

    pub fn get(&self, target: &str) -> Option<&TargetParameters> {
        self.index.get(target).map(|&slot| &self.targets[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TargetParameters> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Expand every target into its combination set
    pub fn combinations(&self) -> CombinationMap {
        let mut map = CombinationMap::default();
        for target in &self.targets {
            map.insert(target.target.clone(), CombinationSet::product(&target.columns));
        }
        map
    }
}

/// Target name to combination set, in table order
#[derive(Debug, Clone, Default)]
pub struct CombinationMap {
    sets: Vec<(String, CombinationSet)>,
    index: AHashMap<String, usize>,
}

impl CombinationMap {
    pub fn insert(&mut self, target: String, set: CombinationSet) {
        match self.index.get(&target) {
            Some(&slot) => self.sets[slot].1 = set,
            None => {
                self.index.insert(target.clone(), self.sets.len());
                self.sets.push((target, set));
            }
        }
    }

    pub fn get(&self, target: &str) -> Option<&CombinationSet> {
        self.index.get(target).map(|&slot| &self.sets[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CombinationSet)> {
        self.sets.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn total_combinations(&self) -> usize {
        self.sets.iter().map(|(_, set)| set.len()).sum()
    }
}
