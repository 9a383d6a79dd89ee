// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parameter assignments and their Cartesian product

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parameter name and the expression text to assign to it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterAssignment {
    pub name: String,
    pub value: String,
}

impl ParameterAssignment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ParameterAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// One fully specified set of assignments applied before a single export
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(Vec<ParameterAssignment>);

impl Combination {
    pub fn new(assignments: Vec<ParameterAssignment>) -> Self {
        Self(assignments)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterAssignment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the value assigned to `name`
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, assignment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", assignment)?;
        }
        f.write_str(")")
    }
}

impl<'a> IntoIterator for &'a Combination {
    type Item = &'a ParameterAssignment;
    type IntoIter = std::slice::Iter<'a, ParameterAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every combination to export for one target, in product order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSet {
    parameters: Vec<String>,
    combinations: Vec<Combination>,
}

impl CombinationSet {
    /// Materialize the Cartesian product of `(parameter, values)` columns.
    ///
    /// Columns are taken in the given order and the last column varies
    /// fastest. A column with no values yields an empty set.
    pub fn product(columns: &[(String, Vec<String>)]) -> Self {
        let parameters: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();

        if columns.is_empty() || columns.iter().any(|(_, values)| values.is_empty()) {
            return Self {
                parameters,
                combinations: Vec::new(),
            };
        }

        let total: usize = columns.iter().map(|(_, values)| values.len()).product();
        let mut combinations = Vec::with_capacity(total);

        // Odometer over the value indices, rightmost digit first
        let mut indices = vec![0usize; columns.len()];
        loop {
            let assignments = columns
                .iter()
                .zip(&indices)
                .map(|((name, values), &i)| ParameterAssignment::new(name.clone(), values[i].clone()))
                .collect();
            combinations.push(Combination::new(assignments));

            let mut column = columns.len();
            loop {
                if column == 0 {
                    return Self {
                        parameters,
                        combinations,
                    };
                }
                column -= 1;
                indices[column] += 1;
                if indices[column] < columns[column].1.len() {
                    break;
                }
                indices[column] = 0;
            }
        }
    }

    /// Declared parameter names in first-seen order
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combination> {
        self.combinations.iter()
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

impl<'a> IntoIterator for &'a CombinationSet {
    type Item = &'a Combination;
    type IntoIter = std::slice::Iter<'a, Combination>;

    fn into_iter(self) -> Self::IntoIter {
        self.combinations.iter()
    }
}
