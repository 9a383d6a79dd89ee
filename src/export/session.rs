// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scoped parameter mutation
//!
//! A [`ParameterSession`] owns the host for the duration of one target. Every
//! parameter it changes is recorded in a [`MutationLedger`] before the first
//! write, and all recorded parameters are written back when the session is
//! restored or dropped.

use crate::error::{ExportError, Result};
use crate::host::ParameterStore;
use crate::params::ParameterAssignment;
use std::ops::{Deref, DerefMut};
use tracing::{debug, error, warn};

/// Original expressions of every parameter touched for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationLedger {
    entries: Vec<(String, String)>,
}

impl MutationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original` for `name` unless `name` was already recorded.
    /// Returns true when this call added the entry.
    pub fn record(&mut self, name: &str, original: String) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), original));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn original(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry in recording order
    pub fn drain(&mut self) -> std::vec::Drain<'_, (String, String)> {
        self.entries.drain(..)
    }
}

/// Result of applying one assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Applied,
    /// The model has no parameter with this name; nothing was written
    Missing,
}

/// Exclusive, self-restoring access to a host's parameters
pub struct ParameterSession<'h, H: ParameterStore + ?Sized> {
    host: &'h mut H,
    target: String,
    ledger: MutationLedger,
}

impl<'h, H: ParameterStore + ?Sized> ParameterSession<'h, H> {
    pub fn begin(host: &'h mut H, target: impl Into<String>) -> Self {
        Self {
            host,
            target: target.into(),
            ledger: MutationLedger::new(),
        }
    }

    /// Write one assignment, recording the original expression first
    pub fn apply(&mut self, assignment: &ParameterAssignment) -> Result<AssignmentOutcome> {
        let Some(current) = self.host.expression(&assignment.name) else {
            return Ok(AssignmentOutcome::Missing);
        };

        if self.ledger.record(&assignment.name, current) {
            debug!(
                target_name = %self.target,
                parameter = %assignment.name,
                "original expression recorded"
            );
        }

        self.host
            .set_expression(&assignment.name, &assignment.value)
            .map_err(|source| ExportError::ParameterRejected {
                target: self.target.clone(),
                parameter: assignment.name.clone(),
                value: assignment.value.clone(),
                source,
            })?;

        Ok(AssignmentOutcome::Applied)
    }

    pub fn ledger(&self) -> &MutationLedger {
        &self.ledger
    }

    /// Write every recorded original back and clear the ledger.
    ///
    /// All entries are attempted; the first failure is returned. Returns the
    /// number of parameters restored.
    pub fn restore(mut self) -> Result<usize> {
        self.restore_all()
    }

    fn restore_all(&mut self) -> Result<usize> {
        let mut restored = 0;
        let mut first_error = None;

        let entries: Vec<(String, String)> = self.ledger.drain().collect();
        for (name, expression) in entries {
            match self.host.set_expression(&name, &expression) {
                Ok(()) => restored += 1,
                Err(source) => {
                    error!(
                        target_name = %self.target,
                        parameter = %name,
                        expression = %expression,
                        error = %source,
                        "failed to restore parameter"
                    );
                    first_error.get_or_insert(ExportError::RestoreFailed {
                        target: self.target.clone(),
                        parameter: name,
                        expression,
                        source,
                    });
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(restored),
        }
    }
}

impl<H: ParameterStore + ?Sized> Deref for ParameterSession<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: ParameterStore + ?Sized> DerefMut for ParameterSession<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: ParameterStore + ?Sized> Drop for ParameterSession<'_, H> {
    fn drop(&mut self) {
        if self.ledger.is_empty() {
            return;
        }
        warn!(
            target_name = %self.target,
            pending = self.ledger.len(),
            "parameter session dropped without restore; restoring now"
        );
        // Errors are already logged by restore_all
        let _ = self.restore_all();
    }
}
