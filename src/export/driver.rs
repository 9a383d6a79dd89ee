// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export driver: mutate, export, restore

use super::naming::OutputName;
use super::options::{DriverOptions, FailurePolicy, MissingParameterPolicy};
use super::session::{AssignmentOutcome, ParameterSession};
use crate::error::{ExportError, Result};
use crate::host::{DesignHost, EventPump, ExportRequest, MeshExporter};
use crate::params::{Combination, CombinationMap, CombinationSet};
use crate::report::{ExportRecord, ExportStatus, RunReport, RunWarning};
use crate::scene::ExportTarget;
use ahash::AHashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn};

/// Joins discovered targets with their combination sets and exports them
/// one target at a time, one combination at a time.
pub struct ExportDriver<'a> {
    combinations: &'a CombinationMap,
    options: DriverOptions,
}

struct RunState<'o> {
    report: RunReport,
    written: AHashSet<PathBuf>,
    observer: &'o mut dyn FnMut(&ExportRecord),
}

impl RunState<'_> {
    /// Store the outcome of one export; a failure is handed back to the caller
    fn record<B>(
        &mut self,
        target: &ExportTarget<B>,
        path: PathBuf,
        combination: Option<&Combination>,
        outcome: Result<()>,
    ) -> Result<()> {
        let (status, result) = match outcome {
            Ok(()) => {
                if !self.written.insert(path.clone()) {
                    warn!(path = %path.display(), "output path written twice in this run");
                    self.report
                        .add_warning(RunWarning::DuplicateOutput { path: path.clone() });
                }
                (ExportStatus::Exported, Ok(()))
            }
            Err(err) => {
                error!(
                    target_name = %target.name,
                    body = %target.body_name,
                    combination = %combination.map(ToString::to_string).unwrap_or_default(),
                    error = %err,
                    "export failed"
                );
                (
                    ExportStatus::Failed {
                        message: err.to_string(),
                    },
                    Err(err),
                )
            }
        };

        let record = ExportRecord {
            target: target.name.clone(),
            body: target.body_name.clone(),
            path,
            assignments: combination.map(|c| c.iter().cloned().collect()).unwrap_or_default(),
            status,
        };
        (self.observer)(&record);
        self.report.add_record(record);
        result
    }
}

impl<'a> ExportDriver<'a> {
    pub fn new(combinations: &'a CombinationMap, options: DriverOptions) -> Self {
        Self {
            combinations,
            options,
        }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Number of exports a run over `targets` will attempt
    pub fn planned_exports<B>(&self, targets: &[ExportTarget<B>]) -> usize {
        targets
            .iter()
            .map(|t| self.combinations.get(&t.name).map_or(1, CombinationSet::len))
            .sum()
    }

    pub fn run<H: DesignHost>(&self, host: &mut H, targets: &[ExportTarget<H::BodyId>]) -> RunReport {
        self.run_with_observer(host, targets, &mut |_: &ExportRecord| {})
    }

    /// Run every target, calling `observer` after each export attempt.
    ///
    /// Failures never escape as errors: they are recorded in the report, and
    /// a run that has to stop records the reason in [`RunReport::aborted`].
    pub fn run_with_observer<H: DesignHost>(
        &self,
        host: &mut H,
        targets: &[ExportTarget<H::BodyId>],
        observer: &mut dyn FnMut(&ExportRecord),
    ) -> RunReport {
        let mut state = RunState {
            report: RunReport::new(targets.len()),
            written: AHashSet::new(),
            observer,
        };

        for target in targets {
            let span = info_span!("export_target", target_name = %target.name, body = %target.body_name);
            let _enter = span.enter();

            let result = match self.combinations.get(&target.name) {
                Some(set) => self.export_combinations(host, target, set, &mut state),
                None => self.export_plain(host, target, &mut state),
            };

            if let Err(err) = result {
                error!(error = %err, "export run stopped");
                state.report.abort(err.to_string());
                break;
            }
        }

        info!(
            exported = state.report.exported(),
            failed = state.report.failed(),
            restored = state.report.restored_parameters,
            "export run finished"
        );
        state.report
    }

    fn export_plain<H: DesignHost>(
        &self,
        host: &mut H,
        target: &ExportTarget<H::BodyId>,
        state: &mut RunState<'_>,
    ) -> Result<()> {
        info!("exporting body without parameters");
        let path = OutputName::new(&target.name, &target.body_name)
            .path_in(&self.options.output_dir, &self.options.extension);

        let outcome = self.export_one(host, target, &path);
        self.settle(state.record(target, path, None, outcome))
    }

    fn export_combinations<H: DesignHost>(
        &self,
        host: &mut H,
        target: &ExportTarget<H::BodyId>,
        set: &CombinationSet,
        state: &mut RunState<'_>,
    ) -> Result<()> {
        info!(combinations = set.len(), "exporting body with parameters");

        let mut session = ParameterSession::begin(host, target.name.clone());
        let mut stopped = None;

        for combination in set {
            let outcome = self.export_combination(&mut session, target, combination, state);
            if let Err(err) = self.settle(outcome) {
                stopped = Some(err);
                break;
            }
        }

        // Parameters stay mutated across the whole set and are reset once here
        let restored = session.restore()?;
        state.report.restored_parameters += restored;
        debug!(restored, "parameters restored");

        match stopped {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn export_combination<H: DesignHost>(
        &self,
        session: &mut ParameterSession<'_, H>,
        target: &ExportTarget<H::BodyId>,
        combination: &Combination,
        state: &mut RunState<'_>,
    ) -> Result<()> {
        let mut name = OutputName::new(&target.name, &target.body_name);
        let applied = self.apply_combination(session, target, combination, &mut name, state);
        let path = name.path_in(&self.options.output_dir, &self.options.extension);

        let outcome = applied.and_then(|()| self.export_one(&mut **session, target, &path));
        state.record(target, path, Some(combination), outcome)
    }

    fn apply_combination<H: DesignHost>(
        &self,
        session: &mut ParameterSession<'_, H>,
        target: &ExportTarget<H::BodyId>,
        combination: &Combination,
        name: &mut OutputName,
        state: &mut RunState<'_>,
    ) -> Result<()> {
        for assignment in combination {
            match session.apply(assignment)? {
                AssignmentOutcome::Applied => name.push(assignment),
                AssignmentOutcome::Missing => match self.options.missing_parameters {
                    MissingParameterPolicy::Warn => {
                        warn!(parameter = %assignment.name, "parameter not found on model; value ignored");
                        state.report.add_warning(RunWarning::MissingParameter {
                            target: target.name.clone(),
                            parameter: assignment.name.clone(),
                        });
                    }
                    MissingParameterPolicy::Error => {
                        return Err(ExportError::ParameterNotFound {
                            target: target.name.clone(),
                            parameter: assignment.name.clone(),
                        });
                    }
                },
            }
        }
        Ok(())
    }

    fn export_one<H>(&self, host: &mut H, target: &ExportTarget<H::BodyId>, path: &Path) -> Result<()>
    where
        H: MeshExporter + EventPump + ?Sized,
    {
        debug!(path = %path.display(), "exporting");

        // Let the host drain its queue before a blocking export
        host.do_events();
        host.export(&ExportRequest {
            body: &target.body,
            path,
            refinement: self.options.refinement,
        })
        .map_err(|source| ExportError::ExportFailed {
            target: target.name.clone(),
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply the failure policy to one recorded outcome
    fn settle(&self, outcome: Result<()>) -> Result<()> {
        match (outcome, self.options.failure_policy) {
            (Ok(()), _) => Ok(()),
            (Err(err), FailurePolicy::FailFast) => Err(err),
            (Err(_), FailurePolicy::BestEffort) => Ok(()),
        }
    }
}
