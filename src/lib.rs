// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe parameter export
//!
//! Batch mesh export of CAD bodies, varying named design parameters per
//! export according to a table of parameter combinations. The CAD host is
//! reached through the traits in [`host`]; [`document`] provides a
//! file-backed host for the command line.

pub mod cli;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod host;
pub mod logging;
pub mod params;
pub mod report;
pub mod scene;

pub use config::RunConfig;
pub use error::{DocumentError, ExportError, HostError};
pub use export::{DriverOptions, ExportDriver, FailurePolicy, MeshRefinement, MissingParameterPolicy};
pub use host::DesignHost;
pub use params::{load_combinations, Combination, CombinationMap, CombinationSet, ParameterAssignment};
pub use report::RunReport;
pub use scene::{derive_target_name, discover_targets, ExportTarget};

/// Discover the host's targets, load the configured table and export every
/// combination.
///
/// Incomplete configuration and unreadable tables are returned as errors
/// before any parameter is changed; failures during the run are recorded in
/// the returned report.
pub fn run<H: DesignHost>(host: &mut H, config: &RunConfig) -> Result<RunReport, ExportError> {
    let (table, output_dir) = config.validate()?;

    let targets = discover_targets(&*host);
    let combinations = load_combinations(table)?;

    let driver = ExportDriver::new(&combinations, config.driver_options(output_dir));
    Ok(driver.run(host, &targets))
}
