// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parameter-varying export of discovered targets

mod driver;
mod naming;
mod options;
mod session;

pub use driver::ExportDriver;
pub use naming::{normalize_path, OutputName};
pub use options::{
    DriverOptions, FailurePolicy, MeshRefinement, MissingParameterPolicy, DEFAULT_EXTENSION,
};
pub use session::{AssignmentOutcome, MutationLedger, ParameterSession};
