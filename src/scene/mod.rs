// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene hierarchy access and export target discovery

mod discovery;
mod graph;

pub use discovery::{derive_target_name, discover_targets, ExportTarget};
pub use graph::{Occurrence, SceneBody, SceneGraph};
