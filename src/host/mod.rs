// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Capabilities a CAD host exposes to the export engine
//!
//! The engine never talks to a host API directly. An adapter implements
//! these traits over the real object model; [`crate::document::DesignDocument`]
//! is the file-backed adapter used by the CLI.

use crate::error::HostError;
use crate::export::MeshRefinement;
use crate::scene::SceneGraph;
use std::path::Path;

/// Named user parameters, read and written as expression text
pub trait ParameterStore {
    /// Current expression of `name`, or `None` when no such parameter exists
    fn expression(&self, name: &str) -> Option<String>;

    fn set_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError>;
}

/// One mesh export issued to the host
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a, B> {
    pub body: &'a B,
    pub path: &'a Path,
    pub refinement: MeshRefinement,
}

/// Host-side mesh export of a single body
pub trait MeshExporter: SceneGraph {
    fn export(&mut self, request: &ExportRequest<'_, Self::BodyId>) -> Result<(), HostError>;
}

/// Cooperative yield back to the host's event loop
pub trait EventPump {
    fn do_events(&mut self);
}

/// Everything an export run needs from the host
pub trait DesignHost: SceneGraph + ParameterStore + MeshExporter + EventPump {}

impl<T> DesignHost for T where T: SceneGraph + ParameterStore + MeshExporter + EventPump {}
