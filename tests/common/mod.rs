// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory host for driver tests

#![allow(dead_code)]

use paramexport::host::{EventPump, ExportRequest, MeshExporter, ParameterStore};
use paramexport::scene::{Occurrence, SceneBody, SceneGraph};
use paramexport::HostError;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Every host call, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Set { name: String, expression: String },
    Yield,
    Export {
        path: PathBuf,
        body: String,
        parameters: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone)]
pub struct MockNode {
    pub name: String,
    pub bodies_visible: bool,
    pub bodies: Vec<(String, bool)>,
    /// (node, visible, reference)
    pub occurrences: Vec<(usize, bool, bool)>,
}

#[derive(Debug, Default)]
pub struct MockHost {
    pub nodes: Vec<MockNode>,
    pub parameters: BTreeMap<String, String>,
    pub calls: Vec<HostCall>,
    /// Exports whose file name contains one of these fail
    pub failing_exports: Vec<String>,
    /// Expressions the parameter system refuses
    pub rejected_expressions: Vec<String>,
}

impl MockHost {
    /// Root node with no bodies of its own
    pub fn new() -> Self {
        Self {
            nodes: vec![MockNode {
                name: "Assembly v1".into(),
                bodies_visible: true,
                bodies: Vec::new(),
                occurrences: Vec::new(),
            }],
            ..Default::default()
        }
    }

    /// Add a visible node under the root with visible bodies
    pub fn with_component(mut self, name: &str, bodies: &[&str]) -> Self {
        let index = self.add_node(name, bodies);
        self.nodes[0].occurrences.push((index, true, false));
        self
    }

    pub fn add_node(&mut self, name: &str, bodies: &[&str]) -> usize {
        self.nodes.push(MockNode {
            name: name.into(),
            bodies_visible: true,
            bodies: bodies.iter().map(|b| (b.to_string(), true)).collect(),
            occurrences: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn with_parameter(mut self, name: &str, expression: &str) -> Self {
        self.parameters.insert(name.into(), expression.into());
        self
    }

    pub fn exports(&self) -> Vec<&HostCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Export { .. }))
            .collect()
    }

    /// File names of every export, in order
    pub fn exported_names(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Export { path, .. } => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }
}

impl SceneGraph for MockHost {
    type NodeId = usize;
    type BodyId = (usize, usize);

    fn root(&self) -> usize {
        0
    }

    fn node_name(&self, node: &usize) -> String {
        self.nodes[*node].name.clone()
    }

    fn bodies_folder_visible(&self, node: &usize) -> bool {
        self.nodes[*node].bodies_visible
    }

    fn bodies(&self, node: &usize) -> Vec<SceneBody<(usize, usize)>> {
        self.nodes[*node]
            .bodies
            .iter()
            .enumerate()
            .map(|(i, (name, visible))| SceneBody {
                id: (*node, i),
                name: name.clone(),
                visible: *visible,
            })
            .collect()
    }

    fn occurrences(&self, node: &usize) -> Vec<Occurrence<usize>> {
        self.nodes[*node]
            .occurrences
            .iter()
            .map(|&(node, visible, reference)| Occurrence {
                node,
                visible,
                reference,
            })
            .collect()
    }
}

impl ParameterStore for MockHost {
    fn expression(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }

    fn set_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError> {
        if self.rejected_expressions.iter().any(|e| e == expression) {
            return Err(HostError::InvalidExpression {
                expression: expression.into(),
                reason: "rejected by test".into(),
            });
        }
        let slot = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| HostError::UnknownParameter(name.into()))?;
        *slot = expression.into();
        self.calls.push(HostCall::Set {
            name: name.into(),
            expression: expression.into(),
        });
        Ok(())
    }
}

impl MeshExporter for MockHost {
    fn export(&mut self, request: &ExportRequest<'_, (usize, usize)>) -> Result<(), HostError> {
        let (node, body) = *request.body;
        let file_name = request
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing_exports.iter().any(|f| file_name.contains(f.as_str())) {
            return Err(HostError::Other(format!("export of {} failed", file_name)));
        }

        self.calls.push(HostCall::Export {
            path: request.path.to_path_buf(),
            body: self.nodes[node].bodies[body].0.clone(),
            parameters: self.parameters.clone(),
        });
        Ok(())
    }
}

impl EventPump for MockHost {
    fn do_events(&mut self) {
        self.calls.push(HostCall::Yield);
    }
}
