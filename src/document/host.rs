// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Host capabilities over a [`DesignDocument`]

use super::model::{BodyRef, DesignDocument};
use crate::error::HostError;
use crate::host::{EventPump, ExportRequest, MeshExporter, ParameterStore};
use crate::scene::{Occurrence, SceneBody, SceneGraph};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::trace;

impl SceneGraph for DesignDocument {
    type NodeId = usize;
    type BodyId = BodyRef;

    fn root(&self) -> usize {
        self.root_index()
    }

    fn node_name(&self, node: &usize) -> String {
        self.component(*node)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn bodies_folder_visible(&self, node: &usize) -> bool {
        self.component(*node).is_some_and(|c| c.bodies_visible)
    }

    fn bodies(&self, node: &usize) -> Vec<SceneBody<BodyRef>> {
        let Some(component) = self.component(*node) else {
            return Vec::new();
        };

        component
            .bodies
            .iter()
            .enumerate()
            .map(|(i, body)| SceneBody {
                id: BodyRef {
                    component: *node,
                    body: i,
                },
                name: body.name.clone(),
                visible: body.visible,
            })
            .collect()
    }

    fn occurrences(&self, node: &usize) -> Vec<Occurrence<usize>> {
        let Some(component) = self.component(*node) else {
            return Vec::new();
        };

        component
            .occurrences
            .iter()
            .filter_map(|occurrence| {
                self.component_by_id(&occurrence.component)
                    .map(|index| Occurrence {
                        node: index,
                        visible: occurrence.visible,
                        reference: occurrence.reference,
                    })
            })
            .collect()
    }
}

impl ParameterStore for DesignDocument {
    fn expression(&self, name: &str) -> Option<String> {
        self.parameter(name).map(|p| p.expression.clone())
    }

    /// Rejects expressions that do not evaluate; the old one stays in place
    fn set_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError> {
        let previous = self.parameter_mut(name)?;
        let previous = std::mem::replace(&mut previous.expression, expression.to_string());

        if let Err(err) = self.evaluate(expression) {
            self.parameter_mut(name)?.expression = previous;
            return Err(err);
        }

        trace!(parameter = name, expression, "parameter set");
        Ok(())
    }
}

impl MeshExporter for DesignDocument {
    fn export(&mut self, request: &ExportRequest<'_, BodyRef>) -> Result<(), HostError> {
        let body = self
            .body(request.body)
            .ok_or_else(|| HostError::UnknownBody(format!("{:?}", request.body)))?;

        let triangles = self.solid(body)?.to_triangles(request.refinement);

        let file = File::create(request.path)?;
        let mut writer = BufWriter::new(file);
        stl_io::write_stl(&mut writer, triangles.iter())?;
        writer.flush()?;

        trace!(
            path = %request.path.display(),
            triangles = triangles.len(),
            "mesh written"
        );
        Ok(())
    }
}

impl EventPump for DesignDocument {
    fn do_events(&mut self) {
        self.events += 1;
    }
}
