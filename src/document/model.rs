// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Design document model

use super::expression;
use super::tessellate::Solid;
use crate::error::{DocumentError, HostError};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn visible() -> bool {
    true
}

/// A named user parameter and its expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserParameter {
    pub name: String,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body geometry with dimensions given as expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Box {
        width: String,
        depth: String,
        height: String,
    },
    Cylinder {
        radius: String,
        height: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    #[serde(default = "visible")]
    pub visible: bool,
    pub shape: Shape,
}

/// Placement of a component inside another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceSpec {
    pub component: String,
    #[serde(default = "visible")]
    pub visible: bool,
    /// Geometry lives in another design
    #[serde(default)]
    pub reference: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default = "visible")]
    pub bodies_visible: bool,
    #[serde(default)]
    pub bodies: Vec<Body>,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceSpec>,
}

/// Handle of a body inside a [`DesignDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef {
    pub component: usize,
    pub body: usize,
}

/// A CAD design held in a JSON or TOML file.
///
/// The structure is fixed once loaded; only parameter expressions change,
/// through [`crate::host::ParameterStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parameters: Vec<UserParameter>,
    /// Id of the root component
    root: String,
    components: Vec<Component>,
    #[serde(skip)]
    component_index: AHashMap<String, usize>,
    #[serde(skip)]
    root_index: usize,
    #[serde(skip)]
    pub(crate) events: usize,
}

impl DesignDocument {
    /// Load a design from `.json` or `.toml`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        serde_json::from_str::<Self>(content)?.indexed()
    }

    pub fn from_toml(content: &str) -> Result<Self, DocumentError> {
        toml::from_str::<Self>(content)?.indexed()
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check references and expressions, then build the component index
    fn indexed(mut self) -> Result<Self, DocumentError> {
        self.component_index.clear();
        for (i, component) in self.components.iter().enumerate() {
            if self.component_index.insert(component.id.clone(), i).is_some() {
                return Err(DocumentError::DuplicateComponent(component.id.clone()));
            }
        }

        self.root_index = self.component_by_id(&self.root).ok_or_else(|| {
            DocumentError::UnknownComponent {
                parent: "<root>".to_string(),
                component: self.root.clone(),
            }
        })?;

        for component in &self.components {
            for occurrence in &component.occurrences {
                if !self.component_index.contains_key(&occurrence.component) {
                    return Err(DocumentError::UnknownComponent {
                        parent: component.id.clone(),
                        component: occurrence.component.clone(),
                    });
                }
            }
        }

        self.check_acyclic()?;

        let mut names = AHashSet::new();
        for parameter in &self.parameters {
            if !names.insert(parameter.name.as_str()) {
                return Err(DocumentError::DuplicateParameter(parameter.name.clone()));
            }
            self.evaluate(&parameter.expression)
                .map_err(|source| DocumentError::InvalidParameter {
                    name: parameter.name.clone(),
                    source,
                })?;
        }

        Ok(self)
    }

    /// Reject designs where a component ends up placing itself
    fn check_acyclic(&self) -> Result<(), DocumentError> {
        let mut marks = vec![Mark::Unvisited; self.components.len()];
        for index in 0..self.components.len() {
            self.walk_occurrences(index, &mut marks)?;
        }
        Ok(())
    }

    fn walk_occurrences(&self, index: usize, marks: &mut [Mark]) -> Result<(), DocumentError> {
        match marks[index] {
            Mark::Done => return Ok(()),
            Mark::OnStack => {
                return Err(DocumentError::CyclicOccurrence {
                    component: self.components[index].id.clone(),
                });
            }
            Mark::Unvisited => {}
        }

        marks[index] = Mark::OnStack;
        for occurrence in &self.components[index].occurrences {
            if let Some(child) = self.component_by_id(&occurrence.component) {
                self.walk_occurrences(child, marks)?;
            }
        }
        marks[index] = Mark::Done;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[UserParameter] {
        &self.parameters
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Index of the root component
    pub fn root_index(&self) -> usize {
        self.root_index
    }

    pub fn parameter(&self, name: &str) -> Option<&UserParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Evaluate an expression against the current parameter values
    pub fn evaluate(&self, expression: &str) -> Result<f64, HostError> {
        let lookup = |name: &str| self.parameter(name).map(|p| p.expression.as_str());
        expression::evaluate(expression, &lookup)
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub(crate) fn component_by_id(&self, id: &str) -> Option<usize> {
        self.component_index.get(id).copied()
    }

    pub fn body(&self, body: &BodyRef) -> Option<&Body> {
        self.components.get(body.component)?.bodies.get(body.body)
    }

    /// Resolve a body's dimensions against the current parameters
    pub fn solid(&self, body: &Body) -> Result<Solid, HostError> {
        let dimension = |label: &str, expression: &str| -> Result<f64, HostError> {
            let value = self.evaluate(expression)?;
            if value > 0.0 && value.is_finite() {
                Ok(value)
            } else {
                Err(HostError::Other(format!(
                    "body '{}' has non-positive {} ({} = {})",
                    body.name, label, expression, value
                )))
            }
        };

        Ok(match &body.shape {
            Shape::Box {
                width,
                depth,
                height,
            } => Solid::Box {
                width: dimension("width", width)?,
                depth: dimension("depth", depth)?,
                height: dimension("height", height)?,
            },
            Shape::Cylinder { radius, height } => Solid::Cylinder {
                radius: dimension("radius", radius)?,
                height: dimension("height", height)?,
            },
        })
    }

    /// Number of cooperative yields requested so far
    pub fn yield_count(&self) -> usize {
        self.events
    }

    pub(crate) fn parameter_mut(&mut self, name: &str) -> Result<&mut UserParameter, HostError> {
        self.parameters
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| HostError::UnknownParameter(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}
