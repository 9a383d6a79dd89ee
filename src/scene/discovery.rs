// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export target discovery

use super::graph::SceneGraph;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, info};

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" v\d$").expect("version suffix pattern is valid"));

/// A visible body and the name its table rows are keyed by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTarget<B> {
    #[serde(skip)]
    pub body: B,
    pub body_name: String,
    /// Node name with the version suffix removed
    pub name: String,
    pub node_name: String,
}

impl<B> ExportTarget<B> {
    /// `<target>_<body>`, the stem every output file name starts with
    pub fn stem(&self) -> String {
        format!("{}_{}", self.name, self.body_name)
    }
}

/// Strip a trailing `" v<digit>"` and surrounding whitespace from a node name
pub fn derive_target_name(node_name: &str) -> String {
    VERSION_SUFFIX.replace(node_name, "").trim().to_string()
}

/// Collect every visible body reachable from the root through visible,
/// non-reference occurrences, depth first, in pre-order.
pub fn discover_targets<G: SceneGraph>(graph: &G) -> Vec<ExportTarget<G::BodyId>> {
    let mut targets = Vec::new();
    visit(graph, &graph.root(), &mut targets);

    info!(count = targets.len(), "export targets discovered");
    targets
}

fn visit<G: SceneGraph>(graph: &G, node: &G::NodeId, targets: &mut Vec<ExportTarget<G::BodyId>>) {
    if graph.bodies_folder_visible(node) {
        let node_name = graph.node_name(node);
        let name = derive_target_name(&node_name);

        for body in graph.bodies(node).into_iter().filter(|b| b.visible) {
            debug!(target_name = %name, body = %body.name, "target found");
            targets.push(ExportTarget {
                body: body.id,
                body_name: body.name,
                name: name.clone(),
                node_name: node_name.clone(),
            });
        }
    }

    for occurrence in graph.occurrences(node) {
        if occurrence.visible && !occurrence.reference {
            visit(graph, &occurrence.node, targets);
        }
    }
}
