// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph capability interface

use std::fmt::Debug;

/// A body owned directly by a scene node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBody<B> {
    pub id: B,
    pub name: String,
    pub visible: bool,
}

/// A placement of a node inside its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<N> {
    pub node: N,
    pub visible: bool,
    /// Points at geometry owned by another design
    pub reference: bool,
}

/// Read-only view of a host's model hierarchy.
///
/// Nodes own bodies and contain occurrences of other nodes. A node may be
/// placed by several occurrences.
pub trait SceneGraph {
    type NodeId: Clone + Debug;
    type BodyId: Clone + Debug;

    fn root(&self) -> Self::NodeId;

    fn node_name(&self, node: &Self::NodeId) -> String;

    /// State of the node's bodies folder light bulb
    fn bodies_folder_visible(&self, node: &Self::NodeId) -> bool;

    fn bodies(&self, node: &Self::NodeId) -> Vec<SceneBody<Self::BodyId>>;

    fn occurrences(&self, node: &Self::NodeId) -> Vec<Occurrence<Self::NodeId>>;
}
