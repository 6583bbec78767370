// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for concept maps.
//!
//! Operations are applied with optimistic concurrency (revision checks) to a copy of the graph.
//! The map's graph is swapped only after the whole batch succeeded, and the result carries a
//! minimal delta that the UI can use to refresh derived state.

use std::collections::HashSet;
use std::fmt;

use crate::model::{
    ConceptEdge, ConceptGraph, ConceptMap, ConceptNode, DragClass, EdgeId, EntityId, NodeId,
    ObjectRef, OriginRange, Point, Saliency, Size,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        node_id: NodeId,
        node: ConceptNode,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodePatch,
    },
    SetNodeDragClass {
        node_id: NodeId,
        drag_class: Option<DragClass>,
    },
    /// Deletes the node together with every edge that references it.
    RemoveNode {
        node_id: NodeId,
    },
    AddEdge {
        edge_id: EdgeId,
        edge: ConceptEdge,
    },
    UpdateEdge {
        edge_id: EdgeId,
        patch: EdgePatch,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    /// Swaps in a complete graph, e.g. a freshly parsed answer.
    ReplaceAll {
        graph: ConceptGraph,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub background: Option<String>,
    pub selected: Option<bool>,
    pub editing: Option<bool>,
    pub add_origins: Vec<OriginRange>,
    pub add_entity_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub label: Option<String>,
    pub saliency: Option<Saliency>,
    pub selected: Option<bool>,
    pub editing: Option<bool>,
    pub add_origins: Vec<OriginRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// Reports only added/removed/updated `ObjectRef`s, sorted, without field-level detail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ObjectRef>,
    removed: HashSet<ObjectRef>,
    updated: HashSet<ObjectRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        // Remove-then-add of the same id within one batch reads as an update.
        if self.removed.remove(&object_ref) {
            self.updated.insert(object_ref);
            return;
        }
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_removed(&mut self, object_ref: ObjectRef) {
        self.updated.remove(&object_ref);
        if self.added.remove(&object_ref) {
            return;
        }
        self.removed.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta { added, removed, updated }
    }
}

pub fn apply_ops(
    map: &mut ConceptMap,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = map.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: 0, delta: Delta::default() });
    }

    let mut new_graph = map.graph().clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut new_graph, op, &mut delta)?;
    }

    map.replace_graph(new_graph);
    map.bump_rev();
    let new_rev = map.rev();
    tracing::debug!(map_id = %map.map_id(), new_rev, applied = ops.len(), "applied ops");

    Ok(ApplyResult { new_rev, applied: ops.len(), delta: delta.finish() })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    AlreadyExists { object_ref: ObjectRef },
    NotFound { object_ref: ObjectRef },
    MissingNode { node_id: NodeId },
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::AlreadyExists { object_ref } => write!(f, "object already exists ({object_ref})"),
            Self::NotFound { object_ref } => write!(f, "object not found ({object_ref})"),
            Self::MissingNode { node_id } => write!(f, "edge endpoint not found (id={node_id})"),
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "edge {edge_id} references missing node {node_id}")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation for node/edge mutations.
include!("ops_impl.rs");
