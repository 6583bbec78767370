// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag feedback and drop-to-merge decisions.
//!
//! A node dropped with its center inside another node is folded into that node: every edge is
//! re-pointed to the surviving node and the dropped node is removed. The resolver only builds
//! ops; committing them is the caller's job (see [`crate::ops::apply_ops`]).

use std::fmt;

use crate::model::{ConceptGraph, NodeId};
use crate::ops::{EdgePatch, NodePatch, Op};
use crate::query::node_intersections;

/// Conditions under which dropping a node must not merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeGate {
    /// A model answer is streaming into the graph.
    pub generating: bool,
    /// The condensed read-only view is shown.
    pub summary_view: bool,
}

impl MergeGate {
    pub fn is_suppressed(self) -> bool {
        self.generating || self.summary_view
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDecision {
    Suppressed,
    /// Nothing under the dropped node; its position stays as is.
    Commit,
    Merge { target: NodeId },
}

/// Live intersection set for a node being dragged by `(dx, dy)`.
pub fn classify_drag(graph: &ConceptGraph, node_id: &NodeId, dx: f64, dy: f64) -> Vec<NodeId> {
    node_intersections(graph, node_id, dx, dy)
}

/// Decides what dropping `node_id` at its current position does.
///
/// Positions are committed while dragging, so the drop test uses a zero offset. With several
/// nodes under the center, the first one in collection order is the target.
pub fn resolve_drop(graph: &ConceptGraph, node_id: &NodeId, gate: MergeGate) -> DropDecision {
    if gate.is_suppressed() {
        return DropDecision::Suppressed;
    }

    match node_intersections(graph, node_id, 0.0, 0.0).into_iter().next() {
        Some(target) => DropDecision::Merge { target },
        None => DropDecision::Commit,
    }
}

/// Ops folding `source` into `target`.
///
/// Edges of `source` are re-pointed (an edge between the two becomes a self-loop on
/// `target`), the source's entity ids and origins move to `target`, then `source` is removed.
pub fn merge_ops(
    graph: &ConceptGraph,
    source: &NodeId,
    target: &NodeId,
) -> Result<Vec<Op>, MergeError> {
    if source == target {
        return Err(MergeError::SameNode { node_id: source.clone() });
    }
    let Some(source_node) = graph.node(source) else {
        return Err(MergeError::MissingSource { node_id: source.clone() });
    };
    if graph.node(target).is_none() {
        return Err(MergeError::MissingTarget { node_id: target.clone() });
    }

    let mut ops = Vec::new();
    for (edge_id, edge) in graph.edges() {
        if !edge.touches(source) {
            continue;
        }
        let patch = EdgePatch {
            source: (edge.source() == source).then(|| target.clone()),
            target: (edge.target() == source).then(|| target.clone()),
            ..EdgePatch::default()
        };
        ops.push(Op::UpdateEdge { edge_id: edge_id.clone(), patch });
    }

    if !source_node.entity_ids().is_empty() || !source_node.origins().is_empty() {
        ops.push(Op::UpdateNode {
            node_id: target.clone(),
            patch: NodePatch {
                add_entity_ids: source_node.entity_ids().to_vec(),
                add_origins: source_node.origins().to_vec(),
                ..NodePatch::default()
            },
        });
    }
    ops.push(Op::RemoveNode { node_id: source.clone() });

    tracing::debug!(%source, %target, ops = ops.len(), "built merge ops");
    Ok(ops)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    MissingSource { node_id: NodeId },
    MissingTarget { node_id: NodeId },
    SameNode { node_id: NodeId },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource { node_id } => write!(f, "merge source not found (id={node_id})"),
            Self::MissingTarget { node_id } => write!(f, "merge target not found (id={node_id})"),
            Self::SameNode { node_id } => write!(f, "cannot merge node {node_id} into itself"),
        }
    }
}

impl std::error::Error for MergeError {}
