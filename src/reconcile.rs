// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Maps a parsed response onto the live graph.
//!
//! Entities resolve through the entity ids carried by nodes, so an id seen in an earlier turn
//! (or merged into another node) updates that node instead of adding a duplicate. Each endpoint
//! pair of a relationship becomes one edge; an edge with the same endpoints and label is reused.

use std::collections::HashMap;

use crate::config::EditorConfig;
use crate::format::{EndpointPair, ParsedAnnotation};
use crate::model::{ConceptEdge, ConceptGraph, ConceptNode, EdgeId, EntityId, NodeId, Point};
use crate::ops::{EdgePatch, NodePatch, Op};
use crate::thread::ConversationThread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileIssue {
    /// `label` was introduced as `known` earlier in the thread and is now tagged as `used`.
    LabelReused { label: String, known: EntityId, used: EntityId },
    /// A relationship pair whose endpoint has no node; the edge was not created.
    SkippedPair { relationship: String, pair: EndpointPair },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub ops: Vec<Op>,
    pub issues: Vec<ReconcileIssue>,
}

/// Builds the ops that commit `annotation` as turn `turn` of `thread`.
pub fn reconcile(
    graph: &ConceptGraph,
    thread: &ConversationThread,
    annotation: &ParsedAnnotation,
    turn: u64,
    config: &EditorConfig,
) -> Reconciliation {
    let mut out = Reconciliation::default();
    let mut node_for_entity: HashMap<EntityId, NodeId> = HashMap::new();
    let mut node_ids = graph.node_id_allocator();
    let mut placed = graph.nodes().len();

    for entity in &annotation.entities {
        if let Some(known) = thread.entity_for_label(&entity.label) {
            if known != entity.id {
                tracing::warn!(label = %entity.label, %known, used = %entity.id, "label reused");
                out.issues.push(ReconcileIssue::LabelReused {
                    label: entity.label.clone(),
                    known,
                    used: entity.id,
                });
            }
        }

        let origins = entity
            .mentions
            .iter()
            .map(|mention| mention.span.to_origin(turn))
            .collect::<Vec<_>>();

        if let Some(node_id) = graph.node_for_entity(entity.id) {
            let label = graph
                .node(node_id)
                .filter(|node| node.label() != entity.label)
                .map(|_| entity.label.clone());
            out.ops.push(Op::UpdateNode {
                node_id: node_id.clone(),
                patch: NodePatch { label, add_origins: origins, ..NodePatch::default() },
            });
            node_for_entity.insert(entity.id, node_id.clone());
            continue;
        }

        let preferred = entity.id.node_id();
        let node_id = if graph.nodes().contains_key(&preferred) {
            node_ids.next_id()
        } else {
            preferred
        };

        let position = grid_slot(placed, config);
        let mut node = ConceptNode::for_entity(entity.id, entity.label.clone(), position);
        node.set_background(Some(config.node_background.as_str()));
        node.extend_origins(&origins);
        placed += 1;

        out.ops.push(Op::AddNode { node_id: node_id.clone(), node });
        node_for_entity.insert(entity.id, node_id);
    }

    let mut edge_ids = graph.edge_id_allocator();
    let mut edge_by_key: HashMap<(NodeId, NodeId, String), EdgeId> = graph
        .edges()
        .iter()
        .map(|(edge_id, edge)| {
            let key = (edge.source().clone(), edge.target().clone(), edge.label().to_owned());
            (key, edge_id.clone())
        })
        .collect();

    for relationship in &annotation.relationships {
        let origin = relationship.span.to_origin(turn);
        for pair in &relationship.pairs {
            let resolve = |id: EntityId| {
                node_for_entity
                    .get(&id)
                    .or_else(|| graph.node_for_entity(id))
                    .cloned()
            };
            let (Some(source), Some(target)) = (resolve(pair.source), resolve(pair.target)) else {
                out.issues.push(ReconcileIssue::SkippedPair {
                    relationship: relationship.label.clone(),
                    pair: *pair,
                });
                continue;
            };

            let key = (source, target, relationship.label.clone());
            if let Some(edge_id) = edge_by_key.get(&key) {
                out.ops.push(Op::UpdateEdge {
                    edge_id: edge_id.clone(),
                    patch: EdgePatch {
                        saliency: Some(pair.saliency),
                        add_origins: vec![origin],
                        ..EdgePatch::default()
                    },
                });
                continue;
            }

            let edge_id = edge_ids.next_id();
            let mut edge =
                ConceptEdge::new(key.0.clone(), key.1.clone(), relationship.label.clone());
            edge.set_saliency(Some(pair.saliency));
            edge.extend_origins(&[origin]);
            out.ops.push(Op::AddEdge { edge_id: edge_id.clone(), edge });
            edge_by_key.insert(key, edge_id);
        }
    }

    tracing::debug!(ops = out.ops.len(), issues = out.issues.len(), turn, "reconciled annotation");
    out
}

/// Provisional position of the `index`-th node on a grid of configured cell size and gap.
pub fn grid_slot(index: usize, config: &EditorConfig) -> Point {
    let columns = config.grid_columns.max(1);
    let column = (index % columns) as f64;
    let row = (index / columns) as f64;
    Point::new(
        column * (config.node_size.width + config.node_gap),
        row * (config.node_size.height + config.node_gap),
    )
}
