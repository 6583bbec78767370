// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ConceptEdge, ConceptMap, ConceptNode, EdgeId, NodeId, Point, Saliency, Size};

use super::ViewMode;

/// Everything a renderer needs to draw the current graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderSnapshot {
    pub map_id: String,
    pub rev: u64,
    pub generating: bool,
    pub view_mode: ViewMode,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub size: Option<Size>,
    pub background: Option<String>,
    /// `node-to-merge-source` / `node-to-merge-target` while a drag is in progress.
    pub class_name: Option<String>,
    /// Entity ids as written in the markup (`$N1`).
    pub entity_ids: Vec<String>,
    pub selected: bool,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeView {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub label: String,
    pub saliency: Option<Saliency>,
    pub selected: bool,
    pub editing: bool,
}

impl RenderSnapshot {
    pub(super) fn capture(map: &ConceptMap, generating: bool, view_mode: ViewMode) -> Self {
        let graph = map.graph();
        Self {
            map_id: map.map_id().to_string(),
            rev: map.rev(),
            generating,
            view_mode,
            nodes: graph.nodes().iter().map(|(id, node)| NodeView::new(id, node)).collect(),
            edges: graph.edges().iter().map(|(id, edge)| EdgeView::new(id, edge)).collect(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(RenderSnapshot)).unwrap_or_default()
    }
}

impl NodeView {
    fn new(id: &NodeId, node: &ConceptNode) -> Self {
        Self {
            id: id.to_string(),
            label: node.label().to_owned(),
            position: node.position(),
            size: node.size(),
            background: node.background().map(str::to_owned),
            class_name: node.drag_class().map(|class| class.as_class_name().to_owned()),
            entity_ids: node.entity_ids().iter().map(ToString::to_string).collect(),
            selected: node.selected(),
            editing: node.editing(),
        }
    }
}

impl EdgeView {
    fn new(id: &EdgeId, edge: &ConceptEdge) -> Self {
        Self {
            id: id.to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            source_handle: edge.source_handle().map(str::to_owned),
            target_handle: edge.target_handle().map(str::to_owned),
            label: edge.label().to_owned(),
            saliency: edge.saliency(),
            selected: edge.selected(),
            editing: edge.editing(),
        }
    }
}
