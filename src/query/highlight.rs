// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ConceptGraph, EdgeId, NodeId, OriginRange};

pub fn node_origins(graph: &ConceptGraph, node_id: &NodeId) -> Vec<OriginRange> {
    graph
        .node(node_id)
        .map(|node| node.origins().to_vec())
        .unwrap_or_default()
}

pub fn edge_origins(graph: &ConceptGraph, edge_id: &EdgeId) -> Vec<OriginRange> {
    graph
        .edge(edge_id)
        .map(|edge| edge.origins().to_vec())
        .unwrap_or_default()
}

/// Origins of every selected node, in node order. Shown once the pointer leaves a node.
pub fn selected_node_origins(graph: &ConceptGraph) -> Vec<OriginRange> {
    graph
        .nodes()
        .values()
        .filter(|node| node.selected())
        .flat_map(|node| node.origins().iter().copied())
        .collect()
}

/// Origins of every selected edge, in edge order. Shown once the pointer leaves an edge.
pub fn selected_edge_origins(graph: &ConceptGraph) -> Vec<OriginRange> {
    graph
        .edges()
        .values()
        .filter(|edge| edge.selected())
        .flat_map(|edge| edge.origins().iter().copied())
        .collect()
}
