// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ConceptGraph, ConceptNode, NodeId, Point};

/// Center of `node` after moving it by `(dx, dy)`. Unmeasured sides count as zero.
pub fn offset_center(node: &ConceptNode, dx: f64, dy: f64) -> Point {
    node.bounds().center().offset(dx, dy)
}

/// Ids of the candidates whose box contains the offset center of the moving node.
///
/// Linear scan in candidate order; the moving node itself is never reported. Callers that
/// pick a single target take the first id, so the order of `candidates` is the tie-break.
pub fn intersections<'a, I>(
    moving_id: &NodeId,
    moving: &ConceptNode,
    candidates: I,
    dx: f64,
    dy: f64,
) -> Vec<NodeId>
where
    I: IntoIterator<Item = (&'a NodeId, &'a ConceptNode)>,
{
    let center = offset_center(moving, dx, dy);

    candidates
        .into_iter()
        .filter(|(node_id, _)| *node_id != moving_id)
        .filter(|(_, node)| node.bounds().contains(center))
        .map(|(node_id, _)| node_id.clone())
        .collect()
}

/// [`intersections`] for a node of `graph`, against the rest of that graph.
///
/// Returns an empty list when `node_id` is not in the graph.
pub fn node_intersections(
    graph: &ConceptGraph,
    node_id: &NodeId,
    dx: f64,
    dy: f64,
) -> Vec<NodeId> {
    let Some(moving) = graph.node(node_id) else {
        return Vec::new();
    };
    intersections(node_id, moving, graph.nodes(), dx, dy)
}
