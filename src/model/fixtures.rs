// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::geometry::{Point, Size};
use super::graph::{ConceptEdge, ConceptGraph, ConceptNode};
use super::ids::{EdgeId, EntityId, NodeId};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

pub(crate) fn sized_node(label: &str, x: f64, y: f64, width: f64, height: f64) -> ConceptNode {
    let mut node = ConceptNode::new(label, Point::new(x, y));
    node.set_size(Some(Size::new(width, height)));
    node
}

/// `A` and `B` side by side with `A -> C` and `C -> A` edges; dragging `A` by (60, 10)
/// puts its center inside `B`.
pub(crate) fn overlapping_pair() -> ConceptGraph {
    let mut graph = ConceptGraph::default();

    let mut a = sized_node("A", 0.0, 0.0, 100.0, 40.0);
    a.absorb_entity_ids(&[EntityId::new(1)]);
    let mut b = sized_node("B", 50.0, 0.0, 100.0, 40.0);
    b.absorb_entity_ids(&[EntityId::new(2)]);
    let mut c = sized_node("C", 400.0, 300.0, 100.0, 40.0);
    c.absorb_entity_ids(&[EntityId::new(3)]);

    graph.nodes_mut().insert(nid("n:a"), a);
    graph.nodes_mut().insert(nid("n:b"), b);
    graph.nodes_mut().insert(nid("n:c"), c);

    graph
        .edges_mut()
        .insert(eid("e:0"), ConceptEdge::new(nid("n:a"), nid("n:c"), "feeds"));
    graph
        .edges_mut()
        .insert(eid("e:1"), ConceptEdge::new(nid("n:c"), nid("n:a"), "depends on"));
    graph
        .edges_mut()
        .insert(eid("e:2"), ConceptEdge::new(nid("n:b"), nid("n:c"), "near"));

    graph
}
