// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use graphologue::model::{
    ConceptEdge, ConceptGraph, ConceptMap, ConceptNode, EdgeId, EntityId, MapId, NodeId, Point,
    Size,
};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    fn entities(self) -> u32 {
        match self {
            Self::Small => 8,
            Self::Medium => 64,
            Self::Large => 512,
        }
    }
}

/// Nodes on a 16-column grid, each linked to the next one.
pub fn graph(case: Case) -> ConceptGraph {
    let mut graph = ConceptGraph::default();
    let count = case.entities();

    for index in 1..=count {
        let column = f64::from((index - 1) % 16);
        let row = f64::from((index - 1) / 16);
        let id = EntityId::new(index);
        let position = Point::new(column * 190.0, row * 73.0);
        let mut node = ConceptNode::for_entity(id, format!("concept {index}"), position);
        node.set_size(Some(Size::new(160.0, 43.0)));
        graph.nodes_mut().insert(id.node_id(), node);
    }

    for index in 1..count {
        let edge_id = EdgeId::new(format!("e:{index}")).expect("edge id");
        let edge = ConceptEdge::new(
            EntityId::new(index).node_id(),
            EntityId::new(index + 1).node_id(),
            "leads to",
        );
        graph.edges_mut().insert(edge_id, edge);
    }

    graph
}

pub fn map(case: Case) -> ConceptMap {
    let map_id = MapId::new(format!("m:bench:{}", case.id())).expect("map id");
    ConceptMap::new(map_id, "bench", graph(case))
}

/// A consistent annotated answer: one sentence per relationship.
pub fn annotated_text(case: Case) -> String {
    let mut text = String::new();
    for index in 1..case.entities() {
        let _ = write!(
            text,
            "[concept {index} ($N{index})] [leads to ($H, $N{index}, $N{next})] \
             [concept {next} ($N{next})] within the bench. ",
            next = index + 1,
        );
    }
    text
}

pub fn node_id(index: u32) -> NodeId {
    EntityId::new(index).node_id()
}
