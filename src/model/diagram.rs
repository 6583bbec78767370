// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::ConceptGraph;
use super::ids::MapId;

/// One concept map: the committed graph plus a revision counter.
///
/// The graph is only ever swapped as a whole (`replace_graph`), so readers holding a
/// reference always see one consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptMap {
    map_id: MapId,
    name: String,
    graph: ConceptGraph,
    rev: u64,
}

impl ConceptMap {
    pub fn new(map_id: MapId, name: impl Into<String>, graph: ConceptGraph) -> Self {
        Self {
            map_id,
            name: name.into(),
            graph,
            rev: 0,
        }
    }

    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn replace_graph(&mut self, graph: ConceptGraph) -> ConceptGraph {
        std::mem::replace(&mut self.graph, graph)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}
