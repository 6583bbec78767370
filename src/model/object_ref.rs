// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::{EdgeId, NodeId};

/// Reference to a node or an edge of a concept map.
///
/// Displayed as `node/<node_id>` or `edge/<edge_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl ObjectRef {
    pub fn as_node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(node_id) => Some(node_id),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeId> {
        match self {
            Self::Node(_) => None,
            Self::Edge(edge_id) => Some(edge_id),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_id) => write!(f, "node/{node_id}"),
            Self::Edge(edge_id) => write!(f, "edge/{edge_id}"),
        }
    }
}
