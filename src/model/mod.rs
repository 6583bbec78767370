// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A [`ConceptMap`] owns one [`ConceptGraph`] of nodes (concepts) and edges (relationships).

pub mod diagram;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod graph;
pub mod ids;
pub mod object_ref;

pub use diagram::ConceptMap;
pub use geometry::{Point, Rect, Size};
pub use graph::{
    ConceptEdge, ConceptGraph, ConceptNode, DragClass, IdAllocator, OriginRange, Saliency,
};
pub use ids::{EdgeId, EntityId, Id, IdError, MapId, NodeId, ParseEntityIdError, ThreadId};
pub use object_ref::ObjectRef;
