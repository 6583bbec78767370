// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::marker::PhantomData;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::geometry::{Point, Rect, Size};
use super::ids::{EdgeId, EdgeIdTag, EntityId, Id, NodeId, NodeIdTag};

/// Node and edge collections of one concept map.
///
/// Both collections keep insertion order, and removals use `shift_remove` so the relative
/// order of the survivors never changes. Merge target selection depends on this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConceptGraph {
    nodes: IndexMap<NodeId, ConceptNode>,
    edges: IndexMap<EdgeId, ConceptEdge>,
}

impl ConceptGraph {
    pub fn nodes(&self) -> &IndexMap<NodeId, ConceptNode> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut IndexMap<NodeId, ConceptNode> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &IndexMap<EdgeId, ConceptEdge> {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut IndexMap<EdgeId, ConceptEdge> {
        &mut self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&ConceptNode> {
        self.nodes.get(node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&ConceptEdge> {
        self.edges.get(edge_id)
    }

    /// The node currently representing `entity_id`, including nodes it was merged into.
    pub fn node_for_entity(&self, entity_id: EntityId) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.entity_ids().contains(&entity_id))
            .map(|(node_id, _)| node_id)
    }

    pub fn incident_edge_ids(&self, node_id: &NodeId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, edge)| edge.touches(node_id))
            .map(|(edge_id, _)| edge_id.clone())
            .collect()
    }

    /// Edges whose source or target is not a node of this graph, with the first missing id.
    pub fn dangling_edges(&self) -> Vec<(EdgeId, NodeId)> {
        self.edges
            .iter()
            .filter_map(|(edge_id, edge)| {
                [edge.source(), edge.target()]
                    .into_iter()
                    .find(|node_id| !self.nodes.contains_key(*node_id))
                    .map(|missing| (edge_id.clone(), missing.clone()))
            })
            .collect()
    }

    pub fn node_id_allocator(&self) -> IdAllocator<NodeIdTag> {
        IdAllocator::after(NODE_ID_PREFIX, self.nodes.keys())
    }

    pub fn edge_id_allocator(&self) -> IdAllocator<EdgeIdTag> {
        IdAllocator::after(EDGE_ID_PREFIX, self.edges.keys())
    }
}

const NODE_ID_PREFIX: &str = "n:";
const EDGE_ID_PREFIX: &str = "e:";

/// Hands out `<prefix><k>` ids that do not collide with the numbered ids already in use.
#[derive(Debug, Clone)]
pub struct IdAllocator<T> {
    prefix: &'static str,
    next: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> IdAllocator<T> {
    fn after<'a>(prefix: &'static str, existing: impl Iterator<Item = &'a Id<T>>) -> Self
    where
        T: 'a,
    {
        let next = existing
            .filter_map(|id| id.as_str().strip_prefix(prefix)?.parse::<u64>().ok())
            .max()
            .map_or(0, |max| max.saturating_add(1));
        Self {
            prefix,
            next,
            _marker: PhantomData,
        }
    }

    pub fn next_id(&mut self) -> Id<T> {
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(self.next);
        self.next = self.next.saturating_add(1);

        let mut value = String::with_capacity(self.prefix.len() + digits.len());
        value.push_str(self.prefix);
        value.push_str(digits);
        Id::new(value).expect("valid generated id")
    }
}

/// Span of response text a node or edge was derived from.
///
/// `start..end` is a byte range into the response of turn `turn` of the owning thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct OriginRange {
    pub turn: u64,
    pub start: usize,
    pub end: usize,
}

impl OriginRange {
    pub const fn new(turn: u64, start: usize, end: usize) -> Self {
        Self { turn, start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Saliency {
    High,
    Low,
}

impl Saliency {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "H" | "$H" => Some(Self::High),
            "L" | "$L" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Live drag feedback. Cleared on every drag stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DragClass {
    #[serde(rename = "merge-source")]
    MergeSource,
    #[serde(rename = "merge-target")]
    MergeTarget,
}

impl DragClass {
    pub fn as_class_name(self) -> &'static str {
        match self {
            Self::MergeSource => "node-to-merge-source",
            Self::MergeTarget => "node-to-merge-target",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptNode {
    label: String,
    position: Point,
    size: Option<Size>,
    background: Option<SmolStr>,
    entity_ids: SmallVec<[EntityId; 1]>,
    origins: Vec<OriginRange>,
    selected: bool,
    editing: bool,
    drag_class: Option<DragClass>,
}

impl ConceptNode {
    pub fn new(label: impl Into<String>, position: Point) -> Self {
        Self {
            label: label.into(),
            position,
            size: None,
            background: None,
            entity_ids: SmallVec::new(),
            origins: Vec::new(),
            selected: false,
            editing: false,
            drag_class: None,
        }
    }

    pub fn for_entity(entity_id: EntityId, label: impl Into<String>, position: Point) -> Self {
        let mut node = Self::new(label, position);
        node.entity_ids.push(entity_id);
        node
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_background<T: Into<SmolStr>>(&mut self, background: Option<T>) {
        self.background = background.map(Into::into);
    }

    pub fn entity_ids(&self) -> &[EntityId] {
        &self.entity_ids
    }

    /// Adds ids not yet carried by this node, keeping the existing ones first.
    pub fn absorb_entity_ids(&mut self, entity_ids: &[EntityId]) {
        for entity_id in entity_ids {
            if !self.entity_ids.contains(entity_id) {
                self.entity_ids.push(*entity_id);
            }
        }
    }

    pub fn origins(&self) -> &[OriginRange] {
        &self.origins
    }

    pub fn extend_origins(&mut self, origins: &[OriginRange]) {
        extend_unique(&mut self.origins, origins);
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub fn drag_class(&self) -> Option<DragClass> {
        self.drag_class
    }

    pub fn set_drag_class(&mut self, drag_class: Option<DragClass>) {
        self.drag_class = drag_class;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptEdge {
    source: NodeId,
    target: NodeId,
    source_handle: Option<SmolStr>,
    target_handle: Option<SmolStr>,
    label: String,
    saliency: Option<Saliency>,
    origins: Vec<OriginRange>,
    selected: bool,
    editing: bool,
}

impl ConceptEdge {
    pub fn new(source: NodeId, target: NodeId, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            source_handle: None,
            target_handle: None,
            label: label.into(),
            saliency: None,
            origins: Vec::new(),
            selected: false,
            editing: false,
        }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn set_source(&mut self, source: NodeId) {
        self.source = source;
    }

    pub fn set_target(&mut self, target: NodeId) {
        self.target = target;
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    pub fn source_handle(&self) -> Option<&str> {
        self.source_handle.as_deref()
    }

    pub fn target_handle(&self) -> Option<&str> {
        self.target_handle.as_deref()
    }

    pub fn set_handles<T: Into<SmolStr>>(
        &mut self,
        source_handle: Option<T>,
        target_handle: Option<T>,
    ) {
        self.source_handle = source_handle.map(Into::into);
        self.target_handle = target_handle.map(Into::into);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn saliency(&self) -> Option<Saliency> {
        self.saliency
    }

    pub fn set_saliency(&mut self, saliency: Option<Saliency>) {
        self.saliency = saliency;
    }

    pub fn origins(&self) -> &[OriginRange] {
        &self.origins
    }

    pub fn extend_origins(&mut self, origins: &[OriginRange]) {
        extend_unique(&mut self.origins, origins);
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }
}

fn extend_unique(target: &mut Vec<OriginRange>, origins: &[OriginRange]) {
    for origin in origins {
        if !target.contains(origin) {
            target.push(*origin);
        }
    }
}
