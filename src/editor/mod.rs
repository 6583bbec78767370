// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The concept-map editor.
//!
//! [`Editor`] owns one [`ConceptMap`] and is the only writer of its graph. UI events (drag,
//! click, drop, hover) and model responses are routed through the parser, validator, merge
//! resolver and reconciler, and every resulting change is committed with [`apply_ops`].

use std::collections::HashMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::format::{parse_annotation, AnnotationIssue};
use crate::merge::{classify_drag, merge_ops, resolve_drop, DropDecision, MergeError, MergeGate};
use crate::model::{
    ConceptEdge, ConceptGraph, ConceptMap, ConceptNode, DragClass, EdgeId, NodeId, OriginRange,
    Point, Size, ThreadId,
};
use crate::ops::{apply_ops, ApplyError, Delta, EdgePatch, NodePatch, Op};
use crate::query::highlight;
use crate::reconcile::{reconcile, ReconcileIssue};
use crate::thread::{ConversationThread, HeldResponse, RequestTicket, RequestTracker};
use crate::validate::{locate_issues, validate_with_known, CorrectionRequest, ValidationReport};

pub mod shared;
mod snapshot;

pub use snapshot::{EdgeView, NodeView, RenderSnapshot};

/// The item the user last interacted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Full,
    /// Condensed, read-only rendering of the answer; merges are disabled.
    Summary,
}

/// Token dragged from the answer text onto the canvas.
#[derive(Debug, Clone, Deserialize)]
struct DropPayload {
    value: serde_json::Value,
}

impl DropPayload {
    fn label(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
            serde_json::Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Generating or summary view; nothing changed.
    Suppressed,
    /// Dropped on empty canvas.
    Placed { delta: Delta },
    Merged { target: NodeId, delta: Delta },
    /// The target disappeared before the merge was committed; the node stays where it is.
    MergeAborted { target: NodeId, delta: Delta },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// A newer request of the same thread exists.
    Discarded,
    /// The response failed validation and was not applied.
    HeldForCorrection { requests: Vec<CorrectionRequest> },
    Committed {
        delta: Delta,
        /// Findings left after the last correction round.
        unresolved: Option<ValidationReport>,
        annotation_issues: Vec<AnnotationIssue>,
        reconcile_issues: Vec<ReconcileIssue>,
    },
}

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    map: ConceptMap,
    tracker: RequestTracker,
    threads: HashMap<ThreadId, ConversationThread>,
    selection: Selection,
    highlight: Vec<OriginRange>,
    generating: bool,
    view_mode: ViewMode,
    dragging: Option<NodeId>,
}

impl Editor {
    pub fn new(map: ConceptMap, config: EditorConfig) -> Self {
        Self {
            config,
            map,
            tracker: RequestTracker::default(),
            threads: HashMap::new(),
            selection: Selection::None,
            highlight: Vec::new(),
            generating: false,
            view_mode: ViewMode::Full,
            dragging: None,
        }
    }

    pub fn map(&self) -> &ConceptMap {
        &self.map
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Origin ranges to highlight in the answer text.
    pub fn highlight(&self) -> &[OriginRange] {
        &self.highlight
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn thread(&self, thread_id: &ThreadId) -> Option<&ConversationThread> {
        self.threads.get(thread_id)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.map, self.generating, self.view_mode)
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    fn gate(&self) -> MergeGate {
        MergeGate {
            generating: self.generating,
            summary_view: self.view_mode == ViewMode::Summary,
        }
    }

    fn commit(&mut self, ops: &[Op]) -> Result<Delta, EditorError> {
        let rev = self.map.rev();
        Ok(apply_ops(&mut self.map, rev, ops)?.delta)
    }

    fn ensure_node(&self, node_id: &NodeId) -> Result<(), EditorError> {
        if self.map.graph().node(node_id).is_none() {
            return Err(EditorError::UnknownNode { node_id: node_id.clone() });
        }
        Ok(())
    }

    fn ensure_edge(&self, edge_id: &EdgeId) -> Result<(), EditorError> {
        if self.map.graph().edge(edge_id).is_none() {
            return Err(EditorError::UnknownEdge { edge_id: edge_id.clone() });
        }
        Ok(())
    }

    /// Selects exactly `node_id` and its incident edges; everything else is deselected.
    fn select_node_and_edges(&mut self, node_id: &NodeId) -> Result<Delta, EditorError> {
        self.ensure_node(node_id)?;
        let ops = selection_ops(
            self.map.graph(),
            |id, _| id == node_id,
            |_, edge| edge.touches(node_id),
        );

        self.selection = Selection::Node(node_id.clone());
        self.commit(&ops)
    }

    pub fn click_node(&mut self, node_id: &NodeId) -> Result<Delta, EditorError> {
        self.select_node_and_edges(node_id)
    }

    pub fn double_click_node(&mut self, node_id: &NodeId) -> Result<(), EditorError> {
        self.ensure_node(node_id)?;
        self.selection = Selection::Node(node_id.clone());
        Ok(())
    }

    /// Selects exactly `edge_id`; every node and every other edge is deselected.
    pub fn click_edge(&mut self, edge_id: &EdgeId) -> Result<Delta, EditorError> {
        self.ensure_edge(edge_id)?;
        let ops = selection_ops(self.map.graph(), |_, _| false, |id, _| id == edge_id);

        self.selection = Selection::Edge(edge_id.clone());
        self.commit(&ops)
    }

    pub fn double_click_edge(&mut self, edge_id: &EdgeId) -> Result<Delta, EditorError> {
        self.click_edge(edge_id)
    }

    /// Deselects everything, leaves editing mode on every node and clears the highlight.
    pub fn click_pane(&mut self) -> Result<Delta, EditorError> {
        let graph = self.map.graph();
        let mut ops = graph
            .nodes()
            .iter()
            .filter(|(_, node)| node.editing() || node.selected())
            .map(|(id, node)| {
                let patch = NodePatch {
                    editing: node.editing().then_some(false),
                    selected: node.selected().then_some(false),
                    ..NodePatch::default()
                };
                node_patch(id, patch)
            })
            .collect::<Vec<_>>();
        ops.extend(selection_ops(graph, |_, node| node.selected(), |_, _| false));

        self.highlight.clear();
        self.selection = Selection::None;
        self.commit(&ops)
    }

    pub fn drag_start(&mut self, node_id: &NodeId) -> Result<Delta, EditorError> {
        let delta = self.select_node_and_edges(node_id)?;
        self.dragging = Some(node_id.clone());
        Ok(delta)
    }

    /// Moves the dragged node by `(dx, dy)` and refreshes the merge feedback classes. While
    /// merging is suppressed the node still moves but no node is marked.
    pub fn drag_move(&mut self, node_id: &NodeId, dx: f64, dy: f64) -> Result<Delta, EditorError> {
        self.ensure_node(node_id)?;
        let graph = self.map.graph();
        let intersections = if self.gate().is_suppressed() {
            Vec::new()
        } else {
            classify_drag(graph, node_id, dx, dy)
        };

        let mut ops = Vec::with_capacity(graph.nodes().len() + 1);
        for (id, node) in graph.nodes() {
            let drag_class = if id == node_id {
                let position = node.position().offset(dx, dy);
                ops.push(node_patch(
                    id,
                    NodePatch { position: Some(position), ..NodePatch::default() },
                ));
                (!intersections.is_empty()).then_some(DragClass::MergeSource)
            } else {
                intersections.contains(id).then_some(DragClass::MergeTarget)
            };
            ops.push(Op::SetNodeDragClass { node_id: id.clone(), drag_class });
        }

        tracing::debug!(node = %node_id, dx, dy, hits = intersections.len(), "drag move");
        self.commit(&ops)
    }

    /// Ends a drag: merges into the first node under the dragged node's center, if any.
    pub fn drag_stop(&mut self, node_id: &NodeId) -> Result<DragOutcome, EditorError> {
        self.ensure_node(node_id)?;
        self.dragging = None;

        let graph = self.map.graph();
        let mut ops = graph
            .nodes()
            .iter()
            .filter(|(_, node)| node.drag_class().is_some())
            .map(|(id, _)| Op::SetNodeDragClass { node_id: id.clone(), drag_class: None })
            .collect::<Vec<_>>();

        let target = match resolve_drop(graph, node_id, self.gate()) {
            DropDecision::Suppressed => {
                self.commit(&ops)?;
                return Ok(DragOutcome::Suppressed);
            }
            DropDecision::Commit => {
                let delta = self.commit(&ops)?;
                return Ok(DragOutcome::Placed { delta });
            }
            DropDecision::Merge { target } => target,
        };

        match merge_ops(graph, node_id, &target) {
            Ok(merge) => ops.extend(merge),
            Err(MergeError::MissingTarget { .. }) => {
                tracing::warn!(node = %node_id, %target, "merge target missing, keeping position");
                let delta = self.commit(&ops)?;
                return Ok(DragOutcome::MergeAborted { target, delta });
            }
            Err(err) => return Err(err.into()),
        }

        let delta = self.commit(&ops)?;
        if self.selection == Selection::Node(node_id.clone()) {
            self.selection = Selection::Node(target.clone());
        }
        tracing::debug!(source = %node_id, %target, "merged nodes");
        Ok(DragOutcome::Merged { target, delta })
    }

    /// Adds a node for a token dropped at `position` (the node is centered there).
    ///
    /// Payloads that are not JSON or carry no usable `value` are ignored.
    pub fn drop_token(
        &mut self,
        position: Point,
        payload_json: &str,
    ) -> Result<Option<(NodeId, Delta)>, EditorError> {
        let label = match serde_json::from_str::<DropPayload>(payload_json) {
            Ok(payload) => payload.label(),
            Err(err) => {
                tracing::debug!(%err, "ignoring drop payload");
                None
            }
        };
        let Some(label) = label else {
            return Ok(None);
        };

        let Size { width, height } = self.config.node_size;
        let mut node = ConceptNode::new(label, position.offset(-width / 2.0, -height / 2.0));
        node.set_background(Some(self.config.node_background.as_str()));

        let node_id = self.map.graph().node_id_allocator().next_id();
        let delta = self.commit(&[Op::AddNode { node_id: node_id.clone(), node }])?;
        Ok(Some((node_id, delta)))
    }

    pub fn hover_node_enter(&mut self, node_id: &NodeId) {
        self.highlight = highlight::node_origins(self.map.graph(), node_id);
    }

    pub fn hover_node_leave(&mut self) {
        self.highlight = highlight::selected_node_origins(self.map.graph());
    }

    pub fn hover_edge_enter(&mut self, edge_id: &EdgeId) {
        self.highlight = highlight::edge_origins(self.map.graph(), edge_id);
    }

    pub fn hover_edge_leave(&mut self) {
        self.highlight = highlight::selected_edge_origins(self.map.graph());
    }

    pub fn measure_node(&mut self, node_id: &NodeId, size: Size) -> Result<Delta, EditorError> {
        self.ensure_node(node_id)?;
        self.commit(&[node_patch(node_id, NodePatch { size: Some(size), ..NodePatch::default() })])
    }

    /// Unknown ids are skipped.
    pub fn set_nodes_editing(
        &mut self,
        node_ids: &[NodeId],
        editing: bool,
    ) -> Result<Delta, EditorError> {
        let graph = self.map.graph();
        let ops = node_ids
            .iter()
            .filter(|id| graph.node(*id).is_some())
            .map(|id| node_patch(id, NodePatch { editing: Some(editing), ..NodePatch::default() }))
            .collect::<Vec<_>>();
        self.commit(&ops)
    }

    /// Unknown ids are skipped.
    pub fn set_edges_editing(
        &mut self,
        edge_ids: &[EdgeId],
        editing: bool,
    ) -> Result<Delta, EditorError> {
        let graph = self.map.graph();
        let ops = edge_ids
            .iter()
            .filter(|id| graph.edge(*id).is_some())
            .map(|id| Op::UpdateEdge {
                edge_id: id.clone(),
                patch: EdgePatch { editing: Some(editing), ..EdgePatch::default() },
            })
            .collect::<Vec<_>>();
        self.commit(&ops)
    }

    /// Selects exactly `node_ids` among the nodes; edges are left alone.
    pub fn select_nodes(&mut self, node_ids: &[NodeId]) -> Result<Delta, EditorError> {
        let ops = self
            .map
            .graph()
            .nodes()
            .iter()
            .filter(|(id, node)| node.selected() != node_ids.contains(*id))
            .map(|(id, node)| {
                let patch = NodePatch { selected: Some(!node.selected()), ..NodePatch::default() };
                node_patch(id, patch)
            })
            .collect::<Vec<_>>();
        self.commit(&ops)
    }

    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<Delta, EditorError> {
        self.ensure_node(node_id)?;
        let delta = self.commit(&[Op::RemoveNode { node_id: node_id.clone() }])?;
        self.forget_removed(&delta);
        Ok(delta)
    }

    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> Result<Delta, EditorError> {
        self.ensure_edge(edge_id)?;
        let delta = self.commit(&[Op::RemoveEdge { edge_id: edge_id.clone() }])?;
        self.forget_removed(&delta);
        Ok(delta)
    }

    fn forget_removed(&mut self, delta: &Delta) {
        let removed = delta.removed.iter().any(|object_ref| match &self.selection {
            Selection::Node(id) => object_ref.as_node() == Some(id),
            Selection::Edge(id) => object_ref.as_edge() == Some(id),
            Selection::None => false,
        });
        if removed {
            self.selection = Selection::None;
        }
        if self
            .dragging
            .as_ref()
            .is_some_and(|id| self.map.graph().node(id).is_none())
        {
            self.dragging = None;
        }
    }

    /// Starts a model request for `thread_id`. Any earlier request of the thread is superseded.
    pub fn issue_request(&mut self, thread_id: ThreadId) -> RequestTicket {
        self.threads
            .entry(thread_id.clone())
            .or_insert_with(|| ConversationThread::new(thread_id.clone()));
        self.tracker.issue(thread_id)
    }

    /// Delivers the model's answer for `ticket`.
    pub fn receive_response(
        &mut self,
        ticket: &RequestTicket,
        text: &str,
    ) -> Result<ResponseOutcome, EditorError> {
        if !self.tracker.is_latest(ticket) {
            tracing::warn!(
                thread = %ticket.thread_id(),
                seq = ticket.seq(),
                "discarding stale response"
            );
            return Ok(ResponseOutcome::Discarded);
        }
        let thread = thread_mut(&mut self.threads, ticket.thread_id())?;
        if let Some(held) = thread.take_held() {
            tracing::debug!(seq = held.ticket.seq(), "dropping superseded held response");
        }
        self.process_response(ticket, text, 0)
    }

    /// Delivers a corrected version of the response held for `ticket`'s thread.
    pub fn receive_correction(
        &mut self,
        ticket: &RequestTicket,
        text: &str,
    ) -> Result<ResponseOutcome, EditorError> {
        if !self.tracker.is_latest(ticket) {
            tracing::warn!(
                thread = %ticket.thread_id(),
                seq = ticket.seq(),
                "discarding stale correction"
            );
            return Ok(ResponseOutcome::Discarded);
        }
        let thread = thread_mut(&mut self.threads, ticket.thread_id())?;
        let Some(held) = thread.take_held() else {
            return Err(EditorError::NoHeldResponse { thread_id: ticket.thread_id().clone() });
        };
        self.process_response(ticket, text, held.rounds + 1)
    }

    fn process_response(
        &mut self,
        ticket: &RequestTicket,
        text: &str,
        rounds: u32,
    ) -> Result<ResponseOutcome, EditorError> {
        let annotation = parse_annotation(text);
        for issue in &annotation.issues {
            tracing::warn!(%issue, "annotation issue");
        }

        let thread = thread_mut(&mut self.threads, ticket.thread_id())?;
        let report = validate_with_known(&annotation.entities, &annotation.relationships, |id| {
            thread.knows(id)
        });

        if !report.is_clean() && rounds < self.config.max_correction_rounds {
            let next_entity_id = thread.next_entity_id(annotation.max_entity_id());
            let requests = locate_issues(text, &annotation, &report, next_entity_id);
            tracing::warn!(
                thread = %ticket.thread_id(),
                rounds,
                orphans = report.orphan_entity_ids.len(),
                dangling = report.dangling_relationships.len(),
                "holding response for correction"
            );
            thread.hold(HeldResponse { ticket: ticket.clone(), text: text.to_owned(), rounds });
            return Ok(ResponseOutcome::HeldForCorrection { requests });
        }

        let turn = thread.turns();
        let plan = reconcile(self.map.graph(), thread, &annotation, turn, &self.config);
        let delta = self.commit(&plan.ops)?;

        let thread = thread_mut(&mut self.threads, ticket.thread_id())?;
        thread.commit_turn(
            annotation.entities.iter().map(|entity| (entity.id, entity.label.as_str())),
        );
        tracing::debug!(
            thread = %ticket.thread_id(),
            turn,
            rev = self.map.rev(),
            "committed response"
        );

        Ok(ResponseOutcome::Committed {
            delta,
            unresolved: (!report.is_clean()).then_some(report),
            annotation_issues: annotation.issues,
            reconcile_issues: plan.issues,
        })
    }
}

fn thread_mut<'a>(
    threads: &'a mut HashMap<ThreadId, ConversationThread>,
    thread_id: &ThreadId,
) -> Result<&'a mut ConversationThread, EditorError> {
    threads
        .get_mut(thread_id)
        .ok_or_else(|| EditorError::UnknownThread { thread_id: thread_id.clone() })
}

fn node_patch(node_id: &NodeId, patch: NodePatch) -> Op {
    Op::UpdateNode { node_id: node_id.clone(), patch }
}

/// Ops that set each node's and edge's `selected` flag to the predicate's answer, skipping
/// objects already in that state.
fn selection_ops(
    graph: &ConceptGraph,
    node_selected: impl Fn(&NodeId, &ConceptNode) -> bool,
    edge_selected: impl Fn(&EdgeId, &ConceptEdge) -> bool,
) -> Vec<Op> {
    let nodes = graph.nodes().iter().filter_map(|(id, node)| {
        let selected = node_selected(id, node);
        (node.selected() != selected).then(|| {
            node_patch(id, NodePatch { selected: Some(selected), ..NodePatch::default() })
        })
    });
    let edges = graph.edges().iter().filter_map(|(id, edge)| {
        let selected = edge_selected(id, edge);
        (edge.selected() != selected).then(|| Op::UpdateEdge {
            edge_id: id.clone(),
            patch: EdgePatch { selected: Some(selected), ..EdgePatch::default() },
        })
    });
    nodes.chain(edges).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    UnknownNode { node_id: NodeId },
    UnknownEdge { edge_id: EdgeId },
    UnknownThread { thread_id: ThreadId },
    NoHeldResponse { thread_id: ThreadId },
    Apply(ApplyError),
    Merge(MergeError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "node not found (id={node_id})"),
            Self::UnknownEdge { edge_id } => write!(f, "edge not found (id={edge_id})"),
            Self::UnknownThread { thread_id } => write!(f, "thread not found (id={thread_id})"),
            Self::NoHeldResponse { thread_id } => {
                write!(f, "no response held for correction in thread {thread_id}")
            }
            Self::Apply(err) => write!(f, "apply failed: {err}"),
            Self::Merge(err) => write!(f, "merge failed: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Apply(err) => Some(err),
            Self::Merge(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApplyError> for EditorError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

impl From<MergeError> for EditorError {
    fn from(err: MergeError) -> Self {
        Self::Merge(err)
    }
}

#[cfg(test)]
mod tests;
