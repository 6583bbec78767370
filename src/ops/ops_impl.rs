// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Node/edge mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(
    graph: &mut ConceptGraph,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        Op::AddNode { node_id, node } => {
            if graph.nodes().contains_key(node_id) {
                return Err(ApplyError::AlreadyExists { object_ref: node_ref(node_id) });
            }
            graph.nodes_mut().insert(node_id.clone(), node.clone());
            delta.record_added(node_ref(node_id));
            Ok(())
        }
        Op::UpdateNode { node_id, patch } => {
            let Some(existing) = graph.nodes_mut().get_mut(node_id) else {
                return Err(ApplyError::NotFound { object_ref: node_ref(node_id) });
            };

            if let Some(label) = &patch.label {
                existing.set_label(label.clone());
            }
            if let Some(position) = patch.position {
                existing.set_position(position);
            }
            if let Some(size) = patch.size {
                existing.set_size(Some(size));
            }
            if let Some(background) = patch.background.as_deref() {
                existing.set_background(Some(background));
            }
            if let Some(selected) = patch.selected {
                existing.set_selected(selected);
            }
            if let Some(editing) = patch.editing {
                existing.set_editing(editing);
            }
            existing.extend_origins(&patch.add_origins);
            existing.absorb_entity_ids(&patch.add_entity_ids);
            delta.record_updated(node_ref(node_id));
            Ok(())
        }
        Op::SetNodeDragClass { node_id, drag_class } => {
            let Some(existing) = graph.nodes_mut().get_mut(node_id) else {
                return Err(ApplyError::NotFound { object_ref: node_ref(node_id) });
            };

            if existing.drag_class() != *drag_class {
                existing.set_drag_class(*drag_class);
                delta.record_updated(node_ref(node_id));
            }
            Ok(())
        }
        Op::RemoveNode { node_id } => {
            if graph.nodes_mut().shift_remove(node_id).is_none() {
                return Err(ApplyError::NotFound { object_ref: node_ref(node_id) });
            }
            for edge_id in graph.incident_edge_ids(node_id) {
                graph.edges_mut().shift_remove(&edge_id);
                delta.record_removed(ObjectRef::Edge(edge_id));
            }
            delta.record_removed(node_ref(node_id));
            Ok(())
        }
        Op::AddEdge { edge_id, edge } => {
            if graph.edges().contains_key(edge_id) {
                return Err(ApplyError::AlreadyExists { object_ref: edge_ref(edge_id) });
            }
            ensure_endpoints(graph, edge.source(), edge.target())?;
            graph.edges_mut().insert(edge_id.clone(), edge.clone());
            delta.record_added(edge_ref(edge_id));
            Ok(())
        }
        Op::UpdateEdge { edge_id, patch } => {
            let Some(mut updated) = graph.edges().get(edge_id).cloned() else {
                return Err(ApplyError::NotFound { object_ref: edge_ref(edge_id) });
            };

            if let Some(source) = &patch.source {
                updated.set_source(source.clone());
            }
            if let Some(target) = &patch.target {
                updated.set_target(target.clone());
            }
            if patch.source_handle.is_some() || patch.target_handle.is_some() {
                let source_handle =
                    patch.source_handle.as_deref().or(updated.source_handle()).map(str::to_owned);
                let target_handle =
                    patch.target_handle.as_deref().or(updated.target_handle()).map(str::to_owned);
                updated.set_handles(source_handle, target_handle);
            }
            if let Some(label) = &patch.label {
                updated.set_label(label.clone());
            }
            if let Some(saliency) = patch.saliency {
                updated.set_saliency(Some(saliency));
            }
            if let Some(selected) = patch.selected {
                updated.set_selected(selected);
            }
            if let Some(editing) = patch.editing {
                updated.set_editing(editing);
            }
            updated.extend_origins(&patch.add_origins);

            ensure_endpoints(graph, updated.source(), updated.target())?;
            graph.edges_mut().insert(edge_id.clone(), updated);
            delta.record_updated(edge_ref(edge_id));
            Ok(())
        }
        Op::RemoveEdge { edge_id } => {
            if graph.edges_mut().shift_remove(edge_id).is_none() {
                return Err(ApplyError::NotFound { object_ref: edge_ref(edge_id) });
            }
            delta.record_removed(edge_ref(edge_id));
            Ok(())
        }
        Op::ReplaceAll { graph: replacement } => {
            if let Some((edge_id, node_id)) = replacement.dangling_edges().into_iter().next() {
                return Err(ApplyError::DanglingEdge { edge_id, node_id });
            }
            record_replacement(graph, replacement, delta);
            *graph = replacement.clone();
            Ok(())
        }
    }
}

fn ensure_endpoints(
    graph: &ConceptGraph,
    source: &NodeId,
    target: &NodeId,
) -> Result<(), ApplyError> {
    for node_id in [source, target] {
        if !graph.nodes().contains_key(node_id) {
            return Err(ApplyError::MissingNode { node_id: node_id.clone() });
        }
    }
    Ok(())
}

fn record_replacement(old: &ConceptGraph, new: &ConceptGraph, delta: &mut DeltaBuilder) {
    for (node_id, node) in old.nodes() {
        match new.nodes().get(node_id) {
            None => delta.record_removed(node_ref(node_id)),
            Some(replacement) if replacement != node => {
                delta.record_updated(node_ref(node_id));
            }
            Some(_) => {}
        }
    }
    for node_id in new.nodes().keys() {
        if !old.nodes().contains_key(node_id) {
            delta.record_added(node_ref(node_id));
        }
    }

    for (edge_id, edge) in old.edges() {
        match new.edges().get(edge_id) {
            None => delta.record_removed(edge_ref(edge_id)),
            Some(replacement) if replacement != edge => {
                delta.record_updated(edge_ref(edge_id));
            }
            Some(_) => {}
        }
    }
    for edge_id in new.edges().keys() {
        if !old.edges().contains_key(edge_id) {
            delta.record_added(edge_ref(edge_id));
        }
    }
}

fn node_ref(node_id: &NodeId) -> ObjectRef {
    ObjectRef::Node(node_id.clone())
}

fn edge_ref(edge_id: &EdgeId) -> ObjectRef {
    ObjectRef::Edge(edge_id.clone())
}
