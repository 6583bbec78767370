// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::config::EditorConfig;
use crate::model::fixtures::{eid, nid, sized_node};
use crate::model::{
    ConceptEdge, ConceptGraph, ConceptMap, EntityId, MapId, NodeId, ObjectRef, OriginRange, Point,
    Saliency, Size, ThreadId,
};

use super::{DragOutcome, Editor, EditorError, ResponseOutcome, Selection, ViewMode};

const CAT_AND_DOG: &str =
    "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)]. [Dog ($N3)] is mentioned.";

/// `A`, `B` and `C` well apart; moving `A` by (230, 10) puts its center inside `B`.
fn spread() -> ConceptGraph {
    let mut graph = ConceptGraph::default();
    let nodes = [
        ("n:a", "A", 0.0, 0.0, 1),
        ("n:b", "B", 200.0, 0.0, 2),
        ("n:c", "C", 400.0, 300.0, 3),
    ];
    for (index, (id, label, x, y, entity)) in nodes.into_iter().enumerate() {
        let mut node = sized_node(label, x, y, 100.0, 40.0);
        node.absorb_entity_ids(&[EntityId::new(entity)]);
        let start = index * 10;
        node.extend_origins(&[OriginRange::new(0, start, start + 5)]);
        graph.nodes_mut().insert(nid(id), node);
    }

    let edges = [("e:0", "n:a", "n:c", "feeds"), ("e:1", "n:c", "n:a", "depends on")];
    for (id, source, target, label) in edges {
        let mut edge = ConceptEdge::new(nid(source), nid(target), label);
        edge.extend_origins(&[OriginRange::new(0, 40, 50)]);
        graph.edges_mut().insert(eid(id), edge);
    }
    graph
        .edges_mut()
        .insert(eid("e:2"), ConceptEdge::new(nid("n:b"), nid("n:c"), "near"));
    graph
}

#[fixture]
fn editor() -> Editor {
    let map = ConceptMap::new(MapId::new("m:1").expect("map id"), "answer", spread());
    Editor::new(map, EditorConfig::default())
}

fn empty_editor() -> Editor {
    let map = ConceptMap::new(MapId::new("m:2").expect("map id"), "answer", Default::default());
    Editor::new(map, EditorConfig::default())
}

fn tid(value: &str) -> ThreadId {
    ThreadId::new(value).expect("thread id")
}

fn selected_nodes(editor: &Editor) -> Vec<&str> {
    let graph = editor.map().graph();
    graph.nodes().iter().filter(|(_, node)| node.selected()).map(|(id, _)| id.as_str()).collect()
}

fn selected_edges(editor: &Editor) -> Vec<&str> {
    let graph = editor.map().graph();
    graph.edges().iter().filter(|(_, edge)| edge.selected()).map(|(id, _)| id.as_str()).collect()
}

fn class_of<'a>(snapshot: &'a super::RenderSnapshot, id: &str) -> Option<&'a str> {
    snapshot.node(id).and_then(|node| node.class_name.as_deref())
}

#[rstest]
fn click_node_selects_it_with_its_edges(mut editor: Editor) {
    editor.click_node(&nid("n:a")).expect("click a");
    assert_eq!(selected_nodes(&editor), vec!["n:a"]);
    assert_eq!(selected_edges(&editor), vec!["e:0", "e:1"]);
    assert_eq!(editor.selection(), &Selection::Node(nid("n:a")));

    editor.click_node(&nid("n:b")).expect("click b");
    assert_eq!(selected_nodes(&editor), vec!["n:b"]);
    assert_eq!(selected_edges(&editor), vec!["e:2"]);
}

#[rstest]
fn click_unknown_node_fails(mut editor: Editor) {
    let err = editor.click_node(&nid("n:zz")).unwrap_err();
    assert_eq!(err, EditorError::UnknownNode { node_id: nid("n:zz") });
    assert_eq!(editor.map().rev(), 0);
}

#[rstest]
fn edge_click_selects_only_that_edge(mut editor: Editor) {
    editor.click_node(&nid("n:a")).expect("click a");

    let delta = editor.click_edge(&eid("e:2")).expect("click edge");
    assert_eq!(editor.selection(), &Selection::Edge(eid("e:2")));
    assert!(selected_nodes(&editor).is_empty());
    assert_eq!(selected_edges(&editor), vec!["e:2"]);
    assert_eq!(editor.map().rev(), 2);
    assert!(delta.updated.contains(&ObjectRef::Edge(eid("e:0"))));

    editor.double_click_edge(&eid("e:0")).expect("double click edge");
    assert_eq!(selected_edges(&editor), vec!["e:0"]);
    assert!(editor.double_click_edge(&eid("e:9")).is_err());
}

#[rstest]
fn double_click_node_only_moves_the_selection(mut editor: Editor) {
    editor.double_click_node(&nid("n:c")).expect("double click");
    assert_eq!(editor.selection(), &Selection::Node(nid("n:c")));
    assert!(selected_nodes(&editor).is_empty());
    assert_eq!(editor.map().rev(), 0);
}

#[rstest]
fn pane_click_leaves_editing_and_clears_context(mut editor: Editor) {
    editor.set_nodes_editing(&[nid("n:a"), nid("n:b")], true).expect("editing");
    editor.click_node(&nid("n:a")).expect("click");
    editor.hover_node_enter(&nid("n:a"));
    assert!(!editor.highlight().is_empty());

    editor.click_pane().expect("pane");
    let graph = editor.map().graph();
    assert!(graph.nodes().values().all(|node| !node.editing()));
    assert!(editor.highlight().is_empty());
    assert_eq!(editor.selection(), &Selection::None);
}

#[rstest]
fn pane_click_deselects_every_node_and_edge(mut editor: Editor) {
    editor.click_node(&nid("n:a")).expect("click a");
    editor.click_node(&nid("n:b")).expect("click b");

    editor.click_pane().expect("pane");
    assert!(selected_nodes(&editor).is_empty());
    assert!(selected_edges(&editor).is_empty());

    let rev = editor.map().rev();
    editor.click_pane().expect("pane again");
    assert_eq!(editor.map().rev(), rev);
}

#[rstest]
fn drag_move_marks_merge_source_and_target(mut editor: Editor) {
    editor.drag_start(&nid("n:a")).expect("start");
    editor.drag_move(&nid("n:a"), 230.0, 10.0).expect("move");

    let snapshot = editor.snapshot();
    assert_eq!(class_of(&snapshot, "n:a"), Some("node-to-merge-source"));
    assert_eq!(class_of(&snapshot, "n:b"), Some("node-to-merge-target"));
    assert_eq!(class_of(&snapshot, "n:c"), None);
    assert_eq!(snapshot.node("n:a").map(|node| node.position), Some(Point::new(230.0, 10.0)));

    editor.drag_move(&nid("n:a"), 0.0, 200.0).expect("move away");
    let snapshot = editor.snapshot();
    assert!(snapshot.nodes.iter().all(|node| node.class_name.is_none()));
}

#[rstest]
fn drag_stop_over_a_node_merges_into_it(mut editor: Editor) {
    editor.drag_start(&nid("n:a")).expect("start");
    editor.drag_move(&nid("n:a"), 230.0, 10.0).expect("move");

    let outcome = editor.drag_stop(&nid("n:a")).expect("stop");
    let DragOutcome::Merged { target, delta } = outcome else {
        panic!("expected a merge, got {outcome:?}");
    };
    assert_eq!(target, nid("n:b"));
    assert!(delta.removed.contains(&ObjectRef::Node(nid("n:a"))));

    let graph = editor.map().graph();
    assert!(graph.node(&nid("n:a")).is_none());
    assert!(graph.dangling_edges().is_empty());
    let b = graph.node(&nid("n:b")).expect("b");
    assert_eq!(b.entity_ids(), &[EntityId::new(2), EntityId::new(1)]);
    assert_eq!(b.drag_class(), None);
    let feeds = graph.edge(&eid("e:0")).expect("feeds");
    assert_eq!(feeds.source(), &nid("n:b"));
    assert_eq!(editor.selection(), &Selection::Node(nid("n:b")));
}

#[rstest]
fn drag_stop_on_empty_canvas_keeps_the_position(mut editor: Editor) {
    editor.drag_start(&nid("n:a")).expect("start");
    editor.drag_move(&nid("n:a"), 0.0, 200.0).expect("move");

    let outcome = editor.drag_stop(&nid("n:a")).expect("stop");
    assert!(matches!(outcome, DragOutcome::Placed { .. }));
    let a = editor.map().graph().node(&nid("n:a")).expect("a");
    assert_eq!(a.position(), Point::new(0.0, 200.0));
    assert_eq!(editor.map().graph().nodes().len(), 3);
}

#[rstest]
#[case(true, ViewMode::Full)]
#[case(false, ViewMode::Summary)]
fn merging_is_suppressed_while_generating_or_summarised(
    mut editor: Editor,
    #[case] generating: bool,
    #[case] view_mode: ViewMode,
) {
    editor.set_generating(generating);
    editor.set_view_mode(view_mode);
    editor.drag_start(&nid("n:a")).expect("start");
    editor.drag_move(&nid("n:a"), 230.0, 10.0).expect("move");

    let snapshot = editor.snapshot();
    assert!(snapshot.nodes.iter().all(|node| node.class_name.is_none()));
    assert_eq!(snapshot.node("n:a").map(|node| node.position), Some(Point::new(230.0, 10.0)));

    let outcome = editor.drag_stop(&nid("n:a")).expect("stop");
    assert_eq!(outcome, DragOutcome::Suppressed);
    assert_eq!(editor.map().graph().nodes().len(), 3);
}

#[test]
fn dropped_token_becomes_a_centered_node() {
    let mut editor = empty_editor();
    let (node_id, delta) = editor
        .drop_token(Point::new(300.0, 300.0), r#"{"value":"photosynthesis"}"#)
        .expect("drop")
        .expect("node added");

    assert_eq!(delta.added, vec![ObjectRef::Node(node_id.clone())]);
    let node = editor.map().graph().node(&node_id).expect("node");
    assert_eq!(node.label(), "photosynthesis");
    assert_eq!(node.position(), Point::new(220.0, 278.5));
    assert_eq!(node.background(), Some("#ffffff"));

    let (number_id, _) = editor
        .drop_token(Point::new(0.0, 0.0), r#"{"value":42}"#)
        .expect("drop")
        .expect("node added");
    assert_ne!(number_id, node_id);
    assert_eq!(editor.map().graph().node(&number_id).map(|node| node.label()), Some("42"));
}

#[rstest]
#[case("not json")]
#[case("{}")]
#[case(r#"{"value":""}"#)]
#[case(r#"{"value":"   "}"#)]
#[case(r#"{"value":null}"#)]
#[case(r#"{"value":["a"]}"#)]
fn unusable_drop_payloads_are_ignored(#[case] payload: &str) {
    let mut editor = empty_editor();
    let dropped = editor.drop_token(Point::new(10.0, 10.0), payload).expect("drop");
    assert!(dropped.is_none());
    assert_eq!(editor.map().rev(), 0);
}

#[rstest]
fn hover_highlights_origins_and_falls_back_to_the_selection(mut editor: Editor) {
    editor.hover_node_enter(&nid("n:b"));
    assert_eq!(editor.highlight(), &[OriginRange::new(0, 10, 15)]);

    editor.click_node(&nid("n:c")).expect("click");
    editor.hover_node_leave();
    assert_eq!(editor.highlight(), &[OriginRange::new(0, 20, 25)]);

    editor.hover_edge_enter(&eid("e:0"));
    assert_eq!(editor.highlight(), &[OriginRange::new(0, 40, 50)]);

    editor.hover_edge_leave();
    // e:0 and e:1 are selected with n:c and share one origin.
    assert_eq!(
        editor.highlight(),
        &[OriginRange::new(0, 40, 50), OriginRange::new(0, 40, 50)]
    );
}

#[rstest]
fn measuring_sets_the_node_size(mut editor: Editor) {
    editor.measure_node(&nid("n:c"), Size::new(120.0, 43.0)).expect("measure");
    let c = editor.map().graph().node(&nid("n:c")).expect("c");
    assert_eq!(c.size(), Some(Size::new(120.0, 43.0)));

    let err = editor.measure_node(&nid("n:x"), Size::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, EditorError::UnknownNode { .. }));
}

#[rstest]
fn editing_flags_skip_unknown_ids(mut editor: Editor) {
    let delta = editor.set_nodes_editing(&[nid("n:a"), nid("n:x")], true).expect("nodes");
    assert_eq!(delta.updated, vec![ObjectRef::Node(nid("n:a"))]);

    let delta = editor.set_edges_editing(&[eid("e:x"), eid("e:2")], true).expect("edges");
    assert_eq!(delta.updated, vec![ObjectRef::Edge(eid("e:2"))]);
    assert!(editor.map().graph().edge(&eid("e:2")).is_some_and(|edge| edge.editing()));
}

#[rstest]
fn select_nodes_replaces_the_node_selection(mut editor: Editor) {
    editor.select_nodes(&[nid("n:a"), nid("n:c")]).expect("select");
    assert_eq!(selected_nodes(&editor), vec!["n:a", "n:c"]);

    editor.select_nodes(&[nid("n:b")]).expect("select");
    assert_eq!(selected_nodes(&editor), vec!["n:b"]);
    assert!(selected_edges(&editor).is_empty());
}

#[rstest]
fn removing_the_selected_node_clears_the_selection(mut editor: Editor) {
    editor.click_node(&nid("n:c")).expect("click");
    let delta = editor.remove_node(&nid("n:c")).expect("remove");

    assert!(delta.removed.contains(&ObjectRef::Node(nid("n:c"))));
    assert_eq!(editor.selection(), &Selection::None);
    assert!(editor.map().graph().edges().is_empty());

    editor.click_edge(&eid("e:9")).unwrap_err();
    assert!(editor.remove_edge(&eid("e:0")).is_err());
}

#[rstest]
fn removing_another_edge_keeps_the_edge_selection(mut editor: Editor) {
    editor.click_edge(&eid("e:2")).expect("click");
    editor.remove_edge(&eid("e:0")).expect("remove other");
    assert_eq!(editor.selection(), &Selection::Edge(eid("e:2")));

    editor.remove_edge(&eid("e:2")).expect("remove selected");
    assert_eq!(editor.selection(), &Selection::None);
}

#[test]
fn clean_response_is_committed() {
    let mut editor = empty_editor();
    let ticket = editor.issue_request(tid("t:1"));
    let text = "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)].";

    let outcome = editor.receive_response(&ticket, text).expect("response");
    let ResponseOutcome::Committed { delta, unresolved, annotation_issues, reconcile_issues } =
        outcome
    else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!(delta.added.len(), 3);
    assert!(unresolved.is_none());
    assert!(annotation_issues.is_empty());
    assert!(reconcile_issues.is_empty());

    let graph = editor.map().graph();
    let labels = graph.nodes().values().map(|node| node.label()).collect::<Vec<_>>();
    assert_eq!(labels, vec!["Cat", "fish"]);
    let likes = graph.edges().values().next().expect("likes");
    assert_eq!(likes.saliency(), Some(Saliency::High));
    assert_eq!(editor.thread(&tid("t:1")).map(|thread| thread.turns()), Some(1));
}

#[test]
fn inconsistent_response_is_held_then_committed_after_the_last_round() {
    let mut editor = empty_editor();
    let ticket = editor.issue_request(tid("t:1"));

    let outcome = editor.receive_response(&ticket, CAT_AND_DOG).expect("response");
    let ResponseOutcome::HeldForCorrection { requests } = outcome else {
        panic!("expected a hold, got {outcome:?}");
    };
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].sentence, 1);
    assert_eq!(requests[0].sentence_text, "[Dog ($N3)] is mentioned.");
    assert_eq!(requests[0].orphan_labels, vec!["Dog".to_owned()]);
    assert_eq!(requests[0].next_entity_id, EntityId::new(4));
    assert!(editor.map().graph().nodes().is_empty());

    let still_wrong = "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)]. [Dog ($N3)] barks.";
    let outcome = editor.receive_correction(&ticket, still_wrong).expect("correction");
    let ResponseOutcome::Committed { unresolved: Some(report), .. } = outcome else {
        panic!("expected a commit with findings, got {outcome:?}");
    };
    assert_eq!(report.orphan_entity_ids, vec![EntityId::new(3)]);

    let graph = editor.map().graph();
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.edges().len(), 1);
    assert!(editor.thread(&tid("t:1")).is_some_and(|thread| thread.held().is_none()));
}

#[test]
fn correction_without_a_held_response_fails() {
    let mut editor = empty_editor();
    let ticket = editor.issue_request(tid("t:1"));
    let err = editor.receive_correction(&ticket, "[Cat ($N1)].").unwrap_err();
    assert_eq!(err, EditorError::NoHeldResponse { thread_id: tid("t:1") });
}

#[test]
fn superseded_response_never_touches_the_graph() {
    let mut editor = empty_editor();
    let first = editor.issue_request(tid("t:1"));
    let second = editor.issue_request(tid("t:1"));

    let outcome = editor.receive_response(&first, CAT_AND_DOG).expect("first");
    assert_eq!(outcome, ResponseOutcome::Discarded);
    assert_eq!(editor.map().rev(), 0);

    let outcome = editor
        .receive_response(&second, "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)].")
        .expect("second");
    assert!(matches!(outcome, ResponseOutcome::Committed { .. }));
    assert_eq!(
        editor.receive_correction(&first, "[Cat ($N1)].").expect("late"),
        ResponseOutcome::Discarded
    );
}

#[test]
fn follow_up_turn_links_to_known_entities() {
    let mut editor = empty_editor();
    let ticket = editor.issue_request(tid("t:1"));
    editor
        .receive_response(&ticket, "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)].")
        .expect("first turn");

    let ticket = editor.issue_request(tid("t:1"));
    let outcome = editor
        .receive_response(&ticket, "[Dog ($N3)] [chases ($L, $N3, $N1)] the cat.")
        .expect("second turn");
    assert!(matches!(outcome, ResponseOutcome::Committed { unresolved: None, .. }));

    let graph = editor.map().graph();
    let chases = graph
        .edges()
        .values()
        .find(|edge| edge.label() == "chases")
        .expect("chases");
    assert_eq!(chases.source(), &EntityId::new(3).node_id());
    assert_eq!(chases.target(), &EntityId::new(1).node_id());
    assert_eq!(graph.node(&EntityId::new(3).node_id()).map(|node| node.origins()[0].turn), Some(1));
}

#[rstest]
fn snapshot_serializes_render_state(mut editor: Editor) {
    editor.drag_move(&nid("n:a"), 230.0, 10.0).expect("move");
    editor.set_view_mode(ViewMode::Summary);

    let value = serde_json::to_value(editor.snapshot()).expect("json");
    assert_eq!(value["view_mode"], "summary");
    assert_eq!(value["rev"], 1);
    assert_eq!(value["nodes"][0]["id"], "n:a");
    assert_eq!(value["nodes"][0]["class_name"], "node-to-merge-source");
    assert_eq!(value["nodes"][0]["entity_ids"][0], "$N1");
    assert_eq!(value["edges"][2]["label"], "near");

    let schema = super::RenderSnapshot::json_schema();
    assert!(schema["properties"]["nodes"].is_object());
}

#[test]
fn node_ids_follow_entity_ids() {
    let mut editor = empty_editor();
    let ticket = editor.issue_request(tid("t:1"));
    editor
        .receive_response(&ticket, "[Cat ($N1)] [likes ($H, $N1, $N2)] [fish ($N2)].")
        .expect("response");
    let ids = editor.map().graph().nodes().keys().map(NodeId::as_str).collect::<Vec<_>>();
    assert_eq!(ids, vec!["n:N1", "n:N2"]);
}
