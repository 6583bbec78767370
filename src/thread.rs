// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversation threads and request sequencing.
//!
//! Every model request gets a [`RequestTicket`]. Only the latest ticket of a thread may change
//! the graph; a response for an older ticket is dropped before it is parsed.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::{EntityId, ThreadId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    thread_id: ThreadId,
    seq: u64,
}

impl RequestTicket {
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Hands out tickets with a sequence number that increases across all threads.
#[derive(Debug, Default)]
pub struct RequestTracker {
    last_seq: u64,
    latest: HashMap<ThreadId, u64>,
}

impl RequestTracker {
    pub fn issue(&mut self, thread_id: ThreadId) -> RequestTicket {
        self.last_seq += 1;
        self.latest.insert(thread_id.clone(), self.last_seq);
        RequestTicket { thread_id, seq: self.last_seq }
    }

    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        self.latest.get(&ticket.thread_id) == Some(&ticket.seq)
    }

    pub fn latest(&self, thread_id: &ThreadId) -> Option<u64> {
        self.latest.get(thread_id).copied()
    }
}

/// A response that failed validation and waits for a corrected version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldResponse {
    pub ticket: RequestTicket,
    pub text: String,
    /// Correction rounds already spent on this response.
    pub rounds: u32,
}

#[derive(Debug, Clone)]
pub struct ConversationThread {
    thread_id: ThreadId,
    turns: u64,
    entities: IndexMap<EntityId, String>,
    first_id_by_label: HashMap<String, EntityId>,
    held: Option<HeldResponse>,
}

impl ConversationThread {
    pub fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            turns: 0,
            entities: IndexMap::new(),
            first_id_by_label: HashMap::new(),
            held: None,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Number of committed turns; also the turn index of the next committed response.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn knows(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity_label(&self, id: EntityId) -> Option<&str> {
        self.entities.get(&id).map(String::as_str)
    }

    pub fn known_entities(&self) -> impl Iterator<Item = (EntityId, &str)> + '_ {
        self.entities.iter().map(|(id, label)| (*id, label.as_str()))
    }

    /// Id first used for exactly `label` in this thread.
    pub fn entity_for_label(&self, label: &str) -> Option<EntityId> {
        self.first_id_by_label.get(label).copied()
    }

    /// First id not used by this thread nor by `pending` (the highest id of a response that is
    /// not committed yet).
    pub fn next_entity_id(&self, pending: Option<EntityId>) -> EntityId {
        self.entities
            .keys()
            .copied()
            .chain(pending)
            .max()
            .map_or(EntityId::new(1), EntityId::next)
    }

    /// Records the entities of a committed response and advances the turn counter.
    pub fn commit_turn<'a>(&mut self, entities: impl IntoIterator<Item = (EntityId, &'a str)>) {
        for (id, label) in entities {
            self.first_id_by_label.entry(label.to_owned()).or_insert(id);
            self.entities.insert(id, label.to_owned());
        }
        self.turns += 1;
        self.held = None;
    }

    pub fn held(&self) -> Option<&HeldResponse> {
        self.held.as_ref()
    }

    pub fn hold(&mut self, held: HeldResponse) {
        self.held = Some(held);
    }

    pub fn take_held(&mut self) -> Option<HeldResponse> {
        self.held.take()
    }
}
