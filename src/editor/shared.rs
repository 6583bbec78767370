// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! An [`Editor`] shared between the UI and in-flight model requests.
//!
//! The lock is never held while a response is awaited, so UI events keep flowing during
//! generation. Responses that arrive after a newer request of the same thread are discarded.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::model::ThreadId;
use crate::thread::RequestTicket;

use super::{Editor, EditorError, RenderSnapshot, ResponseOutcome};

#[derive(Debug, Clone)]
pub struct SharedEditor {
    state: Arc<Mutex<Editor>>,
}

impl SharedEditor {
    pub fn new(editor: Editor) -> Self {
        Self { state: Arc::new(Mutex::new(editor)) }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Editor> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> RenderSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn begin(&self, thread_id: ThreadId) -> RequestTicket {
        let mut editor = self.state.lock().await;
        editor.set_generating(true);
        editor.issue_request(thread_id)
    }

    pub async fn deliver(
        &self,
        ticket: &RequestTicket,
        text: &str,
    ) -> Result<ResponseOutcome, EditorError> {
        let mut editor = self.state.lock().await;
        let outcome = editor.receive_response(ticket, text);
        settle(&mut editor, &outcome);
        outcome
    }

    pub async fn deliver_correction(
        &self,
        ticket: &RequestTicket,
        text: &str,
    ) -> Result<ResponseOutcome, EditorError> {
        let mut editor = self.state.lock().await;
        let outcome = editor.receive_correction(ticket, text);
        settle(&mut editor, &outcome);
        outcome
    }

    /// Issues a request for `thread_id`, awaits `response` without holding the lock, then
    /// delivers it.
    pub async fn request<F>(
        &self,
        thread_id: ThreadId,
        response: F,
    ) -> Result<ResponseOutcome, EditorError>
    where
        F: Future<Output = String>,
    {
        let ticket = self.begin(thread_id).await;
        let text = response.await;
        self.deliver(&ticket, &text).await
    }
}

/// Clears `generating` once a response is committed or rejected. Held and discarded responses
/// leave it set.
fn settle(editor: &mut Editor, outcome: &Result<ResponseOutcome, EditorError>) {
    if matches!(outcome, Ok(ResponseOutcome::Committed { .. }) | Err(_)) {
        editor.set_generating(false);
    }
}
