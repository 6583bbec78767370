// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graphologue: the headless core of a concept-map editor.
//!
//! A model answer annotated with `[label ($N1)]` entity tags and
//! `[label ($H, $N1, $N2)]` relationship tags is parsed, validated and reconciled into a
//! concept graph; dragging one node onto another merges them. Rendering and the model client
//! live outside this crate and talk to [`editor::Editor`].

pub mod config;
pub mod editor;
pub mod format;
pub mod merge;
pub mod model;
pub mod ops;
pub mod query;
pub mod reconcile;
pub mod thread;
pub mod validate;
