// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a concept graph.
//!
//! Queries never mutate; they feed drag feedback, merge decisions and text highlighting.

pub mod highlight;
pub mod intersect;

pub use intersect::{intersections, node_intersections, offset_center};
