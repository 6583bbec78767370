// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text formats read by the editor.
//!
//! Currently this covers the inline annotation markup a model answer is written in.

pub mod annotation;

pub use annotation::{
    parse_annotation, strip_annotations, AnnotationIssue, EndpointPair, EntityMention,
    ParsedAnnotation, ParsedEntity, ParsedRelationship, TextSpan,
};
