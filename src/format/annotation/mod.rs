// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inline entity/relationship markup.
//!
//! A model answer tags entities as `[label ($N1)]` and relationships as
//! `[label ($H, $N1, $N2; $L, $N1, $N3)]`, where each `;`-separated triple is one endpoint pair
//! with its own saliency. Parsing never fails: tags that look like markup but do not follow the
//! grammar are reported as [`AnnotationIssue::MalformedTag`] and otherwise ignored.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::model::{EntityId, OriginRange, Saliency};

mod grammar;
mod sentences;

use grammar::{GroupKind, Tag};

/// Byte range within a response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn slice(self, text: &str) -> &str {
        text.get(self.start..self.end).unwrap_or_default()
    }

    pub fn to_origin(self, turn: u64) -> OriginRange {
        OriginRange::new(turn, self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMention {
    pub span: TextSpan,
    pub sentence: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntity {
    pub id: EntityId,
    /// Label of the first mention.
    pub label: String,
    pub first_offset: usize,
    pub mentions: Vec<EntityMention>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointPair {
    pub saliency: Saliency,
    pub source: EntityId,
    pub target: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelationship {
    pub label: String,
    pub pairs: SmallVec<[EndpointPair; 2]>,
    pub span: TextSpan,
    pub sentence: usize,
}

impl ParsedRelationship {
    /// Saliency of the first pair.
    pub fn saliency(&self) -> Option<Saliency> {
        self.pairs.first().map(|pair| pair.saliency)
    }

    pub fn endpoint_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.pairs.iter().flat_map(|pair| [pair.source, pair.target])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationIssue {
    /// A bracket group containing `($` that is neither an entity nor a relationship tag.
    MalformedTag { span: TextSpan, text: String },
    /// The same label tagged with two different ids in one response.
    LabelReused { label: String, first: EntityId, other: EntityId },
}

impl fmt::Display for AnnotationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTag { span, text } => {
                write!(f, "malformed tag at {}..{}: {text}", span.start, span.end)
            }
            Self::LabelReused { label, first, other } => {
                write!(f, "label {label:?} tagged as {first} and {other}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnnotation {
    /// One entry per id, in first-seen order.
    pub entities: Vec<ParsedEntity>,
    /// In text order.
    pub relationships: Vec<ParsedRelationship>,
    pub sentences: Vec<TextSpan>,
    pub issues: Vec<AnnotationIssue>,
}

impl ParsedAnnotation {
    pub fn entity(&self, id: EntityId) -> Option<&ParsedEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn sentence_text<'a>(&self, text: &'a str, index: usize) -> Option<&'a str> {
        self.sentences.get(index).map(|span| span.slice(text))
    }

    /// Highest id tagged or referenced anywhere in the response.
    pub fn max_entity_id(&self) -> Option<EntityId> {
        let tagged = self.entities.iter().map(|entity| entity.id);
        let referenced = self.relationships.iter().flat_map(ParsedRelationship::endpoint_ids);
        tagged.chain(referenced).max()
    }

    pub fn has_malformed_tags(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, AnnotationIssue::MalformedTag { .. }))
    }
}

pub fn parse_annotation(text: &str) -> ParsedAnnotation {
    let groups = grammar::bracket_groups(text);
    let sentences = sentences::split_sentences(text, &groups);

    let mut entities: IndexMap<EntityId, ParsedEntity> = IndexMap::new();
    let mut first_id_by_label: HashMap<String, EntityId> = HashMap::new();
    let mut relationships = Vec::new();
    let mut issues = Vec::new();

    for group in groups {
        let span = TextSpan::new(group.start, group.end);
        let sentence = sentences::sentence_at(&sentences, span.start);
        let inner = &text[group.start + 1..group.end - 1];

        match grammar::classify_group(inner) {
            GroupKind::Prose => {}
            GroupKind::Malformed => {
                issues.push(AnnotationIssue::MalformedTag {
                    span,
                    text: span.slice(text).to_owned(),
                });
            }
            GroupKind::Tag(Tag::Entity { id, label }) => {
                let first = *first_id_by_label.entry(label.clone()).or_insert(id);
                if first != id && !label_reuse_reported(&issues, first, id) {
                    issues.push(AnnotationIssue::LabelReused {
                        label: label.clone(),
                        first,
                        other: id,
                    });
                }

                entities
                    .entry(id)
                    .or_insert_with(|| ParsedEntity {
                        id,
                        label,
                        first_offset: span.start,
                        mentions: Vec::new(),
                    })
                    .mentions
                    .push(EntityMention { span, sentence });
            }
            GroupKind::Tag(Tag::Relationship { label, pairs }) => {
                relationships.push(ParsedRelationship { label, pairs, span, sentence });
            }
        }
    }

    tracing::debug!(
        entities = entities.len(),
        relationships = relationships.len(),
        sentences = sentences.len(),
        issues = issues.len(),
        "parsed annotation"
    );

    ParsedAnnotation {
        entities: entities.into_values().collect(),
        relationships,
        sentences,
        issues,
    }
}

fn label_reuse_reported(issues: &[AnnotationIssue], first: EntityId, other: EntityId) -> bool {
    issues.iter().any(|issue| match issue {
        AnnotationIssue::LabelReused { first: f, other: o, .. } => *f == first && *o == other,
        AnnotationIssue::MalformedTag { .. } => false,
    })
}

/// The prose of `text` with every well-formed tag replaced by its label.
///
/// Malformed tags and plain bracketed prose are kept verbatim.
pub fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for group in grammar::bracket_groups(text) {
        let inner = &text[group.start + 1..group.end - 1];
        if let GroupKind::Tag(tag) = grammar::classify_group(inner) {
            out.push_str(&text[cursor..group.start]);
            out.push_str(tag.label());
            cursor = group.end;
        }
    }
    out.push_str(&text[cursor..]);

    out
}
