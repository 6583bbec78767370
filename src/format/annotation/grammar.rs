// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::model::{EntityId, Saliency};

use super::EndpointPair;

// Labels may contain parentheses (`people (users)`) but never end in `$` or whitespace.
const ENTITY_PATTERN: &str = r"^\s*(?P<label>.*?[^\s$])\s*\(\s*\$N(?P<id>\d+)\s*\)\s*$";
const RELATIONSHIP_PATTERN: &str = concat!(
    r"^\s*(?P<label>.*?[^\s$])\s*\(\s*",
    r"(?P<pairs>\$[HL]\s*,\s*\$N\d+\s*,\s*\$N\d+(?:\s*;\s*\$[HL]\s*,\s*\$N\d+\s*,\s*\$N\d+)*)",
    r"\s*\)\s*$",
);
// An opening parenthesis followed by `$` marks a group as meant to be a tag.
const TAG_MARKER_PATTERN: &str = r"\(\s*\$";
const PAIR_PATTERN: &str = concat!(
    r"^\s*\$(?P<saliency>[HL])\s*,",
    r"\s*\$N(?P<source>\d+)\s*,\s*\$N(?P<target>\d+)\s*$",
);

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ENTITY_PATTERN).expect("valid entity tag pattern"))
}

fn relationship_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RELATIONSHIP_PATTERN).expect("valid relationship tag pattern"))
}

fn tag_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAG_MARKER_PATTERN).expect("valid tag marker pattern"))
}

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PAIR_PATTERN).expect("valid endpoint pair pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Tag {
    Entity { id: EntityId, label: String },
    Relationship { label: String, pairs: SmallVec<[EndpointPair; 2]> },
}

impl Tag {
    pub(super) fn label(&self) -> &str {
        match self {
            Self::Entity { label, .. } | Self::Relationship { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum GroupKind {
    /// Plain bracketed prose such as `[sic]`.
    Prose,
    Tag(Tag),
    Malformed,
}

/// Byte ranges of `[...]` groups, brackets included. A `[` reopened before its `]` abandons
/// the outer group, so groups never nest.
pub(super) fn bracket_groups(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut groups = Vec::new();
    let mut cursor = 0;

    while let Some(open) = memchr::memchr(b'[', &bytes[cursor..]).map(|at| cursor + at) {
        match memchr::memchr2(b'[', b']', &bytes[open + 1..]).map(|at| open + 1 + at) {
            Some(close) if bytes[close] == b']' => {
                groups.push(open..close + 1);
                cursor = close + 1;
            }
            Some(reopen) => cursor = reopen,
            None => break,
        }
    }

    groups
}

/// Classifies the inside of one bracket group (without the brackets).
pub(super) fn classify_group(inner: &str) -> GroupKind {
    if !tag_marker_regex().is_match(inner) {
        return GroupKind::Prose;
    }

    if let Some(caps) = entity_regex().captures(inner) {
        return match caps["id"].parse::<u32>() {
            Ok(index) => GroupKind::Tag(Tag::Entity {
                id: EntityId::new(index),
                label: caps["label"].to_owned(),
            }),
            Err(_) => GroupKind::Malformed,
        };
    }

    if let Some(caps) = relationship_regex().captures(inner) {
        let mut pairs = SmallVec::new();
        for raw in caps["pairs"].split(';') {
            match parse_pair(raw) {
                Some(pair) => pairs.push(pair),
                None => return GroupKind::Malformed,
            }
        }
        return GroupKind::Tag(Tag::Relationship { label: caps["label"].to_owned(), pairs });
    }

    GroupKind::Malformed
}

fn parse_pair(raw: &str) -> Option<EndpointPair> {
    let caps = pair_regex().captures(raw)?;
    Some(EndpointPair {
        saliency: Saliency::from_tag(&caps["saliency"])?,
        source: EntityId::new(caps["source"].parse().ok()?),
        target: EntityId::new(caps["target"].parse().ok()?),
    })
}
