// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::Range;

use super::TextSpan;

/// Splits `text` into trimmed, non-empty sentence spans.
///
/// A sentence ends after `.`, `!` or `?` when followed by whitespace or the end of the text,
/// and at every newline. Terminators inside `groups` (bracket groups) never split.
pub(super) fn split_sentences(text: &str, groups: &[Range<usize>]) -> Vec<TextSpan> {
    let bytes = text.as_bytes();
    let inside_group = |pos: usize| {
        let idx = groups.partition_point(|group| group.end <= pos);
        groups.get(idx).is_some_and(|group| group.start <= pos)
    };

    // (end of the current sentence, start of the next one)
    let mut cuts = Vec::new();
    for pos in memchr::memchr3_iter(b'.', b'!', b'?', bytes) {
        let closes = bytes.get(pos + 1).map_or(true, |next| next.is_ascii_whitespace());
        if closes && !inside_group(pos) {
            cuts.push((pos + 1, pos + 1));
        }
    }
    for pos in memchr::memchr_iter(b'\n', bytes) {
        if !inside_group(pos) {
            cuts.push((pos, pos + 1));
        }
    }
    cuts.sort_unstable();

    let mut sentences = Vec::new();
    let mut start = 0;
    for (end, next) in cuts {
        if end < start {
            continue;
        }
        push_trimmed(text, start, end, &mut sentences);
        start = next;
    }
    push_trimmed(text, start, text.len(), &mut sentences);

    sentences
}

fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<TextSpan>) {
    let raw = &text[start..end];
    let trimmed_start = start + (raw.len() - raw.trim_start().len());
    let trimmed_end = start + raw.trim_end().len();
    if trimmed_start < trimmed_end {
        out.push(TextSpan::new(trimmed_start, trimmed_end));
    }
}

/// Index of the sentence containing byte `offset`, or of the closest one before it.
pub(super) fn sentence_at(sentences: &[TextSpan], offset: usize) -> usize {
    sentences
        .partition_point(|sentence| sentence.start <= offset)
        .saturating_sub(1)
}
