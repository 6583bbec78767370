// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Consistency checks for parsed annotations.
//!
//! Validation only classifies. Repairing a response is left to the model (a correction request
//! per affected sentence) or, once retries are exhausted, to the reconciler.

use std::collections::{BTreeMap, HashSet};

use crate::format::{ParsedAnnotation, ParsedEntity, ParsedRelationship};
use crate::model::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Entities that no relationship references, in entity order.
    pub orphan_entity_ids: Vec<EntityId>,
    /// Labels of relationships with an unknown endpoint, in text order, de-duplicated.
    pub dangling_relationship_labels: Vec<String>,
    /// Indices of the dangling relationships, in text order.
    pub dangling_relationships: Vec<usize>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_entity_ids.is_empty() && self.dangling_relationships.is_empty()
    }
}

pub fn validate(
    entities: &[ParsedEntity],
    relationships: &[ParsedRelationship],
) -> ValidationReport {
    validate_with_known(entities, relationships, |_| false)
}

/// Like [`validate`], but relationship endpoints for which `known` holds (entities introduced
/// by an earlier turn of the same thread) are not dangling.
pub fn validate_with_known(
    entities: &[ParsedEntity],
    relationships: &[ParsedRelationship],
    known: impl Fn(EntityId) -> bool,
) -> ValidationReport {
    let tagged = entities.iter().map(|entity| entity.id).collect::<HashSet<_>>();
    let referenced = relationships
        .iter()
        .flat_map(ParsedRelationship::endpoint_ids)
        .collect::<HashSet<_>>();

    let orphan_entity_ids = entities
        .iter()
        .map(|entity| entity.id)
        .filter(|id| !referenced.contains(id))
        .collect();

    let mut report = ValidationReport { orphan_entity_ids, ..ValidationReport::default() };
    for (index, relationship) in relationships.iter().enumerate() {
        let dangling = relationship
            .endpoint_ids()
            .any(|id| !tagged.contains(&id) && !known(id));
        if !dangling {
            continue;
        }
        report.dangling_relationships.push(index);
        if !report.dangling_relationship_labels.contains(&relationship.label) {
            report.dangling_relationship_labels.push(relationship.label.clone());
        }
    }

    report
}

/// What the model is asked to fix in one sentence of a held response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub sentence: usize,
    pub sentence_text: String,
    pub orphan_labels: Vec<String>,
    pub dangling_labels: Vec<String>,
    /// First id the model may use for entities it introduces.
    pub next_entity_id: EntityId,
}

/// Groups the findings of `report` by the sentence they occur in, in sentence order.
///
/// Orphans are located at their first mention.
pub fn locate_issues(
    text: &str,
    annotation: &ParsedAnnotation,
    report: &ValidationReport,
    next_entity_id: EntityId,
) -> Vec<CorrectionRequest> {
    let mut by_sentence: BTreeMap<usize, (Vec<String>, Vec<String>)> = BTreeMap::new();

    for &id in &report.orphan_entity_ids {
        let Some(entity) = annotation.entity(id) else {
            continue;
        };
        let sentence = entity.mentions.first().map_or(0, |mention| mention.sentence);
        let (orphans, _) = by_sentence.entry(sentence).or_default();
        if !orphans.contains(&entity.label) {
            orphans.push(entity.label.clone());
        }
    }

    for &index in &report.dangling_relationships {
        let Some(relationship) = annotation.relationships.get(index) else {
            continue;
        };
        let (_, dangling) = by_sentence.entry(relationship.sentence).or_default();
        if !dangling.contains(&relationship.label) {
            dangling.push(relationship.label.clone());
        }
    }

    by_sentence
        .into_iter()
        .map(|(sentence, (orphan_labels, dangling_labels))| CorrectionRequest {
            sentence,
            sentence_text: annotation.sentence_text(text, sentence).unwrap_or_default().to_owned(),
            orphan_labels,
            dangling_labels,
            next_entity_id,
        })
        .collect()
}
