//! Invariant checks for [`InsightData`].
//!
//! Rules, checked in this order:
//!
//! 1. every id-bearing entity (pain point, opportunity, persona, citation)
//!    has a non-empty id
//! 2. ids are unique across the whole `InsightData` value, not only within
//!    one section
//! 3. citation `relevance_score` lies within `[0, 1]` (NaN is rejected)
//! 4. every `sources` entry on a pain point or opportunity resolves to a
//!    `Citation.id`
//!
//! Enumerated values (`severity`, `competition_level`) are enforced by the
//! type system once data is in the model; the string forms coming from the
//! collaborator are checked by [`crate::normalize`], which reports
//! [`ValidationError::InvalidEnumValue`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::{RELEVANCE_MAX, RELEVANCE_MIN};
use crate::models::InsightData;

/// Kind of entity a violation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PainPoint,
    Competitor,
    Opportunity,
    Persona,
    Citation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::PainPoint => "pain point",
            EntityKind::Competitor => "competitor",
            EntityKind::Opportunity => "opportunity",
            EntityKind::Persona => "persona",
            EntityKind::Citation => "citation",
        })
    }
}

/// A violated insight data invariant.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{entity} #{index} has an empty {field}")]
    EmptyField {
        entity: EntityKind,
        index: usize,
        field: String,
    },

    #[error("duplicate id '{id}' on {entity}")]
    DuplicateId { entity: EntityKind, id: String },

    /// `score` is kept as text so NaN and infinities survive json.
    #[error("citation '{id}' has relevance_score {score} outside [0, 1]")]
    RelevanceOutOfRange { id: String, score: String },

    #[error("{entity} '{id}' references unknown citation '{citation_id}'")]
    UnresolvedSource {
        entity: EntityKind,
        id: String,
        citation_id: String,
    },

    #[error("{entity} '{id}' has invalid {field} '{value}' (expected low, medium, or high)")]
    InvalidEnumValue {
        entity: EntityKind,
        id: String,
        field: String,
        value: String,
    },
}

/// Check every invariant, returning the first violation found.
///
/// Deterministic and side-effect free.
pub fn validate(data: &InsightData) -> Result<(), ValidationError> {
    match violations(data).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Collect every violation, in rule order then document order.
pub fn violations(data: &InsightData) -> Vec<ValidationError> {
    let mut found = Vec::new();
    let ids = identified(data);

    for (entity, index, id) in &ids {
        if id.trim().is_empty() {
            found.push(ValidationError::EmptyField {
                entity: *entity,
                index: *index,
                field: "id".to_string(),
            });
        }
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(ids.len());
    for (entity, _, id) in &ids {
        if !id.trim().is_empty() && !seen.insert(*id) {
            found.push(ValidationError::DuplicateId {
                entity: *entity,
                id: id.to_string(),
            });
        }
    }

    for citation in &data.citations {
        let score = citation.relevance_score;
        if !(RELEVANCE_MIN..=RELEVANCE_MAX).contains(&score) {
            found.push(ValidationError::RelevanceOutOfRange {
                id: citation.id.clone(),
                score: score.to_string(),
            });
        }
    }

    let citation_ids: HashSet<&str> = data.citations.iter().map(|c| c.id.as_str()).collect();
    let referencing = data
        .pain_points
        .iter()
        .map(|p| (EntityKind::PainPoint, &p.id, &p.sources))
        .chain(
            data.opportunities
                .iter()
                .map(|o| (EntityKind::Opportunity, &o.id, &o.sources)),
        );
    for (entity, id, sources) in referencing {
        for source in sources {
            if !citation_ids.contains(source.as_str()) {
                found.push(ValidationError::UnresolvedSource {
                    entity,
                    id: id.clone(),
                    citation_id: source.clone(),
                });
            }
        }
    }

    found
}

/// Every id-bearing entity as (kind, index within its section, id).
fn identified(data: &InsightData) -> Vec<(EntityKind, usize, &str)> {
    let pain_points = data
        .pain_points
        .iter()
        .enumerate()
        .map(|(i, p)| (EntityKind::PainPoint, i, p.id.as_str()));
    let opportunities = data
        .opportunities
        .iter()
        .enumerate()
        .map(|(i, o)| (EntityKind::Opportunity, i, o.id.as_str()));
    let personas = data
        .personas
        .iter()
        .enumerate()
        .map(|(i, p)| (EntityKind::Persona, i, p.id.as_str()));
    let citations = data
        .citations
        .iter()
        .enumerate()
        .map(|(i, c)| (EntityKind::Citation, i, c.id.as_str()));

    pain_points
        .chain(opportunities)
        .chain(personas)
        .chain(citations)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Citation, Level, Opportunity, PainPoint, Persona};

    fn citation(id: &str, score: f64) -> Citation {
        Citation {
            id: id.to_string(),
            url: format!("https://example.com/{id}"),
            title: "Source".to_string(),
            snippet: "snippet".to_string(),
            relevance_score: score,
        }
    }

    fn pain_point(id: &str, sources: &[&str]) -> PainPoint {
        PainPoint {
            id: id.to_string(),
            description: "walkers cancel last minute".to_string(),
            severity: Level::High,
            frequency: 3,
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> InsightData {
        InsightData {
            pain_points: vec![pain_point("p1", &["c1"]), pain_point("p2", &["c1"])],
            citations: vec![citation("c1", 0.8)],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_data_passes() {
        assert_eq!(validate(&sample()), Ok(()));
        assert!(violations(&sample()).is_empty());
    }

    #[test]
    fn test_empty_data_passes() {
        assert_eq!(validate(&InsightData::default()), Ok(()));
    }

    #[test]
    fn test_unresolved_source_rejected() {
        let mut data = sample();
        data.pain_points[1].sources = vec!["c_missing".to_string()];

        assert_eq!(
            validate(&data),
            Err(ValidationError::UnresolvedSource {
                entity: EntityKind::PainPoint,
                id: "p2".to_string(),
                citation_id: "c_missing".to_string(),
            })
        );
    }

    #[test]
    fn test_opportunity_sources_checked() {
        let mut data = sample();
        data.opportunities.push(Opportunity {
            id: "o1".to_string(),
            description: "insured walkers".to_string(),
            market_size: "$1B".to_string(),
            competition_level: Level::Medium,
            sources: vec!["c9".to_string()],
        });

        assert!(matches!(
            validate(&data),
            Err(ValidationError::UnresolvedSource {
                entity: EntityKind::Opportunity,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_within_section() {
        let mut data = sample();
        data.pain_points[1].id = "p1".to_string();

        assert_eq!(
            validate(&data),
            Err(ValidationError::DuplicateId {
                entity: EntityKind::PainPoint,
                id: "p1".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_across_sections() {
        let mut data = sample();
        data.personas.push(Persona {
            id: "c1".to_string(),
            name: "Busy professional".to_string(),
            description: "works long hours".to_string(),
            pain_points: vec![],
            goals: vec![],
            demographics: Default::default(),
        });

        // The persona comes before citations in id order, so the citation is
        // the one reported as the duplicate.
        assert_eq!(
            validate(&data),
            Err(ValidationError::DuplicateId {
                entity: EntityKind::Citation,
                id: "c1".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut data = sample();
        data.pain_points[0].id = "  ".to_string();

        assert!(matches!(
            validate(&data),
            Err(ValidationError::EmptyField { index: 0, .. })
        ));
    }

    #[test]
    fn test_relevance_bounds() {
        for score in [0.0, 0.5, 1.0] {
            let mut data = sample();
            data.citations[0].relevance_score = score;
            assert_eq!(validate(&data), Ok(()), "score {score} should pass");
        }

        for score in [-0.01, 1.01, f64::NAN] {
            let mut data = sample();
            data.citations[0].relevance_score = score;
            assert!(
                matches!(
                    validate(&data),
                    Err(ValidationError::RelevanceOutOfRange { .. })
                ),
                "score {score} should fail"
            );
        }
    }

    #[test]
    fn test_violations_collects_all() {
        let mut data = sample();
        data.pain_points[0].sources = vec!["x".to_string()];
        data.pain_points[1].sources = vec!["y".to_string()];
        data.citations[0].relevance_score = 2.0;

        let all = violations(&data);
        assert_eq!(all.len(), 3);
        assert!(matches!(all[0], ValidationError::RelevanceOutOfRange { .. }));
        assert!(matches!(all[1], ValidationError::UnresolvedSource { .. }));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut data = sample();
        data.pain_points[1].id = "p1".to_string();
        data.pain_points[0].sources = vec!["gone".to_string()];

        let first = violations(&data);
        for _ in 0..5 {
            assert_eq!(violations(&data), first);
        }
    }

    #[test]
    fn test_error_message_names_citation() {
        let err = ValidationError::UnresolvedSource {
            entity: EntityKind::PainPoint,
            id: "p2".to_string(),
            citation_id: "c_missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pain point 'p2' references unknown citation 'c_missing'"
        );
    }

    #[test]
    fn test_validation_error_serde_tagged() {
        let err = ValidationError::DuplicateId {
            entity: EntityKind::Persona,
            id: "x".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["rule"], "duplicate_id");
        assert_eq!(json["entity"], "persona");

        let back: ValidationError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
