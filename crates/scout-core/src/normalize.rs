//! Normalization of raw collaborator findings into [`InsightData`].
//!
//! The content-collection collaborator speaks a lenient shape: enumerations
//! arrive as free strings, text is untrimmed, and source lists may repeat.
//! [`normalize`] cleans that up and maps enum strings onto [`Level`]. It does
//! not check referential integrity; run [`crate::validation::validate`] on
//! the result before publishing it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::models::{
    Citation, Competitor, Demographics, InsightData, Level, Opportunity, PainPoint, Persona,
};
use crate::validation::{EntityKind, ValidationError};

/// Raw pain point as reported by the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPainPoint {
    pub id: String,
    pub description: String,
    pub severity: String,
    #[serde(default)]
    pub frequency: u32,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCompetitor {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pricing: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOpportunity {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub market_size: String,
    pub competition_level: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPersona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub demographics: Demographics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCitation {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    pub relevance_score: f64,
}

/// Findings returned by the content-collection collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFindings {
    #[serde(default)]
    pub pain_points: Vec<RawPainPoint>,
    #[serde(default)]
    pub competitors: Vec<RawCompetitor>,
    #[serde(default)]
    pub opportunities: Vec<RawOpportunity>,
    #[serde(default, alias = "MVP_features")]
    pub mvp_features: Vec<String>,
    #[serde(default)]
    pub out_of_scope: Vec<String>,
    #[serde(default)]
    pub personas: Vec<RawPersona>,
    #[serde(default)]
    pub citations: Vec<RawCitation>,
    /// Opaque side output, passed through to the job untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<JsonValue>,
}

/// Normalized findings ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub insight_data: InsightData,
    pub artifacts: Option<JsonValue>,
}

/// Clean raw findings and map enum strings onto [`Level`].
///
/// Fails only on an unrecognised `severity` or `competition_level`.
pub fn normalize(raw: RawFindings) -> Result<Normalized, ValidationError> {
    let pain_points = raw
        .pain_points
        .into_iter()
        .map(|p| {
            let id = clean(&p.id);
            let severity = level(EntityKind::PainPoint, &id, "severity", &p.severity)?;
            Ok(PainPoint {
                description: clean(&p.description),
                severity,
                frequency: p.frequency,
                sources: dedupe(p.sources),
                id,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let opportunities = raw
        .opportunities
        .into_iter()
        .map(|o| {
            let id = clean(&o.id);
            let competition_level = level(
                EntityKind::Opportunity,
                &id,
                "competition_level",
                &o.competition_level,
            )?;
            Ok(Opportunity {
                description: clean(&o.description),
                market_size: clean(&o.market_size),
                competition_level,
                sources: dedupe(o.sources),
                id,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let competitors = raw
        .competitors
        .into_iter()
        .map(|c| Competitor {
            name: clean(&c.name),
            url: clean(&c.url),
            pricing: clean(&c.pricing),
            features: clean_list(c.features),
            weaknesses: clean_list(c.weaknesses),
        })
        .collect();

    let personas = raw
        .personas
        .into_iter()
        .map(|p| Persona {
            id: clean(&p.id),
            name: clean(&p.name),
            description: clean(&p.description),
            pain_points: clean_list(p.pain_points),
            goals: clean_list(p.goals),
            demographics: Demographics {
                age_range: clean(&p.demographics.age_range),
                income: clean(&p.demographics.income),
                location: clean(&p.demographics.location),
            },
        })
        .collect();

    let citations = raw
        .citations
        .into_iter()
        .map(|c| Citation {
            id: clean(&c.id),
            url: clean(&c.url),
            title: clean(&c.title),
            snippet: clean(&c.snippet),
            relevance_score: c.relevance_score,
        })
        .collect();

    let insight_data = InsightData {
        pain_points,
        competitors,
        opportunities,
        mvp_features: clean_list(raw.mvp_features),
        out_of_scope: clean_list(raw.out_of_scope),
        personas,
        citations,
    };

    debug!(summary = %insight_data.summary(), "Normalized raw findings");

    Ok(Normalized {
        insight_data,
        artifacts: raw.artifacts,
    })
}

fn level(entity: EntityKind, id: &str, field: &str, value: &str) -> Result<Level, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidEnumValue {
        entity,
        id: id.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn clean(s: &str) -> String {
    s.trim().to_string()
}

/// Trim entries and drop blanks, keeping order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|s| clean(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Like [`clean_list`], also dropping repeats after their first occurrence.
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    clean_list(items)
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
