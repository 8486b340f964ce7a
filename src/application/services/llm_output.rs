//! Defensive parsing of model output. Completions frequently arrive
//! wrapped in markdown fences, prefixed with prose, or typeset with
//! smart quotes; this module normalizes all of that before handing the
//! text to serde.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{RecommendationAction, RecommendationResponse};

#[derive(Debug, Error)]
pub enum LlmOutputError {
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("model output did not match the expected schema: {0}")]
    SchemaMismatch(String),
}

// `actions` is required; a reply without the array is a schema
// mismatch, not an empty recommendation set.
#[derive(Debug, Deserialize)]
struct RawOutput {
    root_cause: String,
    actions: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    title: String,
    #[serde(default)]
    description: String,
    co2_reduction: f64,
    cost_impact: String,
    feasibility: u8,
}

/// Parses a raw completion into a recommendation response. Confidence
/// is not part of the model schema; callers attach it afterwards via
/// [`score_confidence`].
pub fn parse_recommendation_output(raw: &str) -> Result<RecommendationResponse, LlmOutputError> {
    let cleaned = normalize(raw)?;
    let parsed: RawOutput =
        serde_json::from_str(&cleaned).map_err(|e| LlmOutputError::SchemaMismatch(e.to_string()))?;

    Ok(RecommendationResponse {
        root_cause: parsed.root_cause,
        actions: parsed
            .actions
            .into_iter()
            .map(|a| RecommendationAction {
                title: a.title,
                description: a.description,
                co2_reduction: a.co2_reduction,
                cost_impact: a.cost_impact,
                feasibility: a.feasibility.clamp(1, 10),
                confidence: 0.0,
            })
            .collect(),
    })
}

/// Confidence for one action: feasibility mapped to [0, 1], damped
/// when the spike is extreme (more than 200% above baseline, where the
/// model tends to overpromise), clamped to [0.3, 0.95].
pub fn score_confidence(feasibility: u8, ratio_above: Option<f64>) -> f64 {
    let mut confidence = f64::from(feasibility) / 10.0;
    if matches!(ratio_above, Some(ratio) if ratio > 2.0) {
        confidence *= 0.9;
    }
    confidence.clamp(0.3, 0.95)
}

fn normalize(raw: &str) -> Result<String, LlmOutputError> {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```") {
        // Drop the fence line ("```json" etc.) and the closing fence.
        text = stripped
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or(stripped);
        if let Some(stripped) = text.trim_end().strip_suffix("```") {
            text = stripped;
        }
    }

    let start = text.find('{').ok_or(LlmOutputError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(LlmOutputError::NoJsonObject)?;
    if end < start {
        return Err(LlmOutputError::NoJsonObject);
    }

    let sliced = &text[start..=end];
    let cleaned: String = sliced
        .chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect();

    Ok(cleaned)
}
