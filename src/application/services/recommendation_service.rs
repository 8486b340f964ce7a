use std::sync::Arc;

use crate::application::ports::{LlmClient, RecommendationRepository};
use crate::domain::{HotspotContext, Recommendation, RecommendationResponse};

use super::llm_output::{parse_recommendation_output, score_confidence};

/// Turns a detected emissions hotspot into persisted, reviewable
/// mitigation actions. Generation never fails outward: any model or
/// parse failure degrades to the stock fallback response.
pub struct RecommendationService {
    llm_client: Arc<dyn LlmClient>,
    repository: Arc<dyn RecommendationRepository>,
}

impl RecommendationService {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        repository: Arc<dyn RecommendationRepository>,
    ) -> Self {
        Self {
            llm_client,
            repository,
        }
    }

    pub async fn generate(&self, hotspot: &HotspotContext) -> RecommendationResponse {
        let prompt = render_prompt(hotspot);

        let raw = match self.llm_client.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Recommendation completion failed, using fallback");
                return RecommendationResponse::fallback();
            }
        };

        let mut response = match parse_recommendation_output(&raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Recommendation output unparseable, using fallback");
                return RecommendationResponse::fallback();
            }
        };

        let ratio = hotspot.ratio_above();
        for action in &mut response.actions {
            action.confidence = score_confidence(action.feasibility, ratio);
        }

        tracing::info!(actions = response.actions.len(), "Generated recommendations");
        response
    }

    /// Persists one row per action, best effort: a failed insert is
    /// logged and skipped so the remaining actions still land. Returns
    /// the rows that were saved.
    pub async fn save(
        &self,
        hotspot: &HotspotContext,
        response: &RecommendationResponse,
    ) -> Vec<Recommendation> {
        let mut saved = Vec::with_capacity(response.actions.len());

        for action in &response.actions {
            let row = Recommendation::from_action(
                hotspot.hotspot_id,
                hotspot.supplier.clone(),
                &response.root_cause,
                action,
            );
            match self.repository.insert(&row).await {
                Ok(()) => saved.push(row),
                Err(e) => {
                    tracing::error!(error = %e, title = %action.title, "Failed to save recommendation")
                }
            }
        }

        tracing::info!(saved = saved.len(), "Saved recommendations");
        saved
    }
}

fn render_prompt(hotspot: &HotspotContext) -> String {
    format!(
        "You are a carbon emissions optimization expert for supply chain management.\n\
         \n\
         Analyze the following hotspot and provide structured recommendations to reduce carbon emissions.\n\
         \n\
         Hotspot Context:\n\
         - Entity: {entity}\n\
         - Current Emissions: {predicted} kg CO2\n\
         - Baseline Emissions: {baseline} kg CO2\n\
         - Percentage Above Baseline: {percent_above}\n\
         - Reason: {reason}\n\
         \n\
         Your task:\n\
         1. Identify the root cause of the emission spike\n\
         2. Provide 2-3 actionable recommendations in JSON format\n\
         \n\
         Each recommendation must include:\n\
         - title: Short, actionable title (max 60 chars)\n\
         - description: Brief explanation (max 200 chars)\n\
         - co2_reduction: Estimated CO2 reduction in kg (number)\n\
         - cost_impact: Cost impact as percentage string (e.g., \"+3%\", \"-2%\", \"0%\")\n\
         - feasibility: Feasibility score from 1-10 (10 = most feasible)\n\
         \n\
         CRITICAL: Return ONLY valid JSON. No markdown, no code blocks, no explanations.\n\
         Use this EXACT format (replace values but keep structure):\n\
         {{\n\
           \"root_cause\": \"Brief explanation here\",\n\
           \"actions\": [\n\
             {{\n\
               \"title\": \"Action title here\",\n\
               \"description\": \"Action description here\",\n\
               \"co2_reduction\": 25.5,\n\
               \"cost_impact\": \"+2%\",\n\
               \"feasibility\": 8\n\
             }}\n\
           ]\n\
         }}\n\
         \n\
         Rules:\n\
         - Use double quotes for all strings\n\
         - No line breaks inside string values\n\
         - Provide 2-3 actions\n\
         - Return ONLY the JSON object, nothing else",
        entity = hotspot.entity_name(),
        predicted = hotspot
            .predicted_emissions
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        baseline = hotspot
            .baseline_emissions
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        percent_above = hotspot.percent_above(),
        reason = hotspot.reason_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_full_hotspot_when_rendering_prompt_then_context_lines_are_filled() {
        let hotspot = HotspotContext {
            supplier: Some("Acme Logistics".into()),
            predicted_emissions: Some(150.0),
            baseline_emissions: Some(100.0),
            reason: Some("New diesel fleet".into()),
            ..Default::default()
        };

        let prompt = render_prompt(&hotspot);
        assert!(prompt.contains("- Entity: Acme Logistics"));
        assert!(prompt.contains("- Current Emissions: 150 kg CO2"));
        assert!(prompt.contains("- Percentage Above Baseline: 50.0%"));
        assert!(prompt.contains("- Reason: New diesel fleet"));
    }

    #[test]
    fn given_sparse_hotspot_when_rendering_prompt_then_defaults_are_used() {
        let prompt = render_prompt(&HotspotContext::default());

        assert!(prompt.contains("- Entity: Unknown"));
        assert!(prompt.contains("- Percentage Above Baseline: n/a"));
        assert!(prompt.contains("- Reason: Emissions spike detected"));
    }
}
