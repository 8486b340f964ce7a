/// Caller-supplied description of an emissions hotspot. All fields are
/// optional because upstream detectors vary in how much context they
/// attach; accessors below fill in the gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotContext {
    pub hotspot_id: Option<i64>,
    pub supplier: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
    pub predicted_emissions: Option<f64>,
    pub baseline_emissions: Option<f64>,
    pub reason: Option<String>,
    /// Raw telemetry events attached by upstream detectors. Carried for
    /// persistence and audit, not fed into the prompt.
    pub recent_events: Option<Vec<serde_json::Value>>,
}

impl HotspotContext {
    /// Supplier name if present, otherwise the generic entity label.
    pub fn entity_name(&self) -> &str {
        self.supplier
            .as_deref()
            .or(self.entity.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn reason_or_default(&self) -> &str {
        self.reason.as_deref().unwrap_or("Emissions spike detected")
    }

    /// Predicted emissions relative to baseline, as a ratio above 1.0.
    /// `None` when either figure is missing or baseline is not positive.
    pub fn ratio_above(&self) -> Option<f64> {
        match (self.predicted_emissions, self.baseline_emissions) {
            (Some(predicted), Some(baseline)) if baseline > 0.0 => {
                Some(predicted / baseline - 1.0)
            }
            _ => None,
        }
    }

    /// Same ratio expressed as a percentage with one decimal, for
    /// prompt rendering. "n/a" when the ratio is unavailable.
    pub fn percent_above(&self) -> String {
        match self.ratio_above() {
            Some(ratio) => format!("{:.1}%", ratio * 100.0),
            None => "n/a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_supplier_and_entity_when_naming_then_supplier_wins() {
        let hotspot = HotspotContext {
            supplier: Some("Acme Logistics".into()),
            entity: Some("Plant 4".into()),
            ..Default::default()
        };

        assert_eq!(hotspot.entity_name(), "Acme Logistics");
    }

    #[test]
    fn given_no_names_when_naming_then_unknown_is_used() {
        assert_eq!(HotspotContext::default().entity_name(), "Unknown");
    }

    #[test]
    fn given_prediction_above_baseline_when_computing_percent_then_one_decimal_is_kept() {
        let hotspot = HotspotContext {
            predicted_emissions: Some(150.0),
            baseline_emissions: Some(100.0),
            ..Default::default()
        };

        assert_eq!(hotspot.ratio_above(), Some(0.5));
        assert_eq!(hotspot.percent_above(), "50.0%");
    }

    #[test]
    fn given_zero_baseline_when_computing_ratio_then_none_is_returned() {
        let hotspot = HotspotContext {
            predicted_emissions: Some(150.0),
            baseline_emissions: Some(0.0),
            ..Default::default()
        };

        assert_eq!(hotspot.ratio_above(), None);
        assert_eq!(hotspot.percent_above(), "n/a");
    }
}
