use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One proposed mitigation, as produced by the model or the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationAction {
    pub title: String,
    pub description: String,
    /// Estimated reduction in kg CO2.
    pub co2_reduction: f64,
    /// Free-form cost estimate, e.g. "-2%" or "minimal".
    pub cost_impact: String,
    /// 1..=10, higher is easier to implement.
    pub feasibility: u8,
    /// Derived score in [0.3, 0.95], see confidence scoring.
    pub confidence: f64,
}

/// Full analysis for one hotspot: a diagnosed root cause plus the
/// ranked actions addressing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResponse {
    pub root_cause: String,
    pub actions: Vec<RecommendationAction>,
}

impl RecommendationResponse {
    /// Stock answer used whenever the model output cannot be trusted.
    pub fn fallback() -> Self {
        Self {
            root_cause: "Unable to determine root cause automatically".to_string(),
            actions: vec![RecommendationAction {
                title: "Review supplier operations".to_string(),
                description: "Conduct detailed analysis of recent operational changes".to_string(),
                co2_reduction: 10.0,
                cost_impact: "0%".to_string(),
                feasibility: 8,
                confidence: 0.5,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationStatus {
    Pending,
    Approved,
    Rejected,
    Implemented,
}

impl RecommendationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Approved => "approved",
            RecommendationStatus::Rejected => "rejected",
            RecommendationStatus::Implemented => "implemented",
        }
    }

    pub fn parse(raw: &str) -> Option<RecommendationStatus> {
        match raw {
            "pending" => Some(RecommendationStatus::Pending),
            "approved" => Some(RecommendationStatus::Approved),
            "rejected" => Some(RecommendationStatus::Rejected),
            "implemented" => Some(RecommendationStatus::Implemented),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecommendationId(Uuid);

impl RecommendationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecommendationId {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted recommendation row, one per action.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: RecommendationId,
    pub hotspot_id: Option<i64>,
    pub supplier_id: Option<String>,
    pub title: String,
    pub description: String,
    pub co2_reduction: f64,
    pub cost_impact: String,
    pub feasibility: u8,
    pub confidence: f64,
    pub root_cause: String,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn from_action(
        hotspot_id: Option<i64>,
        supplier_id: Option<String>,
        root_cause: &str,
        action: &RecommendationAction,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecommendationId::new(),
            hotspot_id,
            supplier_id,
            title: action.title.clone(),
            description: action.description.clone(),
            co2_reduction: action.co2_reduction,
            cost_impact: action.cost_impact.clone(),
            feasibility: action.feasibility,
            confidence: action.confidence,
            root_cause: root_cause.to_string(),
            status: RecommendationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
