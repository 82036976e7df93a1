// Shapes of the structured data the aggregation and dashboard agents return.
// Every field is optional: agent output is free-form and only best-effort
// conforms to these shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads a number that may arrive as a JSON number or a numeric string
///
/// Accepts `45`, `"45"`, `"72%"` and `"1,200"`. Anything else is treated as
/// missing rather than failing the whole report.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .replace(',', "")
            .trim()
            .parse()
            .ok(),
        _ => None,
    }))
}

/// One contributor row as reported by the aggregation agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorReport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "MQLs", alias = "mqlCount", deserialize_with = "lenient_number")]
    pub mqls: Option<f64>,
    #[serde(default, alias = "campaignCount", deserialize_with = "lenient_number")]
    pub campaigns: Option<f64>,
    #[serde(default, alias = "engagement", alias = "engagement_rate", deserialize_with = "lenient_number")]
    pub engagement_rate: Option<f64>,
    #[serde(default, alias = "quality", alias = "quality_score", deserialize_with = "lenient_number")]
    pub quality_score: Option<f64>,
    #[serde(default, alias = "slackId", alias = "slack_user_id")]
    pub slack_user_id: Option<String>,
    #[serde(default)]
    pub response_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Compiled dataset returned by the aggregation agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    #[serde(default, alias = "contributors", skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<ContributorReport>>,
    #[serde(default, rename = "totalMQLs", alias = "totalMqls", deserialize_with = "lenient_number")]
    pub total_mqls: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_campaigns: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quality_score: Option<f64>,
}

impl AggregationReport {
    /// Substitute used when the aggregation agent's reply cannot be parsed
    ///
    /// Carries no contributor list, so the synthesizer falls back to
    /// simulated member metrics.
    pub fn fallback() -> Self {
        Self {
            members: None,
            total_mqls: Some(180.0),
            total_campaigns: Some(25.0),
            quality_score: Some(0.87),
        }
    }
}

/// Narrative summary returned by the dashboard-generation agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInsights {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl DashboardInsights {
    pub fn fallback() -> Self {
        Self {
            headline: "Weekly team metrics compiled".to_string(),
            highlights: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}
