use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::period::ReportPeriod;
use super::report::DashboardInsights;

/// Quality score at or above which a contributor counts as high quality
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.8;
/// Quality score at or above which a contributor counts as medium quality
pub const MEDIUM_QUALITY_THRESHOLD: f64 = 0.6;

/// Per-contributor metrics for one reporting week
///
/// # Invariants
/// - `engagement_rate` and `quality_score` are within [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMetrics {
    pub name: String,
    pub mqls: u32,
    pub campaigns: u32,
    pub engagement_rate: f64,
    pub quality_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl MemberMetrics {
    pub fn quality_tier(&self) -> QualityTier {
        QualityTier::for_score(self.quality_score)
    }
}

/// Quality band a contributor's score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    High,
    Medium,
    ReviewNeeded,
}

impl QualityTier {
    pub fn for_score(score: f64) -> Self {
        if score >= HIGH_QUALITY_THRESHOLD {
            QualityTier::High
        } else if score >= MEDIUM_QUALITY_THRESHOLD {
            QualityTier::Medium
        } else {
            QualityTier::ReviewNeeded
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::High => write!(f, "High Quality"),
            QualityTier::Medium => write!(f, "Medium Quality"),
            QualityTier::ReviewNeeded => write!(f, "Review Needed"),
        }
    }
}

/// Share of contributors per quality band, as rounded percentages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub high_quality: u32,
    pub medium_quality: u32,
    pub review_needed: u32,
}

/// Number of contributors per engagement band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementDistribution {
    /// engagement below 0.5
    pub low: u32,
    /// engagement in [0.5, 0.7)
    pub moderate: u32,
    /// engagement of 0.7 and above
    pub high: u32,
}

/// One week of historical totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub week: u32,
    pub mqls: u32,
    pub campaigns: u32,
}

/// Where the contributor list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    /// Contributor rows reported by the aggregation agent
    Reported,
    /// Rows simulated from the roster because the agent reported none
    Simulated,
}

/// Aggregate dashboard view for one workflow run
///
/// Recomputed wholesale on every run.
///
/// # Invariants
/// - `total_mqls` equals the sum of `members[*].mqls`
/// - `team_size` equals the roster length at the time of the run
/// - `avg_engagement_rate` is within [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub generated_at: DateTime<Utc>,
    pub report_period: ReportPeriod,
    #[serde(rename = "totalMQLs")]
    pub total_mqls: u32,
    pub total_campaigns: u32,
    pub avg_engagement_rate: f64,
    pub avg_quality_score: f64,
    pub team_size: usize,
    pub members: Vec<MemberMetrics>,
    pub trends: Vec<TrendPoint>,
    pub quality_metrics: QualityMetrics,
    pub engagement_distribution: EngagementDistribution,
    pub source: MetricsSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<DashboardInsights>,
}
