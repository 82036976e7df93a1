// Metrics synthesis
//
// Turns the aggregation agent's (possibly partial) report plus the roster
// snapshot into the dashboard's aggregate view. When the agent reported no
// contributor list, rows are simulated from the roster so the dashboard
// always has something to show.

use chrono::Utc;
use rand::Rng;

use super::model::{
    DashboardMetrics, EngagementDistribution, MemberMetrics, MetricsSource, QualityMetrics,
    QualityTier, TrendPoint,
};
use super::period::ReportPeriod;
use super::report::{AggregationReport, ContributorReport};
use crate::domain::team::TeamMember;

/// Base values for simulated rows: (mqls, campaigns, engagement rate)
const BASE_METRICS: [(u32, u32, f64); 4] = [(45, 7, 0.72), (62, 8, 0.75), (38, 5, 0.65), (35, 5, 0.60)];

/// Fixed four-week history: (week, mqls, campaigns)
const TREND_HISTORY: [(u32, u32, u32); 4] = [(1, 135, 20), (2, 150, 22), (3, 165, 24), (4, 180, 25)];

// Substitutes for fields missing from a reported contributor row
const DEFAULT_MQLS: f64 = 35.0;
const DEFAULT_CAMPAIGNS: f64 = 6.0;
const DEFAULT_ENGAGEMENT: f64 = 0.68;
const DEFAULT_QUALITY: f64 = 0.75;

/// Ceiling for a single reported count
const MAX_REPORTED_COUNT: u32 = 1_000_000;

/// Builds the dashboard metrics for one run
///
/// Uses the report's contributor list when present (even if empty),
/// otherwise simulates one row per roster member. `team_size` is always the
/// roster length, and averages are taken over it. Totals saturate instead of
/// overflowing.
pub fn synthesize<R: Rng>(
    report: &AggregationReport,
    roster: &[TeamMember],
    period: ReportPeriod,
    rng: &mut R,
) -> DashboardMetrics {
    let (members, source) = match &report.members {
        Some(rows) => (
            rows.iter()
                .enumerate()
                .map(|(idx, row)| normalize_row(idx, row, roster))
                .collect::<Vec<_>>(),
            MetricsSource::Reported,
        ),
        None => (simulate_members(roster, rng), MetricsSource::Simulated),
    };

    let total_mqls = members.iter().map(|m| m.mqls).fold(0, u32::saturating_add);
    let total_campaigns = members.iter().map(|m| m.campaigns).fold(0, u32::saturating_add);
    let divisor = roster.len().max(1) as f64;
    let avg_engagement_rate =
        clamp_unit(members.iter().map(|m| m.engagement_rate).sum::<f64>() / divisor);
    let avg_quality_score =
        clamp_unit(members.iter().map(|m| m.quality_score).sum::<f64>() / divisor);

    DashboardMetrics {
        generated_at: Utc::now(),
        report_period: period,
        total_mqls,
        total_campaigns,
        avg_engagement_rate,
        avg_quality_score,
        team_size: roster.len(),
        quality_metrics: quality_metrics(&members),
        engagement_distribution: engagement_distribution(&members),
        trends: trend_history(),
        members,
        source,
        insights: None,
    }
}

/// Simulates one row per roster member
///
/// The first rows come from a fixed table; rows beyond it are randomized
/// within the table's range. Quality scores are always in [0.75, 0.95).
pub fn simulate_members<R: Rng>(roster: &[TeamMember], rng: &mut R) -> Vec<MemberMetrics> {
    roster
        .iter()
        .enumerate()
        .map(|(idx, member)| {
            let (mqls, campaigns, engagement_rate) = match BASE_METRICS.get(idx) {
                Some(&base) => base,
                None => (
                    rng.random_range(30..=60),
                    rng.random_range(4..=8),
                    rng.random_range(0.55..0.80),
                ),
            };

            MemberMetrics {
                name: member.name().to_string(),
                mqls,
                campaigns,
                engagement_rate,
                quality_score: 0.75 + rng.random::<f64>() * 0.2,
                slack_user_id: Some(member.slack_id().to_string()),
                response_time: None,
                status: None,
            }
        })
        .collect()
}

/// Returns the fixed trend history
pub fn trend_history() -> Vec<TrendPoint> {
    TREND_HISTORY
        .iter()
        .map(|&(week, mqls, campaigns)| TrendPoint {
            week,
            mqls,
            campaigns,
        })
        .collect()
}

fn normalize_row(idx: usize, row: &ContributorReport, roster: &[TeamMember]) -> MemberMetrics {
    let roster_member = roster.get(idx);
    let name = row
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| roster_member.map(|m| m.name().to_string()))
        .unwrap_or_else(|| format!("Member {}", idx + 1));

    MemberMetrics {
        name,
        mqls: to_count(row.mqls.unwrap_or(DEFAULT_MQLS)),
        campaigns: to_count(row.campaigns.unwrap_or(DEFAULT_CAMPAIGNS)),
        engagement_rate: normalize_rate(row.engagement_rate.unwrap_or(DEFAULT_ENGAGEMENT)),
        quality_score: normalize_rate(row.quality_score.unwrap_or(DEFAULT_QUALITY)),
        slack_user_id: row
            .slack_user_id
            .clone()
            .or_else(|| roster_member.map(|m| m.slack_id().to_string())),
        response_time: row.response_time.clone(),
        status: row.status.clone(),
    }
}

fn to_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(MAX_REPORTED_COUNT as f64) as u32
    } else {
        0
    }
}

/// Rates above 1 are read as percentages
fn normalize_rate(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let value = if value > 1.0 { value / 100.0 } else { value };
    clamp_unit(value)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn quality_metrics(members: &[MemberMetrics]) -> QualityMetrics {
    if members.is_empty() {
        return QualityMetrics::default();
    }

    let count = |tier: QualityTier| members.iter().filter(|m| m.quality_tier() == tier).count();
    let percent = |n: usize| ((n as f64 / members.len() as f64) * 100.0).round() as u32;

    QualityMetrics {
        high_quality: percent(count(QualityTier::High)),
        medium_quality: percent(count(QualityTier::Medium)),
        review_needed: percent(count(QualityTier::ReviewNeeded)),
    }
}

fn engagement_distribution(members: &[MemberMetrics]) -> EngagementDistribution {
    members
        .iter()
        .fold(EngagementDistribution::default(), |mut dist, m| {
            if m.engagement_rate >= 0.7 {
                dist.high += 1;
            } else if m.engagement_rate >= 0.5 {
                dist.moderate += 1;
            } else {
                dist.low += 1;
            }
            dist
        })
}
