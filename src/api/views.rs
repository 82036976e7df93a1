// Dashboard view models
//
// Pure functions from DashboardMetrics to the series each dashboard widget
// draws: KPI cards, the member bar chart, the weekly trend line, the quality
// pie, and the ranking table.

use serde::Serialize;

use crate::domain::metrics::model::QualityTier;
use crate::domain::metrics::{DashboardInsights, DashboardMetrics, MetricsSource, ReportPeriod};
use crate::domain::team::member::first_name;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub loading: bool,
    pub report_period: ReportPeriod,
    pub source: MetricsSource,
    pub kpis: Vec<Kpi>,
    pub member_chart: Vec<MemberChartPoint>,
    pub trend_chart: Vec<TrendChartPoint>,
    pub quality_chart: Vec<QualitySlice>,
    pub rankings: Vec<RankingRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<DashboardInsights>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberChartPoint {
    pub name: String,
    pub mqls: u32,
    pub campaigns: u32,
    /// Engagement as a whole percentage
    pub engagement: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendChartPoint {
    pub week: String,
    pub mqls: u32,
    pub campaigns: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualitySlice {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub rank: usize,
    pub name: String,
    pub mqls: u32,
    pub campaigns: u32,
    pub engagement_percent: u32,
    pub quality_score: u32,
    pub quality_tier: QualityTier,
}

/// Offsets subtracted from this week's totals for the three prior weeks
const TREND_OFFSETS: [(&str, u32, u32); 3] = [("Week 1", 45, 8), ("Week 2", 30, 5), ("Week 3", 15, 2)];

impl DashboardView {
    pub fn build(metrics: &DashboardMetrics, loading: bool) -> Self {
        Self {
            loading,
            report_period: metrics.report_period,
            source: metrics.source,
            kpis: kpis(metrics),
            member_chart: member_chart(metrics),
            trend_chart: trend_chart(metrics),
            quality_chart: quality_chart(metrics),
            rankings: rankings(metrics),
            insights: metrics.insights.clone(),
        }
    }
}

fn percent(rate: f64) -> u32 {
    (rate * 100.0).round() as u32
}

pub fn kpis(metrics: &DashboardMetrics) -> Vec<Kpi> {
    vec![
        Kpi {
            label: "Total MQLs".to_string(),
            value: metrics.total_mqls.to_string(),
        },
        Kpi {
            label: "Campaigns".to_string(),
            value: metrics.total_campaigns.to_string(),
        },
        Kpi {
            label: "Avg Engagement".to_string(),
            value: format!("{}%", percent(metrics.avg_engagement_rate)),
        },
        Kpi {
            label: "Team Members".to_string(),
            value: metrics.team_size.to_string(),
        },
    ]
}

pub fn member_chart(metrics: &DashboardMetrics) -> Vec<MemberChartPoint> {
    metrics
        .members
        .iter()
        .map(|m| MemberChartPoint {
            name: first_name(&m.name).to_string(),
            mqls: m.mqls,
            campaigns: m.campaigns,
            engagement: percent(m.engagement_rate),
        })
        .collect()
}

pub fn trend_chart(metrics: &DashboardMetrics) -> Vec<TrendChartPoint> {
    TREND_OFFSETS
        .iter()
        .map(|&(week, mql_offset, campaign_offset)| TrendChartPoint {
            week: week.to_string(),
            mqls: metrics.total_mqls.saturating_sub(mql_offset),
            campaigns: metrics.total_campaigns.saturating_sub(campaign_offset),
        })
        .chain(std::iter::once(TrendChartPoint {
            week: "This Week".to_string(),
            mqls: metrics.total_mqls,
            campaigns: metrics.total_campaigns,
        }))
        .collect()
}

pub fn quality_chart(metrics: &DashboardMetrics) -> Vec<QualitySlice> {
    let q = metrics.quality_metrics;
    [
        (QualityTier::High, q.high_quality),
        (QualityTier::Medium, q.medium_quality),
        (QualityTier::ReviewNeeded, q.review_needed),
    ]
    .into_iter()
    .map(|(tier, value)| QualitySlice {
        name: tier.to_string(),
        value,
    })
    .collect()
}

/// Contributors ordered by MQL count, highest first
pub fn rankings(metrics: &DashboardMetrics) -> Vec<RankingRow> {
    let mut members: Vec<_> = metrics.members.iter().collect();
    members.sort_by(|a, b| b.mqls.cmp(&a.mqls));

    members
        .into_iter()
        .enumerate()
        .map(|(idx, m)| RankingRow {
            rank: idx + 1,
            name: m.name.clone(),
            mqls: m.mqls,
            campaigns: m.campaigns,
            engagement_percent: percent(m.engagement_rate),
            quality_score: percent(m.quality_score),
            quality_tier: m.quality_tier(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::model::{EngagementDistribution, MemberMetrics, QualityMetrics};
    use crate::domain::metrics::synthesizer::trend_history;
    use chrono::{NaiveDate, Utc};

    fn member(name: &str, mqls: u32, engagement: f64, quality: f64) -> MemberMetrics {
        MemberMetrics {
            name: name.to_string(),
            mqls,
            campaigns: 5,
            engagement_rate: engagement,
            quality_score: quality,
            slack_user_id: None,
            response_time: None,
            status: None,
        }
    }

    fn metrics(members: Vec<MemberMetrics>) -> DashboardMetrics {
        DashboardMetrics {
            generated_at: Utc::now(),
            report_period: ReportPeriod::week_containing(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()),
            total_mqls: members.iter().map(|m| m.mqls).sum(),
            total_campaigns: members.iter().map(|m| m.campaigns).sum(),
            avg_engagement_rate: 0.684,
            avg_quality_score: 0.8,
            team_size: members.len(),
            members,
            trends: trend_history(),
            quality_metrics: QualityMetrics {
                high_quality: 67,
                medium_quality: 33,
                review_needed: 0,
            },
            engagement_distribution: EngagementDistribution::default(),
            source: MetricsSource::Reported,
            insights: None,
        }
    }

    #[test]
    fn kpis_format_values() {
        let m = metrics(vec![member("Alice Johnson", 45, 0.72, 0.9)]);
        let kpis = kpis(&m);

        assert_eq!(kpis[0].value, "45");
        assert_eq!(kpis[2].label, "Avg Engagement");
        assert_eq!(kpis[2].value, "68%");
        assert_eq!(kpis[3].value, "1");
    }

    #[test]
    fn member_chart_uses_first_names_and_percent() {
        let m = metrics(vec![member("Alice Johnson", 45, 0.72, 0.9)]);
        let chart = member_chart(&m);

        assert_eq!(chart[0].name, "Alice");
        assert_eq!(chart[0].engagement, 72);
    }

    #[test]
    fn trend_chart_saturates_at_zero() {
        let m = metrics(vec![member("A", 20, 0.5, 0.5)]);
        let chart = trend_chart(&m);

        let mqls: Vec<u32> = chart.iter().map(|p| p.mqls).collect();
        assert_eq!(mqls, vec![0, 0, 5, 20]);
        assert_eq!(chart[3].week, "This Week");
        assert_eq!(chart[0].campaigns, 0);
    }

    #[test]
    fn rankings_sort_by_mqls_descending() {
        let m = metrics(vec![
            member("Alice", 45, 0.72, 0.85),
            member("Bob", 62, 0.75, 0.65),
            member("Carol", 38, 0.65, 0.4),
        ]);
        let rows = rankings(&m);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice", "Carol"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].quality_tier, QualityTier::Medium);
        assert_eq!(rows[1].quality_score, 85);
        assert_eq!(rows[2].quality_tier, QualityTier::ReviewNeeded);
    }

    #[test]
    fn quality_chart_uses_tier_labels() {
        let m = metrics(vec![]);
        let chart = quality_chart(&m);

        assert_eq!(chart[0].name, "High Quality");
        assert_eq!(chart[0].value, 67);
        assert_eq!(chart[2].name, "Review Needed");
    }

    #[test]
    fn build_carries_loading_flag() {
        let m = metrics(vec![member("A", 1, 0.5, 0.5)]);
        let view = DashboardView::build(&m, true);

        assert!(view.loading);
        assert_eq!(view.kpis.len(), 4);
        assert_eq!(view.trend_chart.len(), 4);
    }
}
