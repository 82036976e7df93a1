// Metrics domain module
// Contributor metrics, the dashboard aggregate, and their synthesis

pub mod model;
pub mod period;
pub mod report;
pub mod synthesizer;

pub use model::{DashboardMetrics, MemberMetrics, MetricsSource, QualityTier};
pub use period::ReportPeriod;
pub use report::{AggregationReport, ContributorReport, DashboardInsights};
pub use synthesizer::synthesize;
