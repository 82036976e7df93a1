use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The Monday-to-Sunday week a workflow run reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// Returns the week that contains `date`
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use pulse_api::domain::metrics::ReportPeriod;
    ///
    /// let wednesday = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    /// let period = ReportPeriod::week_containing(wednesday);
    /// assert_eq!(period.label(), "2026-10-12 to 2026-10-18");
    /// ```
    pub fn week_containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        let start = date - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Returns the current week in UTC
    pub fn current_week() -> Self {
        Self::week_containing(chrono::Utc::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Human-readable label embedded into agent instructions
    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
