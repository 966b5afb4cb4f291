use crate::types::AcquisitionDate;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Plot axis parameters for coherence panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisParams {
    /// Height of the temporal-baseline window per year axis (days)
    pub baseline_max: f64,
    /// Tick spacing on the temporal-baseline axis (days)
    pub baseline_dtick: u32,
    pub days_per_year: f64,
    /// Span of second dates shown, counted back from the latest acquisition
    pub max_years: f64,
    /// Number of stacked year axes
    pub year_axes_count: usize,
    /// Padding added either side of the date axis (days)
    pub date_padding_days: i64,
}

impl Default for AxisParams {
    fn default() -> Self {
        Self {
            baseline_max: 150.0,
            baseline_dtick: 24,
            days_per_year: 365.25,
            max_years: 3.0,
            year_axes_count: 1,
            date_padding_days: 4,
        }
    }
}

/// Axis extents for one year axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisExtents {
    pub year: usize,
    pub baseline_limits: (f64, f64),
    pub date_limits: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl AxisParams {
    /// Temporal-baseline window for the given year axis.
    ///
    /// Year 0 spans `[0, baseline_max]`; later years are centred on
    /// `floor(year * days_per_year)`.
    pub fn baseline_limits(&self, year: usize) -> (f64, f64) {
        if year == 0 {
            return (0.0, self.baseline_max);
        }
        let centre = (year as f64 * self.days_per_year).floor();
        let half = self.baseline_max / 2.0;
        (centre - half, centre + half)
    }

    /// Date-axis window over sorted second dates, `None` when there are none
    pub fn second_date_limits(
        &self,
        second_dates: &[AcquisitionDate],
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = second_dates.first()?.and_time(NaiveTime::MIN);
        let last = second_dates.last()?.and_time(NaiveTime::MIN);

        let window =
            Duration::seconds((self.days_per_year * self.max_years * 86_400.0).round() as i64);
        let padding = Duration::days(self.date_padding_days);

        let start = first.max(last - window) - padding;
        Some((start, last + padding))
    }

    /// Extents for every configured year axis
    pub fn extents(&self, second_dates: &[AcquisitionDate]) -> Vec<AxisExtents> {
        let date_limits = self.second_date_limits(second_dates);
        (0..self.year_axes_count)
            .map(|year| AxisExtents {
                year,
                baseline_limits: self.baseline_limits(year),
                date_limits,
            })
            .collect()
    }
}
