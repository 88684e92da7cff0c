use crate::aggregate::{bucketize, PeriodBucket};
use crate::models::MoodEntry;
use crate::score::mood_score;
use crate::window::{
    first_of_month, month_window, window_for, BucketingConfig, PeriodWindow, WindowKind,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub period_label: String,
    pub window: PeriodWindow,
    pub energy: u8,
    pub mood_score: f64,
    pub entry_count: usize,
    pub has_data: bool,
}

impl DataPoint {
    fn from_bucket(period_label: String, bucket: &PeriodBucket) -> Self {
        let mood_score = if bucket.entries.is_empty() {
            0.0
        } else {
            let total: u32 = bucket
                .entries
                .iter()
                .map(|entry| u32::from(mood_score(&entry.mood)))
                .sum();
            f64::from(total) / bucket.entries.len() as f64
        };
        Self {
            period_label,
            window: bucket.window.clone(),
            energy: bucket.average_energy,
            mood_score,
            entry_count: bucket.entry_count(),
            has_data: bucket.has_data,
        }
    }

    /// True when both series read zero, which a line chart cannot tell apart
    /// from an empty period.
    pub fn is_blank(&self) -> bool {
        self.energy == 0 && self.mood_score == 0.0
    }
}

/// Parallel series ready for a line chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub energy: Vec<u8>,
    pub mood_score: Vec<f64>,
}

impl<'a> FromIterator<&'a DataPoint> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = &'a DataPoint>>(iter: I) -> Self {
        let mut series = ChartSeries::default();
        for point in iter {
            series.labels.push(point.period_label.clone());
            series.energy.push(point.energy);
            series.mood_score.push(point.mood_score);
        }
        series
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub period: ChartPeriod,
    pub window: PeriodWindow,
    pub points: Vec<DataPoint>,
    pub line: ChartSeries,
}

/// Labelled sub-periods plotted for `period`, plus the window they span.
pub fn chart_windows(
    period: ChartPeriod,
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> (PeriodWindow, Vec<(String, PeriodWindow)>) {
    match period {
        ChartPeriod::Week => {
            let week = window_for(WindowKind::Week, reference, config);
            let days = week
                .day_windows()
                .into_iter()
                .map(|day| (day.first_day.format("%a").to_string(), day))
                .collect();
            (week, days)
        }
        ChartPeriod::Month => {
            let month = window_for(WindowKind::Month, reference, config);
            let weeks = month
                .chunks(7)
                .into_iter()
                .enumerate()
                .map(|(index, week)| (format!("Week {}", index + 1), week))
                .collect();
            (month, weeks)
        }
        ChartPeriod::Year => {
            let tz = config.time_zone;
            let mut first = first_of_month(config.local_date(reference));
            let mut months = vec![month_window(first, tz)];
            for _ in 1..12 {
                first = first_of_month(first - Duration::days(1));
                months.push(month_window(first, tz));
            }
            months.reverse();
            let span = PeriodWindow::from_days(months[0].first_day, months[11].last_day, tz);
            let labelled = months
                .into_iter()
                .map(|month| (month.first_day.format("%b").to_string(), month))
                .collect();
            (span, labelled)
        }
    }
}

/// One point per sub-period of `period`: 7 days, the weeks of the month, or
/// the 12 months ending with the reference month. Empty periods are zero-filled.
pub fn resample(
    entries: &[MoodEntry],
    period: ChartPeriod,
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> Vec<DataPoint> {
    let (_, labelled) = chart_windows(period, reference, config);
    let (labels, windows): (Vec<String>, Vec<PeriodWindow>) = labelled.into_iter().unzip();
    bucketize(entries, &windows)
        .iter()
        .zip(labels)
        .map(|(bucket, label)| DataPoint::from_bucket(label, bucket))
        .collect()
}

/// Points that belong on the plotted line: blank points are dropped.
pub fn plotted_points(points: &[DataPoint]) -> Vec<&DataPoint> {
    points.iter().filter(|point| !point.is_blank()).collect()
}

pub fn build_chart(
    entries: &[MoodEntry],
    period: ChartPeriod,
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> ChartResponse {
    let (window, _) = chart_windows(period, reference, config);
    let points = resample(entries, period, reference, config);
    let line = plotted_points(&points).into_iter().collect();
    ChartResponse {
        period,
        window,
        points,
        line,
    }
}
