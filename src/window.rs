use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc, Weekday,
};
use serde::Serialize;

/// Longest trailing window honoured; larger requests are clamped to it.
pub const MAX_TRAILING_DAYS: u32 = 36_600;

/// Zone and week layout used to turn instants into calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketingConfig {
    pub time_zone: FixedOffset,
    pub week_start: Weekday,
}

impl Default for BucketingConfig {
    fn default() -> Self {
        Self {
            time_zone: Utc.fix(),
            week_start: Weekday::Sun,
        }
    }
}

impl BucketingConfig {
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    /// Days between the configured week start and `date`'s weekday.
    pub fn days_into_week(&self, date: NaiveDate) -> u32 {
        (7 + date.weekday().num_days_from_sunday() - self.week_start.num_days_from_sunday()) % 7
    }

    pub fn week_start_of(&self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(self.days_into_week(date)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Day,
    Week,
    Month,
    Year,
    TrailingDays(u32),
}

/// A run of whole calendar days in the bucketing zone.
///
/// `start` is midnight of `first_day` and `end` is 23:59:59.999 of `last_day`;
/// both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl PeriodWindow {
    pub fn from_days(first_day: NaiveDate, last_day: NaiveDate, time_zone: FixedOffset) -> Self {
        let start = first_day.and_time(NaiveTime::MIN);
        let end =
            (last_day + Duration::days(1)).and_time(NaiveTime::MIN) - Duration::milliseconds(1);
        Self {
            first_day,
            last_day,
            start: at_local(start, time_zone),
            end: at_local(end, time_zone),
        }
    }

    pub fn single_day(day: NaiveDate, time_zone: FixedOffset) -> Self {
        Self::from_days(day, day, time_zone)
    }

    pub fn time_zone(&self) -> FixedOffset {
        *self.start.offset()
    }

    pub fn num_days(&self) -> i64 {
        (self.last_day - self.first_day).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first_day.iter_days().take_while(|day| *day <= self.last_day)
    }

    /// Instant-level membership, inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let instant = instant.with_timezone(&self.time_zone());
        instant >= self.start && instant <= self.end
    }

    /// Calendar-level membership: the instant's local date lies in the window.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        let day = instant.with_timezone(&self.time_zone()).date_naive();
        day >= self.first_day && day <= self.last_day
    }

    /// Splits the window into consecutive chunks of `len` days; the last
    /// chunk keeps whatever days remain.
    pub fn chunks(&self, len: u32) -> Vec<PeriodWindow> {
        let step = i64::from(len.max(1));
        let mut chunks = Vec::new();
        let mut first = self.first_day;
        while first <= self.last_day {
            let last = (first + Duration::days(step - 1)).min(self.last_day);
            chunks.push(Self::from_days(first, last, self.time_zone()));
            first = last + Duration::days(1);
        }
        chunks
    }

    pub fn day_windows(&self) -> Vec<PeriodWindow> {
        self.chunks(1)
    }
}

fn at_local(local: NaiveDateTime, time_zone: FixedOffset) -> DateTime<FixedOffset> {
    let utc = local - Duration::seconds(i64::from(time_zone.local_minus_utc()));
    time_zone.from_utc_datetime(&utc)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    // 31 days past the 1st always lands in the following month.
    let next = first_of_month(first + Duration::days(31));
    (next - first).num_days() as u32
}

pub fn month_window(date: NaiveDate, time_zone: FixedOffset) -> PeriodWindow {
    let first = first_of_month(date);
    let last = first + Duration::days(i64::from(days_in_month(first)) - 1);
    PeriodWindow::from_days(first, last, time_zone)
}

pub fn window_for(
    kind: WindowKind,
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> PeriodWindow {
    let today = config.local_date(reference);
    let tz = config.time_zone;
    match kind {
        WindowKind::Day => PeriodWindow::single_day(today, tz),
        WindowKind::Week => {
            let start = config.week_start_of(today);
            PeriodWindow::from_days(start, start + Duration::days(6), tz)
        }
        WindowKind::Month => month_window(today, tz),
        WindowKind::Year => {
            let start = today
                .checked_sub_months(Months::new(12))
                .unwrap_or(today - Duration::days(365));
            PeriodWindow::from_days(start, today, tz)
        }
        WindowKind::TrailingDays(n) => {
            let span = Duration::days(i64::from(n.min(MAX_TRAILING_DAYS)));
            PeriodWindow::from_days(today - span, today, tz)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn day_window_spans_midnight_to_last_millisecond() {
        let config = BucketingConfig::default();
        let window = window_for(WindowKind::Day, at(2024, 5, 15, 13, 45), &config);

        assert_eq!(window.first_day, date(2024, 5, 15));
        assert_eq!(window.start.to_rfc3339(), "2024-05-15T00:00:00+00:00");
        assert_eq!(window.end.timestamp_millis() - window.start.timestamp_millis(), 86_399_999);
        assert!(window.contains(at(2024, 5, 15, 0, 0)));
        assert!(!window.contains(at(2024, 5, 16, 0, 0)));
    }

    #[test]
    fn week_window_starts_on_sunday_by_default() {
        let config = BucketingConfig::default();
        // Wednesday
        let window = window_for(WindowKind::Week, at(2024, 5, 15, 9, 0), &config);

        assert_eq!(window.first_day, date(2024, 5, 12));
        assert_eq!(window.last_day, date(2024, 5, 18));
        assert_eq!(window.num_days(), 7);
    }

    #[test]
    fn week_window_on_the_start_day_begins_that_day() {
        let config = BucketingConfig::default();
        let window = window_for(WindowKind::Week, at(2024, 5, 12, 23, 59), &config);
        assert_eq!(window.first_day, date(2024, 5, 12));
    }

    #[test]
    fn week_window_honours_monday_start() {
        let config = BucketingConfig {
            week_start: Weekday::Mon,
            ..BucketingConfig::default()
        };
        let window = window_for(WindowKind::Week, at(2024, 5, 12, 9, 0), &config);

        assert_eq!(window.first_day, date(2024, 5, 6));
        assert_eq!(window.last_day, date(2024, 5, 12));
    }

    #[test]
    fn week_window_crosses_month_boundary() {
        let config = BucketingConfig::default();
        // Wednesday 1 May 2024
        let window = window_for(WindowKind::Week, at(2024, 5, 1, 12, 0), &config);
        assert_eq!(window.first_day, date(2024, 4, 28));
        assert_eq!(window.last_day, date(2024, 5, 4));
    }

    #[test]
    fn month_window_uses_calendar_length() {
        let config = BucketingConfig::default();
        let cases = [
            (at(2024, 2, 10, 0, 0), 29),
            (at(2026, 2, 10, 0, 0), 28),
            (at(2024, 4, 30, 0, 0), 30),
            (at(2024, 12, 31, 23, 0), 31),
        ];
        for (reference, expected) in cases {
            let window = window_for(WindowKind::Month, reference, &config);
            assert_eq!(window.first_day.day(), 1);
            assert_eq!(window.num_days(), expected);
            assert_eq!(days_in_month(window.first_day), expected as u32);
        }
    }

    #[test]
    fn year_window_reaches_back_one_calendar_year() {
        let config = BucketingConfig::default();
        let window = window_for(WindowKind::Year, at(2024, 2, 29, 8, 0), &config);
        assert_eq!(window.first_day, date(2023, 2, 28));
        assert_eq!(window.last_day, date(2024, 2, 29));
    }

    #[test]
    fn trailing_days_include_the_reference_day() {
        let config = BucketingConfig::default();
        let window = window_for(WindowKind::TrailingDays(6), at(2024, 5, 15, 8, 0), &config);
        assert_eq!(window.first_day, date(2024, 5, 9));
        assert_eq!(window.last_day, date(2024, 5, 15));
        assert_eq!(window.num_days(), 7);
        assert!(window.contains(at(2024, 5, 9, 0, 0)));
        assert!(window.contains(at(2024, 5, 15, 23, 59)));
        assert!(!window.contains(at(2024, 5, 8, 23, 59)));
    }

    #[test]
    fn huge_trailing_window_is_clamped() {
        let config = BucketingConfig {
            time_zone: offset(9),
            ..BucketingConfig::default()
        };
        let reference = at(2024, 5, 15, 12, 0);
        let window = window_for(WindowKind::TrailingDays(u32::MAX), reference, &config);
        assert_eq!(window.last_day, date(2024, 5, 15));
        assert_eq!(window.num_days(), i64::from(MAX_TRAILING_DAYS) + 1);
    }

    #[test]
    fn reference_is_converted_to_the_bucketing_zone_first() {
        let config = BucketingConfig {
            time_zone: offset(-5),
            ..BucketingConfig::default()
        };
        // 02:00 UTC on the 16th is still the 15th five hours west.
        let window = window_for(WindowKind::Day, at(2024, 5, 16, 2, 0), &config);
        assert_eq!(window.first_day, date(2024, 5, 15));
        assert_eq!(window.start.to_rfc3339(), "2024-05-15T00:00:00-05:00");
        assert!(window.contains(at(2024, 5, 16, 4, 59)));
        assert!(!window.contains(at(2024, 5, 16, 5, 0)));
    }

    #[test]
    fn covers_compares_local_calendar_dates() {
        let window = PeriodWindow::single_day(date(2024, 5, 16), offset(2));
        assert!(window.covers(at(2024, 5, 15, 22, 0)));
        assert!(!window.covers(at(2024, 5, 15, 21, 59)));
    }

    #[test]
    fn chunks_keep_the_remainder_in_the_last_window() {
        let window = month_window(date(2024, 5, 20), Utc.fix());
        let weeks = window.chunks(7);

        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0].first_day, date(2024, 5, 1));
        assert_eq!(weeks[0].last_day, date(2024, 5, 7));
        assert_eq!(weeks[4].first_day, date(2024, 5, 29));
        assert_eq!(weeks[4].last_day, date(2024, 5, 31));
        assert_eq!(window.day_windows().len(), 31);
        assert_eq!(window.days().count(), 31);
    }
}
