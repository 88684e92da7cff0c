//! Calendar bucketing of mood entries.
//!
//! Buckets match entries by the calendar date of `created_at` in the window's
//! zone, so two entries land together iff their local dates fall in the same
//! window. Empty buckets report `0` energy and an empty dominant mood; use
//! `has_data` (or the entry count) to tell them apart from real readings.

use crate::models::MoodEntry;
use crate::window::{window_for, BucketingConfig, PeriodWindow, WindowKind};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    pub window: PeriodWindow,
    pub entries: Vec<MoodEntry>,
    pub average_energy: u8,
    pub dominant_mood: String,
    pub dominant_emoji: String,
    pub has_data: bool,
}

impl PeriodBucket {
    pub fn period_start(&self) -> DateTime<FixedOffset> {
        self.window.start
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub window: PeriodWindow,
    pub entry_count: usize,
    pub average_energy: u8,
    pub dominant_mood: String,
    pub dominant_emoji: String,
    pub has_data: bool,
}

impl From<&PeriodBucket> for WindowSummary {
    fn from(bucket: &PeriodBucket) -> Self {
        Self {
            window: bucket.window.clone(),
            entry_count: bucket.entry_count(),
            average_energy: bucket.average_energy,
            dominant_mood: bucket.dominant_mood.clone(),
            dominant_emoji: bucket.dominant_emoji.clone(),
            has_data: bucket.has_data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekOverview {
    pub summary: WindowSummary,
    pub days: Vec<PeriodBucket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthOverview {
    pub summary: WindowSummary,
    /// Empty calendar cells before the 1st when rows begin on the week start.
    pub leading_blank_days: u32,
    pub days: Vec<PeriodBucket>,
}

/// Mood with the highest count, and the emoji of its first entry.
///
/// Labels are visited in order of first appearance and a later label only
/// takes over on a strictly greater count, so ties go to the earliest.
#[derive(Debug, Default)]
struct MoodTally<'a> {
    order: Vec<(&'a str, &'a str, usize)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> MoodTally<'a> {
    fn record(&mut self, entry: &'a MoodEntry) {
        match self.index.get(entry.mood.as_str()) {
            Some(&slot) => self.order[slot].2 += 1,
            None => {
                self.index.insert(entry.mood.as_str(), self.order.len());
                self.order
                    .push((entry.mood.as_str(), entry.mood_emoji.as_str(), 1));
            }
        }
    }

    fn dominant(&self) -> Option<(&'a str, &'a str)> {
        let mut best: Option<(&'a str, &'a str)> = None;
        let mut best_count = 0;
        for &(mood, emoji, count) in &self.order {
            if count > best_count {
                best_count = count;
                best = Some((mood, emoji));
            }
        }
        best
    }
}

pub fn dominant_mood<'a, I>(entries: I) -> Option<(&'a str, &'a str)>
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut tally = MoodTally::default();
    for entry in entries {
        tally.record(entry);
    }
    tally.dominant()
}

/// Mean energy rounded half-up; `0` when there are no entries.
pub fn average_energy<'a, I>(entries: I) -> u8
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let (sum, count) = entries
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), entry| {
            (sum + u64::from(entry.energy_level), count + 1)
        });
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as u8
}

/// Aggregates every entry whose local date falls inside `window`.
pub fn summarize(entries: &[MoodEntry], window: &PeriodWindow) -> PeriodBucket {
    let matched: Vec<MoodEntry> = entries
        .iter()
        .filter(|entry| window.covers(entry.created_at))
        .cloned()
        .collect();

    let average_energy = average_energy(&matched);
    let (dominant_mood, dominant_emoji) = dominant_mood(&matched)
        .map(|(mood, emoji)| (mood.to_string(), emoji.to_string()))
        .unwrap_or_default();

    PeriodBucket {
        window: window.clone(),
        has_data: !matched.is_empty(),
        entries: matched,
        average_energy,
        dominant_mood,
        dominant_emoji,
    }
}

/// One bucket per sub-window, in the order given; empty windows are kept.
pub fn bucketize(entries: &[MoodEntry], sub_windows: &[PeriodWindow]) -> Vec<PeriodBucket> {
    sub_windows
        .iter()
        .map(|window| summarize(entries, window))
        .collect()
}

pub fn week_overview(
    entries: &[MoodEntry],
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> WeekOverview {
    let window = window_for(WindowKind::Week, reference, config);
    WeekOverview {
        summary: WindowSummary::from(&summarize(entries, &window)),
        days: bucketize(entries, &window.day_windows()),
    }
}

pub fn month_overview(
    entries: &[MoodEntry],
    reference: DateTime<Utc>,
    config: &BucketingConfig,
) -> MonthOverview {
    let window = window_for(WindowKind::Month, reference, config);
    MonthOverview {
        summary: WindowSummary::from(&summarize(entries, &window)),
        leading_blank_days: config.days_into_week(window.first_day),
        days: bucketize(entries, &window.day_windows()),
    }
}
