use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_NOTES_CHARS: usize = 280;
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub mood: String,
    pub mood_emoji: String,
    pub energy_level: u8,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub entries: Vec<MoodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    pub user_id: String,
    pub mood: String,
    #[serde(default)]
    pub mood_emoji: Option<String>,
    pub energy_level: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub user_id: String,
    pub reference: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryWindow {
    Day,
    Week,
    Month,
    Year,
    Trailing,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub user_id: String,
    pub window: SummaryWindow,
    pub days: Option<u32>,
    pub reference: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub user_id: String,
    pub period: crate::resample::ChartPeriod,
    pub reference: Option<DateTime<Utc>>,
}
