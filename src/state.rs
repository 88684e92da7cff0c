use crate::models::{AppData, MoodEntry};
use crate::storage::fetch_entries;
use crate::window::BucketingConfig;
use chrono::{DateTime, Utc};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub bucketing: BucketingConfig,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, bucketing: BucketingConfig) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            bucketing,
        }
    }

    /// Copies a user's entries out so aggregation runs without the lock.
    pub async fn entries_for(&self, user_id: &str, since: Option<DateTime<Utc>>) -> Vec<MoodEntry> {
        let data = self.data.lock().await;
        fetch_entries(&data, user_id, since)
    }
}
