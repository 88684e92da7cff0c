use crate::errors::AppError;
use crate::models::{AppData, MoodEntry};
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!(path = %path.display(), "failed to parse mood data, starting empty: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!(path = %path.display(), "failed to read mood data, starting empty: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// A user's entries, oldest first, optionally only those at or after `since`.
pub fn fetch_entries(
    data: &AppData,
    user_id: &str,
    since: Option<DateTime<Utc>>,
) -> Vec<MoodEntry> {
    let mut entries: Vec<MoodEntry> = data
        .entries
        .iter()
        .filter(|entry| entry.user_id == user_id)
        .filter(|entry| since.is_none_or(|since| entry.created_at >= since))
        .cloned()
        .collect();
    entries.sort_by_key(|entry| entry.created_at);
    entries
}

/// The newest `limit` entries for a user, newest first.
pub fn recent_entries(data: &AppData, user_id: &str, limit: usize) -> Vec<MoodEntry> {
    let mut entries = fetch_entries(data, user_id, None);
    entries.reverse();
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{at, entry};

    fn sample() -> AppData {
        let mut other = entry("Sad", "😢", 10, at(2024, 5, 14, 9, 0));
        other.user_id = "user-2".to_string();
        AppData {
            entries: vec![
                entry("Happy", "😊", 90, at(2024, 5, 15, 9, 0)),
                other,
                entry("Tired", "😴", 20, at(2024, 5, 13, 9, 0)),
                entry("Neutral", "😐", 50, at(2024, 5, 14, 9, 0)),
            ],
        }
    }

    #[test]
    fn fetch_filters_by_user_and_sorts_ascending() {
        let entries = fetch_entries(&sample(), "user-1", None);
        let moods: Vec<&str> = entries.iter().map(|e| e.mood.as_str()).collect();
        assert_eq!(moods, ["Tired", "Neutral", "Happy"]);
    }

    #[test]
    fn fetch_respects_lower_bound() {
        let entries = fetch_entries(&sample(), "user-1", Some(at(2024, 5, 14, 9, 0)));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mood, "Neutral");
    }

    #[test]
    fn recent_entries_are_newest_first() {
        let entries = recent_entries(&sample(), "user-1", 2);
        let moods: Vec<&str> = entries.iter().map(|e| e.mood.as_str()).collect();
        assert_eq!(moods, ["Happy", "Neutral"]);
        assert!(recent_entries(&sample(), "nobody", 5).is_empty());
    }

    #[tokio::test]
    async fn missing_file_loads_empty_and_persist_round_trips() {
        let mut path = std::env::temp_dir();
        path.push(format!("mood_dashboard_storage_{}.json", std::process::id()));
        let _ = fs::remove_file(&path).await;

        assert!(load_data(&path).await.entries.is_empty());

        persist_data(&path, &sample()).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.entries, sample().entries);

        let _ = fs::remove_file(&path).await;
    }
}
