use crate::window::BucketingConfig;
use chrono::{FixedOffset, Weekday};
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub bucketing: BucketingConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from a key lookup. Unparseable values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = BucketingConfig::default();

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let time_zone: FixedOffset =
            parse_or("MOOD_TZ_OFFSET", lookup("MOOD_TZ_OFFSET"), defaults.time_zone);
        let week_start: Weekday =
            parse_or("MOOD_WEEK_START", lookup("MOOD_WEEK_START"), defaults.week_start);

        Self {
            port,
            data_path,
            bucketing: BucketingConfig {
                time_zone,
                week_start,
            },
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }
    }
}
