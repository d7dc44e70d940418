use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Duration;
use chrono_tz::Tz;

use crate::time::parse_duration;

pub const DEFAULT_TIME_ZONE: &str = "Europe/Moscow";
pub const DEFAULT_EVENT_DURATION: &str = "1";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_LOG_FILTER: &str = "voxtask=info";

#[derive(Debug, Clone)]
pub struct Settings {
    pub time_zone: Tz,
    pub default_event_duration: Duration,
    pub calendar_id: String,
    /// `None` means the home-directory default chosen by the repositories.
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tz_name = get("TIME_ZONE").unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone = parse_time_zone(&tz_name)?;

        let duration_str =
            get("DEFAULT_EVENT_DURATION_HOURS").unwrap_or_else(|| DEFAULT_EVENT_DURATION.to_string());
        let default_event_duration = parse_duration(&duration_str)?;
        if default_event_duration <= Duration::zero() {
            return Err(anyhow!("Event duration must be positive: '{}'", duration_str));
        }

        Ok(Self {
            time_zone,
            default_event_duration,
            calendar_id: get("CALENDAR_ID").unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            data_dir: get("VOXTASK_DATA_DIR").map(PathBuf::from),
            log_filter: get("VOXTASK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Europe::Moscow,
            default_event_duration: Duration::hours(1),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

pub fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("Invalid time zone '{}': {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.time_zone, chrono_tz::Europe::Moscow);
        assert_eq!(settings.default_event_duration, Duration::hours(1));
        assert_eq!(settings.calendar_id, "primary");
        assert_eq!(settings.data_dir, None);
        assert_eq!(settings.log_filter, "voxtask=info");
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("TIME_ZONE", "Asia/Yekaterinburg"),
            ("DEFAULT_EVENT_DURATION_HOURS", "2"),
            ("CALENDAR_ID", "work"),
            ("VOXTASK_DATA_DIR", "/tmp/voxtask"),
        ])
        .unwrap();
        assert_eq!(settings.time_zone, chrono_tz::Asia::Yekaterinburg);
        assert_eq!(settings.default_event_duration, Duration::hours(2));
        assert_eq!(settings.calendar_id, "work");
        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/voxtask")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let settings = settings_from(&[("TIME_ZONE", "  "), ("CALENDAR_ID", "")]).unwrap();
        assert_eq!(settings.time_zone, chrono_tz::Europe::Moscow);
        assert_eq!(settings.calendar_id, "primary");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(settings_from(&[("TIME_ZONE", "Mars/Olympus")]).is_err());
        assert!(settings_from(&[("DEFAULT_EVENT_DURATION_HOURS", "many")]).is_err());
        assert!(settings_from(&[("DEFAULT_EVENT_DURATION_HOURS", "0")]).is_err());
        assert!(settings_from(&[("DEFAULT_EVENT_DURATION_HOURS", "99999999999999999")]).is_err());
    }
}
