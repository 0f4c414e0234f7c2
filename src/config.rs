use chrono::NaiveTime;
use dotenvy::dotenv;
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use crate::geo::Coordinates;

#[derive(Error, Debug)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,

    // Attendance
    pub checkin_cutoff: NaiveTime,
    pub geo_timeout: Duration,
    pub default_location: Option<Coordinates>,

    // Leave
    pub visible_leave_types: Vec<String>,
    pub leave_type_cache_ttl: Duration,

    pub session_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let latitude: Option<f64> = try_load_opt(&lookup, "HRM_LATITUDE")?;
        let longitude: Option<f64> = try_load_opt(&lookup, "HRM_LONGITUDE")?;
        let default_location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(
                Coordinates::new(latitude, longitude).map_err(|reason| ConfigError {
                    key: "HRM_LATITUDE",
                    reason,
                })?,
            ),
            (None, None) => None,
            _ => {
                return Err(ConfigError {
                    key: "HRM_LATITUDE",
                    reason: "HRM_LATITUDE and HRM_LONGITUDE must be set together".into(),
                });
            }
        };

        let cutoff_raw = lookup("CHECKIN_CUTOFF").unwrap_or_else(|| "11:00:00".to_string());
        let checkin_cutoff = NaiveTime::parse_from_str(&cutoff_raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&cutoff_raw, "%H:%M"))
            .map_err(|e| ConfigError {
                key: "CHECKIN_CUTOFF",
                reason: e.to_string(),
            })?;

        let visible_leave_types = lookup("VISIBLE_LEAVE_TYPES")
            .unwrap_or_else(|| "Sick Leave,Casual Leave".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            checkin_cutoff,
            geo_timeout: Duration::from_millis(try_load(&lookup, "GEO_TIMEOUT_MS", "5000")?),
            default_location,
            visible_leave_types,
            leave_type_cache_ttl: Duration::from_secs(try_load(
                &lookup,
                "LEAVE_TYPE_CACHE_TTL",
                "3600",
            )?),
            session_file: lookup("SESSION_FILE")
                .unwrap_or_else(|| ".hrm-session.json".to_string())
                .into(),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()).into(),
            log_level: try_load(&lookup, "LOG_LEVEL", "debug")?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError {
            key,
            reason: e.to_string(),
        })
}

fn try_load_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError {
                key,
                reason: e.to_string(),
            })
        }
        _ => Ok(None),
    }
}
