use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const TIME_PLACEHOLDER: &str = "--:--";

/// Parses the server's wall-clock strings: `HH:MM`, `HH:MM:SS` and
/// `HH:MM:SS.ffffff`. Only hours and minutes are kept.
pub fn parse_wall_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let mut parts = raw.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(rest) = parts.next() {
        // seconds are tolerated but must still look like a number
        let secs = rest.split('.').next().unwrap_or_default();
        if secs.parse::<u32>().is_err() {
            return None;
        }
    }
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// A time the server recorded. A value the client cannot read is kept as
/// sent: the event still happened, only its display is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallTime {
    At(NaiveTime),
    Unreadable(String),
}

impl WallTime {
    pub fn parse(raw: &str) -> Self {
        match parse_wall_time(raw) {
            Some(time) => WallTime::At(time),
            None => {
                tracing::warn!(value = raw, "Unreadable wall-clock time");
                WallTime::Unreadable(raw.to_string())
            }
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            WallTime::At(time) => Some(*time),
            WallTime::Unreadable(_) => None,
        }
    }
}

impl From<NaiveTime> for WallTime {
    fn from(time: NaiveTime) -> Self {
        WallTime::At(time)
    }
}

/// `9:58 AM`, or `--:--` when unreadable.
impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallTime::At(time) => f.write_str(&format_clock(*time)),
            WallTime::Unreadable(_) => f.write_str(TIME_PLACEHOLDER),
        }
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WallTime::At(time) => serializer.serialize_str(&to_wire(*time)),
            WallTime::Unreadable(raw) => serializer.serialize_str(raw),
        }
    }
}

/// `09:58` -> `9:58 AM`, `18:10` -> `6:10 PM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Missing times render as `--:--`, like unreadable ones.
pub fn format_wall_time(time: Option<&WallTime>) -> String {
    time.map(WallTime::to_string)
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}

/// Hours and minutes of `time` as `HH:MM`, the shape the API sends.
pub fn to_wire(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Serde adapter: `null`, missing, and `""` all mean "no time". Anything
/// else is a recorded time, readable or not.
pub fn de_opt_wall_time<'de, D>(deserializer: D) -> Result<Option<WallTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| WallTime::parse(&s)))
}
