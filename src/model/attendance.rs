use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use strum_macros::EnumString;

use crate::model::employee::Employee;
use crate::utils::time::{WallTime, de_opt_wall_time};

/// Lateness classification the server assigns at check-in.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum DayStatus {
    #[strum(serialize = "OnTime", serialize = "On Time", serialize = "Present")]
    OnTime,
    Late,
    Absent,
    #[strum(default)]
    Other(String),
}

impl DayStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DayStatus::OnTime => "OnTime",
            DayStatus::Late => "Late",
            DayStatus::Absent => "Absent",
            DayStatus::Other(s) => s,
        }
    }

    pub fn is_late(&self) -> bool {
        matches!(self, DayStatus::Late)
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DayStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// `null`, missing and `""` all mean the server has not classified the day.
fn de_opt_day_status<'de, D>(deserializer: D) -> Result<Option<DayStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        // EnumString with a default variant never fails
        .map(|s| DayStatus::from_str(s.trim()).unwrap_or(DayStatus::Other(s))))
}

/// One user's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub check_in: Option<WallTime>,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub check_out: Option<WallTime>,
    #[serde(default, deserialize_with = "de_opt_day_status")]
    pub status: Option<DayStatus>,
}

impl AttendanceRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            check_in: None,
            check_out: None,
            status: None,
        }
    }

    pub fn is_checked_in(&self) -> bool {
        self.check_in.is_some()
    }

    pub fn is_checked_out(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }
}

/// Body of `GET /api/attendance/today/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TodayAttendance {
    #[serde(default)]
    pub employee: Option<Employee>,
    #[serde(default)]
    pub attendance: Option<AttendanceRecord>,
}

/// One row of `GET /api/attendance/history/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceHistoryEntry {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub check_in: Option<WallTime>,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub check_out: Option<WallTime>,
    #[serde(default, deserialize_with = "de_opt_day_status")]
    pub status: Option<DayStatus>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

impl HistorySummary {
    pub fn from_entries(entries: &[AttendanceHistoryEntry]) -> Self {
        entries
            .iter()
            .fold(Self::default(), |mut acc, entry| {
                match entry.status {
                    Some(DayStatus::OnTime) => acc.present += 1,
                    Some(DayStatus::Late) => acc.late += 1,
                    Some(DayStatus::Absent) => acc.absent += 1,
                    _ => {}
                }
                acc
            })
    }
}

/// A calendar month in the `YYYY-MM` form the history endpoint takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map(|first_day| Month { first_day })
            .map_err(|_| format!("expected YYYY-MM, got {s:?}"))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}
