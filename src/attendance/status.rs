use serde::Serialize;
use strum_macros::Display;

use crate::model::attendance::AttendanceRecord;

pub const SUCCESS_MARKER: &str = "✅";
pub const WARNING_MARKER: &str = "⚠️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum DerivedStatus {
    Loading,
    NoActionYet,
    CheckedIn,
    CheckedInAndOut,
    FetchError,
}

/// How a renderer should colour the status box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusTone {
    Neutral,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub status: DerivedStatus,
    pub message: String,
    pub tone: StatusTone,
}

impl StatusView {
    pub fn loading() -> Self {
        Self {
            status: DerivedStatus::Loading,
            message: "Loading...".to_string(),
            tone: StatusTone::Neutral,
        }
    }

    pub fn fetch_error(message: impl Into<String>) -> Self {
        Self {
            status: DerivedStatus::FetchError,
            message: message.into(),
            tone: StatusTone::Danger,
        }
    }
}

/// Pure mapping from the cached record to what the screen shows.
pub fn derive_status(record: Option<&AttendanceRecord>) -> StatusView {
    let Some(record) = record else {
        return StatusView::loading();
    };

    // "(Late)", or nothing when the server has not classified the day
    let tag = record
        .status
        .as_ref()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();

    match (&record.check_in, &record.check_out) {
        (None, _) => StatusView {
            status: DerivedStatus::NoActionYet,
            message: "No action yet".to_string(),
            tone: StatusTone::Neutral,
        },
        (Some(check_in), None) => StatusView {
            status: DerivedStatus::CheckedIn,
            message: format!("{SUCCESS_MARKER} Checked In at {check_in}{tag}"),
            tone: StatusTone::Success,
        },
        (Some(check_in), Some(check_out)) => {
            let late = record.status.as_ref().is_some_and(|s| s.is_late());
            let (marker, tone) = if late {
                (WARNING_MARKER, StatusTone::Warning)
            } else {
                (SUCCESS_MARKER, StatusTone::Success)
            };
            StatusView {
                status: DerivedStatus::CheckedInAndOut,
                message: format!(
                    "{marker} Checked In: {check_in}{tag}, Checked Out at {check_out}"
                ),
                tone,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::DayStatus;
    use crate::utils::time::WallTime;
    use chrono::{NaiveDate, NaiveTime};

    fn record(
        check_in: Option<(u32, u32)>,
        check_out: Option<(u32, u32)>,
        status: Option<DayStatus>,
    ) -> AttendanceRecord {
        let t = |(h, m): (u32, u32)| WallTime::At(NaiveTime::from_hms_opt(h, m, 0).unwrap());
        AttendanceRecord {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            check_in: check_in.map(t),
            check_out: check_out.map(t),
            status,
        }
    }

    #[test]
    fn nothing_loaded_is_loading() {
        assert_eq!(derive_status(None).status, DerivedStatus::Loading);
    }

    #[test]
    fn missing_check_in_is_no_action_even_with_a_check_out() {
        for check_out in [None, Some((18, 0))] {
            let view = derive_status(Some(&record(None, check_out, Some(DayStatus::Late))));
            assert_eq!(view.status, DerivedStatus::NoActionYet);
            assert_eq!(view.message, "No action yet");
        }
    }

    #[test]
    fn checked_in_on_time() {
        let view = derive_status(Some(&record(Some((9, 58)), None, Some(DayStatus::OnTime))));
        assert_eq!(view.status, DerivedStatus::CheckedIn);
        assert_eq!(view.message, "✅ Checked In at 9:58 AM (OnTime)");
        assert!(!view.message.contains(WARNING_MARKER));
    }

    #[test]
    fn late_day_gets_warning_marker_after_check_out() {
        let view = derive_status(Some(&record(
            Some((9, 58)),
            Some((18, 10)),
            Some(DayStatus::Late),
        )));
        assert_eq!(view.status, DerivedStatus::CheckedInAndOut);
        assert!(view.message.starts_with(WARNING_MARKER));
        assert!(view.message.contains("9:58 AM"));
        assert!(view.message.contains("6:10 PM"));
        assert_eq!(view.tone, StatusTone::Warning);
    }

    #[test]
    fn on_time_day_keeps_success_marker_after_check_out() {
        let view = derive_status(Some(&record(
            Some((9, 30)),
            Some((18, 0)),
            Some(DayStatus::OnTime),
        )));
        assert_eq!(view.status, DerivedStatus::CheckedInAndOut);
        assert!(view.message.starts_with(SUCCESS_MARKER));
    }

    #[test]
    fn unclassified_day_has_no_parenthetical() {
        let view = derive_status(Some(&record(Some((9, 58)), None, None)));
        assert_eq!(view.message, "✅ Checked In at 9:58 AM");

        let view = derive_status(Some(&record(Some((9, 58)), Some((18, 0)), None)));
        assert_eq!(
            view.message,
            "✅ Checked In: 9:58 AM, Checked Out at 6:00 PM"
        );
    }

    #[test]
    fn unreadable_check_in_is_still_checked_in() {
        let mut rec = record(None, None, Some(DayStatus::OnTime));
        rec.check_in = Some(WallTime::Unreadable("9.58 AM".into()));
        let view = derive_status(Some(&rec));
        assert_eq!(view.status, DerivedStatus::CheckedIn);
        assert_eq!(view.message, "✅ Checked In at --:-- (OnTime)");
    }
}
