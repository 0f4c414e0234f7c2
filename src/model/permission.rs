use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time::{WallTime, de_opt_wall_time, parse_wall_time, to_wire};

/// Half-day permission form, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct PermissionForm {
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

/// Body of `POST /api/permission/create/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePermission {
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl PermissionForm {
    pub fn into_request(self) -> Result<CreatePermission, String> {
        if self.start_time.trim().is_empty()
            || self.end_time.trim().is_empty()
            || self.reason.trim().is_empty()
        {
            return Err("Please fill in all fields.".to_string());
        }
        let start = parse_wall_time(&self.start_time)
            .ok_or_else(|| format!("Invalid start time {:?}, expected HH:MM", self.start_time))?;
        let end = parse_wall_time(&self.end_time)
            .ok_or_else(|| format!("Invalid end time {:?}, expected HH:MM", self.end_time))?;
        Ok(CreatePermission {
            start_time: to_wire(start),
            end_time: to_wire(end),
            reason: self.reason.trim().to_string(),
        })
    }
}

/// An entry of `GET /api/permission/list/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PermissionRequest {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub start_time: Option<WallTime>,
    #[serde(default, deserialize_with = "de_opt_wall_time")]
    pub end_time: Option<WallTime>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_are_required() {
        let form = PermissionForm {
            start_time: "10:00".into(),
            end_time: "".into(),
            reason: "bank".into(),
        };
        assert_eq!(form.into_request().unwrap_err(), "Please fill in all fields.");
    }

    #[test]
    fn times_are_normalised() {
        let req = PermissionForm {
            start_time: "9:30".into(),
            end_time: "13:00:00".into(),
            reason: " doctor ".into(),
        }
        .into_request()
        .unwrap();
        assert_eq!(req.start_time, "09:30");
        assert_eq!(req.end_time, "13:00");
        assert_eq!(req.reason, "doctor");
    }
}
