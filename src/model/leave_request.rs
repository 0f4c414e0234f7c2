use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::model::employee::de_opt_string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct LeaveId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaveBalance {
    pub leave_type: String,
    #[serde(default)]
    pub total_allowed: f64,
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub pending: f64,
    #[serde(default)]
    pub available: f64,
}

/// Decision state of a leave request. The server's spelling varies in case;
/// anything unrecognised is kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    #[strum(default)]
    Other(String),
}

impl LeaveStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LeaveStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeaveStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // EnumString with a default variant never fails
        Ok(LeaveStatus::from_str(raw.trim()).unwrap_or(LeaveStatus::Other(raw)))
    }
}

/// A leave request as listed by `my-requests` and `pending`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub leave_type_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_days: Option<f64>,
    #[serde(default)]
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    // only on the approval queue
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub employee_id: Option<String>,
}

impl LeaveRequest {
    /// Who decided, or why it was refused, depending on the outcome.
    pub fn decision_note(&self) -> Option<String> {
        match self.status {
            LeaveStatus::Approved => self.approved_by_name.as_ref().map(|n| format!("by {n}")),
            LeaveStatus::Rejected => self.rejection_reason.clone(),
            LeaveStatus::Pending | LeaveStatus::Other(_) => None,
        }
    }
}

/// Body of `POST /api/leave/request/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLeave {
    /// id of a [`LeaveType`]
    pub leave_type: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl CreateLeave {
    pub fn validate(&self) -> Result<(), String> {
        if self.leave_type == 0 {
            return Err("Please select a leave type".to_string());
        }
        if self.start_date > self.end_date {
            return Err("start_date cannot be after end_date".to_string());
        }
        if self.reason.trim().is_empty() {
            return Err("Please provide a reason for the leave".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectLeave {
    pub rejection_reason: String,
}

/// Status tab of the "my leaves" list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl LeaveFilter {
    pub fn matches(&self, status: &LeaveStatus) -> bool {
        match self {
            LeaveFilter::All => true,
            LeaveFilter::Pending => *status == LeaveStatus::Pending,
            LeaveFilter::Approved => *status == LeaveStatus::Approved,
            LeaveFilter::Rejected => *status == LeaveStatus::Rejected,
        }
    }
}

/// Leave kinds the portal shows; everything else the server knows about is hidden.
#[derive(Debug, Clone)]
pub struct VisibleLeaveKinds(Vec<String>);

impl VisibleLeaveKinds {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn types(&self, types: Vec<LeaveType>) -> Vec<LeaveType> {
        types.into_iter().filter(|t| self.contains(&t.name)).collect()
    }

    pub fn balances(&self, balances: Vec<LeaveBalance>) -> Vec<LeaveBalance> {
        balances
            .into_iter()
            .filter(|b| self.contains(&b.leave_type))
            .collect()
    }

    pub fn requests(&self, requests: Vec<LeaveRequest>) -> Vec<LeaveRequest> {
        requests
            .into_iter()
            .filter(|r| self.contains(&r.leave_type_name))
            .collect()
    }
}
