//! Today's attendance: status derivation, the check-in cutoff, and the
//! controller that drives check-in / check-out.

pub mod controller;
pub mod status;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};

use crate::auth::session::Session;
use crate::error::PortalResult;
use crate::geo::Coordinates;
use crate::model::attendance::TodayAttendance;

pub use controller::{ActionOutcome, AttendanceController};
pub use status::{DerivedStatus, StatusTone, StatusView, derive_status};

/// The server side of attendance, as the controller sees it.
#[async_trait]
pub trait AttendanceRemote: Send + Sync {
    async fn fetch_today(&self, session: &Session) -> PortalResult<TodayAttendance>;
    async fn submit_check_in(&self, session: &Session, at: Coordinates) -> PortalResult<()>;
    async fn submit_check_out(&self, session: &Session, at: Coordinates) -> PortalResult<()>;
}

/// The two confirmation dialogs of the attendance screen.
#[async_trait]
pub trait ActionPrompt: Send + Sync {
    /// Blocking notice that check-in is closed for the day; returns once acknowledged.
    async fn acknowledge_check_in_closed(&self, current_time: &str, cutoff: &str);

    /// Asks whether to check out now; `false` cancels.
    async fn confirm_check_out(&self, current_time: &str) -> bool;
}

/// Local wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Latest local time at which check-in is still offered. Only the client
/// enforces it; the server may apply its own rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInCutoff(NaiveTime);

impl CheckInCutoff {
    pub fn new(at: NaiveTime) -> Self {
        Self(at)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Inclusive: the cutoff instant itself is still open.
    pub fn allows(&self, now: NaiveTime) -> bool {
        now <= self.0
    }
}

impl Default for CheckInCutoff {
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(11, 0, 0).expect("11:00:00 is a valid time"))
    }
}
