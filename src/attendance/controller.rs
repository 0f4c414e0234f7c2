use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use strum_macros::Display;
use tracing::{debug, info, instrument, warn};

use super::status::{StatusView, derive_status};
use super::{ActionPrompt, AttendanceRemote, CheckInCutoff, Clock, SystemClock};
use crate::auth::session::Session;
use crate::error::PortalError;
use crate::geo::{LocationOptions, LocationProvider, LocationResult, locate};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::utils::time::format_clock;

const FETCH_REJECTED: &str = "Unable to fetch attendance";
const FETCH_FAILED: &str = "Error fetching attendance";
const ACTION_FAILED: &str = "Action failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Action {
    #[strum(serialize = "check-in")]
    CheckIn,
    #[strum(serialize = "check-out")]
    CheckOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the action. The cached record is now stale; call
    /// [`AttendanceController::load_today`] to see the new state.
    Submitted(Action),
    /// Past the cutoff; nothing was sent.
    CheckInClosed { current_time: String },
    /// The user declined the check-out confirmation.
    Cancelled,
    /// Location or server failure, already worded for the user.
    Failed { message: String },
}

/// Set while a submission is in flight; the view disables both actions on it.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Only the controller sets the flag, and it holds `&mut self` while a
    /// submission runs, so there is never a second holder.
    fn hold(&self) -> BusyGuard {
        self.0.store(true, Ordering::Release);
        BusyGuard(self.0.clone())
    }
}

/// Clears the flag on every exit path, including the future being dropped.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Holds today's attendance for the logged-in user and runs check-in /
/// check-out against the remote API.
///
/// The cached record is only ever replaced by [`load_today`]; submissions
/// mark it stale instead of guessing the new state.
///
/// [`load_today`]: AttendanceController::load_today
pub struct AttendanceController<R, L, C = SystemClock> {
    remote: R,
    location: L,
    clock: C,
    session: Session,
    cutoff: CheckInCutoff,
    location_options: LocationOptions,

    record: Option<AttendanceRecord>,
    employee: Option<Employee>,
    view: StatusView,
    stale: bool,
    busy: BusyFlag,
}

impl<R, L> AttendanceController<R, L, SystemClock>
where
    R: AttendanceRemote,
    L: LocationProvider,
{
    pub fn new(remote: R, location: L, session: Session) -> Self {
        Self {
            remote,
            location,
            clock: SystemClock,
            session,
            cutoff: CheckInCutoff::default(),
            location_options: LocationOptions::default(),
            record: None,
            employee: None,
            view: StatusView::loading(),
            stale: true,
            busy: BusyFlag::default(),
        }
    }
}

impl<R, L, C> AttendanceController<R, L, C>
where
    R: AttendanceRemote,
    L: LocationProvider,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AttendanceController<R, L, C2> {
        AttendanceController {
            remote: self.remote,
            location: self.location,
            clock,
            session: self.session,
            cutoff: self.cutoff,
            location_options: self.location_options,
            record: self.record,
            employee: self.employee,
            view: self.view,
            stale: self.stale,
            busy: self.busy,
        }
    }

    pub fn with_cutoff(mut self, cutoff: CheckInCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_location_options(mut self, options: LocationOptions) -> Self {
        self.location_options = options;
        self
    }

    pub fn record(&self) -> Option<&AttendanceRecord> {
        self.record.as_ref()
    }

    pub fn employee(&self) -> Option<&Employee> {
        self.employee.as_ref()
    }

    pub fn status(&self) -> &StatusView {
        &self.view
    }

    pub fn cutoff(&self) -> CheckInCutoff {
        self.cutoff
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Shared handle on the busy flag, for views that poll it elsewhere.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// True after a successful submission until the next reload.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn can_check_in(&self) -> bool {
        !self.is_busy() && self.record.as_ref().is_some_and(|r| !r.is_checked_in())
    }

    pub fn can_check_out(&self) -> bool {
        !self.is_busy()
            && self
                .record
                .as_ref()
                .is_some_and(|r| r.is_checked_in() && r.check_out.is_none())
    }

    /// Fetches today's record and recomputes the derived status.
    ///
    /// On failure the previous record is kept and the status becomes
    /// `FetchError` with a message for the user.
    #[instrument(name = "load_today", skip_all)]
    pub async fn load_today(&mut self) -> &StatusView {
        match self.remote.fetch_today(&self.session).await {
            Ok(today) => {
                let record = today
                    .attendance
                    .unwrap_or_else(|| AttendanceRecord::empty(self.clock.now().date()));
                if record.check_in.is_none() && record.check_out.is_some() {
                    warn!(date = %record.date, "Check-out recorded without a check-in");
                }
                self.view = derive_status(Some(&record));
                debug!(status = %self.view.status, "Attendance loaded");
                self.record = Some(record);
                if today.employee.is_some() {
                    self.employee = today.employee;
                }
                self.stale = false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load today's attendance");
                let message = match &e {
                    PortalError::ServerRejected { .. } => e.user_message(FETCH_REJECTED),
                    _ => FETCH_FAILED.to_string(),
                };
                self.view = StatusView::fetch_error(message);
            }
        }
        &self.view
    }

    /// Check-in, gated by the daily cutoff.
    #[instrument(name = "request_check_in", skip_all)]
    pub async fn request_check_in<P>(&mut self, prompt: &P) -> ActionOutcome
    where
        P: ActionPrompt + ?Sized,
    {
        let now = self.clock.now().time();
        if !self.cutoff.allows(now) {
            let current_time = format_clock(now);
            info!(%current_time, "Check-in attempted after cutoff");
            prompt
                .acknowledge_check_in_closed(&current_time, &format_clock(self.cutoff.time()))
                .await;
            return ActionOutcome::CheckInClosed { current_time };
        }

        self.locate_and_submit(Action::CheckIn).await
    }

    /// Check-out, after the user confirms.
    #[instrument(name = "request_check_out", skip_all)]
    pub async fn request_check_out<P>(&mut self, prompt: &P) -> ActionOutcome
    where
        P: ActionPrompt + ?Sized,
    {
        let current_time = format_clock(self.clock.now().time());
        if !prompt.confirm_check_out(&current_time).await {
            debug!("Check-out cancelled");
            return ActionOutcome::Cancelled;
        }

        self.locate_and_submit(Action::CheckOut).await
    }

    async fn locate_and_submit(&mut self, action: Action) -> ActionOutcome {
        let _busy = self.busy.hold();

        // 1️⃣ Location
        let at = match locate(&self.location, &self.location_options).await {
            LocationResult::Located(at) => at,
            LocationResult::PermissionDenied => {
                warn!(%action, "Location permission denied");
                return Self::failed(PortalError::LocationDenied);
            }
            LocationResult::Unavailable(reason) => {
                warn!(%action, %reason, "Location unavailable");
                return Self::failed(PortalError::LocationUnavailable(reason));
            }
        };

        // 2️⃣ Submit
        let result = match action {
            Action::CheckIn => self.remote.submit_check_in(&self.session, at).await,
            Action::CheckOut => self.remote.submit_check_out(&self.session, at).await,
        };

        match result {
            Ok(()) => {
                info!(%action, "Attendance action accepted");
                self.stale = true;
                ActionOutcome::Submitted(action)
            }
            Err(e) => {
                warn!(%action, error = %e, "Attendance action failed");
                Self::failed(e)
            }
        }
    }

    fn failed(e: PortalError) -> ActionOutcome {
        ActionOutcome::Failed {
            message: e.user_message(ACTION_FAILED),
        }
    }
}
