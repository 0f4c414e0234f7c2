use async_trait::async_trait;
use tracing::{info, instrument};

use super::{ApiClient, paths};
use crate::attendance::AttendanceRemote;
use crate::auth::session::Session;
use crate::error::PortalResult;
use crate::geo::Coordinates;
use crate::model::attendance::{AttendanceHistoryEntry, Month, TodayAttendance};
use crate::models::LocationPayload;

impl ApiClient {
    /// `GET /api/attendance/today/`
    #[instrument(name = "attendance_today", skip_all)]
    pub async fn attendance_today(&self, session: &Session) -> PortalResult<TodayAttendance> {
        self.get_json(paths::ATTENDANCE_TODAY, &[], session).await
    }

    /// `POST /api/attendance/checkin/`
    #[instrument(name = "attendance_check_in", skip(self, session))]
    pub async fn check_in(&self, session: &Session, at: Coordinates) -> PortalResult<()> {
        let body = LocationPayload {
            latitude: at.latitude,
            longitude: at.longitude,
        };
        self.post_for_message(paths::CHECK_IN, Some(&body), Some(session))
            .await?;
        info!("Checked in");
        Ok(())
    }

    /// `POST /api/attendance/checkout/`
    #[instrument(name = "attendance_check_out", skip(self, session))]
    pub async fn check_out(&self, session: &Session, at: Coordinates) -> PortalResult<()> {
        let body = LocationPayload {
            latitude: at.latitude,
            longitude: at.longitude,
        };
        self.post_for_message(paths::CHECK_OUT, Some(&body), Some(session))
            .await?;
        info!("Checked out");
        Ok(())
    }

    /// `GET /api/attendance/history/?month=YYYY-MM`
    #[instrument(name = "attendance_history", skip(self, session), fields(month = %month))]
    pub async fn attendance_history(
        &self,
        session: &Session,
        month: Month,
    ) -> PortalResult<Vec<AttendanceHistoryEntry>> {
        self.get_json(
            paths::ATTENDANCE_HISTORY,
            &[("month", month.to_string())],
            session,
        )
        .await
    }
}

#[async_trait]
impl AttendanceRemote for ApiClient {
    async fn fetch_today(&self, session: &Session) -> PortalResult<TodayAttendance> {
        self.attendance_today(session).await
    }

    async fn submit_check_in(&self, session: &Session, at: Coordinates) -> PortalResult<()> {
        self.check_in(session, at).await
    }

    async fn submit_check_out(&self, session: &Session, at: Coordinates) -> PortalResult<()> {
        self.check_out(session, at).await
    }
}
