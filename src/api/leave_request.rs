use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{ApiClient, paths};
use crate::auth::session::Session;
use crate::error::{PortalError, PortalResult};
use crate::model::leave_request::{
    CreateLeave, LeaveBalance, LeaveFilter, LeaveId, LeaveRequest, LeaveType, RejectLeave,
};

pub const LEAVE_REQUEST_REJECTED: &str = "Failed to submit leave request";
pub const APPROVE_REJECTED: &str = "Failed to approve leave";
pub const REJECT_REJECTED: &str = "Failed to reject leave";
pub const ADMIN_REQUIRED: &str = "Admin access required";

/// What the leave request screen needs before the user picks anything.
#[derive(Debug, Clone)]
pub struct LeaveOverview {
    pub types: Vec<LeaveType>,
    pub balance: Vec<LeaveBalance>,
}

impl ApiClient {
    /// Visible leave types, served from the per-server cache when fresh.
    #[instrument(name = "leave_types", skip_all)]
    pub async fn leave_types(&self, session: &Session) -> PortalResult<Vec<LeaveType>> {
        let all: Arc<Vec<LeaveType>> = match self.leave_types.get(&self.base_url).await {
            Some(cached) => {
                debug!("Leave types served from cache");
                cached
            }
            None => {
                let fetched: Vec<LeaveType> =
                    self.get_json(paths::LEAVE_TYPES, &[], session).await?;
                self.leave_types.put(&self.base_url, fetched).await
            }
        };
        Ok(self.leave_kinds.types(all.as_ref().clone()))
    }

    #[instrument(name = "leave_balance", skip_all)]
    pub async fn leave_balance(&self, session: &Session) -> PortalResult<Vec<LeaveBalance>> {
        let all: Vec<LeaveBalance> = self.get_json(paths::LEAVE_BALANCE, &[], session).await?;
        Ok(self.leave_kinds.balances(all))
    }

    /// Loads types and balance concurrently.
    pub async fn leave_overview(&self, session: &Session) -> PortalResult<LeaveOverview> {
        let (types, balance) =
            futures::future::try_join(self.leave_types(session), self.leave_balance(session))
                .await?;
        Ok(LeaveOverview { types, balance })
    }

    #[instrument(
        name = "leave_request",
        skip(self, session, form),
        fields(leave_type = form.leave_type, start = %form.start_date, end = %form.end_date)
    )]
    pub async fn request_leave(&self, session: &Session, form: &CreateLeave) -> PortalResult<()> {
        // 1️⃣ validate before anything leaves the machine
        form.validate().map_err(PortalError::Validation)?;

        // 2️⃣ submit
        self.post_for_message(paths::LEAVE_REQUEST, Some(form), Some(session))
            .await?;
        info!("Leave request submitted");
        Ok(())
    }

    /// Own leave requests of the visible kinds, narrowed by `filter`.
    #[instrument(name = "leave_mine", skip(self, session))]
    pub async fn my_leaves(
        &self,
        session: &Session,
        filter: LeaveFilter,
    ) -> PortalResult<Vec<LeaveRequest>> {
        let all: Vec<LeaveRequest> = self
            .get_json(paths::MY_LEAVE_REQUESTS, &[], session)
            .await?;
        Ok(self
            .leave_kinds
            .requests(all)
            .into_iter()
            .filter(|r| filter.matches(&r.status))
            .collect())
    }

    /// Approval queue. A 403 means the user is not an approver.
    #[instrument(name = "leave_pending", skip_all)]
    pub async fn pending_leaves(&self, session: &Session) -> PortalResult<Vec<LeaveRequest>> {
        self.get_json(paths::PENDING_LEAVE, &[], session)
            .await
            .map_err(|e| match e {
                PortalError::ServerRejected { status: 403, .. } => PortalError::ServerRejected {
                    status: 403,
                    message: Some(ADMIN_REQUIRED.to_string()),
                },
                other => other,
            })
    }

    #[instrument(name = "leave_approve", skip(self, session), fields(leave_id = %id))]
    pub async fn approve_leave(&self, session: &Session, id: LeaveId) -> PortalResult<()> {
        self.post_for_message(&paths::approve_leave(id), None::<&()>, Some(session))
            .await?;
        info!("Leave approved");
        Ok(())
    }

    #[instrument(name = "leave_reject", skip(self, session, reason), fields(leave_id = %id))]
    pub async fn reject_leave(
        &self,
        session: &Session,
        id: LeaveId,
        reason: &str,
    ) -> PortalResult<()> {
        if reason.trim().is_empty() {
            return Err(PortalError::Validation(
                "Please provide a rejection reason".to_string(),
            ));
        }
        let body = RejectLeave {
            rejection_reason: reason.trim().to_string(),
        };
        self.post_for_message(&paths::reject_leave(id), Some(&body), Some(session))
            .await?;
        info!("Leave rejected");
        Ok(())
    }
}
