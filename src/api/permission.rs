use tracing::{info, instrument};

use super::{ApiClient, paths};
use crate::auth::session::Session;
use crate::error::{PortalError, PortalResult};
use crate::model::permission::{PermissionForm, PermissionRequest};

pub const PERMISSION_REJECTED: &str = "Failed to submit request.";

impl ApiClient {
    /// Submits a half-day permission request after local validation.
    #[instrument(name = "permission_create", skip_all)]
    pub async fn create_permission(
        &self,
        session: &Session,
        form: PermissionForm,
    ) -> PortalResult<()> {
        let body = form.into_request().map_err(PortalError::Validation)?;
        self.post_for_message(paths::PERMISSION_CREATE, Some(&body), Some(session))
            .await?;
        info!(start = %body.start_time, end = %body.end_time, "Permission requested");
        Ok(())
    }

    #[instrument(name = "permission_list", skip_all)]
    pub async fn list_permissions(&self, session: &Session) -> PortalResult<Vec<PermissionRequest>> {
        self.get_json(paths::PERMISSION_LIST, &[], session).await
    }
}
