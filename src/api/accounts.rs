use tracing::{debug, info, instrument, warn};

use super::{ApiClient, paths};
use crate::auth::password::PasswordResetReq;
use crate::auth::session::Session;
use crate::error::{PortalError, PortalResult};
use crate::models::{LoginReqDto, LoginResponse};

pub const LOGIN_REJECTED: &str = "Invalid Employee ID or Password";
pub const RESET_REJECTED: &str = "Failed to reset password.";
pub const RESET_DONE: &str = "Password reset successfully! Please login.";

impl ApiClient {
    #[instrument(name = "accounts_login", skip_all, fields(employee_id = %employee_id))]
    pub async fn login(&self, employee_id: &str, password: &str) -> PortalResult<Session> {
        info!("Login request");

        // 1️⃣ Basic validation
        if employee_id.trim().is_empty() || password.is_empty() {
            return Err(PortalError::Validation(
                "Employee ID and password are required".to_string(),
            ));
        }

        // 2️⃣ Exchange credentials for a token
        let body = LoginReqDto {
            employee_id: employee_id.trim().to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.post_json(paths::LOGIN, &body, None).await?;

        if resp.token.trim().is_empty() {
            return Err(PortalError::MalformedResponse(
                "login response carried an empty token".to_string(),
            ));
        }

        debug!("Token received");
        Ok(Session::new(resp.token, resp.user))
    }

    /// Tells the server the token is done with. The caller drops its local
    /// session whatever the outcome.
    #[instrument(name = "accounts_logout", skip_all)]
    pub async fn logout(&self, session: &Session) -> PortalResult<()> {
        let result = self
            .post_for_message(paths::LOGOUT, None::<&()>, Some(session))
            .await
            .map(|_| ());
        self.leave_types.clear();
        if let Err(e) = &result {
            warn!(error = %e, "Server-side logout failed");
        }
        result
    }

    /// Returns the confirmation message to show.
    #[instrument(name = "accounts_reset_password", skip_all, fields(employee_id = %req.employee_id))]
    pub async fn reset_password(&self, req: &PasswordResetReq) -> PortalResult<String> {
        req.validate().map_err(PortalError::Validation)?;

        let msg = self
            .post_for_message(paths::FORGOT_PASSWORD, Some(req), None)
            .await?;
        info!("Password reset");
        Ok(msg
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| RESET_DONE.to_string()))
    }
}
