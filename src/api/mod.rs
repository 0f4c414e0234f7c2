//! Typed client for the portal's REST API.
//!
//! Every authenticated call takes the [`Session`] explicitly; the client
//! itself holds no credential.

pub mod accounts;
pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod permission;

use reqwest::{Method, RequestBuilder, Response, header::AUTHORIZATION};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::session::Session;
use crate::error::{PortalError, PortalResult};
use crate::model::leave_request::{LeaveId, VisibleLeaveKinds};
use crate::models::ApiMessage;
use crate::utils::leave_type_cache::LeaveTypeCache;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub mod paths {
    use super::LeaveId;

    pub const LOGIN: &str = "/api/accounts/login/";
    pub const LOGOUT: &str = "/api/accounts/logout/";
    pub const FORGOT_PASSWORD: &str = "/api/accounts/forgot-password/";

    pub const EMPLOYEE_ME: &str = "/api/employee/me/";

    pub const ATTENDANCE_TODAY: &str = "/api/attendance/today/";
    pub const CHECK_IN: &str = "/api/attendance/checkin/";
    pub const CHECK_OUT: &str = "/api/attendance/checkout/";
    pub const ATTENDANCE_HISTORY: &str = "/api/attendance/history/";

    pub const PERMISSION_CREATE: &str = "/api/permission/create/";
    pub const PERMISSION_LIST: &str = "/api/permission/list/";

    pub const LEAVE_TYPES: &str = "/api/leave/types/";
    pub const LEAVE_BALANCE: &str = "/api/leave/balance/";
    pub const LEAVE_REQUEST: &str = "/api/leave/request/";
    pub const MY_LEAVE_REQUESTS: &str = "/api/leave/my-requests/";
    pub const PENDING_LEAVE: &str = "/api/leave/pending/";

    pub fn approve_leave(id: LeaveId) -> String {
        format!("/api/leave/{id}/approve/")
    }

    pub fn reject_leave(id: LeaveId) -> String {
        format!("/api/leave/{id}/reject/")
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    leave_kinds: VisibleLeaveKinds,
    leave_types: LeaveTypeCache,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> PortalResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hrm-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortalError::NetworkFailure(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            leave_kinds: VisibleLeaveKinds::new(vec![
                "Sick Leave".to_string(),
                "Casual Leave".to_string(),
            ]),
            leave_types: LeaveTypeCache::default(),
        })
    }

    pub fn with_leave_kinds(mut self, kinds: VisibleLeaveKinds) -> Self {
        self.leave_kinds = kinds;
        self
    }

    pub fn with_leave_type_ttl(mut self, ttl: Duration) -> Self {
        self.leave_types = LeaveTypeCache::new(ttl);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(session) = session {
            req = req.header(AUTHORIZATION, session.authorization());
        }
        req
    }

    /// Sends the request and turns any non-2xx answer into
    /// [`PortalError::ServerRejected`] carrying the server's message.
    async fn send(&self, method: Method, path: &str, req: RequestBuilder) -> PortalResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        debug!(%request_id, %method, path, "Sending request");

        let resp = req
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                warn!(%request_id, path, error = %e, "Request failed");
                PortalError::NetworkFailure(e.to_string())
            })?;

        let status = resp.status();
        if status.is_success() {
            debug!(%request_id, path, status = status.as_u16(), "Request succeeded");
            return Ok(resp);
        }

        // error bodies are best effort: plain-text or empty answers carry no message
        let body = resp.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ApiMessage>(&body)
            .ok()
            .and_then(ApiMessage::error_text);
        warn!(
            %request_id,
            path,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "Request rejected"
        );
        Err(PortalError::ServerRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> PortalResult<T> {
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(path, error = %e, "Unexpected response payload");
            PortalError::MalformedResponse(format!("{path}: {e}"))
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        session: &Session,
    ) -> PortalResult<T> {
        let req = self.request(Method::GET, path, Some(session)).query(query);
        let resp = self.send(Method::GET, path, req).await?;
        Self::decode(path, resp).await
    }

    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
    ) -> PortalResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path, session).json(body);
        let resp = self.send(Method::POST, path, req).await?;
        Self::decode(path, resp).await
    }

    /// POST where only success matters; whatever JSON comes back is read
    /// loosely for an informational `message`.
    pub(crate) async fn post_for_message<B>(
        &self,
        path: &str,
        body: Option<&B>,
        session: Option<&Session>,
    ) -> PortalResult<ApiMessage>
    where
        B: Serialize + ?Sized,
    {
        let mut req = self.request(Method::POST, path, session);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = self.send(Method::POST, path, req).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }
}
