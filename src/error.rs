use thiserror::Error;

/// Shown when the transport itself failed (connection refused, reset, ...).
pub const GENERIC_FAILURE: &str = "Something went wrong. Try again later.";
pub const LOCATION_DENIED: &str =
    "Location access is required for attendance. Please enable location permissions.";
pub const LOCATION_UNAVAILABLE: &str = "Unable to retrieve your location.";

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("server rejected request with status {status}")]
    ServerRejected {
        status: u16,
        /// `error` / `detail` field of the response body, when there was one
        message: Option<String>,
    },

    #[error("location permission denied")]
    LocationDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("session store: {0}")]
    SessionStore(String),
}

impl PortalError {
    /// Converts the error into the message a user sees.
    ///
    /// `fallback` is used when the server rejected the request without
    /// saying why.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortalError::ServerRejected {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            PortalError::ServerRejected { .. } => fallback.to_string(),
            PortalError::NetworkFailure(_) | PortalError::MalformedResponse(_) => {
                GENERIC_FAILURE.to_string()
            }
            PortalError::LocationDenied => LOCATION_DENIED.to_string(),
            PortalError::LocationUnavailable(_) => LOCATION_UNAVAILABLE.to_string(),
            PortalError::NotAuthenticated => "Please login first.".to_string(),
            PortalError::Validation(msg) => msg.clone(),
            PortalError::SessionStore(_) => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PortalError::MalformedResponse(e.to_string())
        } else {
            PortalError::NetworkFailure(e.to_string())
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::MalformedResponse(e.to_string())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
