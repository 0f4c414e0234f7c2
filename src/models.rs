use serde::{Deserialize, Serialize};

use crate::model::user::User;

#[derive(Serialize)]
pub struct LoginReqDto {
    pub employee_id: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of the check-in / check-out POSTs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
}

/// Loose view over any JSON body the API answers with.
#[derive(Debug, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiMessage {
    /// What went wrong, in the server's words.
    pub fn error_text(self) -> Option<String> {
        self.error
            .filter(|s| !s.trim().is_empty())
            .or(self.detail.filter(|s| !s.trim().is_empty()))
    }
}
