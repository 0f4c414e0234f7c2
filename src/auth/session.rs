use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PortalError, PortalResult};
use crate::model::user::User;

/// The logged-in identity, passed explicitly into every API call.
#[derive(Clone)]
pub struct Session {
    token: Arc<SecretString>,
    pub user: Option<User>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: Arc::new(SecretString::from(token.into())),
            user,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token.expose_secret())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    user: Option<User>,
}

/// Keeps the session between CLI invocations.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> PortalResult<Session> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PortalError::NotAuthenticated);
            }
            Err(e) => return Err(PortalError::SessionStore(e.to_string())),
        };
        let stored: StoredSession = serde_json::from_slice(&bytes)
            .map_err(|e| PortalError::SessionStore(format!("{}: {e}", self.path.display())))?;
        if stored.token.trim().is_empty() {
            return Err(PortalError::NotAuthenticated);
        }
        Ok(Session::new(stored.token, stored.user))
    }

    pub async fn save(&self, session: &Session) -> PortalResult<()> {
        let stored = StoredSession {
            token: session.token.expose_secret().to_string(),
            user: session.user.clone(),
        };
        let body = serde_json::to_vec_pretty(&stored)
            .map_err(|e| PortalError::SessionStore(e.to_string()))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| PortalError::SessionStore(e.to_string()))
    }

    /// Removing a session that was never saved is not an error.
    pub async fn clear(&self) -> PortalResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::SessionStore(e.to_string())),
        }
    }
}
