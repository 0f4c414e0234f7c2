use serde::Serialize;

/// Body of `POST /api/accounts/forgot-password/`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetReq {
    pub employee_id: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordResetReq {
    /// Checked before anything is sent.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            &self.employee_id,
            &self.current_password,
            &self.new_password,
            &self.confirm_password,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("Please fill in all fields.".to_string());
        }
        if self.new_password != self.confirm_password {
            return Err("New password and confirm password do not match!".to_string());
        }
        Ok(())
    }
}
