use tracing::instrument;

use super::{ApiClient, paths};
use crate::auth::session::Session;
use crate::error::PortalResult;
use crate::model::employee::Employee;

impl ApiClient {
    /// Profile of the logged-in employee.
    #[instrument(name = "employee_me", skip_all)]
    pub async fn me(&self, session: &Session) -> PortalResult<Employee> {
        self.get_json(paths::EMPLOYEE_ME, &[], session).await
    }
}
