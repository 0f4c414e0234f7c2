use serde::{Deserialize, Serialize};

use crate::model::employee::de_opt_string_or_number;

/// Profile returned next to the token on login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default, alias = "employeeId", deserialize_with = "de_opt_string_or_number")]
    pub employee_id: Option<String>,

    #[serde(default, alias = "username")]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
}
