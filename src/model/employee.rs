use serde::{Deserialize, Deserializer, Serialize};

/// The employee as the portal endpoints describe them.
///
/// `/api/employee/me/` sends `employeeId`, the attendance endpoint sends
/// `employee_id` (or nothing); both are accepted, string or number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(
        default,
        alias = "employeeId",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub employee_id: Option<String>,
}

impl Employee {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|s| !s.is_empty()).unwrap_or("—")
    }

    pub fn display_email(&self) -> &str {
        self.email.as_deref().filter(|s| !s.is_empty()).unwrap_or("—")
    }
}

pub(crate) fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) if !s.is_empty() => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_both_id_spellings() {
        let me: Employee =
            serde_json::from_value(json!({"name": "Asha", "employeeId": "EMP-7"})).unwrap();
        assert_eq!(me.employee_id.as_deref(), Some("EMP-7"));

        let me: Employee = serde_json::from_value(json!({"employee_id": 1042})).unwrap();
        assert_eq!(me.employee_id.as_deref(), Some("1042"));
        assert_eq!(me.display_name(), "—");
    }
}
