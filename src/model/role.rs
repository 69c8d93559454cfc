use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    /// Parses a role flag, falling back to `Employee` for anything unknown.
    pub fn from_flag(flag: &str) -> Self {
        flag.trim().parse().unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }

    /// Short label shown next to the user's name.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Employee => "Employee",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_case_insensitively() {
        assert_eq!(Role::from_flag("ADMIN"), Role::Admin);
        assert_eq!(Role::from_flag(" admin "), Role::Admin);
        assert_eq!(Role::from_flag("EMPLOYEE"), Role::Employee);
    }

    #[test]
    fn unknown_flag_is_employee() {
        assert_eq!(Role::from_flag("HR"), Role::Employee);
        assert_eq!(Role::from_flag(""), Role::Employee);
        assert!(!Role::from_flag("root").is_admin());
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(
            serde_json::to_string(&Role::Employee).unwrap(),
            "\"EMPLOYEE\""
        );
    }
}
