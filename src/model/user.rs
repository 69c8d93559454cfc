use serde::{Deserialize, Serialize};

use crate::model::role::Role;

/// Static profile of the person using the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub department: String,
    /// HH:mm
    pub shift_start: String,
    /// HH:mm
    pub shift_end: String,
    pub role: Role,
}

impl User {
    /// Only admins may open and save record edits.
    pub fn can_edit_records(&self) -> bool {
        self.role.is_admin()
    }

    /// `"08:00 - 17:30"`
    pub fn shift_window(&self) -> String {
        format!("{} - {}", self.shift_start, self.shift_end)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(role: Role) -> User {
    User {
        id: "NV-2024-001".to_string(),
        name: "Nguyen Van A".to_string(),
        avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix".to_string(),
        department: "Engineering".to_string(),
        shift_start: "08:00".to_string(),
        shift_end: "17:30".to_string(),
        role,
    }
}
