use serde::{Deserialize, Serialize};

use super::AdminId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

/// Entry of the users collection. Only `role == admin` entries may be assigned tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn admin(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role: Role::Admin,
        }
    }

    pub fn regular(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role: Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub display_name: String,
}

impl Admin {
    pub fn new(id: impl Into<AdminId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Admin view of a user entry, `None` for non-admin roles.
    pub fn from_user(id: &str, user: &User) -> Option<Self> {
        match user.role {
            Role::Admin if !id.is_empty() => Some(Self::new(id, user.display_name.clone())),
            _ => None,
        }
    }
}
