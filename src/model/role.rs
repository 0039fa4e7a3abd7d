use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Stored in `employees.role`. Anything that is not `admin` is a regular employee.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, AsRefStr, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or(Role::User)
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_parsed_exactly() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert!(Role::from_db("admin").is_admin());
    }

    #[test]
    fn unknown_roles_fall_back_to_user() {
        assert_eq!(Role::from_db("user"), Role::User);
        assert_eq!(Role::from_db("manager"), Role::User);
        assert_eq!(Role::from_db("Admin"), Role::User);
        assert_eq!(Role::from_db(""), Role::User);
    }

    #[test]
    fn role_renders_lowercase() {
        assert_eq!(Role::Admin.as_ref(), "admin");
        assert_eq!(Role::User.to_string(), "user");
    }
}
