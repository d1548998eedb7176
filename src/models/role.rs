//! User roles
//!
//! The role set is closed: every authenticated principal is exactly one of
//! ADMIN (catalog and user management), RESPONSABLE (loan desk) or CLIENT
//! (borrower). A role never changes within a session; changing identity
//! requires a new login.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "RESPONSABLE")]
    Responsable,
    #[serde(rename = "CLIENT")]
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Responsable => "RESPONSABLE",
            Role::Client => "CLIENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "RESPONSABLE" => Ok(Role::Responsable),
            "CLIENT" => Ok(Role::Client),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_names() {
        for role in [Role::Admin, Role::Responsable, Role::Client] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("admin".parse::<Role>().is_err());
        assert!("STAFF".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_uppercase_string() {
        assert_eq!(
            serde_json::to_string(&Role::Responsable).unwrap(),
            "\"RESPONSABLE\""
        );
    }
}
