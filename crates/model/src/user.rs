//! User identity and session records.
//!
//! Users are created and refreshed by the sign-in flow (upsert semantics)
//! and never deleted. Sessions are opaque server-side records consulted on
//! every authenticated request; an expired session is treated as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{FieldError, Validate, finish, require_non_empty};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Default role for new sign-ins.
    #[default]
    Patient,
    /// Clinical staff.
    Doctor,
    /// Administrative access.
    Admin,
}

impl UserRole {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(UserRole::Patient),
            "doctor" => Ok(UserRole::Doctor),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// A persisted user identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Externally supplied opaque identity.
    pub id: String,
    /// Unique, nullable email.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL from the identity provider.
    pub profile_image_url: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every sign-in.
    pub updated_at: DateTime<Utc>,
}

/// Writable user fields, applied with insert-or-overwrite semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    /// Externally supplied opaque identity.
    pub id: String,
    /// Unique, nullable email.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Account role; defaults to patient.
    #[serde(default)]
    pub role: UserRole,
}

impl Validate for UpsertUser {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "id", &self.id);
        finish(errors)
    }
}

/// A server-side session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque session identifier, carried by the client in a cookie.
    pub sid: String,
    /// The authenticated user.
    pub user_id: String,
    /// Sessions at or past this instant are treated as absent.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_patient() {
        let upsert: UpsertUser = serde_json::from_str(r#"{"id": "u-1"}"#).unwrap();
        assert_eq!(upsert.role, UserRole::Patient);
        assert!(upsert.email.is_none());
    }

    #[test]
    fn role_round_trips_storage_form() {
        for role in [UserRole::Patient, UserRole::Doctor, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("nurse".parse::<UserRole>().is_err());
    }

    #[test]
    fn upsert_requires_id() {
        let upsert = UpsertUser {
            id: "".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            role: UserRole::default(),
        };
        let errors = upsert.validate().unwrap_err();
        assert_eq!(errors[0].field, "id");
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: "u-1".to_string(),
            email: Some("a@b.example".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
            profile_image_url: None,
            role: UserRole::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["role"], "admin");
        assert!(json.get("first_name").is_none());
    }
}
