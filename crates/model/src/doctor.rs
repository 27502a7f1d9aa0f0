//! Doctor professional profile records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::validate::{
    FieldError, Validate, finish, require_non_empty, require_non_empty_opt,
};

/// A persisted doctor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Server-assigned sequential id.
    pub id: i64,
    /// Optional link to a user account.
    pub user_id: Option<String>,
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Medical specialization (required).
    pub specialization: String,
    /// Years of experience.
    pub experience: Option<i64>,
    /// Qualification summary.
    pub qualification: Option<String>,
    /// Medical license number.
    pub license_number: Option<String>,
    /// Consultation fee.
    pub consultation_fee: Option<Decimal>,
    /// Rating, conventionally 1-5.
    pub rating: Option<Decimal>,
    /// Gates the "available doctors" dashboard count.
    pub is_active: bool,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating write.
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Writable doctor fields accepted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    /// Optional link to a user account.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Medical specialization (required).
    pub specialization: String,
    /// Years of experience.
    #[serde(default)]
    pub experience: Option<i64>,
    /// Qualification summary.
    #[serde(default)]
    pub qualification: Option<String>,
    /// Medical license number.
    #[serde(default)]
    pub license_number: Option<String>,
    /// Consultation fee.
    #[serde(default)]
    pub consultation_fee: Option<Decimal>,
    /// Rating, conventionally 1-5.
    #[serde(default)]
    pub rating: Option<Decimal>,
    /// Defaults to true when omitted.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for NewDoctor {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "firstName", &self.first_name);
        require_non_empty(&mut errors, "lastName", &self.last_name);
        require_non_empty(&mut errors, "specialization", &self.specialization);
        finish(errors)
    }
}

/// Partial doctor update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatch {
    /// Optional link to a user account.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Medical specialization.
    #[serde(default)]
    pub specialization: Option<String>,
    /// Years of experience.
    #[serde(default)]
    pub experience: Option<i64>,
    /// Qualification summary.
    #[serde(default)]
    pub qualification: Option<String>,
    /// Medical license number.
    #[serde(default)]
    pub license_number: Option<String>,
    /// Consultation fee.
    #[serde(default)]
    pub consultation_fee: Option<Decimal>,
    /// Rating.
    #[serde(default)]
    pub rating: Option<Decimal>,
    /// Availability flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for DoctorPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty_opt(&mut errors, "firstName", self.first_name.as_deref());
        require_non_empty_opt(&mut errors, "lastName", self.last_name.as_deref());
        require_non_empty_opt(&mut errors, "specialization", self.specialization.as_deref());
        finish(errors)
    }
}

/// Doctor joined with its (possibly absent) user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorWithUser {
    /// The doctor row.
    #[serde(flatten)]
    pub doctor: Doctor,
    /// The linked user, `None` when `user_id` is null or dangling.
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_active_defaults_true() {
        let new: NewDoctor = serde_json::from_str(
            r#"{"firstName": "Greg", "lastName": "House", "specialization": "Diagnostics"}"#,
        )
        .unwrap();
        assert!(new.is_active);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn is_active_can_be_disabled() {
        let new: NewDoctor = serde_json::from_str(
            r#"{"firstName": "G", "lastName": "H", "specialization": "X", "isActive": false}"#,
        )
        .unwrap();
        assert!(!new.is_active);
    }

    #[test]
    fn specialization_is_required() {
        let new: NewDoctor = serde_json::from_str(
            r#"{"firstName": "Greg", "lastName": "House", "specialization": ""}"#,
        )
        .unwrap();
        let errors = new.validate().unwrap_err();
        assert_eq!(errors[0].field, "specialization");
    }

    #[test]
    fn fee_deserializes_from_decimal_string() {
        let new: NewDoctor = serde_json::from_str(
            r#"{"firstName": "G", "lastName": "H", "specialization": "X", "consultationFee": "150.00"}"#,
        )
        .unwrap();
        assert_eq!(new.consultation_fee.unwrap().to_string(), "150.00");
    }
}
