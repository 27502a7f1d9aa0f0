//! Patient demographic records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::validate::{
    FieldError, Validate, finish, require_non_empty, require_non_empty_opt,
};

/// A persisted patient record.
///
/// `user_id` is an advisory link to a [`User`]; deleting the referenced user
/// does not cascade here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
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
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Self-reported gender.
    pub gender: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Emergency contact details.
    pub emergency_contact: Option<String>,
    /// Free-text medical history.
    pub medical_history: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating write.
    pub updated_at: DateTime<Utc>,
}

/// Writable patient fields accepted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
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
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Emergency contact details.
    #[serde(default)]
    pub emergency_contact: Option<String>,
    /// Free-text medical history.
    #[serde(default)]
    pub medical_history: Option<String>,
}

impl Validate for NewPatient {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "firstName", &self.first_name);
        require_non_empty(&mut errors, "lastName", &self.last_name);
        finish(errors)
    }
}

/// Partial patient update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatch {
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
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Emergency contact details.
    #[serde(default)]
    pub emergency_contact: Option<String>,
    /// Free-text medical history.
    #[serde(default)]
    pub medical_history: Option<String>,
}

impl Validate for PatientPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty_opt(&mut errors, "firstName", self.first_name.as_deref());
        require_non_empty_opt(&mut errors, "lastName", self.last_name.as_deref());
        finish(errors)
    }
}

/// Patient joined with its (possibly absent) user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientWithUser {
    /// The patient row.
    #[serde(flatten)]
    pub patient: Patient,
    /// The linked user, `None` when `user_id` is null or dangling.
    pub user: Option<User>,
}
