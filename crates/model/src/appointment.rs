//! Appointment scheduling records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::doctor::Doctor;
use crate::patient::Patient;
use crate::validate::{FieldError, Validate, finish, require_non_empty, require_non_empty_opt};

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Default state for new appointments.
    #[default]
    Scheduled,
    /// The visit took place.
    Completed,
    /// The visit was called off.
    Cancelled,
}

impl AppointmentStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// A persisted appointment record.
///
/// Both foreign keys are advisory and nullable; orphaned references are
/// tolerated and surface as `None` in [`AppointmentWithDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Server-assigned sequential id.
    pub id: i64,
    /// Advisory link to the patient.
    pub patient_id: Option<i64>,
    /// Advisory link to the doctor.
    pub doctor_id: Option<i64>,
    /// Calendar date of the visit (required).
    pub appointment_date: NaiveDate,
    /// Free-text time slot, e.g. "10:30" (required).
    pub appointment_time: String,
    /// Lifecycle state.
    pub status: AppointmentStatus,
    /// Reason for the visit.
    pub reason: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating write.
    pub updated_at: DateTime<Utc>,
}

/// Writable appointment fields accepted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    /// Advisory link to the patient.
    #[serde(default)]
    pub patient_id: Option<i64>,
    /// Advisory link to the doctor.
    #[serde(default)]
    pub doctor_id: Option<i64>,
    /// Calendar date of the visit (required).
    pub appointment_date: NaiveDate,
    /// Free-text time slot (required).
    pub appointment_time: String,
    /// Defaults to scheduled when omitted.
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Reason for the visit.
    #[serde(default)]
    pub reason: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for NewAppointment {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "appointmentTime", &self.appointment_time);
        finish(errors)
    }
}

/// Partial appointment update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    /// Advisory link to the patient.
    #[serde(default)]
    pub patient_id: Option<i64>,
    /// Advisory link to the doctor.
    #[serde(default)]
    pub doctor_id: Option<i64>,
    /// Calendar date of the visit.
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    /// Free-text time slot.
    #[serde(default)]
    pub appointment_time: Option<String>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    /// Reason for the visit.
    #[serde(default)]
    pub reason: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for AppointmentPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty_opt(&mut errors, "appointmentTime", self.appointment_time.as_deref());
        finish(errors)
    }
}

/// Appointment joined with its (possibly absent) patient and doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentWithDetails {
    /// The appointment row.
    #[serde(flatten)]
    pub appointment: Appointment,
    /// The linked patient, `None` when the reference is null or dangling.
    pub patient: Option<Patient>,
    /// The linked doctor, `None` when the reference is null or dangling.
    pub doctor: Option<Doctor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_scheduled() {
        let new: NewAppointment = serde_json::from_str(
            r#"{"appointmentDate": "2026-09-01", "appointmentTime": "10:30"}"#,
        )
        .unwrap();
        assert_eq!(new.status, AppointmentStatus::Scheduled);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<NewAppointment, _> = serde_json::from_str(
            r#"{"appointmentDate": "2026-09-01", "appointmentTime": "10:30", "status": "pending"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_round_trips_storage_form() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<AppointmentStatus>().unwrap(), status);
        }
    }
}
