//! Inpatient admission records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::doctor::Doctor;
use crate::patient::Patient;
use crate::validate::{FieldError, Validate, finish};

/// Lifecycle state of an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionStatus {
    /// Default state; gates the "active admissions" queries.
    #[default]
    Admitted,
    /// The stay has ended.
    Discharged,
}

impl AdmissionStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Admitted => "admitted",
            AdmissionStatus::Discharged => "discharged",
        }
    }
}

impl std::str::FromStr for AdmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admitted" => Ok(AdmissionStatus::Admitted),
            "discharged" => Ok(AdmissionStatus::Discharged),
            other => Err(format!("unknown admission status: {other}")),
        }
    }
}

/// A persisted admission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    /// Server-assigned sequential id.
    pub id: i64,
    /// Advisory link to the patient.
    pub patient_id: Option<i64>,
    /// Advisory link to the attending doctor.
    pub doctor_id: Option<i64>,
    /// Start of the stay (required).
    pub admission_date: NaiveDate,
    /// End of the stay, once discharged.
    pub discharge_date: Option<NaiveDate>,
    /// Room identifier.
    pub room_number: Option<String>,
    /// Bed identifier.
    pub bed_number: Option<String>,
    /// Lifecycle state; active queries filter on admitted only.
    pub status: AdmissionStatus,
    /// Diagnosis on admission.
    pub diagnosis: Option<String>,
    /// Treatment notes.
    pub treatment: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating write.
    pub updated_at: DateTime<Utc>,
}

/// Writable admission fields accepted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmission {
    /// Advisory link to the patient.
    #[serde(default)]
    pub patient_id: Option<i64>,
    /// Advisory link to the attending doctor.
    #[serde(default)]
    pub doctor_id: Option<i64>,
    /// Start of the stay (required).
    pub admission_date: NaiveDate,
    /// End of the stay.
    #[serde(default)]
    pub discharge_date: Option<NaiveDate>,
    /// Room identifier.
    #[serde(default)]
    pub room_number: Option<String>,
    /// Bed identifier.
    #[serde(default)]
    pub bed_number: Option<String>,
    /// Defaults to admitted when omitted.
    #[serde(default)]
    pub status: AdmissionStatus,
    /// Diagnosis on admission.
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Treatment notes.
    #[serde(default)]
    pub treatment: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for NewAdmission {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        // admission_date presence is enforced by deserialization.
        finish(Vec::new())
    }
}

/// Partial admission update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionPatch {
    /// Advisory link to the patient.
    #[serde(default)]
    pub patient_id: Option<i64>,
    /// Advisory link to the attending doctor.
    #[serde(default)]
    pub doctor_id: Option<i64>,
    /// Start of the stay.
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    /// End of the stay.
    #[serde(default)]
    pub discharge_date: Option<NaiveDate>,
    /// Room identifier.
    #[serde(default)]
    pub room_number: Option<String>,
    /// Bed identifier.
    #[serde(default)]
    pub bed_number: Option<String>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: Option<AdmissionStatus>,
    /// Diagnosis.
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Treatment notes.
    #[serde(default)]
    pub treatment: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for AdmissionPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        finish(Vec::new())
    }
}

/// Admission joined with its (possibly absent) patient and doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionWithDetails {
    /// The admission row.
    #[serde(flatten)]
    pub admission: Admission,
    /// The linked patient, `None` when the reference is null or dangling.
    pub patient: Option<Patient>,
    /// The linked doctor, `None` when the reference is null or dangling.
    pub doctor: Option<Doctor>,
}
