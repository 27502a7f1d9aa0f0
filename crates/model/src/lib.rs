//! Clinic Management Server entity schema.
//!
//! This crate defines the record types shared by the persistence and REST
//! layers: the five clinic entities (Patient, Doctor, Drug, Appointment,
//! Admission) plus the User/Session identity records, their insert and
//! partial-update shapes, the composite joined read shapes, and hand-written
//! field validation.
//!
//! # Conventions
//!
//! - JSON field names are camelCase; Rust fields are snake_case.
//! - Every entity carries `created_at` (set once) and `updated_at`
//!   (refreshed on every mutating write).
//! - Primary keys are server-assigned sequential integers; User is keyed by
//!   an externally supplied opaque string.
//! - Monetary and rating values are [`rust_decimal::Decimal`], serialized as
//!   strings.
//! - Foreign keys (`user_id`, `patient_id`, `doctor_id`) are advisory: a
//!   dangling reference surfaces as a `None` related entity in the joined
//!   read shapes, never as an error.
//!
//! # Type families
//!
//! Each entity comes in up to four shapes:
//!
//! - `Entity` — the persisted row, including id and timestamps.
//! - `NewEntity` — the writable field set accepted on create, with serde
//!   defaults for defaulted columns.
//! - `EntityPatch` — every writable field wrapped in `Option`; absent
//!   fields are left unchanged by an update.
//! - `EntityWith...` — the denormalized read shape with related entities as
//!   explicit `Option` fields.

#![warn(missing_docs)]

pub mod admission;
pub mod appointment;
pub mod doctor;
pub mod drug;
pub mod patient;
pub mod stats;
pub mod user;
pub mod validate;

pub use admission::{Admission, AdmissionPatch, AdmissionStatus, AdmissionWithDetails, NewAdmission};
pub use appointment::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentWithDetails, NewAppointment,
};
pub use doctor::{Doctor, DoctorPatch, DoctorWithUser, NewDoctor};
pub use drug::{Drug, DrugPatch, LOW_STOCK_THRESHOLD, NewDrug};
pub use patient::{NewPatient, Patient, PatientPatch, PatientWithUser};
pub use stats::DashboardStats;
pub use user::{Session, UpsertUser, User, UserRole};
pub use validate::{FieldError, Validate};
