//! Storage trait consumed by the REST layer.

use async_trait::async_trait;
use chrono::Duration;

use clinic_model::{
    Admission, AdmissionPatch, AdmissionWithDetails, Appointment, AppointmentPatch,
    AppointmentWithDetails, DashboardStats, Doctor, DoctorPatch, DoctorWithUser, Drug, DrugPatch,
    NewAdmission, NewAppointment, NewDoctor, NewDrug, NewPatient, Patient, PatientPatch,
    PatientWithUser, Session, UpsertUser, User,
};

use crate::error::StorageResult;

/// The data-access contract for the clinic entities.
///
/// One narrow operation per entity, each a single atomic read or write:
///
/// - `list_*` returns all rows, most-recently-created first, left-joined
///   with related entities so a dangling reference yields a `None` field
///   rather than omitting the record.
/// - `get_*` returns `Ok(None)` for a missing id; absence is not an error.
/// - `update_*` overwrites only the supplied fields, always refreshes
///   `updated_at`, and returns `Ok(None)` for a missing id. A zero-field
///   patch is a timestamp-only touch.
/// - `delete_*` is idempotent; deleting a missing id is not an error.
/// - `search_*` matches `%query%` across a fixed set of text columns; the
///   caller rejects empty queries before this layer is reached.
///
/// Implementations must treat every call as potentially blocking and must
/// not coordinate concurrent writers beyond the store's own row-level
/// atomicity (last write wins).
#[async_trait]
pub trait ClinicStorage: Send + Sync {
    /// Short name of the backing store, for logs and health responses.
    fn backend_name(&self) -> &'static str;

    /// Verifies the store is reachable.
    async fn health_check(&self) -> StorageResult<()>;

    // User operations (driven by the sign-in flow)

    /// Fetches a user by its opaque id.
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>>;

    /// Inserts the user, or overwrites all writable fields and refreshes
    /// `updated_at` when the id already exists. `created_at` is preserved.
    async fn upsert_user(&self, user: UpsertUser) -> StorageResult<User>;

    // Session operations

    /// Creates a session for the user, valid for `ttl` from now.
    async fn create_session(&self, user_id: &str, ttl: Duration) -> StorageResult<Session>;

    /// Looks up a session; expired sessions are treated as absent.
    async fn get_session(&self, sid: &str) -> StorageResult<Option<Session>>;

    /// Removes a session. Idempotent.
    async fn delete_session(&self, sid: &str) -> StorageResult<()>;

    // Patient operations

    /// All patients, newest first, joined with their user accounts.
    async fn list_patients(&self) -> StorageResult<Vec<PatientWithUser>>;

    /// One patient by id, joined with its user account.
    async fn get_patient(&self, id: i64) -> StorageResult<Option<PatientWithUser>>;

    /// Inserts a patient and returns the persisted row.
    async fn create_patient(&self, new: NewPatient) -> StorageResult<Patient>;

    /// Applies a partial update; `None` when the id does not exist.
    async fn update_patient(&self, id: i64, patch: PatientPatch)
    -> StorageResult<Option<Patient>>;

    /// Removes a patient. Idempotent.
    async fn delete_patient(&self, id: i64) -> StorageResult<()>;

    /// Substring match across name, email and phone.
    async fn search_patients(&self, query: &str) -> StorageResult<Vec<PatientWithUser>>;

    // Doctor operations

    /// All doctors, newest first, joined with their user accounts.
    async fn list_doctors(&self) -> StorageResult<Vec<DoctorWithUser>>;

    /// One doctor by id, joined with its user account.
    async fn get_doctor(&self, id: i64) -> StorageResult<Option<DoctorWithUser>>;

    /// Inserts a doctor and returns the persisted row.
    async fn create_doctor(&self, new: NewDoctor) -> StorageResult<Doctor>;

    /// Applies a partial update; `None` when the id does not exist.
    async fn update_doctor(&self, id: i64, patch: DoctorPatch) -> StorageResult<Option<Doctor>>;

    /// Removes a doctor. Idempotent.
    async fn delete_doctor(&self, id: i64) -> StorageResult<()>;

    /// Substring match across name, specialization and email.
    async fn search_doctors(&self, query: &str) -> StorageResult<Vec<DoctorWithUser>>;

    // Drug operations

    /// All drugs, newest first.
    async fn list_drugs(&self) -> StorageResult<Vec<Drug>>;

    /// One drug by id.
    async fn get_drug(&self, id: i64) -> StorageResult<Option<Drug>>;

    /// Inserts a drug and returns the persisted row.
    async fn create_drug(&self, new: NewDrug) -> StorageResult<Drug>;

    /// Applies a partial update; `None` when the id does not exist.
    async fn update_drug(&self, id: i64, patch: DrugPatch) -> StorageResult<Option<Drug>>;

    /// Removes a drug. Idempotent.
    async fn delete_drug(&self, id: i64) -> StorageResult<()>;

    /// Substring match across name, category and manufacturer.
    async fn search_drugs(&self, query: &str) -> StorageResult<Vec<Drug>>;

    /// Drugs at or below the low-stock threshold, ascending by quantity.
    async fn low_stock_drugs(&self) -> StorageResult<Vec<Drug>>;

    // Appointment operations

    /// All appointments, latest date first, joined with patient and doctor.
    async fn list_appointments(&self) -> StorageResult<Vec<AppointmentWithDetails>>;

    /// One appointment by id, joined with patient and doctor.
    async fn get_appointment(&self, id: i64) -> StorageResult<Option<AppointmentWithDetails>>;

    /// Inserts an appointment and returns the persisted row.
    async fn create_appointment(&self, new: NewAppointment) -> StorageResult<Appointment>;

    /// Applies a partial update; `None` when the id does not exist.
    async fn update_appointment(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> StorageResult<Option<Appointment>>;

    /// Removes an appointment. Idempotent.
    async fn delete_appointment(&self, id: i64) -> StorageResult<()>;

    /// Appointments for one doctor, latest date first.
    async fn appointments_by_doctor(
        &self,
        doctor_id: i64,
    ) -> StorageResult<Vec<AppointmentWithDetails>>;

    /// Appointments for one patient, latest date first.
    async fn appointments_by_patient(
        &self,
        patient_id: i64,
    ) -> StorageResult<Vec<AppointmentWithDetails>>;

    // Admission operations

    /// All admissions, latest date first, joined with patient and doctor.
    async fn list_admissions(&self) -> StorageResult<Vec<AdmissionWithDetails>>;

    /// One admission by id, joined with patient and doctor.
    async fn get_admission(&self, id: i64) -> StorageResult<Option<AdmissionWithDetails>>;

    /// Inserts an admission and returns the persisted row.
    async fn create_admission(&self, new: NewAdmission) -> StorageResult<Admission>;

    /// Applies a partial update; `None` when the id does not exist.
    async fn update_admission(
        &self,
        id: i64,
        patch: AdmissionPatch,
    ) -> StorageResult<Option<Admission>>;

    /// Removes an admission. Idempotent.
    async fn delete_admission(&self, id: i64) -> StorageResult<()>;

    /// Admissions with status admitted, regardless of discharge date.
    async fn active_admissions(&self) -> StorageResult<Vec<AdmissionWithDetails>>;

    // Aggregation

    /// Computes the six dashboard counts as independent queries. The
    /// snapshot is not transactional; a failure in any count fails the
    /// whole summary.
    async fn dashboard_stats(&self) -> StorageResult<DashboardStats>;
}
