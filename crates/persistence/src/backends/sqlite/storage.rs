//! ClinicStorage implementation for SQLite.

use async_trait::async_trait;
use chrono::{Duration, Local};
use rusqlite::{Connection, OptionalExtension, ToSql, params, params_from_iter};

use clinic_model::{
    Admission, AdmissionPatch, AdmissionWithDetails, Appointment, AppointmentPatch,
    AppointmentWithDetails, DashboardStats, Doctor, DoctorPatch, DoctorWithUser, Drug, DrugPatch,
    LOW_STOCK_THRESHOLD, NewAdmission, NewAppointment, NewDoctor, NewDrug, NewPatient, Patient,
    PatientPatch, PatientWithUser, Session, UpsertUser, User,
};

use crate::core::ClinicStorage;
use crate::error::StorageResult;

use super::SqliteBackend;
use super::rows::{
    ADMISSION_COLS, APPOINTMENT_COLS, DOCTOR_COLS, DRUG_COLS, PATIENT_COLS, SESSION_COLS,
    USER_COLS, admission_at, appointment_at, column_list, doctor_at, drug_at, encode_ts,
    now_micros, opt_doctor_at, opt_patient_at, opt_user_at, patient_at, session_at, user_at,
};

/// Appends `col = ?N` to a dynamic SET clause, numbering from the argument
/// position.
fn push_set(sets: &mut Vec<String>, args: &mut Vec<Box<dyn ToSql>>, col: &str, value: Box<dyn ToSql>) {
    args.push(value);
    sets.push(format!("{col} = ?{}", args.len()));
}

fn count(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> StorageResult<i64> {
    let n = conn.query_row(sql, params_from_iter(args.iter()), |row| row.get(0))?;
    Ok(n)
}

fn like_pattern(query: &str) -> String {
    format!("%{query}%")
}

#[async_trait]
impl ClinicStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM users WHERE id = ?1",
            column_list(None, &USER_COLS)
        );
        let user = conn
            .query_row(&sql, params![id], |row| user_at(row, 0))
            .optional()?;
        Ok(user)
    }

    async fn upsert_user(&self, user: UpsertUser) -> StorageResult<User> {
        let conn = self.get_connection()?;
        let now = encode_ts(now_micros());

        conn.execute(
            "INSERT INTO users (id, email, first_name, last_name, profile_image_url, role,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                profile_image_url = excluded.profile_image_url,
                role = excluded.role,
                updated_at = excluded.updated_at",
            params![
                user.id,
                user.email,
                user.first_name,
                user.last_name,
                user.profile_image_url,
                user.role.as_str(),
                now,
            ],
        )?;

        // Read back so created_at reflects the original insert.
        let sql = format!(
            "SELECT {} FROM users WHERE id = ?1",
            column_list(None, &USER_COLS)
        );
        let stored = conn.query_row(&sql, params![user.id], |row| user_at(row, 0))?;
        Ok(stored)
    }

    async fn create_session(&self, user_id: &str, ttl: Duration) -> StorageResult<Session> {
        let conn = self.get_connection()?;
        let session = Session {
            sid: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            expires_at: now_micros() + ttl,
        };
        conn.execute(
            "INSERT INTO sessions (sid, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![session.sid, session.user_id, encode_ts(session.expires_at)],
        )?;
        tracing::debug!(user_id, "session created");
        Ok(session)
    }

    async fn get_session(&self, sid: &str) -> StorageResult<Option<Session>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM sessions WHERE sid = ?1 AND expires_at > ?2",
            column_list(None, &SESSION_COLS)
        );
        let session = conn
            .query_row(&sql, params![sid, encode_ts(now_micros())], |row| {
                session_at(row, 0)
            })
            .optional()?;
        Ok(session)
    }

    async fn delete_session(&self, sid: &str) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM sessions WHERE sid = ?1", params![sid])?;
        Ok(())
    }

    // Patients

    async fn list_patients(&self) -> StorageResult<Vec<PatientWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM patients p
             LEFT JOIN users u ON p.user_id = u.id
             ORDER BY p.created_at DESC",
            column_list(Some("p"), &PATIENT_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(PatientWithUser {
                patient: patient_at(row, 0)?,
                user: opt_user_at(row, PATIENT_COLS.len())?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn get_patient(&self, id: i64) -> StorageResult<Option<PatientWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM patients p
             LEFT JOIN users u ON p.user_id = u.id
             WHERE p.id = ?1",
            column_list(Some("p"), &PATIENT_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let found = conn
            .query_row(&sql, params![id], |row| {
                Ok(PatientWithUser {
                    patient: patient_at(row, 0)?,
                    user: opt_user_at(row, PATIENT_COLS.len())?,
                })
            })
            .optional()?;
        Ok(found)
    }

    async fn create_patient(&self, new: NewPatient) -> StorageResult<Patient> {
        let conn = self.get_connection()?;
        let now = now_micros();
        conn.execute(
            "INSERT INTO patients (user_id, first_name, last_name, email, phone, date_of_birth,
                                   gender, address, emergency_contact, medical_history,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                new.user_id,
                new.first_name,
                new.last_name,
                new.email,
                new.phone,
                new.date_of_birth.map(|d| d.to_string()),
                new.gender,
                new.address,
                new.emergency_contact,
                new.medical_history,
                encode_ts(now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "patient created");
        Ok(Patient {
            id,
            user_id: new.user_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            address: new.address,
            emergency_contact: new.emergency_contact,
            medical_history: new.medical_history,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_patient(
        &self,
        id: i64,
        patch: PatientPatch,
    ) -> StorageResult<Option<Patient>> {
        let conn = self.get_connection()?;
        let mut sets = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = patch.user_id {
            push_set(&mut sets, &mut args, "user_id", Box::new(v));
        }
        if let Some(v) = patch.first_name {
            push_set(&mut sets, &mut args, "first_name", Box::new(v));
        }
        if let Some(v) = patch.last_name {
            push_set(&mut sets, &mut args, "last_name", Box::new(v));
        }
        if let Some(v) = patch.email {
            push_set(&mut sets, &mut args, "email", Box::new(v));
        }
        if let Some(v) = patch.phone {
            push_set(&mut sets, &mut args, "phone", Box::new(v));
        }
        if let Some(v) = patch.date_of_birth {
            push_set(&mut sets, &mut args, "date_of_birth", Box::new(v.to_string()));
        }
        if let Some(v) = patch.gender {
            push_set(&mut sets, &mut args, "gender", Box::new(v));
        }
        if let Some(v) = patch.address {
            push_set(&mut sets, &mut args, "address", Box::new(v));
        }
        if let Some(v) = patch.emergency_contact {
            push_set(&mut sets, &mut args, "emergency_contact", Box::new(v));
        }
        if let Some(v) = patch.medical_history {
            push_set(&mut sets, &mut args, "medical_history", Box::new(v));
        }
        push_set(&mut sets, &mut args, "updated_at", Box::new(encode_ts(now_micros())));

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE patients SET {} WHERE id = ?{}",
            sets.join(", "),
            args.len()
        );
        let affected = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if affected == 0 {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM patients WHERE id = ?1",
            column_list(None, &PATIENT_COLS)
        );
        let updated = conn
            .query_row(&sql, params![id], |row| patient_at(row, 0))
            .optional()?;
        Ok(updated)
    }

    async fn delete_patient(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn search_patients(&self, query: &str) -> StorageResult<Vec<PatientWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM patients p
             LEFT JOIN users u ON p.user_id = u.id
             WHERE p.first_name LIKE ?1 OR p.last_name LIKE ?1
                OR p.email LIKE ?1 OR p.phone LIKE ?1
             ORDER BY p.created_at DESC",
            column_list(Some("p"), &PATIENT_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(query)], |row| {
            Ok(PatientWithUser {
                patient: patient_at(row, 0)?,
                user: opt_user_at(row, PATIENT_COLS.len())?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // Doctors

    async fn list_doctors(&self) -> StorageResult<Vec<DoctorWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM doctors d
             LEFT JOIN users u ON d.user_id = u.id
             ORDER BY d.created_at DESC",
            column_list(Some("d"), &DOCTOR_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(DoctorWithUser {
                doctor: doctor_at(row, 0)?,
                user: opt_user_at(row, DOCTOR_COLS.len())?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn get_doctor(&self, id: i64) -> StorageResult<Option<DoctorWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM doctors d
             LEFT JOIN users u ON d.user_id = u.id
             WHERE d.id = ?1",
            column_list(Some("d"), &DOCTOR_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let found = conn
            .query_row(&sql, params![id], |row| {
                Ok(DoctorWithUser {
                    doctor: doctor_at(row, 0)?,
                    user: opt_user_at(row, DOCTOR_COLS.len())?,
                })
            })
            .optional()?;
        Ok(found)
    }

    async fn create_doctor(&self, new: NewDoctor) -> StorageResult<Doctor> {
        let conn = self.get_connection()?;
        let now = now_micros();
        conn.execute(
            "INSERT INTO doctors (user_id, first_name, last_name, specialization, email, phone,
                                  experience, qualification, license_number, consultation_fee,
                                  rating, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                new.user_id,
                new.first_name,
                new.last_name,
                new.specialization,
                new.email,
                new.phone,
                new.experience,
                new.qualification,
                new.license_number,
                new.consultation_fee.map(|d| d.to_string()),
                new.rating.map(|d| d.to_string()),
                new.is_active,
                encode_ts(now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "doctor created");
        Ok(Doctor {
            id,
            user_id: new.user_id,
            first_name: new.first_name,
            last_name: new.last_name,
            specialization: new.specialization,
            email: new.email,
            phone: new.phone,
            experience: new.experience,
            qualification: new.qualification,
            license_number: new.license_number,
            consultation_fee: new.consultation_fee,
            rating: new.rating,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_doctor(&self, id: i64, patch: DoctorPatch) -> StorageResult<Option<Doctor>> {
        let conn = self.get_connection()?;
        let mut sets = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = patch.user_id {
            push_set(&mut sets, &mut args, "user_id", Box::new(v));
        }
        if let Some(v) = patch.first_name {
            push_set(&mut sets, &mut args, "first_name", Box::new(v));
        }
        if let Some(v) = patch.last_name {
            push_set(&mut sets, &mut args, "last_name", Box::new(v));
        }
        if let Some(v) = patch.specialization {
            push_set(&mut sets, &mut args, "specialization", Box::new(v));
        }
        if let Some(v) = patch.email {
            push_set(&mut sets, &mut args, "email", Box::new(v));
        }
        if let Some(v) = patch.phone {
            push_set(&mut sets, &mut args, "phone", Box::new(v));
        }
        if let Some(v) = patch.experience {
            push_set(&mut sets, &mut args, "experience", Box::new(v));
        }
        if let Some(v) = patch.qualification {
            push_set(&mut sets, &mut args, "qualification", Box::new(v));
        }
        if let Some(v) = patch.license_number {
            push_set(&mut sets, &mut args, "license_number", Box::new(v));
        }
        if let Some(v) = patch.consultation_fee {
            push_set(&mut sets, &mut args, "consultation_fee", Box::new(v.to_string()));
        }
        if let Some(v) = patch.rating {
            push_set(&mut sets, &mut args, "rating", Box::new(v.to_string()));
        }
        if let Some(v) = patch.is_active {
            push_set(&mut sets, &mut args, "is_active", Box::new(v));
        }
        push_set(&mut sets, &mut args, "updated_at", Box::new(encode_ts(now_micros())));

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE doctors SET {} WHERE id = ?{}",
            sets.join(", "),
            args.len()
        );
        let affected = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if affected == 0 {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM doctors WHERE id = ?1",
            column_list(None, &DOCTOR_COLS)
        );
        let updated = conn
            .query_row(&sql, params![id], |row| doctor_at(row, 0))
            .optional()?;
        Ok(updated)
    }

    async fn delete_doctor(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn search_doctors(&self, query: &str) -> StorageResult<Vec<DoctorWithUser>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {}, {} FROM doctors d
             LEFT JOIN users u ON d.user_id = u.id
             WHERE d.first_name LIKE ?1 OR d.last_name LIKE ?1
                OR d.specialization LIKE ?1 OR d.email LIKE ?1
             ORDER BY d.created_at DESC",
            column_list(Some("d"), &DOCTOR_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(query)], |row| {
            Ok(DoctorWithUser {
                doctor: doctor_at(row, 0)?,
                user: opt_user_at(row, DOCTOR_COLS.len())?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // Drugs

    async fn list_drugs(&self) -> StorageResult<Vec<Drug>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM drugs ORDER BY created_at DESC",
            column_list(None, &DRUG_COLS)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| drug_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn get_drug(&self, id: i64) -> StorageResult<Option<Drug>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM drugs WHERE id = ?1",
            column_list(None, &DRUG_COLS)
        );
        let found = conn
            .query_row(&sql, params![id], |row| drug_at(row, 0))
            .optional()?;
        Ok(found)
    }

    async fn create_drug(&self, new: NewDrug) -> StorageResult<Drug> {
        let conn = self.get_connection()?;
        let now = now_micros();
        conn.execute(
            "INSERT INTO drugs (name, category, manufacturer, dosage, unit, stock_quantity,
                                unit_price, expiry_date, batch_number, description,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                new.name,
                new.category,
                new.manufacturer,
                new.dosage,
                new.unit,
                new.stock_quantity,
                new.unit_price.map(|d| d.to_string()),
                new.expiry_date.map(|d| d.to_string()),
                new.batch_number,
                new.description,
                encode_ts(now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "drug created");
        Ok(Drug {
            id,
            name: new.name,
            category: new.category,
            manufacturer: new.manufacturer,
            dosage: new.dosage,
            unit: new.unit,
            stock_quantity: new.stock_quantity,
            unit_price: new.unit_price,
            expiry_date: new.expiry_date,
            batch_number: new.batch_number,
            description: new.description,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_drug(&self, id: i64, patch: DrugPatch) -> StorageResult<Option<Drug>> {
        let conn = self.get_connection()?;
        let mut sets = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = patch.name {
            push_set(&mut sets, &mut args, "name", Box::new(v));
        }
        if let Some(v) = patch.category {
            push_set(&mut sets, &mut args, "category", Box::new(v));
        }
        if let Some(v) = patch.manufacturer {
            push_set(&mut sets, &mut args, "manufacturer", Box::new(v));
        }
        if let Some(v) = patch.dosage {
            push_set(&mut sets, &mut args, "dosage", Box::new(v));
        }
        if let Some(v) = patch.unit {
            push_set(&mut sets, &mut args, "unit", Box::new(v));
        }
        if let Some(v) = patch.stock_quantity {
            push_set(&mut sets, &mut args, "stock_quantity", Box::new(v));
        }
        if let Some(v) = patch.unit_price {
            push_set(&mut sets, &mut args, "unit_price", Box::new(v.to_string()));
        }
        if let Some(v) = patch.expiry_date {
            push_set(&mut sets, &mut args, "expiry_date", Box::new(v.to_string()));
        }
        if let Some(v) = patch.batch_number {
            push_set(&mut sets, &mut args, "batch_number", Box::new(v));
        }
        if let Some(v) = patch.description {
            push_set(&mut sets, &mut args, "description", Box::new(v));
        }
        push_set(&mut sets, &mut args, "updated_at", Box::new(encode_ts(now_micros())));

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE drugs SET {} WHERE id = ?{}",
            sets.join(", "),
            args.len()
        );
        let affected = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if affected == 0 {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM drugs WHERE id = ?1",
            column_list(None, &DRUG_COLS)
        );
        let updated = conn
            .query_row(&sql, params![id], |row| drug_at(row, 0))
            .optional()?;
        Ok(updated)
    }

    async fn delete_drug(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM drugs WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn search_drugs(&self, query: &str) -> StorageResult<Vec<Drug>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM drugs
             WHERE name LIKE ?1 OR category LIKE ?1 OR manufacturer LIKE ?1
             ORDER BY created_at DESC",
            column_list(None, &DRUG_COLS)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(query)], |row| drug_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn low_stock_drugs(&self) -> StorageResult<Vec<Drug>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM drugs WHERE stock_quantity <= ?1 ORDER BY stock_quantity ASC",
            column_list(None, &DRUG_COLS)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![LOW_STOCK_THRESHOLD], |row| drug_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // Appointments

    async fn list_appointments(&self) -> StorageResult<Vec<AppointmentWithDetails>> {
        self.query_appointments(None, &[]).await
    }

    async fn get_appointment(&self, id: i64) -> StorageResult<Option<AppointmentWithDetails>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "{} WHERE a.id = ?1",
            appointment_join_select()
        );
        let found = conn
            .query_row(&sql, params![id], appointment_with_details)
            .optional()?;
        Ok(found)
    }

    async fn create_appointment(&self, new: NewAppointment) -> StorageResult<Appointment> {
        let conn = self.get_connection()?;
        let now = now_micros();
        conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_date, appointment_time,
                                       status, reason, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                new.patient_id,
                new.doctor_id,
                new.appointment_date.to_string(),
                new.appointment_time,
                new.status.as_str(),
                new.reason,
                new.notes,
                encode_ts(now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "appointment created");
        Ok(Appointment {
            id,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            appointment_date: new.appointment_date,
            appointment_time: new.appointment_time,
            status: new.status,
            reason: new.reason,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_appointment(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> StorageResult<Option<Appointment>> {
        let conn = self.get_connection()?;
        let mut sets = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = patch.patient_id {
            push_set(&mut sets, &mut args, "patient_id", Box::new(v));
        }
        if let Some(v) = patch.doctor_id {
            push_set(&mut sets, &mut args, "doctor_id", Box::new(v));
        }
        if let Some(v) = patch.appointment_date {
            push_set(&mut sets, &mut args, "appointment_date", Box::new(v.to_string()));
        }
        if let Some(v) = patch.appointment_time {
            push_set(&mut sets, &mut args, "appointment_time", Box::new(v));
        }
        if let Some(v) = patch.status {
            push_set(&mut sets, &mut args, "status", Box::new(v.as_str()));
        }
        if let Some(v) = patch.reason {
            push_set(&mut sets, &mut args, "reason", Box::new(v));
        }
        if let Some(v) = patch.notes {
            push_set(&mut sets, &mut args, "notes", Box::new(v));
        }
        push_set(&mut sets, &mut args, "updated_at", Box::new(encode_ts(now_micros())));

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE appointments SET {} WHERE id = ?{}",
            sets.join(", "),
            args.len()
        );
        let affected = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if affected == 0 {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM appointments WHERE id = ?1",
            column_list(None, &APPOINTMENT_COLS)
        );
        let updated = conn
            .query_row(&sql, params![id], |row| appointment_at(row, 0))
            .optional()?;
        Ok(updated)
    }

    async fn delete_appointment(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn appointments_by_doctor(
        &self,
        doctor_id: i64,
    ) -> StorageResult<Vec<AppointmentWithDetails>> {
        self.query_appointments(Some("a.doctor_id = ?1"), &[&doctor_id])
            .await
    }

    async fn appointments_by_patient(
        &self,
        patient_id: i64,
    ) -> StorageResult<Vec<AppointmentWithDetails>> {
        self.query_appointments(Some("a.patient_id = ?1"), &[&patient_id])
            .await
    }

    // Admissions

    async fn list_admissions(&self) -> StorageResult<Vec<AdmissionWithDetails>> {
        self.query_admissions(None).await
    }

    async fn get_admission(&self, id: i64) -> StorageResult<Option<AdmissionWithDetails>> {
        let conn = self.get_connection()?;
        let sql = format!("{} WHERE a.id = ?1", admission_join_select());
        let found = conn
            .query_row(&sql, params![id], admission_with_details)
            .optional()?;
        Ok(found)
    }

    async fn create_admission(&self, new: NewAdmission) -> StorageResult<Admission> {
        let conn = self.get_connection()?;
        let now = now_micros();
        conn.execute(
            "INSERT INTO admissions (patient_id, doctor_id, admission_date, discharge_date,
                                     room_number, bed_number, status, diagnosis, treatment,
                                     notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                new.patient_id,
                new.doctor_id,
                new.admission_date.to_string(),
                new.discharge_date.map(|d| d.to_string()),
                new.room_number,
                new.bed_number,
                new.status.as_str(),
                new.diagnosis,
                new.treatment,
                new.notes,
                encode_ts(now),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "admission created");
        Ok(Admission {
            id,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            admission_date: new.admission_date,
            discharge_date: new.discharge_date,
            room_number: new.room_number,
            bed_number: new.bed_number,
            status: new.status,
            diagnosis: new.diagnosis,
            treatment: new.treatment,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_admission(
        &self,
        id: i64,
        patch: AdmissionPatch,
    ) -> StorageResult<Option<Admission>> {
        let conn = self.get_connection()?;
        let mut sets = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = patch.patient_id {
            push_set(&mut sets, &mut args, "patient_id", Box::new(v));
        }
        if let Some(v) = patch.doctor_id {
            push_set(&mut sets, &mut args, "doctor_id", Box::new(v));
        }
        if let Some(v) = patch.admission_date {
            push_set(&mut sets, &mut args, "admission_date", Box::new(v.to_string()));
        }
        if let Some(v) = patch.discharge_date {
            push_set(&mut sets, &mut args, "discharge_date", Box::new(v.to_string()));
        }
        if let Some(v) = patch.room_number {
            push_set(&mut sets, &mut args, "room_number", Box::new(v));
        }
        if let Some(v) = patch.bed_number {
            push_set(&mut sets, &mut args, "bed_number", Box::new(v));
        }
        if let Some(v) = patch.status {
            push_set(&mut sets, &mut args, "status", Box::new(v.as_str()));
        }
        if let Some(v) = patch.diagnosis {
            push_set(&mut sets, &mut args, "diagnosis", Box::new(v));
        }
        if let Some(v) = patch.treatment {
            push_set(&mut sets, &mut args, "treatment", Box::new(v));
        }
        if let Some(v) = patch.notes {
            push_set(&mut sets, &mut args, "notes", Box::new(v));
        }
        push_set(&mut sets, &mut args, "updated_at", Box::new(encode_ts(now_micros())));

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE admissions SET {} WHERE id = ?{}",
            sets.join(", "),
            args.len()
        );
        let affected = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if affected == 0 {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM admissions WHERE id = ?1",
            column_list(None, &ADMISSION_COLS)
        );
        let updated = conn
            .query_row(&sql, params![id], |row| admission_at(row, 0))
            .optional()?;
        Ok(updated)
    }

    async fn delete_admission(&self, id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM admissions WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn active_admissions(&self) -> StorageResult<Vec<AdmissionWithDetails>> {
        self.query_admissions(Some("a.status = 'admitted'")).await
    }

    async fn dashboard_stats(&self) -> StorageResult<DashboardStats> {
        let conn = self.get_connection()?;

        // "Today" in the server's local calendar, matching how clients
        // render appointment dates.
        let today = Local::now().date_naive().to_string();

        Ok(DashboardStats {
            total_patients: count(&conn, "SELECT COUNT(*) FROM patients", &[])?,
            active_admissions: count(
                &conn,
                "SELECT COUNT(*) FROM admissions WHERE status = 'admitted'",
                &[],
            )?,
            doctors_available: count(
                &conn,
                "SELECT COUNT(*) FROM doctors WHERE is_active = 1",
                &[],
            )?,
            drug_items: count(&conn, "SELECT COUNT(*) FROM drugs", &[])?,
            appointments_today: count(
                &conn,
                "SELECT COUNT(*) FROM appointments WHERE appointment_date = ?1",
                &[&today],
            )?,
            low_stock_drugs: count(
                &conn,
                "SELECT COUNT(*) FROM drugs WHERE stock_quantity <= ?1",
                &[&LOW_STOCK_THRESHOLD],
            )?,
        })
    }
}

fn appointment_join_select() -> String {
    format!(
        "SELECT {}, {}, {} FROM appointments a
         LEFT JOIN patients p ON a.patient_id = p.id
         LEFT JOIN doctors d ON a.doctor_id = d.id",
        column_list(Some("a"), &APPOINTMENT_COLS),
        column_list(Some("p"), &PATIENT_COLS),
        column_list(Some("d"), &DOCTOR_COLS),
    )
}

fn appointment_with_details(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentWithDetails> {
    let patient_base = APPOINTMENT_COLS.len();
    let doctor_base = patient_base + PATIENT_COLS.len();
    Ok(AppointmentWithDetails {
        appointment: appointment_at(row, 0)?,
        patient: opt_patient_at(row, patient_base)?,
        doctor: opt_doctor_at(row, doctor_base)?,
    })
}

fn admission_join_select() -> String {
    format!(
        "SELECT {}, {}, {} FROM admissions a
         LEFT JOIN patients p ON a.patient_id = p.id
         LEFT JOIN doctors d ON a.doctor_id = d.id",
        column_list(Some("a"), &ADMISSION_COLS),
        column_list(Some("p"), &PATIENT_COLS),
        column_list(Some("d"), &DOCTOR_COLS),
    )
}

fn admission_with_details(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdmissionWithDetails> {
    let patient_base = ADMISSION_COLS.len();
    let doctor_base = patient_base + PATIENT_COLS.len();
    Ok(AdmissionWithDetails {
        admission: admission_at(row, 0)?,
        patient: opt_patient_at(row, patient_base)?,
        doctor: opt_doctor_at(row, doctor_base)?,
    })
}

impl SqliteBackend {
    async fn query_appointments(
        &self,
        filter: Option<&str>,
        args: &[&(dyn ToSql + Sync)],
    ) -> StorageResult<Vec<AppointmentWithDetails>> {
        let conn = self.get_connection()?;
        let mut sql = appointment_join_select();
        if let Some(filter) = filter {
            sql.push_str(&format!(" WHERE {filter}"));
        }
        sql.push_str(" ORDER BY a.appointment_date DESC, a.created_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), appointment_with_details)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn query_admissions(
        &self,
        filter: Option<&str>,
    ) -> StorageResult<Vec<AdmissionWithDetails>> {
        let conn = self.get_connection()?;
        let mut sql = admission_join_select();
        if let Some(filter) = filter {
            sql.push_str(&format!(" WHERE {filter}"));
        }
        sql.push_str(" ORDER BY a.admission_date DESC, a.created_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], admission_with_details)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn backend() -> SqliteBackend {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
    }

    fn sample_patient(first: &str, last: &str) -> NewPatient {
        NewPatient {
            user_id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
            date_of_birth: None,
            gender: None,
            address: None,
            emergency_contact: None,
            medical_history: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_patient() {
        let backend = backend().await;
        let created = backend
            .create_patient(sample_patient("Ada", "Lovelace"))
            .await
            .unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = backend.get_patient(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.patient, created);
        assert!(fetched.user.is_none());
    }

    #[tokio::test]
    async fn get_missing_patient_is_none() {
        let backend = backend().await;
        assert!(backend.get_patient(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_patient_is_none() {
        let backend = backend().await;
        let result = backend
            .update_patient(999, PatientPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let backend = backend().await;
        backend.delete_patient(12345).await.unwrap();
        backend.delete_patient(12345).await.unwrap();
    }

    #[tokio::test]
    async fn search_matches_substring_across_columns() {
        let backend = backend().await;
        backend
            .create_patient(sample_patient("Ada", "Lovelace"))
            .await
            .unwrap();
        backend
            .create_patient(sample_patient("Grace", "Hopper"))
            .await
            .unwrap();

        let hits = backend.search_patients("ove").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].patient.last_name, "Lovelace");

        let misses = backend.search_patients("nobody").await.unwrap();
        assert!(misses.is_empty());
    }
}
