//! Row decoding shared by the storage queries.
//!
//! Every mapper takes a base column offset so the same decoder serves both
//! plain selects and joined selects where the entity's columns appear after
//! the owning row's. Joined entities are decoded through the `opt_*`
//! variants, which read the entity's id column first and yield `None` when
//! the LEFT JOIN produced no match.

use chrono::{DateTime, DurationRound, NaiveDate, SecondsFormat, TimeDelta, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

use clinic_model::{Admission, Appointment, Doctor, Drug, Patient, Session, User};

/// Column order for `users`, matching [`user_at`].
pub(super) const USER_COLS: [&str; 8] = [
    "id",
    "email",
    "first_name",
    "last_name",
    "profile_image_url",
    "role",
    "created_at",
    "updated_at",
];

/// Column order for `sessions`, matching [`session_at`].
pub(super) const SESSION_COLS: [&str; 3] = ["sid", "user_id", "expires_at"];

/// Column order for `patients`, matching [`patient_at`].
pub(super) const PATIENT_COLS: [&str; 13] = [
    "id",
    "user_id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "date_of_birth",
    "gender",
    "address",
    "emergency_contact",
    "medical_history",
    "created_at",
    "updated_at",
];

/// Column order for `doctors`, matching [`doctor_at`].
pub(super) const DOCTOR_COLS: [&str; 15] = [
    "id",
    "user_id",
    "first_name",
    "last_name",
    "specialization",
    "email",
    "phone",
    "experience",
    "qualification",
    "license_number",
    "consultation_fee",
    "rating",
    "is_active",
    "created_at",
    "updated_at",
];

/// Column order for `drugs`, matching [`drug_at`].
pub(super) const DRUG_COLS: [&str; 13] = [
    "id",
    "name",
    "category",
    "manufacturer",
    "dosage",
    "unit",
    "stock_quantity",
    "unit_price",
    "expiry_date",
    "batch_number",
    "description",
    "created_at",
    "updated_at",
];

/// Column order for `appointments`, matching [`appointment_at`].
pub(super) const APPOINTMENT_COLS: [&str; 10] = [
    "id",
    "patient_id",
    "doctor_id",
    "appointment_date",
    "appointment_time",
    "status",
    "reason",
    "notes",
    "created_at",
    "updated_at",
];

/// Column order for `admissions`, matching [`admission_at`].
pub(super) const ADMISSION_COLS: [&str; 13] = [
    "id",
    "patient_id",
    "doctor_id",
    "admission_date",
    "discharge_date",
    "room_number",
    "bed_number",
    "status",
    "diagnosis",
    "treatment",
    "notes",
    "created_at",
    "updated_at",
];

/// Renders a column list, optionally qualified with a table alias.
pub(super) fn column_list(alias: Option<&str>, cols: &[&str]) -> String {
    match alias {
        Some(a) => cols
            .iter()
            .map(|c| format!("{a}.{c}"))
            .collect::<Vec<_>>()
            .join(", "),
        None => cols.join(", "),
    }
}

/// Timestamp storage form: RFC3339 with fixed microsecond precision, so
/// lexicographic ordering is chronological.
pub(super) fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current instant truncated to microseconds, so the value handed back to
/// the caller is identical to what a later read decodes.
pub(super) fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now)
}

fn conversion_err(idx: usize, message: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into().into())
}

fn ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, format!("invalid timestamp {raw:?}: {e}")))
}

fn date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    raw.parse::<NaiveDate>()
        .map_err(|e| conversion_err(idx, format!("invalid date {raw:?}: {e}")))
}

fn opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|e| conversion_err(idx, format!("invalid date {raw:?}: {e}"))),
        None => Ok(None),
    }
}

fn opt_decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| conversion_err(idx, format!("invalid decimal {raw:?}: {e}"))),
        None => Ok(None),
    }
}

fn parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| conversion_err(idx, e.to_string()))
}

/// Decodes a user starting at column `base`.
pub(super) fn user_at(row: &Row<'_>, base: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(base)?,
        email: row.get(base + 1)?,
        first_name: row.get(base + 2)?,
        last_name: row.get(base + 3)?,
        profile_image_url: row.get(base + 4)?,
        role: parsed(row, base + 5)?,
        created_at: ts(row, base + 6)?,
        updated_at: ts(row, base + 7)?,
    })
}

/// Decodes the nullable side of a LEFT JOIN against `users`.
pub(super) fn opt_user_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Option<User>> {
    match row.get::<_, Option<String>>(base)? {
        Some(_) => user_at(row, base).map(Some),
        None => Ok(None),
    }
}

/// Decodes a session starting at column `base`.
pub(super) fn session_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Session> {
    Ok(Session {
        sid: row.get(base)?,
        user_id: row.get(base + 1)?,
        expires_at: ts(row, base + 2)?,
    })
}

/// Decodes a patient starting at column `base`.
pub(super) fn patient_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(base)?,
        user_id: row.get(base + 1)?,
        first_name: row.get(base + 2)?,
        last_name: row.get(base + 3)?,
        email: row.get(base + 4)?,
        phone: row.get(base + 5)?,
        date_of_birth: opt_date(row, base + 6)?,
        gender: row.get(base + 7)?,
        address: row.get(base + 8)?,
        emergency_contact: row.get(base + 9)?,
        medical_history: row.get(base + 10)?,
        created_at: ts(row, base + 11)?,
        updated_at: ts(row, base + 12)?,
    })
}

/// Decodes the nullable side of a LEFT JOIN against `patients`.
pub(super) fn opt_patient_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Option<Patient>> {
    match row.get::<_, Option<i64>>(base)? {
        Some(_) => patient_at(row, base).map(Some),
        None => Ok(None),
    }
}

/// Decodes a doctor starting at column `base`.
pub(super) fn doctor_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(base)?,
        user_id: row.get(base + 1)?,
        first_name: row.get(base + 2)?,
        last_name: row.get(base + 3)?,
        specialization: row.get(base + 4)?,
        email: row.get(base + 5)?,
        phone: row.get(base + 6)?,
        experience: row.get(base + 7)?,
        qualification: row.get(base + 8)?,
        license_number: row.get(base + 9)?,
        consultation_fee: opt_decimal(row, base + 10)?,
        rating: opt_decimal(row, base + 11)?,
        is_active: row.get(base + 12)?,
        created_at: ts(row, base + 13)?,
        updated_at: ts(row, base + 14)?,
    })
}

/// Decodes the nullable side of a LEFT JOIN against `doctors`.
pub(super) fn opt_doctor_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Option<Doctor>> {
    match row.get::<_, Option<i64>>(base)? {
        Some(_) => doctor_at(row, base).map(Some),
        None => Ok(None),
    }
}

/// Decodes a drug starting at column `base`.
pub(super) fn drug_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Drug> {
    Ok(Drug {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        category: row.get(base + 2)?,
        manufacturer: row.get(base + 3)?,
        dosage: row.get(base + 4)?,
        unit: row.get(base + 5)?,
        stock_quantity: row.get(base + 6)?,
        unit_price: opt_decimal(row, base + 7)?,
        expiry_date: opt_date(row, base + 8)?,
        batch_number: row.get(base + 9)?,
        description: row.get(base + 10)?,
        created_at: ts(row, base + 11)?,
        updated_at: ts(row, base + 12)?,
    })
}

/// Decodes an appointment starting at column `base`.
pub(super) fn appointment_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(base)?,
        patient_id: row.get(base + 1)?,
        doctor_id: row.get(base + 2)?,
        appointment_date: date(row, base + 3)?,
        appointment_time: row.get(base + 4)?,
        status: parsed(row, base + 5)?,
        reason: row.get(base + 6)?,
        notes: row.get(base + 7)?,
        created_at: ts(row, base + 8)?,
        updated_at: ts(row, base + 9)?,
    })
}

/// Decodes an admission starting at column `base`.
pub(super) fn admission_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Admission> {
    Ok(Admission {
        id: row.get(base)?,
        patient_id: row.get(base + 1)?,
        doctor_id: row.get(base + 2)?,
        admission_date: date(row, base + 3)?,
        discharge_date: opt_date(row, base + 4)?,
        room_number: row.get(base + 5)?,
        bed_number: row.get(base + 6)?,
        status: parsed(row, base + 7)?,
        diagnosis: row.get(base + 8)?,
        treatment: row.get(base + 9)?,
        notes: row.get(base + 10)?,
        created_at: ts(row, base + 11)?,
        updated_at: ts(row, base + 12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 5).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);
        let (a, b) = (encode_ts(earlier), encode_ts(later));
        assert!(a < b);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn encoded_timestamp_round_trips() {
        let now = now_micros();
        let parsed = DateTime::parse_from_rfc3339(&encode_ts(now))
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, now);
    }

    #[test]
    fn column_list_qualifies_with_alias() {
        let cols = ["id", "name"];
        assert_eq!(column_list(None, &cols), "id, name");
        assert_eq!(column_list(Some("d"), &cols), "d.id, d.name");
    }

    #[test]
    fn drug_decodes_from_a_raw_row() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        crate::backends::sqlite::schema::initialize_schema(&conn).unwrap();
        let now = encode_ts(Utc::now());
        conn.execute(
            "INSERT INTO drugs (name, unit, stock_quantity, unit_price, expiry_date,
                                created_at, updated_at)
             VALUES ('Paracetamol', 'tablet', 42, '3.50', '2027-03-01', ?1, ?1)",
            [&now],
        )
        .unwrap();

        let sql = format!("SELECT {} FROM drugs", column_list(None, &DRUG_COLS));
        let drug = conn
            .query_row(&sql, [], |row| drug_at(row, 0))
            .unwrap();
        assert_eq!(drug.name, "Paracetamol");
        assert_eq!(drug.stock_quantity, 42);
        assert_eq!(drug.unit_price.unwrap().to_string(), "3.50");
        assert_eq!(drug.expiry_date.unwrap().to_string(), "2027-03-01");
        assert!(drug.category.is_none());
    }

    #[test]
    fn left_join_null_side_decodes_to_none() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        crate::backends::sqlite::schema::initialize_schema(&conn).unwrap();
        let now = encode_ts(Utc::now());
        conn.execute(
            "INSERT INTO patients (user_id, first_name, last_name, created_at, updated_at)
             VALUES ('no-such-user', 'Ada', 'Lovelace', ?1, ?1)",
            [&now],
        )
        .unwrap();

        let sql = format!(
            "SELECT {}, {} FROM patients p LEFT JOIN users u ON p.user_id = u.id",
            column_list(Some("p"), &PATIENT_COLS),
            column_list(Some("u"), &USER_COLS),
        );
        let (patient, user) = conn
            .query_row(&sql, [], |row| {
                Ok((patient_at(row, 0)?, opt_user_at(row, PATIENT_COLS.len())?))
            })
            .unwrap();
        assert_eq!(patient.first_name, "Ada");
        assert_eq!(patient.user_id.as_deref(), Some("no-such-user"));
        assert!(user.is_none());
    }
}
