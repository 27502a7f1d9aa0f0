//! SQLite schema definitions and migrations.
//!
//! Column references between tables (`user_id`, `patient_id`, `doctor_id`)
//! carry no FOREIGN KEY constraints. A reference may dangle; joined reads
//! resolve it to a null related entity instead of failing.

use rusqlite::Connection;

use crate::error::StorageResult;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema. Idempotent.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
    }
    // Future versions migrate from current_version here.

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    let tables = [
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT,
            first_name TEXT,
            last_name TEXT,
            profile_image_url TEXT,
            role TEXT NOT NULL DEFAULT 'patient',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS sessions (
            sid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            date_of_birth TEXT,
            gender TEXT,
            address TEXT,
            emergency_contact TEXT,
            medical_history TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS doctors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            specialization TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            experience INTEGER,
            qualification TEXT,
            license_number TEXT,
            consultation_fee TEXT,
            rating TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS drugs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT,
            manufacturer TEXT,
            dosage TEXT,
            unit TEXT NOT NULL,
            stock_quantity INTEGER NOT NULL DEFAULT 0,
            unit_price TEXT,
            expiry_date TEXT,
            batch_number TEXT,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            doctor_id INTEGER,
            appointment_date TEXT NOT NULL,
            appointment_time TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled',
            reason TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS admissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            doctor_id INTEGER,
            admission_date TEXT NOT NULL,
            discharge_date TEXT,
            room_number TEXT,
            bed_number TEXT,
            status TEXT NOT NULL DEFAULT 'admitted',
            diagnosis TEXT,
            treatment TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ];

    for table_sql in &tables {
        conn.execute(table_sql, [])?;
    }

    create_indexes(conn)?;

    Ok(())
}

/// Create indexes for efficient queries.
fn create_indexes(conn: &Connection) -> StorageResult<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_patients_created ON patients(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_doctors_created ON doctors(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_drugs_created ON drugs(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_drugs_stock ON drugs(stock_quantity)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(appointment_date)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_admissions_status ON admissions(status)",
        "CREATE INDEX IF NOT EXISTS idx_admissions_date ON admissions(admission_date)",
    ];

    for index_sql in &indexes {
        conn.execute(index_sql, [])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn schema_initialization() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let tables = table_names(&conn);
        for expected in [
            "users",
            "sessions",
            "patients",
            "doctors",
            "drugs",
            "appointments",
            "admissions",
            "schema_version",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn schema_version_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn no_foreign_key_constraints_declared() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let fk_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE sql LIKE '%FOREIGN KEY%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(fk_count, 0);
    }
}
