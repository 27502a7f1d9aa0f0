//! Integration tests for the SQLite backend.

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;

use clinic_model::{
    AdmissionStatus, AppointmentStatus, DoctorPatch, DrugPatch, NewAdmission, NewAppointment,
    NewDoctor, NewDrug, NewPatient, PatientPatch, UpsertUser, UserRole,
};
use clinic_persistence::ClinicStorage;
use clinic_persistence::backends::sqlite::SqliteBackend;

fn backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().unwrap();
    backend.init_schema().unwrap();
    backend
}

fn new_patient(first: &str, last: &str) -> NewPatient {
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

fn new_doctor(first: &str, last: &str, specialization: &str) -> NewDoctor {
    NewDoctor {
        user_id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        phone: None,
        specialization: specialization.to_string(),
        experience: None,
        qualification: None,
        license_number: None,
        consultation_fee: None,
        rating: None,
        is_active: true,
    }
}

fn new_drug(name: &str, stock: i64) -> NewDrug {
    NewDrug {
        name: name.to_string(),
        category: None,
        manufacturer: None,
        dosage: None,
        unit: "tablet".to_string(),
        stock_quantity: stock,
        unit_price: None,
        expiry_date: None,
        batch_number: None,
        description: None,
    }
}

fn new_appointment(date: NaiveDate) -> NewAppointment {
    NewAppointment {
        patient_id: None,
        doctor_id: None,
        appointment_date: date,
        appointment_time: "10:30".to_string(),
        status: AppointmentStatus::Scheduled,
        reason: None,
        notes: None,
    }
}

fn new_admission(date: NaiveDate) -> NewAdmission {
    NewAdmission {
        patient_id: None,
        doctor_id: None,
        admission_date: date,
        discharge_date: None,
        room_number: None,
        bed_number: None,
        status: AdmissionStatus::Admitted,
        diagnosis: None,
        treatment: None,
        notes: None,
    }
}

#[tokio::test]
async fn partial_update_leaves_other_fields_unchanged() {
    let backend = backend();
    let created = backend
        .create_patient(NewPatient {
            email: Some("ada@example.test".to_string()),
            phone: Some("555-0100".to_string()),
            ..new_patient("Ada", "Lovelace")
        })
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let updated = backend
        .update_patient(
            created.id,
            PatientPatch {
                phone: Some("555-0199".to_string()),
                ..PatientPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.phone.as_deref(), Some("555-0199"));
    assert_eq!(updated.email.as_deref(), Some("ada@example.test"));
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn empty_patch_is_a_timestamp_touch() {
    let backend = backend();
    let created = backend
        .create_patient(new_patient("Ada", "Lovelace"))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let touched = backend
        .update_patient(created.id, PatientPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(touched.first_name, created.first_name);
    assert!(touched.updated_at > created.updated_at);
}

#[tokio::test]
async fn lists_are_newest_first() {
    let backend = backend();
    for name in ["First", "Second", "Third"] {
        backend
            .create_patient(new_patient(name, "Patient"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let listed = backend.list_patients().await.unwrap();
    let names: Vec<_> = listed.iter().map(|p| p.patient.first_name.as_str()).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn dangling_user_reference_joins_as_none() {
    let backend = backend();
    let created = backend
        .create_patient(NewPatient {
            user_id: Some("no-such-user".to_string()),
            ..new_patient("Ada", "Lovelace")
        })
        .await
        .unwrap();

    let fetched = backend.get_patient(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.patient.user_id.as_deref(), Some("no-such-user"));
    assert!(fetched.user.is_none());
}

#[tokio::test]
async fn patient_joins_with_linked_user() {
    let backend = backend();
    let user = backend
        .upsert_user(UpsertUser {
            id: "u-1".to_string(),
            email: Some("ada@example.test".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
            profile_image_url: None,
            role: UserRole::Patient,
        })
        .await
        .unwrap();

    let created = backend
        .create_patient(NewPatient {
            user_id: Some(user.id.clone()),
            ..new_patient("Ada", "Lovelace")
        })
        .await
        .unwrap();

    let fetched = backend.get_patient(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.user.unwrap().id, "u-1");
}

#[tokio::test]
async fn upsert_preserves_created_at() {
    let backend = backend();
    let first = backend
        .upsert_user(UpsertUser {
            id: "u-1".to_string(),
            email: Some("old@example.test".to_string()),
            first_name: None,
            last_name: None,
            profile_image_url: None,
            role: UserRole::Patient,
        })
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let second = backend
        .upsert_user(UpsertUser {
            id: "u-1".to_string(),
            email: Some("new@example.test".to_string()),
            first_name: None,
            last_name: None,
            profile_image_url: None,
            role: UserRole::Admin,
        })
        .await
        .unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.email.as_deref(), Some("new@example.test"));
    assert_eq!(second.role, UserRole::Admin);
}

#[tokio::test]
async fn sessions_expire() {
    let backend = backend();
    backend
        .upsert_user(UpsertUser {
            id: "u-1".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            role: UserRole::Patient,
        })
        .await
        .unwrap();

    let live = backend
        .create_session("u-1", Duration::hours(1))
        .await
        .unwrap();
    assert!(backend.get_session(&live.sid).await.unwrap().is_some());

    let expired = backend
        .create_session("u-1", Duration::seconds(-1))
        .await
        .unwrap();
    assert!(backend.get_session(&expired.sid).await.unwrap().is_none());

    backend.delete_session(&live.sid).await.unwrap();
    assert!(backend.get_session(&live.sid).await.unwrap().is_none());
    // Deleting again is a no-op.
    backend.delete_session(&live.sid).await.unwrap();
}

#[tokio::test]
async fn low_stock_orders_by_quantity() {
    let backend = backend();
    for (name, stock) in [("A", 5), ("B", 15), ("C", 10), ("D", 0)] {
        backend.create_drug(new_drug(name, stock)).await.unwrap();
    }

    let low = backend.low_stock_drugs().await.unwrap();
    let quantities: Vec<_> = low.iter().map(|d| d.stock_quantity).collect();
    assert_eq!(quantities, vec![0, 5, 10]);
}

#[tokio::test]
async fn drug_decimal_price_round_trips() {
    let backend = backend();
    let created = backend
        .create_drug(NewDrug {
            unit_price: Some("3.50".parse::<Decimal>().unwrap()),
            ..new_drug("Paracetamol", 20)
        })
        .await
        .unwrap();

    let fetched = backend.get_drug(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.unit_price.unwrap().to_string(), "3.50");

    let updated = backend
        .update_drug(
            created.id,
            DrugPatch {
                stock_quantity: Some(3),
                ..DrugPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.stock_quantity, 3);
    assert_eq!(updated.unit_price.unwrap().to_string(), "3.50");
}

#[tokio::test]
async fn appointments_filter_by_doctor_and_patient() {
    let backend = backend();
    let patient = backend
        .create_patient(new_patient("Ada", "Lovelace"))
        .await
        .unwrap();
    let doctor = backend
        .create_doctor(new_doctor("Greg", "House", "Diagnostics"))
        .await
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

    backend
        .create_appointment(NewAppointment {
            patient_id: Some(patient.id),
            doctor_id: Some(doctor.id),
            ..new_appointment(date)
        })
        .await
        .unwrap();
    backend
        .create_appointment(new_appointment(date))
        .await
        .unwrap();

    let by_doctor = backend.appointments_by_doctor(doctor.id).await.unwrap();
    assert_eq!(by_doctor.len(), 1);
    assert_eq!(by_doctor[0].doctor.as_ref().unwrap().id, doctor.id);
    assert_eq!(by_doctor[0].patient.as_ref().unwrap().id, patient.id);

    let by_patient = backend.appointments_by_patient(patient.id).await.unwrap();
    assert_eq!(by_patient.len(), 1);

    // The unlinked appointment joins as None on both sides.
    let all = backend.list_appointments().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|a| a.patient.is_none() && a.doctor.is_none()));
}

#[tokio::test]
async fn dangling_appointment_references_join_as_none() {
    let backend = backend();
    let patient = backend
        .create_patient(new_patient("Ada", "Lovelace"))
        .await
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let appointment = backend
        .create_appointment(NewAppointment {
            patient_id: Some(patient.id),
            doctor_id: Some(424242),
            ..new_appointment(date)
        })
        .await
        .unwrap();

    let fetched = backend
        .get_appointment(appointment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.appointment.doctor_id, Some(424242));
    assert!(fetched.doctor.is_none());
    assert!(fetched.patient.is_some());
}

#[tokio::test]
async fn active_admissions_keys_off_status_only() {
    let backend = backend();
    let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    // Admitted with a discharge date already recorded: still active.
    backend
        .create_admission(NewAdmission {
            discharge_date: NaiveDate::from_ymd_opt(2026, 8, 10),
            ..new_admission(date)
        })
        .await
        .unwrap();
    backend
        .create_admission(NewAdmission {
            status: AdmissionStatus::Discharged,
            ..new_admission(date)
        })
        .await
        .unwrap();

    let active = backend.active_admissions().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].admission.status, AdmissionStatus::Admitted);
    assert!(active[0].admission.discharge_date.is_some());
}

#[tokio::test]
async fn dashboard_counts() {
    let backend = backend();
    let today = Local::now().date_naive();
    let tomorrow = today + Duration::days(1);

    backend
        .create_patient(new_patient("Ada", "Lovelace"))
        .await
        .unwrap();
    backend
        .create_patient(new_patient("Grace", "Hopper"))
        .await
        .unwrap();

    let doctor = backend
        .create_doctor(new_doctor("Greg", "House", "Diagnostics"))
        .await
        .unwrap();
    backend
        .create_doctor(new_doctor("James", "Wilson", "Oncology"))
        .await
        .unwrap();
    backend
        .update_doctor(
            doctor.id,
            DoctorPatch {
                is_active: Some(false),
                ..DoctorPatch::default()
            },
        )
        .await
        .unwrap();

    backend.create_drug(new_drug("A", 5)).await.unwrap();
    backend.create_drug(new_drug("B", 50)).await.unwrap();

    backend
        .create_appointment(new_appointment(today))
        .await
        .unwrap();
    backend
        .create_appointment(new_appointment(tomorrow))
        .await
        .unwrap();

    backend.create_admission(new_admission(today)).await.unwrap();

    let stats = backend.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_patients, 2);
    assert_eq!(stats.active_admissions, 1);
    assert_eq!(stats.doctors_available, 1);
    assert_eq!(stats.drug_items, 2);
    assert_eq!(stats.appointments_today, 1);
    assert_eq!(stats.low_stock_drugs, 1);
}

#[tokio::test]
async fn health_check_reports_backend() {
    let backend = backend();
    backend.health_check().await.unwrap();
    assert_eq!(backend.backend_name(), "sqlite");
}
