//! Dashboard summary counts.

use serde::{Deserialize, Serialize};

/// The six scalar counts shown on the dashboard.
///
/// Each count comes from an independent query; the snapshot is not
/// transactional, which is acceptable for a dashboard but not for billing
/// or compliance decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All patient rows.
    pub total_patients: i64,
    /// Admissions with status `admitted`.
    pub active_admissions: i64,
    /// Doctors with `is_active` set.
    pub doctors_available: i64,
    /// All drug rows.
    pub drug_items: i64,
    /// Appointments dated today (caller's local date).
    pub appointments_today: i64,
    /// Drugs at or below the low-stock threshold.
    pub low_stock_drugs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let stats = DashboardStats {
            total_patients: 3,
            low_stock_drugs: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalPatients"], 3);
        assert_eq!(json["lowStockDrugs"], 1);
        assert_eq!(json["appointmentsToday"], 0);
    }
}
