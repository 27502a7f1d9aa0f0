//! Drug inventory records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validate::{
    FieldError, Validate, finish, require_non_empty, require_non_empty_opt,
};

/// Stock at or below this quantity counts as "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A persisted drug inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    /// Server-assigned sequential id.
    pub id: i64,
    /// Trade or generic name (required).
    pub name: String,
    /// Therapeutic category.
    pub category: Option<String>,
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Dosage description, e.g. "500mg".
    pub dosage: Option<String>,
    /// Dispensing unit, e.g. "tablet" (required).
    pub unit: String,
    /// On-hand quantity; at or below [`LOW_STOCK_THRESHOLD`] marks low stock.
    pub stock_quantity: i64,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
    /// Expiry date of the current batch.
    pub expiry_date: Option<NaiveDate>,
    /// Batch number.
    pub batch_number: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating write.
    pub updated_at: DateTime<Utc>,
}

/// Writable drug fields accepted on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDrug {
    /// Trade or generic name (required).
    pub name: String,
    /// Therapeutic category.
    #[serde(default)]
    pub category: Option<String>,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Dosage description.
    #[serde(default)]
    pub dosage: Option<String>,
    /// Dispensing unit (required).
    pub unit: String,
    /// On-hand quantity; defaults to 0.
    #[serde(default)]
    pub stock_quantity: i64,
    /// Price per unit.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Expiry date.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Batch number.
    #[serde(default)]
    pub batch_number: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for NewDrug {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "name", &self.name);
        require_non_empty(&mut errors, "unit", &self.unit);
        finish(errors)
    }
}

/// Partial drug update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugPatch {
    /// Trade or generic name.
    #[serde(default)]
    pub name: Option<String>,
    /// Therapeutic category.
    #[serde(default)]
    pub category: Option<String>,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Dosage description.
    #[serde(default)]
    pub dosage: Option<String>,
    /// Dispensing unit.
    #[serde(default)]
    pub unit: Option<String>,
    /// On-hand quantity.
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    /// Price per unit.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Expiry date.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Batch number.
    #[serde(default)]
    pub batch_number: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for DrugPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_non_empty_opt(&mut errors, "name", self.name.as_deref());
        require_non_empty_opt(&mut errors, "unit", self.unit.as_deref());
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_defaults_to_zero() {
        let new: NewDrug =
            serde_json::from_str(r#"{"name": "Paracetamol", "unit": "tablet"}"#).unwrap();
        assert_eq!(new.stock_quantity, 0);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn name_and_unit_required() {
        let new: NewDrug = serde_json::from_str(r#"{"name": "", "unit": " "}"#).unwrap();
        let errors = new.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "unit"]);
    }

    #[test]
    fn expiry_date_parses_iso() {
        let new: NewDrug = serde_json::from_str(
            r#"{"name": "Amoxicillin", "unit": "capsule", "expiryDate": "2027-03-01"}"#,
        )
        .unwrap();
        assert_eq!(new.expiry_date.unwrap().to_string(), "2027-03-01");
    }
}
