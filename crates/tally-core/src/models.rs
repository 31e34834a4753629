//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spending category - a closed set, invalid values are unrepresentable.
///
/// Wire names match the extraction collaborator's schema exactly
/// (e.g. `"Food & Dining"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Income,
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transport & Mobility")]
    TransportMobility,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Shopping & Entertainment")]
    ShoppingEntertainment,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::FoodDining => "Food & Dining",
            Self::TransportMobility => "Transport & Mobility",
            Self::BillsUtilities => "Bills & Utilities",
            Self::ShoppingEntertainment => "Shopping & Entertainment",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Income" => Ok(Self::Income),
            "Food & Dining" => Ok(Self::FoodDining),
            "Transport & Mobility" => Ok(Self::TransportMobility),
            "Bills & Utilities" => Ok(Self::BillsUtilities),
            "Shopping & Entertainment" => Ok(Self::ShoppingEntertainment),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id, assigned at commit time by the ingestion orchestrator
    pub id: String,
    /// Id of the ingestion batch that created this transaction
    pub import_id: String,
    /// Calendar date, no time component (serialized as YYYY-MM-DD)
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount: positive = inflow, negative = outflow
    pub amount: f64,
    /// Normalized merchant name, grouping key for recurrence detection
    pub merchant_canonical: String,
    pub category: Category,
    /// Extraction confidence in [0,1], consumed by the category refiner
    pub confidence: f64,
    /// Set by the recurrence detector within the same ingestion pass
    pub recurring: bool,
}

/// A staged transaction: refined and recurrence-flagged, but not yet
/// assigned an id or committed to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub merchant_canonical: String,
    pub category: Category,
    pub confidence: f64,
    pub recurring: bool,
}

impl NewTransaction {
    /// Promote to a committed transaction with its assigned identifiers.
    pub fn into_transaction(self, id: String, import_id: String) -> Transaction {
        Transaction {
            id,
            import_id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            merchant_canonical: self.merchant_canonical,
            category: self.category,
            confidence: self.confidence,
            recurring: self.recurring,
        }
    }
}

/// One candidate transaction as returned by the extraction collaborator.
///
/// Strict by design: unexpected fields, malformed dates, and categories
/// outside the closed set all fail deserialization, which rejects the
/// whole upload call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub merchant_canonical: String,
    pub category: Category,
    pub confidence: f64,
}

impl ExtractedTransaction {
    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.merchant_canonical.is_empty() {
            return Err(Error::InvalidData(format!(
                "extracted transaction '{}' has an empty merchant",
                self.description
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::InvalidData(format!(
                "extracted transaction '{}' has confidence {} outside [0,1]",
                self.description, self.confidence
            )));
        }
        Ok(())
    }
}

/// Metadata for one uploaded statement file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    pub import_id: String,
    pub filename: String,
    /// Opaque reference to the externally-stored document
    pub document_ref: String,
    pub transaction_count: usize,
    /// RFC 3339 timestamp in the reference timezone
    pub created_at: String,
}

/// A registered user. Reserved: present in the persisted document shape
/// but never created by any current operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

/// The whole persisted ledger document: three flat collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub imports: Vec<Import>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_wire_names_round_trip() {
        for category in [
            Category::Income,
            Category::FoodDining,
            Category::TransportMobility,
            Category::BillsUtilities,
            Category::ShoppingEntertainment,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn category_rejects_unknown_values() {
        let result: std::result::Result<Category, _> =
            serde_json::from_str("\"Gambling\"");
        assert!(result.is_err());
    }

    #[test]
    fn extracted_transaction_rejects_unknown_fields() {
        let raw = r#"{
            "date": "2024-01-15",
            "description": "STARBUCKS 123",
            "amount": -5.5,
            "merchant_canonical": "Starbucks",
            "category": "Food & Dining",
            "confidence": 0.9,
            "memo": "extra"
        }"#;
        let result: std::result::Result<ExtractedTransaction, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn extracted_transaction_rejects_malformed_date() {
        let raw = r#"{
            "date": "15/01/2024",
            "description": "STARBUCKS 123",
            "amount": -5.5,
            "merchant_canonical": "Starbucks",
            "category": "Food & Dining",
            "confidence": 0.9
        }"#;
        let result: std::result::Result<ExtractedTransaction, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_merchant_and_bad_confidence() {
        let mut tx = ExtractedTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "SALARY".to_string(),
            amount: 1000.0,
            merchant_canonical: "Acme Corp".to_string(),
            category: Category::Income,
            confidence: 0.9,
        };
        assert!(tx.validate().is_ok());

        tx.merchant_canonical.clear();
        assert!(tx.validate().is_err());

        tx.merchant_canonical = "Acme Corp".to_string();
        tx.confidence = 1.2;
        assert!(tx.validate().is_err());
    }
}
