use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::RecordType;

/// A ledger line — income or expense, optionally linked to the
/// appointment that generated it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub id: Uuid,
    pub record_type: RecordType,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub appointment_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}
