use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar block unrelated to clients (day off, supplier visit, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalEvent {
    pub id: Uuid,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub notes: String,
    pub created_at: NaiveDateTime,
}
