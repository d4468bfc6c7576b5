use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed medical questionnaire, one per client.
///
/// The row is created together with the client; `submitted` flips when the
/// client actually fills the form, and the audit fields record when and
/// from where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDeclaration {
    pub id: Uuid,
    pub client_id: Uuid,
    pub has_allergies: bool,
    pub has_skin_conditions: bool,
    pub takes_medications: bool,
    pub is_pregnant: bool,
    pub notes: String,
    pub submitted: bool,
    pub created_at: NaiveDateTime,
    pub ip_address: Option<String>,
}
