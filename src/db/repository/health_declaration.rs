use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::HealthDeclaration;

use super::{parse_datetime, DATETIME_FMT};

/// Answers to the fixed questionnaire, submitted by the client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct QuestionnaireAnswers {
    pub has_allergies: bool,
    pub has_skin_conditions: bool,
    pub takes_medications: bool,
    pub is_pregnant: bool,
    #[serde(default)]
    pub notes: String,
}

/// Ensure a blank declaration row exists for the client.
///
/// Called at the client-creation boundary so every client invariantly owns
/// exactly one declaration. Returns the existing or freshly created row.
pub fn ensure_health_declaration(
    conn: &Connection,
    client_id: &Uuid,
    now: NaiveDateTime,
) -> Result<HealthDeclaration, DatabaseError> {
    if let Some(existing) = get_health_declaration(conn, client_id)? {
        return Ok(existing);
    }

    let declaration = HealthDeclaration {
        id: Uuid::new_v4(),
        client_id: *client_id,
        has_allergies: false,
        has_skin_conditions: false,
        takes_medications: false,
        is_pregnant: false,
        notes: String::new(),
        submitted: false,
        created_at: now,
        ip_address: None,
    };

    conn.execute(
        "INSERT INTO health_declarations (id, client_id, has_allergies, has_skin_conditions,
         takes_medications, is_pregnant, notes, submitted, created_at, ip_address)
         VALUES (?1, ?2, 0, 0, 0, 0, '', 0, ?3, NULL)",
        params![
            declaration.id.to_string(),
            declaration.client_id.to_string(),
            declaration.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;

    Ok(declaration)
}

pub fn get_health_declaration(
    conn: &Connection,
    client_id: &Uuid,
) -> Result<Option<HealthDeclaration>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, has_allergies, has_skin_conditions, takes_medications,
         is_pregnant, notes, submitted, created_at, ip_address
         FROM health_declarations WHERE client_id = ?1",
    )?;

    let result = stmt.query_row(params![client_id.to_string()], map_declaration_row);

    match result {
        Ok(row) => Ok(Some(declaration_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Record a questionnaire submission, stamping the submitting IP.
pub fn submit_health_declaration(
    conn: &Connection,
    client_id: &Uuid,
    answers: &QuestionnaireAnswers,
    ip_address: Option<&str>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE health_declarations
         SET has_allergies = ?2, has_skin_conditions = ?3, takes_medications = ?4,
             is_pregnant = ?5, notes = ?6, submitted = 1, ip_address = ?7
         WHERE client_id = ?1",
        params![
            client_id.to_string(),
            answers.has_allergies as i32,
            answers.has_skin_conditions as i32,
            answers.takes_medications as i32,
            answers.is_pregnant as i32,
            answers.notes,
            ip_address,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "health_declaration".into(),
            id: client_id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for HealthDeclaration mapping
struct DeclarationRow {
    id: String,
    client_id: String,
    has_allergies: i32,
    has_skin_conditions: i32,
    takes_medications: i32,
    is_pregnant: i32,
    notes: String,
    submitted: i32,
    created_at: String,
    ip_address: Option<String>,
}

fn map_declaration_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeclarationRow> {
    Ok(DeclarationRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        has_allergies: row.get(2)?,
        has_skin_conditions: row.get(3)?,
        takes_medications: row.get(4)?,
        is_pregnant: row.get(5)?,
        notes: row.get(6)?,
        submitted: row.get(7)?,
        created_at: row.get(8)?,
        ip_address: row.get(9)?,
    })
}

fn declaration_from_row(row: DeclarationRow) -> Result<HealthDeclaration, DatabaseError> {
    Ok(HealthDeclaration {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        client_id: Uuid::parse_str(&row.client_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        has_allergies: row.has_allergies != 0,
        has_skin_conditions: row.has_skin_conditions != 0,
        takes_medications: row.takes_medications != 0,
        is_pregnant: row.is_pregnant != 0,
        notes: row.notes,
        submitted: row.submitted != 0,
        created_at: parse_datetime(&row.created_at),
        ip_address: row.ip_address,
    })
}
