use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::PersonalEvent;

use super::{parse_datetime, DATETIME_FMT};

pub fn insert_personal_event(
    conn: &Connection,
    event: &PersonalEvent,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO personal_events (id, title, start_time, end_time, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.id.to_string(),
            event.title,
            event.start_time.format(DATETIME_FMT).to_string(),
            event.end_time.map(|t| t.format(DATETIME_FMT).to_string()),
            event.notes,
            event.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_personal_event(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<PersonalEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, start_time, end_time, notes, created_at
         FROM personal_events WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], map_event_row);

    match result {
        Ok(row) => Ok(Some(event_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_personal_event(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM personal_events WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

/// Events starting within [start, end] (inclusive), earliest first.
pub fn list_events_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PersonalEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, start_time, end_time, notes, created_at
         FROM personal_events
         WHERE date(start_time) BETWEEN ?1 AND ?2
         ORDER BY start_time",
    )?;

    let rows = stmt.query_map(params![start.to_string(), end.to_string()], map_event_row)?;

    let mut events = Vec::new();
    for row in rows {
        events.push(event_from_row(row?)?);
    }
    Ok(events)
}

// Internal row type for PersonalEvent mapping
struct EventRow {
    id: String,
    title: String,
    start_time: String,
    end_time: Option<String>,
    notes: String,
    created_at: String,
}

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn event_from_row(row: EventRow) -> Result<PersonalEvent, DatabaseError> {
    Ok(PersonalEvent {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        title: row.title,
        start_time: parse_datetime(&row.start_time),
        end_time: row.end_time.map(|t| parse_datetime(&t)),
        notes: row.notes,
        created_at: parse_datetime(&row.created_at),
    })
}
