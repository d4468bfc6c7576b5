use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Client;

use super::{parse_datetime, DATE_FMT};

pub fn insert_client(conn: &Connection, client: &Client) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clients (id, name, age, birth_date, phone, email, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            client.id.to_string(),
            client.name,
            client.age,
            client.birth_date.map(|d| d.to_string()),
            client.phone,
            client.email,
            client.notes,
            client.created_at.format(super::DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_client(conn: &Connection, id: &Uuid) -> Result<Option<Client>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, birth_date, phone, email, notes, created_at
         FROM clients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], map_client_row);

    match result {
        Ok(row) => Ok(Some(client_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_client(conn: &Connection, client: &Client) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE clients SET name = ?2, age = ?3, birth_date = ?4, phone = ?5,
         email = ?6, notes = ?7 WHERE id = ?1",
        params![
            client.id.to_string(),
            client.name,
            client.age,
            client.birth_date.map(|d| d.to_string()),
            client.phone,
            client.email,
            client.notes,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "client".into(),
            id: client.id.to_string(),
        });
    }
    Ok(())
}

/// Delete a client. Appointments cascade; linked ledger lines keep their
/// amounts with the appointment reference nulled.
pub fn delete_client(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM clients WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

pub fn list_clients(conn: &Connection) -> Result<Vec<Client>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, birth_date, phone, email, notes, created_at
         FROM clients ORDER BY name",
    )?;

    let rows = stmt.query_map([], map_client_row)?;

    let mut clients = Vec::new();
    for row in rows {
        clients.push(client_from_row(row?)?);
    }
    Ok(clients)
}

/// Substring search over name, phone and email (the admin search fields).
pub fn search_clients(conn: &Connection, term: &str) -> Result<Vec<Client>, DatabaseError> {
    let like = format!("%{term}%");
    let mut stmt = conn.prepare(
        "SELECT id, name, age, birth_date, phone, email, notes, created_at
         FROM clients
         WHERE name LIKE ?1 OR phone LIKE ?1 OR email LIKE ?1
         ORDER BY name",
    )?;

    let rows = stmt.query_map(params![like], map_client_row)?;

    let mut clients = Vec::new();
    for row in rows {
        clients.push(client_from_row(row?)?);
    }
    Ok(clients)
}

pub fn count_clients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
    Ok(count)
}

// Internal row type for Client mapping
struct ClientRow {
    id: String,
    name: String,
    age: Option<u32>,
    birth_date: Option<String>,
    phone: String,
    email: Option<String>,
    notes: String,
    created_at: String,
}

fn map_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        birth_date: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn client_from_row(row: ClientRow) -> Result<Client, DatabaseError> {
    Ok(Client {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        age: row.age,
        birth_date: row
            .birth_date
            .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
        phone: row.phone,
        email: row.email,
        notes: row.notes,
        created_at: parse_datetime(&row.created_at),
    })
}

/// Build a fresh client from validated form input, normalizing the phone.
pub fn new_client(
    name: String,
    age: Option<u32>,
    birth_date: Option<NaiveDate>,
    phone: &str,
    email: Option<String>,
    notes: String,
    now: NaiveDateTime,
) -> Client {
    Client {
        id: Uuid::new_v4(),
        name,
        age,
        birth_date,
        phone: crate::models::client::normalize_phone(phone),
        email,
        notes,
        created_at: now,
    }
}
