use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{RecordType, ServiceType};
use crate::models::{Appointment, FinanceRecord};

use super::{parse_datetime, DATETIME_FMT};

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, client_id, service_type, price, start_time,
         duration_minutes, notes, is_completed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.id.to_string(),
            appt.client_id.to_string(),
            appt.service_type.as_str(),
            appt.price.to_string(),
            appt.start_time.format(DATETIME_FMT).to_string(),
            appt.duration_minutes,
            appt.notes,
            appt.is_completed as i32,
        ],
    )?;
    Ok(())
}

/// Book an appointment: the appointment row and its income ledger line are
/// written in one transaction — either both land or neither does.
pub fn book_appointment(
    conn: &mut Connection,
    appt: &Appointment,
    client_name: &str,
    now: NaiveDateTime,
) -> Result<FinanceRecord, DatabaseError> {
    let record = FinanceRecord {
        id: Uuid::new_v4(),
        record_type: RecordType::Income,
        date: appt.start_time.date(),
        amount: appt.price,
        category: "טיפול לקוחה".to_string(),
        description: format!(
            "תשלום עבור {} - {}",
            appt.service_type.label(),
            client_name
        ),
        appointment_id: Some(appt.id),
        created_at: now,
    };

    let tx = conn.transaction()?;
    insert_appointment(&tx, appt)?;
    super::finance::insert_finance_record(&tx, &record)?;
    tx.commit()?;

    Ok(record)
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, service_type, price, start_time, duration_minutes, notes, is_completed
         FROM appointments WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], map_appointment_row);

    match result {
        Ok(row) => Ok(Some(appointment_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

/// An appointment joined with the owning client's name, for day and week
/// schedule listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AppointmentWithClient {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
}

/// Appointments starting on the given day, earliest first.
pub fn list_appointments_on(
    conn: &Connection,
    day: NaiveDate,
) -> Result<Vec<AppointmentWithClient>, DatabaseError> {
    list_appointments_between(conn, day, day)
}

/// Appointments starting within [start, end] (inclusive), earliest first.
pub fn list_appointments_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AppointmentWithClient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.client_id, a.service_type, a.price, a.start_time,
                a.duration_minutes, a.notes, a.is_completed, c.name
         FROM appointments a
         JOIN clients c ON c.id = a.client_id
         WHERE date(a.start_time) BETWEEN ?1 AND ?2
         ORDER BY a.start_time",
    )?;

    let rows = stmt.query_map(params![start.to_string(), end.to_string()], |row| {
        Ok((map_appointment_row(row)?, row.get::<_, String>(8)?))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (appt_row, client_name) = row?;
        appointments.push(AppointmentWithClient {
            appointment: appointment_from_row(appt_row)?,
            client_name,
        });
    }
    Ok(appointments)
}

/// All appointments for one client, newest first (client detail page).
pub fn list_appointments_for_client(
    conn: &Connection,
    client_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, service_type, price, start_time, duration_minutes, notes, is_completed
         FROM appointments WHERE client_id = ?1 ORDER BY start_time DESC",
    )?;

    let rows = stmt.query_map(params![client_id.to_string()], map_appointment_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row?)?);
    }
    Ok(appointments)
}

/// Most recent appointment for any client whose name contains the fragment.
/// Returns the appointment together with the full client name.
pub fn latest_appointment_for_client_name(
    conn: &Connection,
    name_fragment: &str,
) -> Result<Option<(Appointment, String)>, DatabaseError> {
    let like = format!("%{name_fragment}%");
    let mut stmt = conn.prepare(
        "SELECT a.id, a.client_id, a.service_type, a.price, a.start_time,
                a.duration_minutes, a.notes, a.is_completed, c.name
         FROM appointments a
         JOIN clients c ON c.id = a.client_id
         WHERE c.name LIKE ?1
         ORDER BY a.start_time DESC
         LIMIT 1",
    )?;

    let result = stmt.query_row(params![like], |row| {
        Ok((map_appointment_row(row)?, row.get::<_, String>(8)?))
    });

    match result {
        Ok((row, name)) => Ok(Some((appointment_from_row(row)?, name))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_appointments(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_appointments_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date(start_time) BETWEEN ?1 AND ?2",
        params![start.to_string(), end.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_appointments_for_client(
    conn: &Connection,
    client_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE client_id = ?1",
        params![client_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_by_service(conn: &Connection, service: ServiceType) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE service_type = ?1",
        params![service.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_by_service_between(
    conn: &Connection,
    service: ServiceType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE service_type = ?1 AND date(start_time) BETWEEN ?2 AND ?3",
        params![service.as_str(), start.to_string(), end.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Per-service appointment counts over all time (finance chart data).
pub fn service_counts(conn: &Connection) -> Result<Vec<(ServiceType, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT service_type, COUNT(*) FROM appointments GROUP BY service_type",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = Vec::new();
    for row in rows {
        let (service, count) = row?;
        counts.push((ServiceType::from_str(&service)?, count));
    }
    Ok(counts)
}

/// The client with the most appointments. Ties resolved by client id so the
/// answer is stable across runs.
pub fn most_frequent_client(conn: &Connection) -> Result<Option<(String, i64)>, DatabaseError> {
    let result = conn.query_row(
        "SELECT c.name, COUNT(a.id) AS visits
         FROM clients c
         JOIN appointments a ON a.client_id = c.id
         GROUP BY c.id
         ORDER BY visits DESC, c.id ASC
         LIMIT 1",
        [],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
    );

    match result {
        Ok(pair) => Ok(Some(pair)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// (client id, client name, appointment price) for every appointment.
/// Revenue ranking folds these with exact decimal arithmetic.
pub fn appointment_client_prices(
    conn: &Connection,
) -> Result<Vec<(Uuid, String, Decimal)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, a.price
         FROM appointments a
         JOIN clients c ON c.id = a.client_id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut prices = Vec::new();
    for row in rows {
        let (id, name, price) = row?;
        prices.push((
            Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            name,
            parse_amount(&price)?,
        ));
    }
    Ok(prices)
}

/// All (service, price) pairs, for revenue-by-service totals.
pub fn service_prices(conn: &Connection) -> Result<Vec<(ServiceType, Decimal)>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT service_type, price FROM appointments")?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut prices = Vec::new();
    for row in rows {
        let (service, price) = row?;
        prices.push((ServiceType::from_str(&service)?, parse_amount(&price)?));
    }
    Ok(prices)
}

pub(super) fn parse_amount(raw: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(raw).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

// Internal row type for Appointment mapping
struct AppointmentRow {
    id: String,
    client_id: String,
    service_type: String,
    price: String,
    start_time: String,
    duration_minutes: u32,
    notes: String,
    is_completed: i32,
}

fn map_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        service_type: row.get(2)?,
        price: row.get(3)?,
        start_time: row.get(4)?,
        duration_minutes: row.get(5)?,
        notes: row.get(6)?,
        is_completed: row.get(7)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        client_id: Uuid::parse_str(&row.client_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        service_type: ServiceType::from_str(&row.service_type)?,
        price: parse_amount(&row.price)?,
        start_time: parse_datetime(&row.start_time),
        duration_minutes: row.duration_minutes,
        notes: row.notes,
        is_completed: row.is_completed != 0,
    })
}
