use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::RecordType;
use crate::models::FinanceRecord;

use super::appointment::parse_amount;
use super::{parse_datetime, DATE_FMT, DATETIME_FMT};

pub fn insert_finance_record(
    conn: &Connection,
    record: &FinanceRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO finance_records (id, record_type, date, amount, category,
         description, appointment_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id.to_string(),
            record.record_type.as_str(),
            record.date.to_string(),
            record.amount.to_string(),
            record.category,
            record.description,
            record.appointment_id.map(|id| id.to_string()),
            record.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_finance_record(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<FinanceRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_type, date, amount, category, description, appointment_id, created_at
         FROM finance_records WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], map_record_row);

    match result {
        Ok(row) => Ok(Some(record_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ledger lines generated by a specific appointment.
pub fn records_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<FinanceRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_type, date, amount, category, description, appointment_id, created_at
         FROM finance_records WHERE appointment_id = ?1",
    )?;

    let rows = stmt.query_map(params![appointment_id.to_string()], map_record_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

/// Records dated within [start, end] (inclusive), newest first.
pub fn list_records_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<FinanceRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, record_type, date, amount, category, description, appointment_id, created_at
         FROM finance_records
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date DESC, created_at DESC",
    )?;

    let rows = stmt.query_map(params![start.to_string(), end.to_string()], map_record_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

/// Amounts of one record type within [start, end]. Summation happens in
/// decimal arithmetic on the caller's side, not in SQLite floats.
pub fn amounts_between(
    conn: &Connection,
    record_type: RecordType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Decimal>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM finance_records
         WHERE record_type = ?1 AND date BETWEEN ?2 AND ?3",
    )?;

    let rows = stmt.query_map(
        params![record_type.as_str(), start.to_string(), end.to_string()],
        |row| row.get::<_, String>(0),
    )?;

    let mut amounts = Vec::new();
    for row in rows {
        amounts.push(parse_amount(&row?)?);
    }
    Ok(amounts)
}

/// All amounts of one record type, no date bound.
pub fn all_amounts(
    conn: &Connection,
    record_type: RecordType,
) -> Result<Vec<Decimal>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT amount FROM finance_records WHERE record_type = ?1")?;

    let rows = stmt.query_map(params![record_type.as_str()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut amounts = Vec::new();
    for row in rows {
        amounts.push(parse_amount(&row?)?);
    }
    Ok(amounts)
}

/// Every dated income amount, for monthly grouping.
pub fn income_by_date(conn: &Connection) -> Result<Vec<(NaiveDate, Decimal)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT date, amount FROM finance_records WHERE record_type = 'income' ORDER BY date",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut amounts = Vec::new();
    for row in rows {
        let (date, amount) = row?;
        let date = NaiveDate::parse_from_str(&date, DATE_FMT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
        amounts.push((date, parse_amount(&amount)?));
    }
    Ok(amounts)
}

// Internal row type for FinanceRecord mapping
struct RecordRow {
    id: String,
    record_type: String,
    date: String,
    amount: String,
    category: String,
    description: String,
    appointment_id: Option<String>,
    created_at: String,
}

fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        record_type: row.get(1)?,
        date: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        appointment_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn record_from_row(row: RecordRow) -> Result<FinanceRecord, DatabaseError> {
    Ok(FinanceRecord {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        record_type: RecordType::from_str(&row.record_type)?,
        date: NaiveDate::parse_from_str(&row.date, DATE_FMT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        amount: parse_amount(&row.amount)?,
        category: row.category,
        description: row.description,
        appointment_id: row.appointment_id.and_then(|s| Uuid::parse_str(&s).ok()),
        created_at: parse_datetime(&row.created_at),
    })
}
