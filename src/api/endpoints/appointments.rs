//! Appointment endpoints: the day/week schedule and the booking operation.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::{self, AppointmentWithClient};
use crate::finance;
use crate::models::appointment::DEFAULT_DURATION_MINUTES;
use crate::models::enums::ServiceType;
use crate::models::{Appointment, Client, FinanceRecord, PersonalEvent};

#[derive(Deserialize)]
pub struct ListParams {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub selected_date: NaiveDate,
    pub appointments: Vec<AppointmentWithClient>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_appointments: Vec<AppointmentWithClient>,
    pub personal_events: Vec<PersonalEvent>,
    pub clients: Vec<Client>,
}

/// `GET /api/appointments?date=YYYY-MM-DD` — the schedule around one day.
///
/// A missing or malformed `date` silently falls back to today.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let selected_date = params
        .date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(today);

    let conn = ctx.state.open_db()?;
    let (week_start, week_end) = finance::week_bounds(selected_date);

    Ok(Json(ScheduleResponse {
        selected_date,
        appointments: db::list_appointments_on(&conn, selected_date)?,
        week_start,
        week_end,
        week_appointments: db::list_appointments_between(&conn, week_start, week_end)?,
        personal_events: db::list_events_between(&conn, week_start, week_end)?,
        clients: db::list_clients(&conn)?,
    }))
}

/// Booking form. Price and the start instant arrive as strings, exactly as
/// the booking form posts them.
#[derive(Deserialize)]
pub struct BookingForm {
    pub client_id: Uuid,
    pub service_type: ServiceType,
    pub price: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub appointment: Appointment,
    pub finance_record: FinanceRecord,
}

/// `POST /api/appointments` — book an appointment.
///
/// Atomically writes the appointment and its income ledger line; a failure
/// in either leaves no trace of the other.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(form): Json<BookingForm>,
) -> Result<Json<BookingResponse>, ApiError> {
    let price = Decimal::from_str(form.price.trim())
        .map_err(|_| ApiError::Validation("מחיר לא תקין".into()))?;
    let start_time =
        NaiveDateTime::parse_from_str(&format!("{} {}", form.date, form.time), "%Y-%m-%d %H:%M")
            .map_err(|_| ApiError::Validation("תאריך או שעה לא תקינים".into()))?;

    let mut conn = ctx.state.open_db()?;
    let client = db::get_client(&conn, &form.client_id)?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        client_id: client.id,
        service_type: form.service_type,
        price,
        start_time,
        duration_minutes: form.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
        notes: form.notes,
        is_completed: false,
    };

    let now = chrono::Local::now().naive_local();
    let finance_record = db::book_appointment(&mut conn, &appointment, &client.name, now)?;

    tracing::info!(
        appointment_id = %appointment.id,
        client = %client.name,
        service = appointment.service_type.as_str(),
        "appointment booked"
    );

    Ok(Json(BookingResponse {
        appointment,
        finance_record,
    }))
}
