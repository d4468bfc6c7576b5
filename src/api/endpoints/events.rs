//! Personal calendar events — blocks on the schedule unrelated to clients.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::finance;
use crate::models::PersonalEvent;

#[derive(Deserialize)]
pub struct ListParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub events: Vec<PersonalEvent>,
}

/// `GET /api/events?from=..&to=..` — events in a range, defaulting to the
/// current week.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<EventsResponse>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let (week_start, week_end) = finance::week_bounds(today);

    let parse = |raw: Option<&str>, fallback: NaiveDate| {
        raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .unwrap_or(fallback)
    };
    let from = parse(params.from.as_deref(), week_start);
    let to = parse(params.to.as_deref(), week_end);

    let conn = ctx.state.open_db()?;
    Ok(Json(EventsResponse {
        from,
        to,
        events: db::list_events_between(&conn, from, to)?,
    }))
}

#[derive(Deserialize)]
pub struct EventForm {
    pub title: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// `POST /api/events` — create a calendar block.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(form): Json<EventForm>,
) -> Result<Json<PersonalEvent>, ApiError> {
    if form.title.trim().is_empty() {
        return Err(ApiError::Validation("כותרת היא שדה חובה".into()));
    }

    let parse = |raw: &str| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M");
    let start_time = parse(&form.start_time)
        .map_err(|_| ApiError::Validation("זמן התחלה לא תקין".into()))?;
    let end_time = match form.end_time.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => {
            Some(parse(raw).map_err(|_| ApiError::Validation("זמן סיום לא תקין".into()))?)
        }
        None => None,
    };

    let event = PersonalEvent {
        id: Uuid::new_v4(),
        title: form.title.trim().to_string(),
        start_time,
        end_time,
        notes: form.notes,
        created_at: chrono::Local::now().naive_local(),
    };

    let conn = ctx.state.open_db()?;
    db::insert_personal_event(&conn, &event)?;

    Ok(Json(event))
}
