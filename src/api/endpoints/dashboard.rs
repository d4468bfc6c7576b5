//! Dashboard endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{fetch_dashboard, DashboardData};

/// `GET /api/dashboard` — today's schedule, week income, zodiac cards.
pub async fn show(State(ctx): State<ApiContext>) -> Result<Json<DashboardData>, ApiError> {
    let conn = ctx.state.open_db()?;
    let today = chrono::Local::now().date_naive();
    let data = fetch_dashboard(&conn, today)?;
    Ok(Json(data))
}
