//! Finance endpoints: the period dashboard and manual ledger entries.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::finance::{finance_overview, FinanceOverview, Period};
use crate::models::enums::RecordType;
use crate::models::FinanceRecord;

#[derive(Deserialize)]
pub struct OverviewParams {
    pub period: Option<String>,
}

/// `GET /api/finance?period=day|week|month|quarter` — sums, ledger lines
/// and chart datasets for the chosen period. Unknown periods fall back to
/// the month preset.
pub async fn overview(
    State(ctx): State<ApiContext>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<FinanceOverview>, ApiError> {
    let period = Period::from_param(params.period.as_deref().unwrap_or("month"));
    let today = chrono::Local::now().date_naive();

    let conn = ctx.state.open_db()?;
    Ok(Json(finance_overview(&conn, today, period)?))
}

/// Manual ledger entry — typically an expense; appointment income arrives
/// through the booking flow instead.
#[derive(Deserialize)]
pub struct RecordForm {
    pub record_type: RecordType,
    pub date: String,
    pub amount: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// `POST /api/finance/records` — add a ledger line.
pub async fn create_record(
    State(ctx): State<ApiContext>,
    Json(form): Json<RecordForm>,
) -> Result<Json<FinanceRecord>, ApiError> {
    if form.category.trim().is_empty() {
        return Err(ApiError::Validation("קטגוריה היא שדה חובה".into()));
    }
    let date = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("תאריך לא תקין".into()))?;
    let amount = Decimal::from_str(form.amount.trim())
        .map_err(|_| ApiError::Validation("סכום לא תקין".into()))?;

    let record = FinanceRecord {
        id: Uuid::new_v4(),
        record_type: form.record_type,
        date,
        amount,
        category: form.category.trim().to_string(),
        description: form.description,
        appointment_id: None,
        created_at: chrono::Local::now().naive_local(),
    };

    let conn = ctx.state.open_db()?;
    db::insert_finance_record(&conn, &record)?;

    Ok(Json(record))
}
