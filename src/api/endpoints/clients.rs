//! Client endpoints: list/search, create, detail, edit, delete, and the
//! health-questionnaire submission.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{Appointment, Client, HealthDeclaration};

const REQUIRED_FIELDS_MSG: &str = "שם וטלפון הם שדות חובה";

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<Client>,
}

/// `GET /api/clients` — all clients, name order; optional substring search.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<ClientsResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let clients = match params.search.as_deref() {
        Some(term) if !term.trim().is_empty() => db::search_clients(&conn, term.trim())?,
        _ => db::list_clients(&conn)?,
    };
    Ok(Json(ClientsResponse { clients }))
}

/// Create/edit form payload. Name and phone are required; everything else
/// is optional and tolerated in sloppy shapes (bad birth date → dropped).
#[derive(Deserialize)]
pub struct ClientForm {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl ClientForm {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() || self.phone.trim().is_empty() {
            return Err(ApiError::Validation(REQUIRED_FIELDS_MSG.into()));
        }
        Ok(())
    }

    fn parsed_birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    fn cleaned_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
    }
}

#[derive(Serialize)]
pub struct ClientCreatedResponse {
    pub ok: bool,
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

/// `POST /api/clients` — create a client.
///
/// The stored phone is digits-only regardless of input punctuation, and a
/// blank health declaration is ensured as part of the same operation.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(form): Json<ClientForm>,
) -> Result<Json<ClientCreatedResponse>, ApiError> {
    form.validate()?;

    let conn = ctx.state.open_db()?;
    let now = chrono::Local::now().naive_local();
    let client = db::new_client(
        form.name.trim().to_string(),
        form.age,
        form.parsed_birth_date(),
        &form.phone,
        form.cleaned_email(),
        form.notes.clone(),
        now,
    );
    db::insert_client(&conn, &client)?;
    db::ensure_health_declaration(&conn, &client.id, now)?;

    tracing::info!(client_id = %client.id, "client created");

    Ok(Json(ClientCreatedResponse {
        ok: true,
        id: client.id,
        name: client.name,
        phone: client.phone,
    }))
}

#[derive(Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ClientDetailResponse {
    pub client: Client,
    pub whatsapp: String,
    pub appointments: Vec<AppointmentView>,
    pub health_declaration: Option<HealthDeclaration>,
}

/// `GET /api/clients/:id` — client card with visit history.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientDetailResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let client = db::get_client(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?;

    let now = chrono::Local::now().naive_local();
    let appointments = db::list_appointments_for_client(&conn, &id)?
        .into_iter()
        .map(|appointment| AppointmentView {
            status: appointment.status_at(now).label(),
            appointment,
        })
        .collect();

    let health_declaration = db::get_health_declaration(&conn, &id)?;
    let whatsapp = client.whatsapp_number();

    Ok(Json(ClientDetailResponse {
        client,
        whatsapp,
        appointments,
        health_declaration,
    }))
}

/// `POST /api/clients/:id` — edit a client, same validation as create.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(form): Json<ClientForm>,
) -> Result<Json<ClientCreatedResponse>, ApiError> {
    form.validate()?;

    let conn = ctx.state.open_db()?;
    let mut client = db::get_client(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?;

    client.name = form.name.trim().to_string();
    client.phone = crate::models::client::normalize_phone(&form.phone);
    client.age = form.age;
    client.birth_date = form.parsed_birth_date();
    client.email = form.cleaned_email();
    client.notes = form.notes;
    db::update_client(&conn, &client)?;
    db::ensure_health_declaration(&conn, &id, chrono::Local::now().naive_local())?;

    Ok(Json(ClientCreatedResponse {
        ok: true,
        id: client.id,
        name: client.name,
        phone: client.phone,
    }))
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// `POST /api/clients/:id/delete` — delete a client and (by cascade) her
/// appointments.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    db::get_client(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?;
    db::delete_client(&conn, &id)?;

    tracing::info!(client_id = %id, "client deleted");
    Ok(Json(OkResponse { ok: true }))
}

/// `POST /api/clients/:id/health` — submit the health questionnaire.
///
/// The submitting address is taken from `X-Forwarded-For` when present.
pub async fn submit_health(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(answers): Json<db::QuestionnaireAnswers>,
) -> Result<Json<OkResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    db::get_client(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?;

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from);

    db::ensure_health_declaration(&conn, &id, chrono::Local::now().naive_local())?;
    db::submit_health_declaration(&conn, &id, &answers, ip.as_deref())?;

    Ok(Json(OkResponse { ok: true }))
}
