//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Mutations ride on POST, mirroring the
//! form-driven surface of the practice app; request logging comes from
//! `tower-http`'s `TraceLayer`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the API router with all practice endpoints under `/api/`.
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dashboard", get(endpoints::dashboard::show))
        .route(
            "/clients",
            get(endpoints::clients::list).post(endpoints::clients::create),
        )
        .route(
            "/clients/:id",
            get(endpoints::clients::detail).post(endpoints::clients::edit),
        )
        .route("/clients/:id/delete", post(endpoints::clients::delete))
        .route("/clients/:id/health", post(endpoints::clients::submit_health))
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/events",
            get(endpoints::events::list).post(endpoints::events::create),
        )
        .route("/finance", get(endpoints::finance::overview))
        .route("/finance/records", post(endpoints::finance::create_record))
        .route("/chat", post(endpoints::chat::ask))
        .route("/chat/examples", get(endpoints::chat::examples))
        .route("/admin/config", get(endpoints::admin::config))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    /// Router backed by a fresh on-disk database. The tempdir guard must
    /// stay alive for the duration of the test.
    fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::with_db_path(dir.path().join("test.db")));
        (api_router(state), dir)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (app, _dir) = test_app();
        let response = app.oneshot(get_req("/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let (app, _dir) = test_app();
        let response = app.oneshot(get_req("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn client_create_normalizes_phone_and_lists() {
        let (app, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/clients",
                json!({"name": "דנה לוי", "phone": "050-123-4567", "age": 30}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created = body_json(response).await;
        assert_eq!(created["ok"], true);
        assert_eq!(created["phone"], "0501234567");

        let response = app.oneshot(get_req("/api/clients")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["clients"].as_array().unwrap().len(), 1);
        assert_eq!(json["clients"][0]["name"], "דנה לוי");
    }

    #[tokio::test]
    async fn client_create_requires_name_and_phone() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(post_json("/api/clients", json!({"name": "", "phone": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION");
        assert_eq!(json["error"]["message"], "שם וטלפון הם שדות חובה");
    }

    #[tokio::test]
    async fn client_detail_carries_whatsapp_and_declaration() {
        let (app, _dir) = test_app();

        let created = body_json(
            app.clone()
                .oneshot(post_json(
                    "/api/clients",
                    json!({"name": "דנה לוי", "phone": "0501234567"}),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(get_req(&format!("/api/clients/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["whatsapp"], "972501234567");
        assert!(json["health_declaration"].is_object());
        assert_eq!(json["health_declaration"]["submitted"], false);
        assert_eq!(json["appointments"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_client_detail_is_404() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(get_req(&format!("/api/clients/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_creates_appointment_and_ledger_line() {
        let (app, _dir) = test_app();

        let created = body_json(
            app.clone()
                .oneshot(post_json(
                    "/api/clients",
                    json!({"name": "דנה לוי", "phone": "0501234567"}),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/appointments",
                json!({
                    "client_id": id,
                    "service_type": "gel",
                    "price": "180",
                    "date": "2024-05-07",
                    "time": "10:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["appointment"]["duration_minutes"], 60);
        assert_eq!(json["finance_record"]["record_type"], "income");
        assert_eq!(json["finance_record"]["amount"], "180");
        assert_eq!(json["finance_record"]["date"], "2024-05-07");
        assert_eq!(
            json["finance_record"]["appointment_id"],
            json["appointment"]["id"]
        );

        // Visible on the client's card
        let detail = body_json(
            app.oneshot(get_req(&format!("/api/clients/{id}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(detail["appointments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn booking_for_unknown_client_is_404() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(post_json(
                "/api/appointments",
                json!({
                    "client_id": uuid::Uuid::new_v4(),
                    "service_type": "face",
                    "price": "350",
                    "date": "2024-05-07",
                    "time": "10:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_schedule_date_falls_back_to_today() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(get_req("/api/appointments?date=not-a-date"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let today = chrono::Local::now().date_naive().to_string();
        assert_eq!(json["selected_date"], today);
    }

    #[tokio::test]
    async fn unknown_finance_period_defaults_to_month() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(get_req("/api/finance?period=fortnight"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["period"], "month");
        assert_eq!(json["income"], "0");
        assert_eq!(json["expenses"], "0");
    }

    #[tokio::test]
    async fn chat_answers_client_count() {
        let (app, _dir) = test_app();

        for (name, phone) in [("דנה לוי", "0501111111"), ("שרה כהן", "0502222222")] {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/api/clients",
                    json!({"name": name, "phone": phone}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(post_json("/api/chat", json!({"question": "כמה לקוחות יש לי?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["answer"], "יש לך 2 לקוחות רשומות במערכת.");

        let empty = app
            .oneshot(post_json("/api/chat", json!({"question": "   "})))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_examples_are_served() {
        let (app, _dir) = test_app();
        let response = app.oneshot(get_req("/api/chat/examples")).await.unwrap();
        let json = body_json(response).await;
        let examples = json["examples"].as_array().unwrap();
        assert!(examples.len() >= 9);
    }

    #[tokio::test]
    async fn event_creation_validates_title() {
        let (app, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/events",
                json!({"title": "", "start_time": "2024-05-07 09:00"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json(
                "/api/events",
                json!({"title": "יום עיון", "start_time": "2024-05-07 09:00"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["title"], "יום עיון");
    }

    #[tokio::test]
    async fn admin_config_lists_all_entities() {
        let (app, _dir) = test_app();
        let response = app.oneshot(get_req("/api/admin/config")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["entities"].as_array().unwrap().len(), 5);
        assert_eq!(json["site"]["title"], "GlowDesk");
    }
}
