//! Admin configuration endpoint — serves the declarative registry the
//! generic record-administration screens render from.

use axum::Json;
use serde::Serialize;

use crate::admin::{EntityAdmin, SiteConfig, REGISTRY, SITE};

#[derive(Serialize)]
pub struct AdminConfigResponse {
    pub site: SiteConfig,
    pub entities: &'static [EntityAdmin],
}

/// `GET /api/admin/config`
pub async fn config() -> Json<AdminConfigResponse> {
    Json(AdminConfigResponse {
        site: SITE,
        entities: REGISTRY,
    })
}
