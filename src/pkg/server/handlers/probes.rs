use axum::{Json, extract::State};
use serde_json::{Value, json};
use sqlx::query;

use crate::{pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Result<Json<Value>> {
    tracing::debug!("service is live");
    Ok(Json(json!({"status": "live"})))
}

pub async fn healthz(State(state): State<AppState>) -> Result<Json<Value>> {
    query("SELECT 1").execute(&*state.db_pool).await?;
    tracing::debug!("database reachable, service is healthy");
    Ok(Json(json!({"status": "healthy"})))
}
