use axum::middleware::from_fn;
use axum::routing::{delete, patch, post};
use axum::{Router, routing::get};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::middlewares::authn;
use super::state::AppState;
use crate::prelude::Result;

pub fn build_routes() -> Result<Router> {
    let state = AppState::new()?;
    let app = Router::new()
        .route("/jobs", post(handlers::jobs::create))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/{id}", get(handlers::jobs::get_by_id))
        .route("/jobs/{id}", patch(handlers::jobs::update))
        .route("/jobs/{id}", delete(handlers::jobs::remove))
        .layer(from_fn(authn::authenticate))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
