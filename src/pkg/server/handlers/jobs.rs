use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::types::BigDecimal;
use validator::Validate;

use crate::{
    errors::{Error, validation_messages},
    pkg::internal::adaptors::jobs::{mutators::JobMutator, selectors::JobSelector},
    pkg::internal::sql::SqlValue,
    pkg::server::middlewares::authn::Admin,
    pkg::server::state::{AppState, GetConn},
    prelude::Result,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJobInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, message = "salary must be zero or greater"))]
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    #[validate(length(min = 1, message = "companyHandle must not be empty"))]
    pub company_handle: String,
}

impl CreateJobInput {
    pub fn check(&self) -> Result<()> {
        let mut messages = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errs) => validation_messages(&errs),
        };
        check_equity(&self.equity, &mut messages);
        fail_on(messages)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchJobInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0, message = "salary must be zero or greater"))]
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
}

impl PatchJobInput {
    pub fn check(&self) -> Result<()> {
        let mut messages = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errs) => validation_messages(&errs),
        };
        check_equity(&self.equity, &mut messages);
        fail_on(messages)
    }

    /// Field/value pairs in declaration order, ready for the partial
    /// update builder.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(("title", SqlValue::Text(title.clone())));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", SqlValue::Int(salary)));
        }
        if let Some(equity) = &self.equity {
            fields.push(("equity", SqlValue::Numeric(equity.clone())));
        }
        fields
    }
}

#[derive(Debug, Default, Validate)]
pub struct SearchJobsInput {
    pub title: Option<String>,
    #[validate(range(min = 0, message = "minSalary must be zero or greater"))]
    pub min_salary: Option<i32>,
    pub has_equity: bool,
}

impl SearchJobsInput {
    /// Coerces raw query params into filters. Coercion is total for
    /// the known keys: a non-numeric minSalary means no minimum, and
    /// hasEquity is true only for the literal "true". Keys outside the
    /// filter vocabulary are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        SearchJobsInput {
            title: params.get("title").cloned(),
            min_salary: params.get("minSalary").and_then(|raw| raw.parse().ok()),
            has_equity: params.get("hasEquity").is_some_and(|raw| raw == "true"),
        }
    }

    pub fn check(&self) -> Result<()> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errs) => fail_on(validation_messages(&errs)),
        }
    }
}

fn check_equity(equity: &Option<BigDecimal>, messages: &mut Vec<String>) {
    if let Some(equity) = equity {
        if *equity < BigDecimal::from(0) || *equity > BigDecimal::from(1) {
            messages.push("equity must be between 0 and 1".into());
        }
    }
}

fn fail_on(mut messages: Vec<String>) -> Result<()> {
    if messages.is_empty() {
        return Ok(());
    }
    messages.sort();
    Err(Error::Validation(messages))
}

/// Deserializes a body the extractor already accepted as JSON. Shape
/// violations (wrong types, unknown fields) report like any other
/// validation failure.
fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|err| Error::Validation(vec![err.to_string()]))
}

/// Unwraps the `Json` extractor, folding its rejections (syntactically
/// invalid JSON, missing content type) into the uniform error body
/// instead of axum's plain-text response.
fn json_body(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(Error::BadRequest(rejection.body_text())),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Admin(claims): Admin,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input: CreateJobInput = parse_body(json_body(body)?)?;
    input.check()?;
    let mut conn = state.db_pool.conn().await?;
    let job = JobMutator::new(&mut conn).create(&input).await?;
    tracing::info!("job {} created by {}", job.id, &claims.username);
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let filters = SearchJobsInput::from_query(&params);
    filters.check()?;
    let mut conn = state.db_pool.conn().await?;
    let jobs = JobSelector::new(&mut conn).get_all(&filters).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.conn().await?;
    let job = JobSelector::new(&mut conn).get_by_id(id).await?;
    Ok(Json(json!({ "job": job })))
}

pub async fn update(
    State(state): State<AppState>,
    Admin(claims): Admin,
    Path(id): Path<i32>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let input: PatchJobInput = parse_body(json_body(body)?)?;
    input.check()?;
    let mut conn = state.db_pool.conn().await?;
    let job = JobMutator::new(&mut conn).update(id, &input).await?;
    tracing::info!("job {} updated by {}", id, &claims.username);
    Ok(Json(json!({ "job": job })))
}

pub async fn remove(
    State(state): State<AppState>,
    Admin(claims): Admin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.conn().await?;
    JobMutator::new(&mut conn).delete(id).await?;
    tracing::info!("job {} deleted by {}", id, &claims.username);
    Ok(Json(json!({ "deleted": id })))
}
