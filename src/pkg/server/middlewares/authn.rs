use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    errors::Error,
    pkg::internal::auth::{Claims, decode_token},
    prelude::Result,
};

/// Decodes the bearer token, if any, and stashes its claims on the
/// request. A missing or bad token is not an error here: the request
/// carries on anonymously and the route guards decide what that means.
pub async fn authenticate(mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim);
    if let Some(token) = token {
        match decode_token(token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(err) => {
                tracing::debug!("ignoring invalid bearer token: {}", err);
            }
        }
    }
    next.run(request).await
}

/// Extractor for routes only admins may hit. Rejects with 401 when the
/// request is anonymous or its claims lack the admin flag.
#[derive(Debug)]
pub struct Admin(pub Claims);

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        match parts.extensions.get::<Claims>() {
            Some(claims) if claims.is_admin => Ok(Admin(claims.clone())),
            Some(claims) => {
                tracing::warn!("user {} denied admin access", &claims.username);
                Err(Error::Unauthorized("admin privileges required".into()))
            }
            None => {
                tracing::warn!("token missing, authentication denied");
                Err(Error::Unauthorized("authentication required".into()))
            }
        }
    }
}
