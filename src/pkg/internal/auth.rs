use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{conf::settings, prelude::Result};

/// What a bearer token asserts about its holder. Issuance lives
/// outside this service; we only mint tokens from the cli and in
/// tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

pub fn create_token(username: &str, is_admin: bool) -> Result<String> {
    let issued = Utc::now().timestamp();
    let claims = Claims {
        username: username.into(),
        is_admin,
        iat: issued,
        exp: issued + chrono::Duration::hours(24).num_seconds(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret_key.as_bytes()),
    )?)
}

pub fn decode_token(token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret_key.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
