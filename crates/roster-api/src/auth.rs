//! Admin login and bearer-token verification.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"email":"...","password":"..."}`; returns a bearer token |
//! | `GET`  | `/auth/me` | The signed-in admin |
//!
//! Tokens are random 32-byte values, hex-encoded. Only their SHA-256 digest
//! is kept, together with an expiry.

use std::{collections::HashMap, sync::RwLock};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use roster_core::gateway::EntityGateway;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError, extract::ApiJson};

/// The single admin account allowed to sign in.
pub struct AuthConfig {
  pub admin_email:   String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub token_ttl:     Duration,
}

/// Issued tokens, keyed by digest.
pub struct Auth {
  config: AuthConfig,
  tokens: RwLock<HashMap<String, DateTime<Utc>>>,
}

fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

impl Auth {
  pub fn new(config: AuthConfig) -> Self {
    Self { config, tokens: RwLock::new(HashMap::new()) }
  }

  pub fn admin_email(&self) -> &str { &self.config.admin_email }

  /// `true` if `email`/`password` match the configured admin.
  pub fn check_password(&self, email: &str, password: &str) -> bool {
    if !email.eq_ignore_ascii_case(&self.config.admin_email) {
      return false;
    }
    let Ok(parsed) = PasswordHash::new(&self.config.password_hash) else {
      tracing::error!("configured admin password hash is not a PHC string");
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  }

  /// Mint a new token valid for the configured TTL.
  pub fn issue(&self) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let expires = Utc::now() + self.config.token_ttl;

    let mut tokens = match self.tokens.write() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    let now = Utc::now();
    tokens.retain(|_, exp| *exp > now);
    tokens.insert(digest(&token), expires);
    token
  }

  /// `true` if `token` was issued here and has not expired.
  pub fn verify(&self, token: &str) -> bool {
    let tokens = match self.tokens.read() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    tokens.get(&digest(token)).is_some_and(|exp| *exp > Utc::now())
  }

  #[cfg(test)]
  pub(crate) fn expire_all(&self) {
    if let Ok(mut tokens) = self.tokens.write() {
      for exp in tokens.values_mut() {
        *exp = Utc::now() - Duration::seconds(1);
      }
    }
  }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
}

/// Zero-size marker: present in the handler means the request was authenticated.
pub struct Authenticated;

impl<G> FromRequestParts<AppState<G>> for Authenticated
where
  G: EntityGateway + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<G>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    if state.auth.verify(token) {
      Ok(Authenticated)
    } else {
      Err(ApiError::Unauthorized)
    }
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenBody {
  pub access_token: String,
  pub token_type:   &'static str,
}

/// `POST /auth/login`
pub async fn login<G>(
  State(state): State<AppState<G>>,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<TokenBody>, ApiError>
where
  G: EntityGateway + 'static,
{
  if !state.auth.check_password(&body.email, &body.password) {
    tracing::info!(email = %body.email, "rejected login");
    return Err(ApiError::Unauthorized);
  }
  tracing::info!(email = %body.email, "admin signed in");
  Ok(Json(TokenBody { access_token: state.auth.issue(), token_type: "bearer" }))
}

#[derive(Debug, Serialize)]
pub struct MeBody {
  pub email: String,
  pub role:  &'static str,
}

/// `GET /auth/me`
pub async fn me<G>(
  _auth: Authenticated,
  State(state): State<AppState<G>>,
) -> Json<MeBody>
where
  G: EntityGateway + 'static,
{
  Json(MeBody { email: state.auth.admin_email().to_owned(), role: "admin" })
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};

  use super::*;

  fn auth(password: &str) -> Auth {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    Auth::new(AuthConfig {
      admin_email:   "admin@leafclutch.com".into(),
      password_hash: hash,
      token_ttl:     Duration::minutes(30),
    })
  }

  #[test]
  fn password_check() {
    let a = auth("secret");
    assert!(a.check_password("admin@leafclutch.com", "secret"));
    assert!(a.check_password("ADMIN@leafclutch.com", "secret"));
    assert!(!a.check_password("admin@leafclutch.com", "wrong"));
    assert!(!a.check_password("someone@else.com", "secret"));
  }

  #[test]
  fn issued_tokens_verify_until_expired() {
    let a = auth("secret");
    let token = a.issue();
    assert_eq!(token.len(), 64);
    assert!(a.verify(&token));
    assert!(!a.verify("not-a-token"));
    a.expire_all();
    assert!(!a.verify(&token));
  }

  #[test]
  fn bearer_header_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);
    headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
    assert_eq!(bearer_token(&headers), None);
    headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
    assert_eq!(bearer_token(&headers), Some("abc"));
  }
}
