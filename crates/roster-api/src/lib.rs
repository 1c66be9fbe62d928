//! JSON REST backend for the intern/team roster.
//!
//! Exposes an axum [`Router`] backed by any [`EntityGateway`]. Every
//! `/api` route requires a bearer token obtained from `/auth/login`.

pub mod auth;
pub mod error;
pub mod extract;
pub mod members;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use roster_core::gateway::EntityGateway;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use auth::Auth;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_ttl() -> i64 { 60 * 24 }

/// Runtime server configuration, deserialised from `roster.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub admin_email:         String,
  pub admin_password_hash: String,
  #[serde(default = "default_ttl")]
  pub token_ttl_minutes:   i64,
  /// Start with a handful of sample interns.
  #[serde(default)]
  pub seed_demo:           bool,
}

impl ServerConfig {
  pub fn auth_config(&self) -> auth::AuthConfig {
    auth::AuthConfig {
      admin_email:   self.admin_email.clone(),
      password_hash: self.admin_password_hash.clone(),
      token_ttl:     chrono::Duration::minutes(self.token_ttl_minutes.max(1)),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<G> {
  pub directory: Arc<G>,
  pub auth:      Arc<Auth>,
}

impl<G> Clone for AppState<G> {
  fn clone(&self) -> Self {
    Self { directory: Arc::clone(&self.directory), auth: Arc::clone(&self.auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full router for `state`.
pub fn api_router<G>(state: AppState<G>) -> Router
where
  G: EntityGateway + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<G>))
    .route("/auth/me", get(auth::me::<G>))
    // Members
    .route("/api/{kind}", get(members::list::<G>).post(members::create::<G>))
    .route(
      "/api/{kind}/{id}",
      put(members::update::<G>).delete(members::delete_one::<G>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
