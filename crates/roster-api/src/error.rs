//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_core::GatewayError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Bodies are `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Well-formed JSON that does not fit the expected shape.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("directory error: {0}")]
  Directory(#[source] GatewayError),
}

impl From<GatewayError> for ApiError {
  fn from(err: GatewayError) -> Self {
    match err {
      GatewayError::Rejected { status: 400, message } => Self::BadRequest(message),
      GatewayError::Rejected { status: 404, message } => Self::NotFound(message),
      GatewayError::Rejected { status: 409, message } => Self::Conflict(message),
      other => Self::Directory(other),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      JsonRejection::JsonDataError(e) => Self::Unprocessable(e.body_text()),
      other => Self::BadRequest(other.body_text()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "Could not validate credentials".to_owned())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Directory(e) => {
        tracing::error!(error = %e, "directory failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    let mut res = (status, Json(json!({ "detail": detail }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
