//! Handlers for `/api/{kind}` endpoints. `kind` is `interns` or `teams`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/{kind}` | Every member, including hidden ones |
//! | `POST`   | `/api/{kind}` | Body: partial member; a client-chosen `id` is kept; 201, 400 if invalid, 409 on a taken id |
//! | `PUT`    | `/api/{kind}/{id}` | Body: partial member; 404 if unknown |
//! | `DELETE` | `/api/{kind}/{id}` | 204; 404 if unknown |
//!
//! An unknown kind or malformed id answers 400; a body of the wrong shape 422.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use roster_core::{EntityKind, Member, MemberPatch, gateway::EntityGateway};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// `GET /api/{kind}`
pub async fn list<G>(
  _auth: Authenticated,
  State(state): State<AppState<G>>,
  ApiPath(kind): ApiPath<EntityKind>,
) -> Result<Json<Vec<Member>>, ApiError>
where
  G: EntityGateway + 'static,
{
  let members = state.directory.list(kind).await?;
  Ok(Json(members))
}

/// `POST /api/{kind}`, answering 201 with the stored [`Member`].
pub async fn create<G>(
  _auth: Authenticated,
  State(state): State<AppState<G>>,
  ApiPath(kind): ApiPath<EntityKind>,
  ApiJson(patch): ApiJson<MemberPatch>,
) -> Result<impl IntoResponse, ApiError>
where
  G: EntityGateway + 'static,
{
  let member = state.directory.create(kind, patch).await?;
  tracing::info!(%kind, id = %member.id, "member created");
  Ok((StatusCode::CREATED, Json(member)))
}

/// `PUT /api/{kind}/{id}`
pub async fn update<G>(
  _auth: Authenticated,
  State(state): State<AppState<G>>,
  ApiPath((kind, id)): ApiPath<(EntityKind, Uuid)>,
  ApiJson(patch): ApiJson<MemberPatch>,
) -> Result<Json<Member>, ApiError>
where
  G: EntityGateway + 'static,
{
  if patch.id.is_some_and(|body_id| body_id != id) {
    return Err(ApiError::BadRequest("id in body does not match path".into()));
  }
  let member = state.directory.update(kind, id, patch).await?;
  tracing::info!(%kind, %id, "member updated");
  Ok(Json(member))
}

/// `DELETE /api/{kind}/{id}`
pub async fn delete_one<G>(
  _auth: Authenticated,
  State(state): State<AppState<G>>,
  ApiPath((kind, id)): ApiPath<(EntityKind, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  G: EntityGateway + 'static,
{
  state.directory.delete(kind, id).await?;
  tracing::info!(%kind, %id, "member deleted");
  Ok(StatusCode::NO_CONTENT)
}
