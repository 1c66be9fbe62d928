//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_core::{
  EntityKind, GatewayError, Member, MemberPatch, gateway::EntityGateway,
  session::Session,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:     String,
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:8000".into(), timeout_secs: 30 }
  }
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default = "bearer")]
  pub token_type:   String,
}

fn bearer() -> String { "bearer".into() }

#[derive(Serialize)]
struct LoginBody<'a> {
  email:    &'a str,
  password: &'a str,
}

/// Async HTTP client for the roster REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] and the session are
/// `Arc`-based.
#[derive(Clone)]
pub struct HttpGateway {
  client:  Client,
  config:  ClientConfig,
  session: Session,
}

impl HttpGateway {
  pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config, session })
  }

  pub fn session(&self) -> &Session { &self.session }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn collection(&self, kind: EntityKind) -> String {
    self.url(&format!("/api/{kind}"))
  }

  fn member(&self, kind: EntityKind, id: Uuid) -> String {
    self.url(&format!("/api/{kind}/{id}"))
  }

  /// Attach the bearer token, if there is one.
  fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
    match self.session.token() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req` and turn anything but a 2xx into a [`GatewayError`].
  async fn execute(
    &self,
    req: RequestBuilder,
    what: &str,
  ) -> Result<Response, GatewayError> {
    let resp = self
      .authorize(req)
      .send()
      .await
      .map_err(|e| GatewayError::Network(format!("{what}: {e}")))?;

    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
      tracing::warn!("{what} → 401; logging out");
      self.session.invalidate();
      return Err(GatewayError::Unauthorized);
    }
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(GatewayError::Rejected {
        status:  status.as_u16(),
        message: error_message(status, &body),
      });
    }
    Ok(resp)
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /auth/login`. On success the token is installed in the session.
  pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&LoginBody { email, password })
      .send()
      .await
      .map_err(|e| GatewayError::Network(format!("POST /auth/login: {e}")))?;

    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
      return Err(Error::InvalidCredentials);
    }
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(
        GatewayError::Rejected {
          status:  status.as_u16(),
          message: error_message(status, &body),
        }
        .into(),
      );
    }
    let token: TokenResponse = decode(resp, "POST /auth/login").await?;
    self.session.sign_in(token.access_token.clone());
    Ok(token)
  }
}

impl EntityGateway for HttpGateway {
  /// `GET /api/{kind}`
  async fn list(&self, kind: EntityKind) -> Result<Vec<Member>, GatewayError> {
    let what = format!("GET /api/{kind}");
    let resp = self.execute(self.client.get(self.collection(kind)), &what).await?;
    decode(resp, &what).await
  }

  /// `POST /api/{kind}`
  async fn create(
    &self,
    kind: EntityKind,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    let what = format!("POST /api/{kind}");
    let req = self.client.post(self.collection(kind)).json(&patch);
    let resp = self.execute(req, &what).await?;
    decode(resp, &what).await
  }

  /// `PUT /api/{kind}/{id}`
  async fn update(
    &self,
    kind: EntityKind,
    id: Uuid,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    let what = format!("PUT /api/{kind}/{id}");
    let req = self.client.put(self.member(kind, id)).json(&patch);
    let resp = self.execute(req, &what).await?;
    decode(resp, &what).await
  }

  /// `DELETE /api/{kind}/{id}`
  async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), GatewayError> {
    let what = format!("DELETE /api/{kind}/{id}");
    self.execute(self.client.delete(self.member(kind, id)), &what).await?;
    Ok(())
  }
}

async fn decode<T: DeserializeOwned>(
  resp: Response,
  what: &str,
) -> Result<T, GatewayError> {
  resp
    .json()
    .await
    .map_err(|e| GatewayError::Decode(format!("{what}: {e}")))
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}` and
/// `{"error": "..."}`; falls back to the raw body, then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
  let fallback = || {
    let trimmed = body.trim();
    if trimmed.is_empty() {
      status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
      trimmed.to_owned()
    }
  };

  let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
    return fallback();
  };
  match value.get("detail").or_else(|| value.get("error")) {
    Some(serde_json::Value::String(s)) => s.clone(),
    Some(serde_json::Value::Array(items)) => {
      let msgs: Vec<&str> = items
        .iter()
        .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
        .collect();
      if msgs.is_empty() { fallback() } else { msgs.join("; ") }
    }
    _ => fallback(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn member_json(id: Uuid, name: &str, visible: bool) -> serde_json::Value {
    json!({
      "id": id,
      "photo_url": "https://api.dicebear.com/7.x/avataaars/svg?seed=x",
      "name": name,
      "position": "Backend Intern",
      "start_date": "2025-11-15",
      "end_date": null,
      "social_media": {},
      "contact_email": "x@leafclutch.com",
      "personal_email": null,
      "contact_number": null,
      "is_visible": visible,
      "created_at": "2026-01-05T09:00:00Z",
      "updated_at": "2026-01-05T09:00:00Z"
    })
  }

  fn gateway(server: &MockServer, token: Option<&str>) -> HttpGateway {
    HttpGateway::new(
      ClientConfig { base_url: server.uri(), timeout_secs: 5 },
      Session::new(token.map(str::to_owned)),
    )
    .unwrap()
  }

  #[tokio::test]
  async fn list_sends_bearer_token() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
      .and(path("/api/interns"))
      .and(header("authorization", "Bearer tok-123"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!([member_json(id, "Rahul", false)])),
      )
      .expect(1)
      .mount(&server)
      .await;

    let members = gateway(&server, Some("tok-123"))
      .list(EntityKind::Interns)
      .await
      .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, id);
  }

  #[tokio::test]
  async fn update_puts_partial_body() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PUT"))
      .and(path(format!("/api/teams/{id}")))
      .and(body_json(json!({ "is_visible": true })))
      .respond_with(ResponseTemplate::new(200).set_body_json(member_json(id, "Neha", true)))
      .expect(1)
      .mount(&server)
      .await;

    let updated = gateway(&server, Some("t"))
      .update(EntityKind::Teams, id, MemberPatch::visibility(true))
      .await
      .unwrap();
    assert!(updated.is_visible);
  }

  #[tokio::test]
  async fn unauthorized_invalidates_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/teams"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
      .mount(&server)
      .await;

    let gw = gateway(&server, Some("stale"));
    let watch = gw.session().watch();
    let err = gw.list(EntityKind::Teams).await.unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized);
    assert!(!watch.is_active());
    assert_eq!(gw.session().token(), None);
  }

  #[tokio::test]
  async fn rejection_carries_detail_message() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("DELETE"))
      .and(path(format!("/api/interns/{id}")))
      .respond_with(
        ResponseTemplate::new(404).set_body_json(json!({ "detail": "member not found" })),
      )
      .mount(&server)
      .await;

    let err = gateway(&server, Some("t"))
      .delete(EntityKind::Interns, id)
      .await
      .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
      err,
      GatewayError::Rejected { status: 404, message: "member not found".into() }
    );
  }

  #[tokio::test]
  async fn garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/interns"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
      .mount(&server)
      .await;

    let err = gateway(&server, None).list(EntityKind::Interns).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
  }

  #[tokio::test]
  async fn unreachable_server_is_network_error() {
    let gw = HttpGateway::new(
      ClientConfig { base_url: "http://127.0.0.1:1".into(), timeout_secs: 2 },
      Session::default(),
    )
    .unwrap();
    let err = gw.list(EntityKind::Interns).await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
  }

  #[tokio::test]
  async fn login_installs_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/auth/login"))
      .and(body_json(json!({ "email": "admin@leafclutch.com", "password": "pw" })))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh" })),
      )
      .mount(&server)
      .await;

    let gw = gateway(&server, None);
    let token = gw.login("admin@leafclutch.com", "pw").await.unwrap();
    assert_eq!(token.token_type, "bearer");
    assert_eq!(gw.session().token().as_deref(), Some("fresh"));
    assert!(gw.session().is_active());
  }

  #[tokio::test]
  async fn login_with_bad_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/auth/login"))
      .respond_with(
        ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
      )
      .mount(&server)
      .await;

    let err = gateway(&server, None).login("a@b.c", "nope").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
  }

  #[test]
  fn error_message_shapes() {
    let s = StatusCode::UNPROCESSABLE_ENTITY;
    assert_eq!(
      error_message(s, r#"{"detail":[{"msg":"field required","loc":["body","name"],"type":"missing"}]}"#),
      "field required"
    );
    assert_eq!(error_message(s, r#"{"error":"bad"}"#), "bad");
    assert_eq!(error_message(s, "plain text"), "plain text");
    assert_eq!(error_message(s, ""), "Unprocessable Entity");
  }
}
