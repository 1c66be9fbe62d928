//! The gateway the CLI drives: the real API, or demo data held in memory.

use roster_core::{
  EntityKind, GatewayError, Member, MemberPatch, gateway::EntityGateway,
  memory::MemoryDirectory,
};
use roster_client::HttpGateway;
use uuid::Uuid;

pub enum Backend {
  Http(HttpGateway),
  /// `--demo`: nothing leaves the process.
  Demo(MemoryDirectory),
}

impl EntityGateway for Backend {
  async fn list(&self, kind: EntityKind) -> Result<Vec<Member>, GatewayError> {
    match self {
      Self::Http(g) => g.list(kind).await,
      Self::Demo(d) => d.list(kind).await,
    }
  }

  async fn create(
    &self,
    kind: EntityKind,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    match self {
      Self::Http(g) => g.create(kind, patch).await,
      Self::Demo(d) => d.create(kind, patch).await,
    }
  }

  async fn update(
    &self,
    kind: EntityKind,
    id: Uuid,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    match self {
      Self::Http(g) => g.update(kind, id, patch).await,
      Self::Demo(d) => d.update(kind, id, patch).await,
    }
  }

  async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), GatewayError> {
    match self {
      Self::Http(g) => g.delete(kind, id).await,
      Self::Demo(d) => d.delete(kind, id).await,
    }
  }
}
