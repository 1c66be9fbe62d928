//! The `EntityGateway` trait: CRUD against a member collection.
//!
//! Implemented by the HTTP client (`roster-client`) and by the in-memory
//! [`MemoryDirectory`](crate::memory::MemoryDirectory). The collection store
//! and the JSON server depend on this abstraction, not on a transport.

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::GatewayError,
  kind::EntityKind,
  member::{Member, MemberPatch},
};

/// Remote CRUD for the `interns` and `teams` collections.
///
/// No method retries; failures are returned exactly as they happened.
pub trait EntityGateway: Send + Sync {
  /// Every member of `kind`'s collection.
  fn list(
    &self,
    kind: EntityKind,
  ) -> impl Future<Output = Result<Vec<Member>, GatewayError>> + Send + '_;

  /// Store a new member and return the canonical stored record.
  ///
  /// If `patch.id` is set the backend keeps that id.
  fn create(
    &self,
    kind: EntityKind,
    patch: MemberPatch,
  ) -> impl Future<Output = Result<Member, GatewayError>> + Send + '_;

  /// Merge `patch` into member `id` and return the stored result.
  fn update(
    &self,
    kind: EntityKind,
    id: Uuid,
    patch: MemberPatch,
  ) -> impl Future<Output = Result<Member, GatewayError>> + Send + '_;

  /// Remove member `id`. A missing id yields a `404` rejection.
  fn delete(
    &self,
    kind: EntityKind,
    id: Uuid,
  ) -> impl Future<Output = Result<(), GatewayError>> + Send + '_;
}
