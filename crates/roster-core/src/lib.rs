//! Core types and trait definitions for the roster personnel manager.
//!
//! This crate is deliberately free of HTTP dependencies. It holds the member
//! record, its validation rules, the pure list query, and the
//! [`gateway::EntityGateway`] seam that the client and the server both build
//! on.

pub mod error;
pub mod form;
pub mod gateway;
pub mod kind;
pub mod member;
pub mod memory;
pub mod query;
pub mod session;

pub use error::{Error, FieldErrors, GatewayError, Result};
pub use kind::EntityKind;
pub use member::{Member, MemberPatch, SocialMedia};
