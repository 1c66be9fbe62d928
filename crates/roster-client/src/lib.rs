//! HTTP implementation of [`roster_core::gateway::EntityGateway`].
//!
//! Talks to the roster JSON API (`/api/{interns|teams}`), attaching the
//! session's bearer token to every request. Any `401` answer invalidates the
//! shared [`Session`](roster_core::session::Session) before the error is
//! returned, so every subscriber learns about the forced logout.

mod client;

pub mod error;

pub use client::{ClientConfig, HttpGateway, TokenResponse};
pub use error::{Error, Result};
