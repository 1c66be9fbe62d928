//! Error type for `roster-client`.

use roster_core::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[from] reqwest::Error),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error(transparent)]
  Gateway(#[from] GatewayError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
