//! Error types for `roster-core`.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown entity kind: {0:?}")]
  UnknownKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Field errors ────────────────────────────────────────────────────────────

/// A form field that can carry a validation message. Serialises to the key
/// the form uses for that field.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Field {
  #[serde(rename = "name")]
  Name,
  #[serde(rename = "position")]
  Position,
  #[serde(rename = "contact_email")]
  ContactEmail,
  #[serde(rename = "start_date")]
  StartDate,
  #[serde(rename = "end_date")]
  EndDate,
  #[serde(rename = "linkedIn")]
  LinkedIn,
  #[serde(rename = "twitter")]
  Twitter,
  #[serde(rename = "github")]
  Github,
}

impl Field {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Position => "position",
      Self::ContactEmail => "contact_email",
      Self::StartDate => "start_date",
      Self::EndDate => "end_date",
      Self::LinkedIn => "linkedIn",
      Self::Twitter => "twitter",
      Self::Github => "github",
    }
  }
}

/// Accumulated field → message map produced by a rejected submit.
///
/// Never reaches the network layer; the form re-renders it next to the
/// offending inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, field: Field, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  pub fn get(&self, field: Field) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn contains(&self, field: Field) -> bool { self.0.contains_key(&field) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }

  /// `Ok(())` when nothing was recorded, otherwise the errors themselves.
  pub fn into_result(self) -> Result<(), FieldErrors> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{}: {message}", field.as_str())?;
      first = false;
    }
    Ok(())
  }
}

// ─── Gateway errors ──────────────────────────────────────────────────────────

/// Failure taxonomy for calls crossing the [`EntityGateway`] boundary.
///
/// [`EntityGateway`]: crate::gateway::EntityGateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
  /// The request never produced a response (connect, timeout, TLS…).
  #[error("network error: {0}")]
  Network(String),

  /// The backend answered `401`. The session has already been invalidated.
  #[error("unauthorized")]
  Unauthorized,

  /// Any other non-2xx answer.
  #[error("server rejected request ({status}): {message}")]
  Rejected { status: u16, message: String },

  /// A 2xx answer whose body could not be decoded.
  #[error("malformed response: {0}")]
  Decode(String),
}

impl GatewayError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Rejected { status: 404, .. })
  }

  pub fn is_unauthorized(&self) -> bool { matches!(self, Self::Unauthorized) }
}
