//! The two personnel collections managed by roster.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which collection a member belongs to. The serialised form doubles as the
/// REST path segment (`/api/interns`, `/api/teams`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Interns,
  Teams,
}

impl EntityKind {
  pub const ALL: [EntityKind; 2] = [EntityKind::Interns, EntityKind::Teams];

  /// The path segment and wire name.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Interns => "interns",
      Self::Teams => "teams",
    }
  }

  /// Singular title used in headings and removal notices.
  pub fn entity_name(&self) -> &'static str {
    match self {
      Self::Interns => "Intern",
      Self::Teams => "Member",
    }
  }

  /// Lower-case noun used in creation notices.
  pub fn noun(&self) -> &'static str {
    match self {
      Self::Interns => "intern",
      Self::Teams => "team member",
    }
  }

  /// Form label for the `position` field; also used in its error message.
  pub fn position_label(&self) -> &'static str {
    match self {
      Self::Interns => "Internship Role",
      Self::Teams => "Designation",
    }
  }

  pub fn start_date_label(&self) -> &'static str {
    match self {
      Self::Interns => "Start Date",
      Self::Teams => "Joined Date",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EntityKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "interns" => Ok(Self::Interns),
      "teams" => Ok(Self::Teams),
      other => Err(Error::UnknownKind(other.to_owned())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_path_segments() {
    assert_eq!("interns".parse::<EntityKind>().unwrap(), EntityKind::Interns);
    assert_eq!("teams".parse::<EntityKind>().unwrap(), EntityKind::Teams);
    assert!("mentors".parse::<EntityKind>().is_err());
  }

  #[test]
  fn labels_differ_per_kind() {
    assert_eq!(EntityKind::Teams.position_label(), "Designation");
    assert_eq!(EntityKind::Interns.position_label(), "Internship Role");
    assert_eq!(
      serde_json::to_string(&EntityKind::Teams).unwrap(),
      "\"teams\""
    );
  }
}
