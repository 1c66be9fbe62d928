//! Mutation surfaces: the create/edit form and the delete confirmation.
//!
//! The form holds raw user input. [`MemberForm::validate`] turns it into a
//! [`MemberPatch`] or a [`FieldErrors`] map, never a mix of both; every rule
//! runs on every submit so all messages show at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{Field, FieldErrors},
  kind::EntityKind,
  member::{Member, MemberPatch, SocialKind, SocialMedia, is_http_url},
};

// ─── Create / edit form ──────────────────────────────────────────────────────

/// Raw form input. Dates are `YYYY-MM-DD` strings; an empty `end_date` means
/// "still active".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberForm {
  pub name:           String,
  pub position:       String,
  pub start_date:     String,
  pub end_date:       String,
  pub contact_email:  String,
  pub personal_email: String,
  pub contact_number: String,
  pub is_visible:     bool,
  /// Uploaded or pasted photo URL; empty means "generate from name".
  pub photo_url:      String,
  #[serde(rename = "linkedIn")]
  pub linked_in:      String,
  pub twitter:        String,
  pub github:         String,
}

impl MemberForm {
  /// An empty form for a new member: visible, starting `today`.
  pub fn blank(today: NaiveDate) -> Self {
    Self {
      start_date: today.to_string(),
      is_visible: true,
      ..Self::default()
    }
  }

  /// A form pre-filled from an existing record, for editing.
  pub fn from_member(member: &Member) -> Self {
    let social = &member.social_media;
    Self {
      name:           member.name.clone(),
      position:       member.position.clone(),
      start_date:     member.start_date.to_string(),
      end_date:       member.end_date.map(|d| d.to_string()).unwrap_or_default(),
      contact_email:  member.contact_email.clone(),
      personal_email: member.personal_email.clone().unwrap_or_default(),
      contact_number: member.contact_number.clone().unwrap_or_default(),
      is_visible:     member.is_visible,
      photo_url:      member.photo_url.clone(),
      linked_in:      social.linked_in.clone().unwrap_or_default(),
      twitter:        social.twitter.clone().unwrap_or_default(),
      github:         social.github.clone().unwrap_or_default(),
    }
  }

  fn social(&self, kind: SocialKind) -> &str {
    match kind {
      SocialKind::LinkedIn => &self.linked_in,
      SocialKind::Twitter => &self.twitter,
      SocialKind::Github => &self.github,
    }
  }

  /// Check every rule and build the patch for `kind`'s collection.
  ///
  /// The position message uses the kind's label ("Designation" for teams,
  /// "Internship Role" for interns).
  pub fn validate(&self, kind: EntityKind) -> Result<MemberPatch, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = self.name.trim();
    if name.is_empty() {
      errors.insert(Field::Name, "Full name is required.");
    }

    let position = self.position.trim();
    if position.is_empty() {
      errors.insert(
        Field::Position,
        format!("{} is required.", kind.position_label()),
      );
    }

    let contact_email = self.contact_email.trim();
    if contact_email.is_empty() {
      errors.insert(Field::ContactEmail, "Work email is required.");
    }

    let start_date = parse_date(&self.start_date, Field::StartDate, &mut errors);
    let end_date = parse_date(&self.end_date, Field::EndDate, &mut errors);
    if let (Some(start), Some(end)) = (start_date, end_date)
      && end < start
    {
      errors.insert(Field::EndDate, "End date must be after start date.");
    }

    let mut social_media = SocialMedia::default();
    for kind in SocialKind::ALL {
      let url = self.social(kind).trim();
      if url.is_empty() {
        continue;
      }
      if !is_http_url(url) {
        errors.insert(kind.field(), "Invalid URL.");
      }
      social_media.set(kind, Some(url.to_owned()));
    }

    errors.into_result()?;

    Ok(MemberPatch {
      id:             None,
      photo_url:      non_empty(&self.photo_url),
      name:           Some(name.to_owned()),
      position:       Some(position.to_owned()),
      start_date,
      end_date:       Some(end_date),
      social_media:   Some(social_media),
      contact_email:  Some(contact_email.to_owned()),
      personal_email: Some(non_empty(&self.personal_email)),
      contact_number: Some(non_empty(&self.contact_number)),
      is_visible:     Some(self.is_visible),
    })
  }
}

fn non_empty(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse an optional `YYYY-MM-DD` input, recording a field error on garbage.
fn parse_date(
  raw: &str,
  field: Field,
  errors: &mut FieldErrors,
) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  match raw.parse::<NaiveDate>() {
    Ok(date) => Some(date),
    Err(_) => {
      errors.insert(field, "Enter a date as YYYY-MM-DD.");
      None
    }
  }
}

// ─── Delete confirmation ─────────────────────────────────────────────────────

/// A confirmed request to remove one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteIntent {
  pub id: Uuid,
}

/// The user's answer to a [`DeletePrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
  Confirmed(DeleteIntent),
  Cancelled,
}

/// An open "are you sure?" dialog for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
  pub id:   Uuid,
  /// Display name shown in the question.
  pub name: String,
}

impl DeletePrompt {
  pub fn new(member: &Member) -> Self {
    Self { id: member.id, name: member.name.clone() }
  }

  pub fn question(&self) -> String {
    format!("Remove {}? This cannot be undone.", self.name)
  }

  pub fn confirm(self) -> Confirmation {
    Confirmation::Confirmed(DeleteIntent { id: self.id })
  }

  pub fn cancel(self) -> Confirmation { Confirmation::Cancelled }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { "2026-01-05".parse().unwrap() }

  fn filled() -> MemberForm {
    MemberForm {
      name: "Aman Gupta".into(),
      position: "Frontend Developer".into(),
      contact_email: "aman@leafclutch.com".into(),
      ..MemberForm::blank(today())
    }
  }

  #[test]
  fn valid_form_produces_patch() {
    let patch = filled().validate(EntityKind::Interns).unwrap();
    assert_eq!(patch.name.as_deref(), Some("Aman Gupta"));
    assert_eq!(patch.start_date, Some(today()));
    assert_eq!(patch.end_date, Some(None));
    assert_eq!(patch.personal_email, Some(None));
    assert_eq!(patch.photo_url, None);
    assert_eq!(patch.is_visible, Some(true));
  }

  #[test]
  fn empty_name_and_inverted_dates_give_exactly_two_errors() {
    let form = MemberForm {
      name: "   ".into(),
      start_date: "2026-03-01".into(),
      end_date: "2026-02-01".into(),
      ..filled()
    };
    let errors = form.validate(EntityKind::Interns).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(Field::Name));
    assert!(errors.contains(Field::EndDate));
  }

  #[test]
  fn position_message_uses_kind_label() {
    let form = MemberForm { position: String::new(), ..filled() };
    let teams = form.validate(EntityKind::Teams).unwrap_err();
    assert_eq!(teams.get(Field::Position), Some("Designation is required."));
    let interns = form.validate(EntityKind::Interns).unwrap_err();
    assert_eq!(
      interns.get(Field::Position),
      Some("Internship Role is required.")
    );
  }

  #[test]
  fn errors_accumulate() {
    let form = MemberForm::blank(today());
    let errors = form.validate(EntityKind::Teams).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(Field::ContactEmail));
  }

  #[test]
  fn social_links_must_look_like_urls() {
    let form = MemberForm {
      linked_in: "linkedin.com/in/aman".into(),
      github: "github.com/aman".into(),
      twitter: "https://twitter.com/aman".into(),
      ..filled()
    };
    let errors = form.validate(EntityKind::Interns).unwrap_err();
    assert_eq!(errors.get(Field::LinkedIn), Some("Invalid URL."));
    assert!(errors.contains(Field::Github));
    assert!(!errors.contains(Field::Twitter));
  }

  #[test]
  fn garbage_date_is_a_field_error() {
    let form = MemberForm { start_date: "next week".into(), ..filled() };
    let errors = form.validate(EntityKind::Interns).unwrap_err();
    assert!(errors.contains(Field::StartDate));
  }

  #[test]
  fn edit_prefill_round_trips_through_validation() {
    let member = Member::from_patch(
      Uuid::new_v4(),
      filled().validate(EntityKind::Interns).unwrap(),
      today(),
      chrono::Utc::now(),
    );
    let form = MemberForm::from_member(&member);
    let patch = form.validate(EntityKind::Interns).unwrap();
    assert_eq!(patch.photo_url.as_deref(), Some(member.photo_url.as_str()));
    assert_eq!(patch.contact_email.as_deref(), Some("aman@leafclutch.com"));
  }

  #[test]
  fn delete_prompt_resolves() {
    let member = Member::from_patch(
      Uuid::new_v4(),
      filled().validate(EntityKind::Interns).unwrap(),
      today(),
      chrono::Utc::now(),
    );
    let prompt = DeletePrompt::new(&member);
    assert!(prompt.question().contains("Aman Gupta"));
    assert_eq!(
      prompt.clone().confirm(),
      Confirmation::Confirmed(DeleteIntent { id: member.id })
    );
    assert_eq!(prompt.cancel(), Confirmation::Cancelled);
  }
}
