//! The member record: one intern or team member.
//!
//! A [`Member`] is the full stored record. A [`MemberPatch`] is the partial
//! body carried by create and update calls; absent fields are left alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Field, FieldErrors};

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Deterministic generated-avatar URL for `name`.
pub fn avatar_url(name: &str) -> String {
  let seed = name.trim();
  let seed = if seed.is_empty() { "default" } else { seed };
  let encoded: String =
    url::form_urlencoded::byte_serialize(seed.as_bytes()).collect();
  format!("{AVATAR_BASE}{encoded}")
}

/// `http(s)://` URL with a host; applied to social profile links.
pub fn is_http_url(value: &str) -> bool {
  url::Url::parse(value).is_ok_and(|u| {
    matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty())
  })
}

// ─── Social media ────────────────────────────────────────────────────────────

/// The profile kinds a member can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialKind {
  LinkedIn,
  Twitter,
  Github,
}

impl SocialKind {
  pub const ALL: [SocialKind; 3] =
    [SocialKind::LinkedIn, SocialKind::Twitter, SocialKind::Github];

  pub fn field(&self) -> Field {
    match self {
      Self::LinkedIn => Field::LinkedIn,
      Self::Twitter => Field::Twitter,
      Self::Github => Field::Github,
    }
  }
}

/// Profile links keyed by [`SocialKind`]. Serialised as an object with
/// optional `linkedIn` / `twitter` / `github` string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
  #[serde(
    rename = "linkedIn",
    alias = "linkedin",
    default,
    deserialize_with = "blank_as_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub linked_in: Option<String>,
  #[serde(
    default,
    deserialize_with = "blank_as_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub twitter:   Option<String>,
  #[serde(
    default,
    deserialize_with = "blank_as_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub github:    Option<String>,
}

impl SocialMedia {
  pub fn get(&self, kind: SocialKind) -> Option<&str> {
    match kind {
      SocialKind::LinkedIn => self.linked_in.as_deref(),
      SocialKind::Twitter => self.twitter.as_deref(),
      SocialKind::Github => self.github.as_deref(),
    }
  }

  pub fn set(&mut self, kind: SocialKind, url: Option<String>) {
    let url = url.filter(|u| !u.trim().is_empty());
    match kind {
      SocialKind::LinkedIn => self.linked_in = url,
      SocialKind::Twitter => self.twitter = url,
      SocialKind::Github => self.github = url,
    }
  }
}

// ─── Member ──────────────────────────────────────────────────────────────────

/// A stored personnel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMember")]
pub struct Member {
  /// Assigned once at creation (client-side), never changed afterwards.
  pub id:             Uuid,
  pub photo_url:      String,
  pub name:           String,
  pub position:       String,
  pub start_date:     NaiveDate,
  pub end_date:       Option<NaiveDate>,
  pub social_media:   SocialMedia,
  pub contact_email:  String,
  pub personal_email: Option<String>,
  pub contact_number: Option<String>,
  /// Whether the public website shows this member.
  pub is_visible:     bool,
  pub created_at:     DateTime<Utc>,
  /// Refreshed on every mutation; never earlier than `created_at`.
  pub updated_at:     DateTime<Utc>,
}

/// Wire form of [`Member`]. Older rows may lack a photo or carry `null`.
#[derive(Deserialize)]
struct StoredMember {
  id:             Uuid,
  #[serde(default, deserialize_with = "blank_as_none")]
  photo_url:      Option<String>,
  name:           String,
  #[serde(default)]
  position:       String,
  start_date:     NaiveDate,
  #[serde(default)]
  end_date:       Option<NaiveDate>,
  #[serde(default, deserialize_with = "null_as_default")]
  social_media:   SocialMedia,
  #[serde(default, deserialize_with = "null_as_default")]
  contact_email:  String,
  #[serde(default, deserialize_with = "blank_as_none")]
  personal_email: Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  contact_number: Option<String>,
  is_visible:     bool,
  created_at:     DateTime<Utc>,
  updated_at:     DateTime<Utc>,
}

impl From<StoredMember> for Member {
  fn from(raw: StoredMember) -> Self {
    let photo_url = raw.photo_url.unwrap_or_else(|| avatar_url(&raw.name));
    Self {
      id: raw.id,
      photo_url,
      name: raw.name,
      position: raw.position,
      start_date: raw.start_date,
      end_date: raw.end_date,
      social_media: raw.social_media,
      contact_email: raw.contact_email,
      personal_email: raw.personal_email,
      contact_number: raw.contact_number,
      is_visible: raw.is_visible,
      created_at: raw.created_at,
      updated_at: raw.updated_at,
    }
  }
}

impl Member {
  /// Build a new record from a validated patch. Fields the patch leaves out
  /// take their creation defaults: today's start date, a generated avatar,
  /// visible.
  pub fn from_patch(
    id: Uuid,
    patch: MemberPatch,
    today: NaiveDate,
    now: DateTime<Utc>,
  ) -> Self {
    let name = patch.name.unwrap_or_default();
    let photo_url = patch
      .photo_url
      .filter(|u| !u.trim().is_empty())
      .unwrap_or_else(|| avatar_url(&name));
    Self {
      id,
      photo_url,
      position: patch.position.unwrap_or_default(),
      start_date: patch.start_date.unwrap_or(today),
      end_date: patch.end_date.flatten(),
      social_media: patch.social_media.unwrap_or_default(),
      contact_email: patch.contact_email.unwrap_or_default(),
      personal_email: patch.personal_email.flatten(),
      contact_number: patch.contact_number.flatten(),
      is_visible: patch.is_visible.unwrap_or(true),
      created_at: now,
      updated_at: now,
      name,
    }
  }

  /// Merge `patch` into this record and refresh `updated_at`.
  ///
  /// `id` and `created_at` are never touched, even if the patch names an id.
  pub fn apply(&mut self, patch: &MemberPatch, now: DateTime<Utc>) {
    if let Some(v) = &patch.photo_url {
      self.photo_url = v.clone();
    }
    if let Some(v) = &patch.name {
      self.name = v.clone();
    }
    if let Some(v) = &patch.position {
      self.position = v.clone();
    }
    if let Some(v) = patch.start_date {
      self.start_date = v;
    }
    if let Some(v) = patch.end_date {
      self.end_date = v;
    }
    if let Some(v) = &patch.social_media {
      self.social_media = v.clone();
    }
    if let Some(v) = &patch.contact_email {
      self.contact_email = v.clone();
    }
    if let Some(v) = &patch.personal_email {
      self.personal_email = v.clone();
    }
    if let Some(v) = &patch.contact_number {
      self.contact_number = v.clone();
    }
    if let Some(v) = patch.is_visible {
      self.is_visible = v;
    }
    self.updated_at = now.max(self.created_at);
  }

  /// Record-level invariants a stored member must satisfy.
  pub fn check(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if self.name.trim().is_empty() {
      errors.insert(Field::Name, "Full name is required.");
    }
    if let Some(end) = self.end_date
      && end < self.start_date
    {
      errors.insert(Field::EndDate, "End date must be after start date.");
    }
    errors.into_result()
  }

  /// A patch that reproduces every client-editable field of this record.
  pub fn to_patch(&self) -> MemberPatch {
    MemberPatch {
      id:             Some(self.id),
      photo_url:      Some(self.photo_url.clone()),
      name:           Some(self.name.clone()),
      position:       Some(self.position.clone()),
      start_date:     Some(self.start_date),
      end_date:       Some(self.end_date),
      social_media:   Some(self.social_media.clone()),
      contact_email:  Some(self.contact_email.clone()),
      personal_email: Some(self.personal_email.clone()),
      contact_number: Some(self.contact_number.clone()),
      is_visible:     Some(self.is_visible),
    }
  }
}

// ─── MemberPatch ─────────────────────────────────────────────────────────────

/// Partial member body for `POST` and `PUT`.
///
/// Clearable fields use `Option<Option<_>>`: outer `None` leaves the field
/// alone (and is omitted from JSON), `Some(None)` clears it (sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:             Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub photo_url:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date:     Option<NaiveDate>,
  #[serde(
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub end_date:       Option<Option<NaiveDate>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub social_media:   Option<SocialMedia>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_email:  Option<String>,
  #[serde(
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub personal_email: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub contact_number: Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_visible:     Option<bool>,
}

impl MemberPatch {
  /// The patch sent by the visibility toggle.
  pub fn visibility(is_visible: bool) -> Self {
    Self { is_visible: Some(is_visible), ..Self::default() }
  }
}

// ─── serde helpers ───────────────────────────────────────────────────────────

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key, which
/// `#[serde(default)]` turns into `None`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Empty strings from older clients mean "not set".
fn blank_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<String>::deserialize(de)?;
  Ok(value.filter(|s| !s.trim().is_empty()))
}
