//! Plain-text output for the scripted subcommands.

use std::fmt::Write as _;

use roster_core::{EntityKind, FieldErrors, Member};
use roster_store::{Notice, Page, Tone};

/// Cut `s` to at most `width` characters, marking the cut with `…`.
pub fn fit(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_owned();
  }
  let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
  out.push('…');
  out
}

/// `2024-06-01 → present`
pub fn tenure(member: &Member) -> String {
  match member.end_date {
    Some(end) => format!("{} → {end}", member.start_date),
    None => format!("{} → present", member.start_date),
  }
}

pub fn visibility_mark(member: &Member) -> &'static str {
  if member.is_visible { "●" } else { "○" }
}

pub fn page(kind: EntityKind, search: &str, page: &Page) -> String {
  let mut out = String::new();
  if page.items.is_empty() {
    if search.is_empty() {
      let _ = writeln!(out, "No {kind} yet.");
    } else {
      let _ = writeln!(out, "Nothing matches \"{search}\".");
    }
    return out;
  }

  let _ = writeln!(
    out,
    "{:<3} {:<24} {:<24} {:<28} {:<26} {}",
    "",
    "NAME",
    kind.position_label().to_uppercase(),
    "EMAIL",
    kind.start_date_label().to_uppercase(),
    "ID",
  );
  for m in &page.items {
    let _ = writeln!(
      out,
      "{:<3} {:<24} {:<24} {:<28} {:<26} {}",
      visibility_mark(m),
      fit(&m.name, 24),
      fit(&m.position, 24),
      fit(&m.contact_email, 28),
      tenure(m),
      m.id,
    );
  }
  let _ = writeln!(
    out,
    "\npage {}/{} · {} of {} {}",
    page.page,
    page.page_count,
    page.total_filtered,
    page.total,
    kind.as_str(),
  );
  out
}

pub fn member(kind: EntityKind, m: &Member) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} {}", kind.entity_name(), m.id);
  let _ = writeln!(out, "  name:     {}", m.name);
  let _ = writeln!(out, "  {}: {}", kind.position_label().to_lowercase(), m.position);
  let _ = writeln!(out, "  email:    {}", m.contact_email);
  let _ = writeln!(out, "  dates:    {}", tenure(m));
  let _ = writeln!(
    out,
    "  website:  {}",
    if m.is_visible { "visible" } else { "hidden" }
  );
  out
}

pub fn field_errors(errors: &FieldErrors) -> String {
  let mut out = String::new();
  for (field, message) in errors.iter() {
    let _ = writeln!(out, "  {}: {message}", field.as_str());
  }
  out
}

pub fn notice(notice: &Notice) -> String {
  let tag = match notice.tone {
    Tone::Success => "ok",
    Tone::Removed => "removed",
    Tone::Error => "error",
  };
  format!("[{tag}] {}", notice.message)
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use roster_core::{MemberPatch, error::Field};
  use uuid::Uuid;

  use super::*;

  fn sample(name: &str, visible: bool) -> Member {
    let patch = MemberPatch {
      name: Some(name.into()),
      position: Some("Backend Intern".into()),
      contact_email: Some("aman@leafclutch.com".into()),
      is_visible: Some(visible),
      ..MemberPatch::default()
    };
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    Member::from_patch(Uuid::new_v4(), patch, day, Utc::now())
  }

  #[test]
  fn fit_truncates_on_chars() {
    assert_eq!(fit("Aman", 10), "Aman");
    assert_eq!(fit("Sanya Malhotra", 6), "Sanya…");
  }

  #[test]
  fn page_lists_rows_and_footer() {
    let members = vec![sample("Aman Gupta", true), sample("Rahul Verma", false)];
    let p = Page {
      items:          members.clone(),
      page:           1,
      page_count:     1,
      total_filtered: 2,
      total:          4,
    };
    let text = page(EntityKind::Interns, "", &p);
    assert!(text.contains("INTERNSHIP ROLE"));
    assert!(text.contains("Aman Gupta"));
    assert!(text.contains("○   Rahul Verma"));
    assert!(text.contains(&members[0].id.to_string()));
    assert!(text.contains("2024-06-01 → present"));
    assert!(text.contains("page 1/1 · 2 of 4 interns"));
  }

  #[test]
  fn empty_page_mentions_search() {
    let p = Page { items: vec![], page: 1, page_count: 1, total_filtered: 0, total: 3 };
    assert_eq!(page(EntityKind::Teams, "zzz", &p), "Nothing matches \"zzz\".\n");
    assert_eq!(page(EntityKind::Interns, "", &p), "No interns yet.\n");
  }

  #[test]
  fn errors_one_per_line() {
    let mut errors = FieldErrors::new();
    errors.insert(Field::Name, "Full name is required.");
    errors.insert(Field::Github, "Please enter a valid URL.");
    assert_eq!(
      field_errors(&errors),
      "  name: Full name is required.\n  github: Please enter a valid URL.\n"
    );
  }

  #[test]
  fn notices_are_tagged() {
    assert_eq!(notice(&Notice::removed("Intern removed.")), "[removed] Intern removed.");
    assert_eq!(
      notice(&Notice::error("Failed to delete.")),
      "[error] Failed to delete."
    );
  }
}
