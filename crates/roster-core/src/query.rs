//! Search and pagination over a member list.
//!
//! Pure functions only. Resetting the page when the search text changes is
//! the caller's job, since nothing here holds state between calls.

use crate::member::Member;

/// Cards shown per page.
pub const PAGE_SIZE: usize = 12;

/// `true` if `name`, `position` or `contact_email` contains `needle`,
/// ignoring case. An empty needle matches everything.
pub fn matches(member: &Member, needle: &str) -> bool {
  let needle = needle.to_lowercase();
  [&member.name, &member.position, &member.contact_email]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Members matching `search`, in collection order.
pub fn filter<'a>(members: &'a [Member], search: &str) -> Vec<&'a Member> {
  members.iter().filter(|m| matches(m, search)).collect()
}

/// The 1-based `page` of `items`. Pages past the end are empty; page `0` is
/// treated as page `1`.
pub fn paginate<T: Copy>(items: &[T], page: usize) -> Vec<T> {
  let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
  items.iter().skip(start).take(PAGE_SIZE).copied().collect()
}

/// Number of pages needed for `total` items (at least one).
pub fn page_count(total: usize) -> usize { total.div_ceil(PAGE_SIZE).max(1) }

/// One rendered page of a filtered member list.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
  pub items:          Vec<&'a Member>,
  /// 1-based page number that was requested.
  pub page:           usize,
  pub page_count:     usize,
  /// Matches across all pages.
  pub total_filtered: usize,
}

impl PageView<'_> {
  pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// Filter then paginate in one step.
pub fn view<'a>(members: &'a [Member], search: &str, page: usize) -> PageView<'a> {
  let filtered = filter(members, search);
  PageView {
    items: paginate(&filtered, page),
    page: page.max(1),
    page_count: page_count(filtered.len()),
    total_filtered: filtered.len(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::member::MemberPatch;

  fn member(name: &str, position: &str, email: &str) -> Member {
    Member::from_patch(
      Uuid::new_v4(),
      MemberPatch {
        name: Some(name.into()),
        position: Some(position.into()),
        contact_email: Some(email.into()),
        ..MemberPatch::default()
      },
      "2026-01-01".parse().unwrap(),
      Utc::now(),
    )
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let m = member("Aman Gupta", "Frontend Developer", "aman@leafclutch.com");
    for q in ["aman", "GUPTA", "an g", ""] {
      assert!(matches(&m, q), "{q:?} should match");
    }
    assert!(matches(&m, "FRONTEND"));
    assert!(matches(&m, "leafclutch"));
    assert!(!matches(&m, "sanya"));
  }

  #[test]
  fn search_tolerates_blank_optional_fields() {
    let m = member("Rahul Verma", "", "");
    assert!(matches(&m, "rahul"));
    assert!(!matches(&m, "intern"));
  }

  #[test]
  fn pages_of_twelve() {
    let members: Vec<_> = (0..25)
      .map(|i| member(&format!("Person {i}"), "Intern", "p@x.io"))
      .collect();
    assert_eq!(view(&members, "", 1).items.len(), 12);
    assert_eq!(view(&members, "", 2).items.len(), 12);
    assert_eq!(view(&members, "", 3).items.len(), 1);
    assert_eq!(view(&members, "", 4).items.len(), 0);
    assert_eq!(view(&members, "", 1).page_count, 3);
    assert_eq!(view(&members, "", 3).items[0].name, "Person 24");
  }

  #[test]
  fn filter_then_paginate() {
    let mut members: Vec<_> = (0..5)
      .map(|i| member(&format!("Dev {i}"), "Backend", "d@x.io"))
      .collect();
    members.push(member("Sanya Malhotra", "UI/UX Designer", "sanya@x.io"));
    let page = view(&members, "designer", 1);
    assert_eq!(page.total_filtered, 1);
    assert_eq!(page.items[0].name, "Sanya Malhotra");
    assert_eq!(page.page_count, 1);
    assert!(view(&members, "nobody", 1).is_empty());
  }

  #[test]
  fn page_zero_is_page_one() {
    let members = vec![member("A", "B", "C")];
    assert_eq!(view(&members, "", 0).items.len(), 1);
  }
}
