//! Search text and page number for the list view.

/// UI-only list state. Changing the search text always returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
  search: String,
  page:   usize,
}

impl Default for BrowseState {
  fn default() -> Self { Self { search: String::new(), page: 1 } }
}

impl BrowseState {
  pub fn new() -> Self { Self::default() }

  pub fn search(&self) -> &str { &self.search }

  /// 1-based.
  pub fn page(&self) -> usize { self.page }

  pub fn set_search(&mut self, search: impl Into<String>) {
    self.search = search.into();
    self.page = 1;
  }

  pub fn clear_search(&mut self) { self.set_search(String::new()); }

  /// Jump to `page`, clamped to `1..=page_count`.
  pub fn go_to(&mut self, page: usize, page_count: usize) {
    self.page = page.clamp(1, page_count.max(1));
  }

  pub fn next(&mut self, page_count: usize) { self.go_to(self.page + 1, page_count); }

  pub fn prev(&mut self) { self.page = self.page.saturating_sub(1).max(1); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_search_resets_page() {
    let mut b = BrowseState::new();
    b.go_to(3, 5);
    assert_eq!(b.page(), 3);
    b.set_search("aman");
    assert_eq!(b.page(), 1);
    assert_eq!(b.search(), "aman");
  }

  #[test]
  fn paging_is_clamped() {
    let mut b = BrowseState::new();
    b.prev();
    assert_eq!(b.page(), 1);
    b.next(2);
    b.next(2);
    assert_eq!(b.page(), 2);
    b.go_to(0, 2);
    assert_eq!(b.page(), 1);
  }
}
