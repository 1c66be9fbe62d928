//! Interactive browser state machine and key dispatcher.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  EntityKind, FieldErrors,
  error::Field,
  form::{Confirmation, DeletePrompt, MemberForm},
  gateway::EntityGateway,
  session::SessionWatch,
};
use roster_store::{BrowseState, CollectionStore, Notice, Notices, Outcome, Page};
use tokio::task::JoinSet;
use uuid::Uuid;

// ─── Form fields ──────────────────────────────────────────────────────────────

/// One editable row of the member form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Name,
  Position,
  ContactEmail,
  StartDate,
  EndDate,
  PersonalEmail,
  ContactNumber,
  PhotoUrl,
  LinkedIn,
  Twitter,
  Github,
  Visible,
}

impl FormField {
  pub const ALL: [FormField; 12] = [
    Self::Name,
    Self::Position,
    Self::ContactEmail,
    Self::StartDate,
    Self::EndDate,
    Self::PersonalEmail,
    Self::ContactNumber,
    Self::PhotoUrl,
    Self::LinkedIn,
    Self::Twitter,
    Self::Github,
    Self::Visible,
  ];

  pub fn label(self, kind: EntityKind) -> &'static str {
    match self {
      Self::Name => "Full Name",
      Self::Position => kind.position_label(),
      Self::ContactEmail => "Email",
      Self::StartDate => kind.start_date_label(),
      Self::EndDate => "End Date",
      Self::PersonalEmail => "Personal Email",
      Self::ContactNumber => "Phone",
      Self::PhotoUrl => "Photo URL",
      Self::LinkedIn => "LinkedIn",
      Self::Twitter => "Twitter",
      Self::Github => "GitHub",
      Self::Visible => "Show on website",
    }
  }

  /// The validation key errors for this row are filed under.
  pub fn error_key(self) -> Option<Field> {
    match self {
      Self::Name => Some(Field::Name),
      Self::Position => Some(Field::Position),
      Self::ContactEmail => Some(Field::ContactEmail),
      Self::StartDate => Some(Field::StartDate),
      Self::EndDate => Some(Field::EndDate),
      Self::LinkedIn => Some(Field::LinkedIn),
      Self::Twitter => Some(Field::Twitter),
      Self::Github => Some(Field::Github),
      Self::PersonalEmail | Self::ContactNumber | Self::PhotoUrl | Self::Visible => None,
    }
  }

  /// The text behind this row; `None` for the visibility checkbox.
  pub fn text(self, form: &MemberForm) -> Option<&str> {
    let s = match self {
      Self::Name => &form.name,
      Self::Position => &form.position,
      Self::ContactEmail => &form.contact_email,
      Self::StartDate => &form.start_date,
      Self::EndDate => &form.end_date,
      Self::PersonalEmail => &form.personal_email,
      Self::ContactNumber => &form.contact_number,
      Self::PhotoUrl => &form.photo_url,
      Self::LinkedIn => &form.linked_in,
      Self::Twitter => &form.twitter,
      Self::Github => &form.github,
      Self::Visible => return None,
    };
    Some(s)
  }

  fn text_mut(self, form: &mut MemberForm) -> Option<&mut String> {
    let s = match self {
      Self::Name => &mut form.name,
      Self::Position => &mut form.position,
      Self::ContactEmail => &mut form.contact_email,
      Self::StartDate => &mut form.start_date,
      Self::EndDate => &mut form.end_date,
      Self::PersonalEmail => &mut form.personal_email,
      Self::ContactNumber => &mut form.contact_number,
      Self::PhotoUrl => &mut form.photo_url,
      Self::LinkedIn => &mut form.linked_in,
      Self::Twitter => &mut form.twitter,
      Self::Github => &mut form.github,
      Self::Visible => return None,
    };
    Some(s)
  }
}

/// The open create/edit dialog.
#[derive(Debug, Clone)]
pub struct FormState {
  /// `None` when adding a new member.
  pub editing: Option<Uuid>,
  pub form:    MemberForm,
  /// Index into [`FormField::ALL`].
  pub focus:   usize,
  pub errors:  FieldErrors,
}

impl FormState {
  pub fn focused(&self) -> FormField { FormField::ALL[self.focus] }
}

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Mode {
  /// Browsing the list.
  Normal,
  /// Typing into the search box.
  Search,
  Form(FormState),
  Confirm(DeletePrompt),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level browser state.
pub struct App<G> {
  store:   CollectionStore<G>,
  notices: Notices,
  session: Option<SessionWatch>,

  /// Toggles run in the background so the list shows the optimistic flip.
  toggles: JoinSet<Outcome>,

  pub kind:   EntityKind,
  pub browse: BrowseState,

  /// The page currently on screen.
  pub page: Page,

  /// Cursor within `page.items`.
  pub cursor: usize,

  pub mode: Mode,

  /// Most recent notice, shown in the status bar until the next one.
  pub status: Option<Notice>,

  /// The store's loading flag as of the last `refresh`.
  pub loading: bool,
}

impl<G> App<G>
where
  G: EntityGateway + 'static,
{
  pub fn new(
    store: CollectionStore<G>,
    notices: Notices,
    kind: EntityKind,
    session: Option<SessionWatch>,
  ) -> Self {
    Self {
      store,
      notices,
      session,
      toggles: JoinSet::new(),
      kind,
      browse: BrowseState::new(),
      page: Page { items: Vec::new(), page: 1, page_count: 1, total_filtered: 0, total: 0 },
      cursor: 0,
      mode: Mode::Normal,
      status: None,
      loading: false,
    }
  }

  /// `true` once the server has rejected the saved token.
  pub fn signed_out(&self) -> bool {
    self.session.as_ref().is_some_and(|s| !s.is_active())
  }

  // ── Data ──────────────────────────────────────────────────────────────────

  /// Fetch the active collection.
  pub async fn load(&mut self) {
    self.store.load().await;
    self.refresh().await;
  }

  /// Re-read the visible page and pick up any new notices. Called every
  /// frame.
  pub async fn refresh(&mut self) {
    while let Ok(notice) = self.notices.try_recv() {
      self.status = Some(notice);
    }
    while let Some(done) = self.toggles.try_join_next() {
      if let Err(e) = done {
        tracing::warn!(error = %e, "toggle task failed");
      }
    }

    let mut page = self.store.page(&self.browse).await;
    if page.page > page.page_count {
      // The list shrank under us.
      self.browse.go_to(page.page_count, page.page_count);
      page = self.store.page(&self.browse).await;
    }
    self.cursor = self.cursor.min(page.items.len().saturating_sub(1));
    self.page = page;
    self.loading = self.store.is_loading().await;
  }

  /// Wait for background toggles, so none is lost on exit.
  pub async fn settle(&mut self) {
    while self.toggles.join_next().await.is_some() {}
    self.refresh().await;
  }

  /// The member under the cursor, if any.
  pub fn selected(&self) -> Option<&roster_core::Member> { self.page.items.get(self.cursor) }

  async fn switch_kind(&mut self) {
    self.kind = match self.kind {
      EntityKind::Interns => EntityKind::Teams,
      EntityKind::Teams => EntityKind::Interns,
    };
    self.store.mount(self.kind).await;
    self.browse = BrowseState::new();
    self.cursor = 0;
    self.load().await;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Normal => return self.handle_list_key(key).await,
      Mode::Search => self.handle_search_key(key),
      Mode::Form(_) => self.handle_form_key(key).await,
      Mode::Confirm(_) => self.handle_confirm_key(key).await,
    }
    self.refresh().await;
    true
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.page.items.len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => {
        self.browse.next(self.page.page_count);
        self.cursor = 0;
      }
      KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => {
        self.browse.prev();
        self.cursor = 0;
      }

      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Tab => self.switch_kind().await,
      KeyCode::Char('r') => self.load().await,

      KeyCode::Char('a') => {
        self.mode = Mode::Form(FormState {
          editing: None,
          form:    MemberForm::blank(Local::now().date_naive()),
          focus:   0,
          errors:  FieldErrors::new(),
        });
      }
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(member) = self.selected() {
          self.mode = Mode::Form(FormState {
            editing: Some(member.id),
            form:    MemberForm::from_member(member),
            focus:   0,
            errors:  FieldErrors::new(),
          });
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(member) = self.selected() {
          self.mode = Mode::Confirm(DeletePrompt::new(member));
        }
      }
      KeyCode::Char('v') | KeyCode::Char(' ') => {
        if let Some(id) = self.selected().map(|m| m.id) {
          let store = self.store.clone();
          self.toggles.spawn(async move { store.toggle_visibility(id).await });
          // Yield so the optimistic flip lands before the next frame.
          tokio::task::yield_now().await;
        }
      }
      _ => {}
    }
    self.refresh().await;
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.browse.clear_search();
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        let mut search = self.browse.search().to_owned();
        search.pop();
        self.browse.set_search(search);
      }
      KeyCode::Char(c) => {
        let search = format!("{}{c}", self.browse.search());
        self.browse.set_search(search);
      }
      _ => return,
    }
    self.cursor = 0;
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let Mode::Form(state) = &mut self.mode else { return };
    let field = state.focused();
    match key.code {
      KeyCode::Esc => self.mode = Mode::Normal,
      KeyCode::Tab | KeyCode::Down => {
        state.focus = (state.focus + 1) % FormField::ALL.len();
      }
      KeyCode::BackTab | KeyCode::Up => {
        state.focus = (state.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
      }
      KeyCode::Char(' ') if field == FormField::Visible => {
        state.form.is_visible = !state.form.is_visible;
      }
      KeyCode::Char(c) => {
        if let Some(text) = field.text_mut(&mut state.form) {
          text.push(c);
        }
      }
      KeyCode::Backspace => {
        if let Some(text) = field.text_mut(&mut state.form) {
          text.pop();
        }
      }
      KeyCode::Enter => {
        let editing = state.editing;
        let form = state.form.clone();
        match self.store.save(editing, &form).await {
          Outcome::Invalid(errors) => {
            if let Mode::Form(state) = &mut self.mode {
              state.errors = errors;
            }
          }
          // Keep the dialog open so the input is not lost.
          Outcome::Failed(_) => {
            if let Mode::Form(state) = &mut self.mode {
              state.errors = FieldErrors::new();
            }
          }
          Outcome::Applied | Outcome::Skipped => {
            self.mode = Mode::Normal;
            if editing.is_none() {
              self.browse.go_to(1, 1);
              self.cursor = 0;
            }
          }
        }
      }
      _ => {}
    }
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    let answer = match key.code {
      KeyCode::Char('y') | KeyCode::Enter => true,
      KeyCode::Char('n') | KeyCode::Esc => false,
      _ => return,
    };
    let Mode::Confirm(prompt) = std::mem::replace(&mut self.mode, Mode::Normal) else {
      return;
    };
    let decision = if answer { prompt.confirm() } else { prompt.cancel() };
    if let Confirmation::Confirmed(intent) = decision {
      self.store.delete(intent).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use roster_core::memory::MemoryDirectory;
  use roster_store::Tone;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn typed(app: &mut App<MemoryDirectory>, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c))).await;
    }
  }

  async fn demo_app() -> (App<MemoryDirectory>, MemoryDirectory) {
    let directory = MemoryDirectory::with_demo_data();
    let (store, notices) = CollectionStore::new(directory.clone(), EntityKind::Interns);
    let mut app = App::new(store, notices, EntityKind::Interns, None);
    app.load().await;
    (app, directory)
  }

  #[tokio::test]
  async fn loads_demo_interns() {
    let (app, _) = demo_app().await;
    assert_eq!(app.page.total, 4);
    assert_eq!(app.page.items.len(), 4);
    assert!(!app.loading);
  }

  #[tokio::test]
  async fn search_filters_and_escape_clears() {
    let (mut app, _) = demo_app().await;
    app.handle_key(key(KeyCode::Char('/'))).await;
    typed(&mut app, "verma").await;
    assert_eq!(app.browse.search(), "verma");
    assert_eq!(app.page.items.len(), 1);
    assert_eq!(app.page.items[0].name, "Rahul Verma");

    app.handle_key(key(KeyCode::Esc)).await;
    assert!(matches!(app.mode, Mode::Normal));
    assert_eq!(app.page.items.len(), 4);
  }

  #[tokio::test]
  async fn tab_switches_collection() {
    let (mut app, _) = demo_app().await;
    app.handle_key(key(KeyCode::Tab)).await;
    assert_eq!(app.kind, EntityKind::Teams);
    assert_eq!(app.page.total, 0);
  }

  #[tokio::test]
  async fn invalid_form_stays_open_with_errors() {
    let (mut app, directory) = demo_app().await;
    app.handle_key(key(KeyCode::Char('a'))).await;
    app.handle_key(key(KeyCode::Enter)).await;

    let Mode::Form(state) = &app.mode else { panic!("form closed") };
    assert!(state.errors.contains(Field::Name));
    assert!(state.errors.contains(Field::Position));
    assert_eq!(directory.len(EntityKind::Interns).await, 4);
    assert!(app.status.is_none());
  }

  #[tokio::test]
  async fn add_member_through_form() {
    let (mut app, directory) = demo_app().await;
    app.handle_key(key(KeyCode::Char('a'))).await;
    typed(&mut app, "Nisha Rai").await;
    app.handle_key(key(KeyCode::Tab)).await;
    typed(&mut app, "QA Intern").await;
    app.handle_key(key(KeyCode::Tab)).await;
    typed(&mut app, "nisha@leafclutch.com").await;
    app.handle_key(key(KeyCode::Enter)).await;

    assert!(matches!(app.mode, Mode::Normal));
    assert_eq!(directory.len(EntityKind::Interns).await, 5);
    assert_eq!(app.page.items[0].name, "Nisha Rai");
    let status = app.status.clone().unwrap();
    assert_eq!(status.tone, Tone::Success);
    assert_eq!(status.message, "New intern added!");
  }

  #[tokio::test]
  async fn delete_asks_first() {
    let (mut app, directory) = demo_app().await;
    let victim = app.selected().unwrap().id;

    app.handle_key(key(KeyCode::Char('d'))).await;
    assert!(matches!(app.mode, Mode::Confirm(_)));
    app.handle_key(key(KeyCode::Char('n'))).await;
    assert_eq!(directory.len(EntityKind::Interns).await, 4);

    app.handle_key(key(KeyCode::Char('d'))).await;
    app.handle_key(key(KeyCode::Char('y'))).await;
    assert!(directory.get(EntityKind::Interns, victim).await.is_none());
    assert_eq!(app.page.items.len(), 3);
    assert_eq!(app.status.clone().unwrap().message, "Intern removed.");
  }

  #[tokio::test]
  async fn toggle_runs_in_background() {
    let (mut app, directory) = demo_app().await;
    let id = app.selected().unwrap().id;
    let before = app.selected().unwrap().is_visible;

    app.handle_key(key(KeyCode::Char('v'))).await;
    app.settle().await;

    let stored = directory.get(EntityKind::Interns, id).await.unwrap();
    assert_eq!(stored.is_visible, !before);
    assert_eq!(app.page.items[0].is_visible, !before);
    assert!(app.status.is_some());
  }

  #[tokio::test]
  async fn q_quits() {
    let (mut app, _) = demo_app().await;
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await);
  }
}
