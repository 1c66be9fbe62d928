//! [`CollectionStore`]: the authoritative client-side copy of a collection.
//!
//! Every public operation resolves to an [`Outcome`]; gateway failures are
//! logged, turned into a [`Notice`], and recovered from here so the view
//! layer never sees an error it has to handle.
//!
//! | Operation | Policy |
//! |-----------|--------|
//! | `load` | replace on success; keep the previous list on failure |
//! | `create` | validate, assign id, call, then insert at the front |
//! | `update` | validate, call, then swap in the stored record |
//! | `delete` | remove locally at once; a failed call is reported, not undone |
//! | `toggle_visibility` | flip locally at once; roll back if the call fails |
//!
//! Locks are never held across a gateway call, so calls can overlap. Toggles
//! on the same id are queued behind a per-id mutex.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use roster_core::{
  EntityKind, FieldErrors, GatewayError, Member, MemberPatch,
  form::{DeleteIntent, MemberForm},
  gateway::EntityGateway,
  query,
  session::SessionWatch,
};
use tokio::sync::{Mutex, RwLock, mpsc};
use uuid::Uuid;

use crate::{
  BrowseState,
  notice::{Notice, Notices},
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// How a store operation ended. The collection is consistent in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The change reached the backend and the local copy.
  Applied,
  /// The form was rejected locally; nothing was sent and no notice raised.
  Invalid(FieldErrors),
  /// The backend call failed; a notice was raised and local state recovered.
  Failed(GatewayError),
  /// Nothing to do: unknown id, unmounted view, or expired session.
  Skipped,
}

/// An owned page of the filtered collection.
#[derive(Debug, Clone)]
pub struct Page {
  pub items:          Vec<Member>,
  pub page:           usize,
  pub page_count:     usize,
  pub total_filtered: usize,
  /// Size of the unfiltered collection.
  pub total:          usize,
}

// ─── State ───────────────────────────────────────────────────────────────────

struct State {
  kind:          EntityKind,
  members:       Vec<Member>,
  loads:         usize,
  mounted:       bool,
  /// Bumped by `mount`/`unmount`; results issued under an older epoch are
  /// dropped.
  epoch:         u64,
  /// Bumped by every change to `members`.
  revision:      u64,
}

impl State {
  fn is_current(&self, epoch: u64) -> bool { self.mounted && self.epoch == epoch }

  fn position(&self, id: Uuid) -> Option<usize> {
    self.members.iter().position(|m| m.id == id)
  }

  fn find_mut(&mut self, id: Uuid) -> Option<&mut Member> {
    self.members.iter_mut().find(|m| m.id == id)
  }

  fn touch(&mut self) { self.revision += 1; }
}

struct Inner<G> {
  gateway: G,
  session: Option<SessionWatch>,
  state:   RwLock<State>,
  toggles: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
  notices: mpsc::UnboundedSender<Notice>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// In-memory collection for one [`EntityKind`], synchronised with a gateway.
///
/// Cloning is cheap; clones share state, which is how overlapping operations
/// are issued.
pub struct CollectionStore<G> {
  inner: Arc<Inner<G>>,
}

impl<G> Clone for CollectionStore<G> {
  fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

impl<G: EntityGateway> CollectionStore<G> {
  /// A mounted, empty store for `kind`, plus the receiver for its notices.
  pub fn new(gateway: G, kind: EntityKind) -> (Self, Notices) {
    Self::build(gateway, kind, None)
  }

  /// Like [`CollectionStore::new`], but operations are skipped once
  /// `session` has been invalidated.
  pub fn with_session(
    gateway: G,
    kind: EntityKind,
    session: SessionWatch,
  ) -> (Self, Notices) {
    Self::build(gateway, kind, Some(session))
  }

  fn build(
    gateway: G,
    kind: EntityKind,
    session: Option<SessionWatch>,
  ) -> (Self, Notices) {
    let (tx, rx) = mpsc::unbounded_channel();
    let state = State {
      kind,
      members: Vec::new(),
      loads: 0,
      mounted: true,
      epoch: 0,
      revision: 0,
    };
    let inner = Inner {
      gateway,
      session,
      state: RwLock::new(state),
      toggles: Mutex::new(HashMap::new()),
      notices: tx,
    };
    (Self { inner: Arc::new(inner) }, rx)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn kind(&self) -> EntityKind { self.inner.state.read().await.kind }

  pub async fn members(&self) -> Vec<Member> {
    self.inner.state.read().await.members.clone()
  }

  pub async fn get(&self, id: Uuid) -> Option<Member> {
    let state = self.inner.state.read().await;
    state.members.iter().find(|m| m.id == id).cloned()
  }

  /// `true` while at least one `load` is outstanding.
  pub async fn is_loading(&self) -> bool { self.inner.state.read().await.loads > 0 }

  /// The page `browse` points at.
  pub async fn page(&self, browse: &BrowseState) -> Page {
    let state = self.inner.state.read().await;
    let view = query::view(&state.members, browse.search(), browse.page());
    Page {
      items:          view.items.into_iter().cloned().collect(),
      page:           view.page,
      page_count:     view.page_count,
      total_filtered: view.total_filtered,
      total:          state.members.len(),
    }
  }

  // ── Mounting ──────────────────────────────────────────────────────────────

  /// Attach the store to a view of `kind`. Switching kinds empties the
  /// collection; re-mounting the same kind keeps it until the next `load`.
  pub async fn mount(&self, kind: EntityKind) {
    let mut state = self.inner.state.write().await;
    if state.kind != kind {
      state.kind = kind;
      state.members.clear();
      state.touch();
    }
    state.mounted = true;
    state.epoch += 1;
    state.loads = 0;
    tracing::debug!(%kind, epoch = state.epoch, "store mounted");
  }

  /// Detach from the view. Calls still in flight will not touch state.
  pub async fn unmount(&self) {
    let mut state = self.inner.state.write().await;
    state.mounted = false;
    state.epoch += 1;
    state.loads = 0;
    tracing::debug!(epoch = state.epoch, "store unmounted");
  }

  /// Kind and epoch for a new operation, or `None` if it must not run.
  async fn begin(&self) -> Option<(EntityKind, u64)> {
    if let Some(session) = &self.inner.session
      && !session.is_active()
    {
      tracing::debug!("session ended; skipping operation");
      return None;
    }
    let state = self.inner.state.read().await;
    state.mounted.then_some((state.kind, state.epoch))
  }

  fn notify(&self, notice: Notice) {
    // A dropped receiver only means nobody is showing notices.
    let _ = self.inner.notices.send(notice);
  }

  /// Log a gateway failure and raise `message`, except for `401`s, which the
  /// session handles globally.
  fn report(&self, op: &str, err: &GatewayError, message: String) {
    if err.is_unauthorized() {
      tracing::info!(op, "request unauthorized; leaving it to the session");
      return;
    }
    tracing::warn!(op, error = %err, "gateway call failed");
    self.notify(Notice::error(message));
  }

  // ── Load ──────────────────────────────────────────────────────────────────

  /// Fetch the whole collection and replace the local copy.
  ///
  /// On failure the previous list stays visible. Duplicate ids in the
  /// response are collapsed to their first occurrence.
  pub async fn load(&self) -> Outcome {
    let Some((kind, epoch)) = self.begin().await else {
      return Outcome::Skipped;
    };
    {
      // Counted only under the epoch it was issued in.
      let mut state = self.inner.state.write().await;
      if !state.is_current(epoch) {
        return Outcome::Skipped;
      }
      state.loads += 1;
    }

    let result = self.inner.gateway.list(kind).await;

    let mut state = self.inner.state.write().await;
    if !state.is_current(epoch) {
      tracing::debug!(%kind, "discarding load for a stale view");
      return Outcome::Skipped;
    }
    state.loads = state.loads.saturating_sub(1);

    match result {
      Ok(members) => {
        let mut seen = std::collections::HashSet::new();
        state.members = members.into_iter().filter(|m| seen.insert(m.id)).collect();
        state.touch();
        tracing::debug!(%kind, count = state.members.len(), "collection loaded");
        Outcome::Applied
      }
      Err(err) => {
        drop(state);
        self.report("load", &err, format!("Could not load {kind}."));
        Outcome::Failed(err)
      }
    }
  }

  // ── Create / update ───────────────────────────────────────────────────────

  /// Validate `form` and add a new member once the backend has stored it.
  ///
  /// The id is chosen here; the backend is expected to keep it. The stored
  /// record it returns is what lands in the collection, at the front.
  pub async fn create(&self, form: &MemberForm) -> Outcome {
    let Some((kind, epoch)) = self.begin().await else {
      return Outcome::Skipped;
    };
    let patch = match form.validate(kind) {
      Ok(patch) => patch,
      Err(errors) => return Outcome::Invalid(errors),
    };

    let now = Utc::now();
    let draft = Member::from_patch(Uuid::new_v4(), patch, now.date_naive(), now);
    let result = self.inner.gateway.create(kind, draft.to_patch()).await;

    match result {
      Ok(stored) => {
        let mut state = self.inner.state.write().await;
        if state.is_current(epoch) {
          state.members.retain(|m| m.id != stored.id);
          state.members.insert(0, stored);
          state.touch();
        }
        drop(state);
        self.notify(Notice::success(format!("New {} added!", kind.noun())));
        Outcome::Applied
      }
      Err(err) => {
        self.report("create", &err, "Could not save changes.".into());
        Outcome::Failed(err)
      }
    }
  }

  /// Validate `form` and save it over member `id`.
  ///
  /// The backend merges the patch and refreshes `updated_at`; the record it
  /// returns replaces the local one. Skipped if `id` is not in the
  /// collection. A member deleted while the call was in flight is not
  /// brought back.
  pub async fn update(&self, id: Uuid, form: &MemberForm) -> Outcome {
    let Some((kind, epoch)) = self.begin().await else {
      return Outcome::Skipped;
    };
    let patch = match form.validate(kind) {
      Ok(patch) => patch,
      Err(errors) => return Outcome::Invalid(errors),
    };
    if self.get(id).await.is_none() {
      tracing::debug!(%id, "update of unknown member ignored");
      return Outcome::Skipped;
    }

    match self.inner.gateway.update(kind, id, patch).await {
      Ok(stored) => {
        let mut state = self.inner.state.write().await;
        if state.is_current(epoch)
          && let Some(slot) = state.find_mut(id)
        {
          *slot = stored;
          state.touch();
        }
        drop(state);
        self.notify(Notice::success("Changes saved successfully!"));
        Outcome::Applied
      }
      Err(err) => {
        self.report("update", &err, "Could not save changes.".into());
        Outcome::Failed(err)
      }
    }
  }

  /// Submit the create/edit form: an update when `editing` names a member,
  /// otherwise a create.
  pub async fn save(&self, editing: Option<Uuid>, form: &MemberForm) -> Outcome {
    match editing {
      Some(id) => self.update(id, form).await,
      None => self.create(form).await,
    }
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  /// Remove a member the user has already confirmed.
  ///
  /// The record leaves the collection before the call is made and stays
  /// removed even if the call fails; the failure is only reported. A `404`
  /// counts as success, and deleting an id that is already gone is skipped.
  pub async fn delete(&self, intent: DeleteIntent) -> Outcome {
    let DeleteIntent { id } = intent;
    let Some((kind, _)) = self.begin().await else {
      return Outcome::Skipped;
    };
    {
      let mut state = self.inner.state.write().await;
      let Some(index) = state.position(id) else {
        tracing::debug!(%id, "delete of absent member ignored");
        return Outcome::Skipped;
      };
      state.members.remove(index);
      state.touch();
    }

    match self.inner.gateway.delete(kind, id).await {
      Ok(()) => {
        self.notify(Notice::removed(format!("{} removed.", kind.entity_name())));
        Outcome::Applied
      }
      Err(err) if err.is_not_found() => {
        tracing::debug!(%id, "member already gone on the backend");
        self.notify(Notice::removed(format!("{} removed.", kind.entity_name())));
        Outcome::Applied
      }
      Err(err) => {
        self.report("delete", &err, "Failed to delete.".into());
        Outcome::Failed(err)
      }
    }
  }

  // ── Visibility ────────────────────────────────────────────────────────────

  async fn toggle_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
    let mut toggles = self.inner.toggles.lock().await;
    Arc::clone(toggles.entry(id).or_default())
  }

  async fn release_toggle_lock(&self, id: Uuid, lock: Arc<Mutex<()>>) {
    let mut toggles = self.inner.toggles.lock().await;
    // Only the map and this handle left: nobody is queued behind us.
    if Arc::strong_count(&lock) <= 2 {
      toggles.remove(&id);
    }
  }

  /// Flip `is_visible` on member `id` right away, then persist it.
  ///
  /// If the call fails the collection goes back to the snapshot taken
  /// before the flip. When another operation changed the collection in the
  /// meantime only this member's flag is reverted, so that change survives.
  /// Toggles of the same id run one after another.
  pub async fn toggle_visibility(&self, id: Uuid) -> Outcome {
    let Some((kind, epoch)) = self.begin().await else {
      return Outcome::Skipped;
    };
    let lock = self.toggle_lock(id).await;
    let outcome = {
      let _queued = lock.lock().await;
      self.toggle_locked(kind, epoch, id).await
    };
    self.release_toggle_lock(id, lock).await;
    outcome
  }

  async fn toggle_locked(&self, kind: EntityKind, epoch: u64, id: Uuid) -> Outcome {
    let (snapshot, revision, visible) = {
      let mut state = self.inner.state.write().await;
      if !state.is_current(epoch) {
        return Outcome::Skipped;
      }
      let snapshot = state.members.clone();
      let Some(member) = state.find_mut(id) else {
        tracing::debug!(%id, "toggle of unknown member ignored");
        return Outcome::Skipped;
      };
      let visible = !member.is_visible;
      member.is_visible = visible;
      state.touch();
      (snapshot, state.revision, visible)
    };
    tracing::debug!(%id, visible, "visibility flipped optimistically");

    let result = self
      .inner
      .gateway
      .update(kind, id, MemberPatch::visibility(visible))
      .await;

    let mut state = self.inner.state.write().await;
    if !state.is_current(epoch) {
      tracing::debug!(%id, "discarding toggle result for a stale view");
      return Outcome::Skipped;
    }

    match result {
      Ok(stored) => {
        if let Some(slot) = state.find_mut(id) {
          *slot = stored;
          state.touch();
        }
        drop(state);
        let message = if visible { "Visible on website" } else { "Hidden from website" };
        self.notify(Notice::success(message));
        Outcome::Applied
      }
      Err(err) => {
        if state.revision == revision {
          state.members = snapshot;
        } else if let Some(slot) = state.find_mut(id) {
          slot.is_visible = !visible;
        }
        state.touch();
        drop(state);
        tracing::debug!(%id, "visibility rolled back");
        self.report("toggle_visibility", &err, "Server error. Reverting change.".into());
        Outcome::Failed(err)
      }
    }
  }
}
