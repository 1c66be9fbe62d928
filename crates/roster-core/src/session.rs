//! Shared login session: the bearer token plus an invalidation signal.
//!
//! The HTTP gateway reads the token for every request and calls
//! [`Session::invalidate`] when the backend answers `401`. Anything that
//! must react to a forced logout (the collection store, the CLI) holds a
//! [`SessionWatch`] instead of polling a side channel.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

/// Cheap to clone; all clones share one token and one signal.
#[derive(Clone, Debug)]
pub struct Session {
  token:  Arc<RwLock<Option<String>>>,
  active: Arc<watch::Sender<bool>>,
}

impl Default for Session {
  fn default() -> Self { Self::new(None) }
}

impl Session {
  pub fn new(token: Option<String>) -> Self {
    let token = token.filter(|t| !t.trim().is_empty());
    let (active, _) = watch::channel(token.is_some());
    Self { token: Arc::new(RwLock::new(token)), active: Arc::new(active) }
  }

  /// The current bearer token, if logged in.
  pub fn token(&self) -> Option<String> {
    match self.token.read() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn is_active(&self) -> bool { *self.active.borrow() }

  /// Install a freshly issued token.
  pub fn sign_in(&self, token: String) {
    self.replace(Some(token));
    self.active.send_replace(true);
  }

  /// Drop the token and notify every watcher. Idempotent.
  pub fn invalidate(&self) {
    self.replace(None);
    if self.active.send_replace(false) {
      tracing::warn!("session invalidated; login required");
    }
  }

  pub fn watch(&self) -> SessionWatch {
    SessionWatch { rx: self.active.subscribe() }
  }

  fn replace(&self, value: Option<String>) {
    match self.token.write() {
      Ok(mut guard) => *guard = value,
      Err(poisoned) => *poisoned.into_inner() = value,
    }
  }
}

/// Receiving end of the invalidation signal.
#[derive(Clone, Debug)]
pub struct SessionWatch {
  rx: watch::Receiver<bool>,
}

impl SessionWatch {
  pub fn is_active(&self) -> bool { *self.rx.borrow() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_token_is_no_session() {
    let s = Session::new(Some("  ".into()));
    assert!(!s.is_active());
    assert_eq!(s.token(), None);
  }

  #[test]
  fn invalidate_reaches_watchers() {
    let s = Session::new(Some("abc".into()));
    let watch = s.watch();
    assert!(watch.is_active());

    s.clone().invalidate();
    assert!(!watch.is_active());
    assert_eq!(s.token(), None);

    s.sign_in("def".into());
    assert_eq!(s.token().as_deref(), Some("def"));
    assert!(s.is_active());
  }
}
