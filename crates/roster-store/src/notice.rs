//! Transient user-facing notifications ("toasts").

use tokio::sync::mpsc;

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Success,
  /// A completed removal; shown in the destructive colour.
  Removed,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub tone:    Tone,
  pub message: String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self { tone: Tone::Success, message: message.into() }
  }

  pub fn removed(message: impl Into<String>) -> Self {
    Self { tone: Tone::Removed, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { tone: Tone::Error, message: message.into() }
  }
}

/// Receiving end handed out by [`CollectionStore::new`](crate::CollectionStore::new).
pub type Notices = mpsc::UnboundedReceiver<Notice>;
