//! The saved bearer token between invocations.

use std::{
  io,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

/// The stored token, if any. Blank files count as signed out.
pub fn read(path: &Path) -> Result<Option<String>> {
  match std::fs::read_to_string(path) {
    Ok(raw) => {
      let token = raw.trim();
      Ok((!token.is_empty()).then(|| token.to_owned()))
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e).with_context(|| format!("reading token file {}", path.display())),
  }
}

pub fn write(path: &Path, token: &str) -> Result<()> {
  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating {}", dir.display()))?;
  }
  std::fs::write(path, token)
    .with_context(|| format!("writing token file {}", path.display()))?;
  restrict(path)
}

#[cfg(unix)]
fn restrict(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
    .with_context(|| format!("restricting {}", path.display()))
}

#[cfg(not(unix))]
fn restrict(_path: &Path) -> Result<()> { Ok(()) }

/// Forget the token. Missing files are fine.
pub fn remove(path: &Path) -> Result<()> {
  match std::fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e).with_context(|| format!("removing token file {}", path.display())),
  }
}
