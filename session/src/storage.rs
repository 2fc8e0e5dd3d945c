//! Durable token storage.
//!
//! One opaque value under the key `token`. Implementations may offer change
//! notifications; the session store falls back to polling when they don't.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use showmaster_core::{Result, ShowMasterError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

/// Capacity of the change notification channels.
const EVENT_CAPACITY: usize = 16;

/// A hint that the stored value may have changed.
///
/// Receivers re-read the storage; the event itself carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEvent {
    /// The value was written
    Written,
    /// The value was removed
    Cleared,
}

/// Key-value storage holding the session token.
pub trait TokenStorage: Send + Sync {
    /// Read the stored token. Empty values read as `None`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Persist a token.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backing store cannot be written.
    fn store(&self, token: &str) -> Result<()>;

    /// Remove the token.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backing store cannot be written.
    fn clear(&self) -> Result<()>;

    /// Change notifications, if this storage can produce them.
    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>>;
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage shared between clones.
///
/// Every clone sees the same value, which makes a clone a stand-in for
/// "another process" in tests.
#[derive(Debug, Clone)]
pub struct MemoryTokenStorage {
    value: Arc<Mutex<Option<String>>>,
    events: Option<broadcast::Sender<StorageEvent>>,
}

impl Default for MemoryTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTokenStorage {
    /// Empty storage with change notifications.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            value: Arc::new(Mutex::new(None)),
            events: Some(tx),
        }
    }

    /// Empty storage that never notifies; observers must poll.
    #[must_use]
    pub fn without_notifications() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
            events: None,
        }
    }

    /// Storage pre-populated with a token.
    #[must_use]
    pub fn with_token(self, token: &str) -> Self {
        self.write(normalize(token));
        self
    }

    fn write(&self, value: Option<String>) {
        let event = if value.is_some() {
            StorageEvent::Written
        } else {
            StorageEvent::Cleared
        };
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        self.write(normalize(token));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.write(None);
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>> {
        self.events.as_ref().map(broadcast::Sender::subscribe)
    }
}

// ============================================================================
// File storage
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    token: Option<String>,
}

struct FileWatch {
    // Dropping the watcher stops notifications.
    _watcher: RecommendedWatcher,
    events: broadcast::Sender<StorageEvent>,
}

/// Token persisted as `{"token": "..."}` in a JSON file.
///
/// Writes go to a sibling temp file and are renamed into place. Change
/// notifications come from a filesystem watcher on the parent directory,
/// started on first `subscribe`.
pub struct FileTokenStorage {
    path: PathBuf,
    watch: Mutex<Option<FileWatch>>,
}

impl std::fmt::Debug for FileTokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTokenStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileTokenStorage {
    /// Storage backed by the file at `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watch: Mutex::new(None),
        }
    }

    /// `$HOME/.showmaster/session.json`, or a relative `.showmaster/session.json`
    /// when `HOME` is unset.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map_or_else(PathBuf::new, PathBuf::from)
            .join(".showmaster")
            .join("session.json")
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_document(&self, doc: &SessionDocument) -> Result<()> {
        let dir = self.parent();
        std::fs::create_dir_all(&dir).map_err(storage_error)?;

        let body = serde_json::to_vec_pretty(doc)
            .map_err(|e| ShowMasterError::Storage(e.to_string()))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, body).map_err(storage_error)?;
        std::fs::rename(&tmp, &self.path).map_err(storage_error)
    }

    fn start_watch(&self) -> Option<FileWatch> {
        let dir = self.parent();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(error = %e, dir = %dir.display(), "Cannot create session directory, polling only");
            return None;
        }

        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        let sender = tx.clone();
        let file_name = self.path.file_name().map(ToOwned::to_owned);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(ToOwned::to_owned) == file_name);
                if !ours {
                    return;
                }
                let hint = match event.kind {
                    EventKind::Remove(_) => StorageEvent::Cleared,
                    EventKind::Create(_) | EventKind::Modify(_) => StorageEvent::Written,
                    _ => return,
                };
                let _ = sender.send(hint);
            },
            Err(e) => tracing::warn!(error = %e, "Session file watch error"),
        });

        let mut watcher = match watcher {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "File watcher unavailable, polling only");
                return None;
            },
        };
        if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            tracing::warn!(error = %e, dir = %dir.display(), "Cannot watch session directory, polling only");
            return None;
        }

        tracing::debug!(path = %self.path.display(), "Watching session file");
        Some(FileWatch {
            _watcher: watcher,
            events: tx,
        })
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(e)),
        };
        // Half-written or hand-edited files read as logged out.
        let doc: SessionDocument = serde_json::from_slice(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "Unreadable session file");
            SessionDocument::default()
        });
        Ok(doc.token.as_deref().and_then(normalize))
    }

    fn store(&self, token: &str) -> Result<()> {
        match normalize(token) {
            Some(token) => self.write_document(&SessionDocument { token: Some(token) }),
            None => self.clear(),
        }
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageEvent>> {
        let mut watch = self.watch.lock().unwrap_or_else(PoisonError::into_inner);
        if watch.is_none() {
            *watch = self.start_watch();
        }
        watch.as_ref().map(|w| w.events.subscribe())
    }
}

fn normalize(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[allow(clippy::needless_pass_by_value)]
fn storage_error(err: std::io::Error) -> ShowMasterError {
    ShowMasterError::Storage(err.to_string())
}
