//! The session store: the one place the bearer token lives.

use crate::storage::{StorageEvent, TokenStorage};
use async_stream::stream;
use futures::Stream;
use showmaster_core::Result;
use showmaster_core::providers::Credentials;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;

/// Stream of token values; `None` means logged out.
pub type TokenStream = Pin<Box<dyn Stream<Item = Option<String>> + Send>>;

/// How `observe()` notices changes made outside this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interval between storage re-reads
    pub poll_interval: Duration,
    /// Poll even when the storage offers change notifications
    pub always_poll: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            always_poll: true,
        }
    }
}

impl SessionConfig {
    /// Rely on change notifications alone when the storage has them.
    ///
    /// Storages without notifications are still polled.
    #[must_use]
    pub fn notifications_only() -> Self {
        Self {
            always_poll: false,
            ..Self::default()
        }
    }

    /// Set the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

struct Inner {
    storage: Arc<dyn TokenStorage>,
    config: SessionConfig,
    current: watch::Sender<Option<String>>,
}

impl Inner {
    fn publish(&self, value: Option<String>) -> bool {
        self.current.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    fn reconcile(&self) -> bool {
        match self.storage.load() {
            Ok(value) => {
                let changed = self.publish(value);
                if changed {
                    tracing::debug!("Session token changed in storage");
                }
                changed
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read token storage");
                false
            },
        }
    }
}

/// Holds the bearer token and keeps it in sync with durable storage.
///
/// Clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.inner.current.borrow().is_some())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store over `storage`, seeded with whatever it currently holds.
    pub fn new(storage: impl TokenStorage + 'static, config: SessionConfig) -> Self {
        Self::from_arc(Arc::new(storage), config)
    }

    /// Same as [`new`](Self::new) for storage that is already shared.
    pub fn from_arc(storage: Arc<dyn TokenStorage>, config: SessionConfig) -> Self {
        let initial = storage.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read token storage, starting logged out");
            None
        });
        let (current, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                storage,
                config,
                current,
            }),
        }
    }

    /// The last-known token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    /// Store a token. A blank value logs out.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the token cannot be persisted; the in-memory
    /// value is left unchanged in that case.
    pub fn set_token(&self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            self.inner.storage.clear()?;
            self.inner.publish(None);
        } else {
            self.inner.storage.store(value)?;
            self.inner.publish(Some(value.to_string()));
        }
        Ok(())
    }

    /// Log out.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the stored token cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.set_token("")
    }

    /// Log out only if `token` is still the current one.
    ///
    /// Used when a token is rejected, so a newer login is not undone.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the stored token cannot be removed.
    pub fn clear_if_current(&self, token: &str) -> Result<bool> {
        if self.token().as_deref() == Some(token) {
            self.clear()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Re-read storage and publish its value if it differs.
    ///
    /// Returns whether the token changed. Read failures are logged and
    /// count as "no change".
    pub fn reconcile(&self) -> bool {
        self.inner.reconcile()
    }

    /// Follow the token.
    ///
    /// Yields the current value first, then every distinct value caused by a
    /// local `set_token`, a storage notification, or a poll tick. The stream
    /// never ends on its own; dropping it stops polling.
    #[must_use]
    pub fn observe(&self) -> TokenStream {
        let inner = Arc::clone(&self.inner);
        Box::pin(stream! {
            let mut tokens = inner.current.subscribe();
            let mut events = inner.storage.subscribe();
            let mut ticker = tokio::time::interval(inner.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.reset();

            let mut last = tokens.borrow_and_update().clone();
            yield last.clone();

            loop {
                let poll = events.is_none() || inner.config.always_poll;
                tokio::select! {
                    changed = tokens.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    event = next_event(&mut events) => {
                        match event {
                            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                                inner.reconcile();
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                tracing::debug!("Storage notifications closed, polling");
                                events = None;
                            }
                        }
                    }
                    _ = ticker.tick(), if poll => {
                        inner.reconcile();
                    }
                }

                let value = tokens.borrow_and_update().clone();
                if value != last {
                    last.clone_from(&value);
                    yield value;
                }
            }
        })
    }
}

async fn next_event(
    events: &mut Option<broadcast::Receiver<StorageEvent>>,
) -> std::result::Result<StorageEvent, broadcast::error::RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl Credentials for SessionStore {
    fn bearer(&self) -> Option<String> {
        self.token()
    }
}
