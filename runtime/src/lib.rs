//! # ShowMaster Runtime
//!
//! Executes reducers and their effects.
//!
//! ## Core Components
//!
//! - **Store**: owns reducer state, runs effects, feeds produced actions back
//! - **Retry**: bounded exponential backoff used by the catalog reads
//!
//! ## Example
//!
//! ```ignore
//! use showmaster_runtime::Store;
//!
//! let store = Store::new(BookingState::default(), BookingReducer::new(), env);
//!
//! store.send(BookingAction::OpenShow { show_id, layout }).await;
//! let phase = store.state(|s| s.phase).await;
//! ```

use showmaster_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

/// Retry logic with exponential backoff
pub mod retry;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// No matching action arrived before the deadline.
        ///
        /// Returned by `send_and_wait_for`.
        #[error("Timeout waiting for action")]
        Timeout,

        /// The action broadcast channel closed while waiting.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{Arc, Duration, Effect, Reducer, RwLock, StoreError, broadcast};

    /// Default capacity of the action broadcast channel.
    const BROADCAST_CAPACITY: usize = 32;

    /// The Store - runtime coordinator for a reducer
    ///
    /// Holds state behind a `RwLock`, runs the reducer under the write lock,
    /// then executes the returned effects on the tokio runtime. Actions
    /// produced by effects are fed back into the reducer, then broadcast to
    /// observers.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Clone + Send + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a store from its initial state, reducer, and environment.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                action_broadcast,
            }
        }

        /// Process one action.
        ///
        /// The reducer runs synchronously under the write lock. Effects start
        /// before this returns but may still be running.
        pub async fn send(&self, action: A) {
            self.send_and_read(action, |_| ()).await;
        }

        /// Process one action and read the resulting state before any other
        /// action can run.
        #[tracing::instrument(skip(self, action, read), name = "store_send")]
        pub async fn send_and_read<F, T>(&self, action: A, read: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (effects, value) = {
                let mut state = self.state.write().await;
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                (effects, read(&state))
            };

            tracing::trace!(count = effects.len(), "Reducer returned effects");
            for effect in effects {
                self.execute_effect(effect);
            }

            value
        }

        /// Send an action and wait for the first effect-produced action that
        /// matches `predicate`.
        ///
        /// Subscribes before sending, so a fast effect cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`] if nothing matches before `timeout`
        /// - [`StoreError::ChannelClosed`] if the broadcast channel closes
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();
            self.send(action).await;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Read state through a closure; the read lock is released on return.
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();
                    tokio::spawn(async move {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
            }
        }

        async fn feed_back(&self, action: A) {
            tracing::trace!(?action, "Effect produced action");
            self.send(action.clone()).await;
            // Observers only see actions the state already reflects.
            let _ = self.action_broadcast.send(action);
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}
