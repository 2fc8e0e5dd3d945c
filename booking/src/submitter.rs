//! Booking flow driven through a [`Store`].

use crate::reducer::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
use crate::seats::{SeatLayout, ToggleOutcome};
use showmaster_core::providers::BookingApi;
use showmaster_core::types::{ShowId, Ticket, UserId};
use showmaster_core::{Result, ShowMasterError};
use showmaster_runtime::store::Store;
use std::time::Duration;
use uuid::Uuid;

/// How long [`BookingSubmitter::submit`] waits for an outcome.
///
/// The HTTP client has its own timeouts; this only bounds the wait on the
/// store.
pub const DEFAULT_OUTCOME_TIMEOUT: Duration = Duration::from_secs(300);

type BookingStore<B> = Store<BookingState, BookingAction, BookingEnvironment<B>, BookingReducer<B>>;

/// Async front of the booking reducer.
///
/// Clones share the same flow.
pub struct BookingSubmitter<B>
where
    B: BookingApi + 'static,
{
    store: BookingStore<B>,
    timeout: Duration,
}

impl<B> Clone for BookingSubmitter<B>
where
    B: BookingApi + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
        }
    }
}

impl<B> BookingSubmitter<B>
where
    B: BookingApi + 'static,
{
    /// Start with no show open.
    #[must_use]
    pub fn new(environment: BookingEnvironment<B>) -> Self {
        Self {
            store: Store::new(BookingState::default(), BookingReducer::new(), environment),
            timeout: DEFAULT_OUTCOME_TIMEOUT,
        }
    }

    /// Override the outcome wait.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start a new flow for `show_id`.
    pub async fn open_show(&self, show_id: ShowId, layout: SeatLayout) {
        self.store
            .send(BookingAction::OpenShow { show_id, layout })
            .await;
    }

    /// Flip one seat. `None` if the toggle was ignored (no show open, or the
    /// flow is submitting or booked).
    pub async fn toggle(&self, seat: &str) -> Option<ToggleOutcome> {
        self.store
            .send_and_read(
                BookingAction::ToggleSeat {
                    seat: seat.to_string(),
                },
                |s| s.last_toggle,
            )
            .await
    }

    /// Drop the selection.
    pub async fn clear(&self) {
        self.store.send(BookingAction::ClearSelection).await;
    }

    /// Book the current selection and wait for the outcome.
    ///
    /// # Errors
    ///
    /// - `Validation` for a missing show, user, seat or token (no remote call)
    /// - `SubmissionInFlight` if another submit is running
    /// - the remote error, verbatim, if the backend refuses the booking
    #[tracing::instrument(skip(self), fields(user_id = ?user_id))]
    pub async fn submit(&self, user_id: Option<UserId>) -> Result<Ticket> {
        let request_id = Uuid::new_v4();
        let outcome = self
            .store
            .send_and_wait_for(
                BookingAction::Submit {
                    request_id,
                    user_id,
                },
                |action| action.outcome_of() == Some(request_id),
                self.timeout,
            )
            .await
            .map_err(|e| ShowMasterError::Remote {
                status: None,
                message: format!("booking outcome unavailable: {e}"),
            })?;

        match outcome {
            BookingAction::BookingConfirmed { receipt, .. } => Ok(receipt),
            BookingAction::BookingRejected { error, .. }
            | BookingAction::SubmitRefused { error, .. } => Err(error),
            other => Err(ShowMasterError::Decode(format!(
                "unexpected booking outcome: {other:?}"
            ))),
        }
    }

    /// Read the flow state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&BookingState) -> T,
    {
        self.store.state(f).await
    }

    /// Snapshot of the flow state.
    pub async fn snapshot(&self) -> BookingState {
        self.store.state(Clone::clone).await
    }
}
