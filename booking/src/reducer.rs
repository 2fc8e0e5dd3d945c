//! Booking flow as a reducer.
//!
//! `NoSelection → SelectingSeats → Submitting → Booked`, with a rejected
//! submit falling back to `SelectingSeats`. The remote call is an
//! [`Effect::Future`] that feeds `BookingConfirmed` or `BookingRejected`
//! back into the reducer.
//!
//! Every `Submit` carries a request id and every outcome echoes it, so
//! observers waiting on the store can tell their own outcome apart from a
//! concurrent one.

use crate::seats::{RowPricing, SeatLayout, SeatSelection, ToggleOutcome, is_valid_seat_id};
use chrono::{DateTime, Utc};
use showmaster_core::environment::Clock;
use showmaster_core::providers::{BookingApi, Credentials};
use showmaster_core::requests::TicketRequest;
use showmaster_core::types::{ShowId, Ticket, UserId};
use showmaster_core::{
    SmallVec, ShowMasterError, ValidationError, effect::Effect, reducer::Reducer, smallvec,
};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Where the booking flow is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingPhase {
    /// Nothing selected yet
    #[default]
    NoSelection,
    /// At least one seat selected
    SelectingSeats,
    /// Booking call in flight
    Submitting,
    /// Booking confirmed; open a show to start over
    Booked,
}

/// State of one booking flow.
#[derive(Debug, Clone, Default)]
pub struct BookingState {
    /// Current phase
    pub phase: BookingPhase,
    /// Show being booked
    pub show_id: Option<ShowId>,
    /// Seats of that show
    pub layout: SeatLayout,
    /// Seats picked so far
    pub selection: SeatSelection,
    /// Display-only price rule
    pub pricing: RowPricing,
    /// Outcome of the most recent toggle; `None` if it was ignored
    pub last_toggle: Option<ToggleOutcome>,
    /// Request id of the submit in flight
    pub in_flight: Option<Uuid>,
    /// Receipt of the confirmed booking
    pub last_receipt: Option<Ticket>,
    /// Most recent failure, local or remote
    pub last_error: Option<ShowMasterError>,
    /// When the booking was confirmed
    pub booked_at: Option<DateTime<Utc>>,
}

impl BookingState {
    /// Display-only total of the current selection.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.selection.total(&self.pricing)
    }

    /// Whether a booking call is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, BookingPhase::Submitting)
    }

    fn selection_phase(&self) -> BookingPhase {
        if self.selection.is_empty() {
            BookingPhase::NoSelection
        } else {
            BookingPhase::SelectingSeats
        }
    }
}

/// Booking flow actions.
#[derive(Debug, Clone)]
pub enum BookingAction {
    // Commands
    /// Start a new flow for a show.
    OpenShow {
        /// Show to book
        show_id: ShowId,
        /// Its seats
        layout: SeatLayout,
    },
    /// Flip one seat.
    ToggleSeat {
        /// Seat label, e.g. `A1`
        seat: String,
    },
    /// Drop every selected seat.
    ClearSelection,
    /// Book the selection.
    Submit {
        /// Correlates the outcome with this submit
        request_id: Uuid,
        /// Who is booking
        user_id: Option<UserId>,
    },

    // Outcomes
    /// The backend booked the seats.
    BookingConfirmed {
        /// Echo of the submit's request id
        request_id: Uuid,
        /// Receipt returned by the backend
        receipt: Ticket,
    },
    /// The backend refused the booking.
    BookingRejected {
        /// Echo of the submit's request id
        request_id: Uuid,
        /// Error as surfaced by the remote layer
        error: ShowMasterError,
    },
    /// The submit failed before any remote call.
    SubmitRefused {
        /// Echo of the submit's request id
        request_id: Uuid,
        /// Validation failure or `SubmissionInFlight`
        error: ShowMasterError,
    },
}

impl BookingAction {
    /// Request id of an outcome action; `None` for commands.
    #[must_use]
    pub const fn outcome_of(&self) -> Option<Uuid> {
        match self {
            Self::BookingConfirmed { request_id, .. }
            | Self::BookingRejected { request_id, .. }
            | Self::SubmitRefused { request_id, .. } => Some(*request_id),
            Self::OpenShow { .. }
            | Self::ToggleSeat { .. }
            | Self::ClearSelection
            | Self::Submit { .. } => None,
        }
    }
}

/// Dependencies of the booking reducer.
pub struct BookingEnvironment<B> {
    /// Ticket endpoints
    pub api: Arc<B>,
    /// Current bearer token
    pub credentials: Arc<dyn Credentials>,
    /// Stamps confirmed bookings
    pub clock: Arc<dyn Clock>,
}

impl<B> Clone for BookingEnvironment<B> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            credentials: Arc::clone(&self.credentials),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B> BookingEnvironment<B> {
    /// Bundle the dependencies.
    pub fn new(api: Arc<B>, credentials: Arc<dyn Credentials>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            credentials,
            clock,
        }
    }
}

/// Reducer for [`BookingState`].
pub struct BookingReducer<B> {
    _api: PhantomData<fn() -> B>,
}

impl<B> BookingReducer<B> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _api: PhantomData }
    }
}

impl<B> Default for BookingReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Clone for BookingReducer<B> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Everything a booking call needs, or the reason it cannot be made.
fn prepare(
    state: &BookingState,
    user_id: Option<UserId>,
    credentials: &dyn Credentials,
) -> Result<(String, TicketRequest), ShowMasterError> {
    if state.is_submitting() {
        return Err(ShowMasterError::SubmissionInFlight);
    }
    let show_id = state.show_id.ok_or_else(|| ValidationError::required("showId"))?;
    let user_id = user_id.ok_or_else(|| ValidationError::required("userId"))?;
    if state.selection.is_empty() {
        return Err(ValidationError::required("seatNos").into());
    }
    if let Some(bad) = state.selection.seats().iter().find(|s| !is_valid_seat_id(s)) {
        return Err(ValidationError::invalid("seatNos", bad).into());
    }
    let token = credentials
        .bearer()
        .ok_or_else(|| ValidationError::new("token", "you must be logged in to book tickets"))?;

    Ok((
        token,
        TicketRequest {
            show_id,
            user_id,
            seat_nos: state.selection.seats().to_vec(),
        },
    ))
}

impl<B> Reducer for BookingReducer<B>
where
    B: BookingApi + 'static,
{
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment<B>;

    fn reduce(
        &self,
        state: &mut BookingState,
        action: BookingAction,
        env: &BookingEnvironment<B>,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        match action {
            BookingAction::OpenShow { show_id, layout } => {
                *state = BookingState {
                    show_id: Some(show_id),
                    layout,
                    pricing: state.pricing,
                    ..BookingState::default()
                };
                SmallVec::new()
            },

            BookingAction::ToggleSeat { seat } => {
                if state.show_id.is_none()
                    || matches!(state.phase, BookingPhase::Submitting | BookingPhase::Booked)
                {
                    tracing::debug!(phase = ?state.phase, "Seat toggle ignored");
                    state.last_toggle = None;
                    return SmallVec::new();
                }
                let outcome = state.selection.toggle(&seat, &state.layout);
                state.last_toggle = Some(outcome);
                state.phase = state.selection_phase();
                SmallVec::new()
            },

            BookingAction::ClearSelection => {
                if !state.is_submitting() {
                    state.selection.clear();
                    if state.phase == BookingPhase::SelectingSeats {
                        state.phase = BookingPhase::NoSelection;
                    }
                }
                SmallVec::new()
            },

            BookingAction::Submit {
                request_id,
                user_id,
            } => match prepare(state, user_id, env.credentials.as_ref()) {
                Err(error) => {
                    tracing::debug!(%error, "Booking refused locally");
                    if !matches!(error, ShowMasterError::SubmissionInFlight) {
                        state.last_error = Some(error.clone());
                    }
                    smallvec![Effect::future(async move {
                        Some(BookingAction::SubmitRefused { request_id, error })
                    })]
                },
                Ok((token, request)) => {
                    tracing::info!(
                        show_id = %request.show_id,
                        seats = request.seat_nos.len(),
                        "Submitting booking"
                    );
                    state.phase = BookingPhase::Submitting;
                    state.in_flight = Some(request_id);
                    state.last_error = None;

                    let api = Arc::clone(&env.api);
                    smallvec![Effect::future(async move {
                        Some(match api.book(&token, &request).await {
                            Ok(receipt) => BookingAction::BookingConfirmed {
                                request_id,
                                receipt,
                            },
                            Err(error) => BookingAction::BookingRejected { request_id, error },
                        })
                    })]
                },
            },

            BookingAction::BookingConfirmed {
                request_id,
                receipt,
            } => {
                if state.in_flight != Some(request_id) {
                    tracing::debug!(%request_id, "Stale booking confirmation ignored");
                    return SmallVec::new();
                }
                tracing::info!(amount = receipt.amount, seats = %receipt.seat_list(), "Booking confirmed");
                state.layout.mark_booked(&receipt.seats);
                state.selection.clear();
                state.phase = BookingPhase::Booked;
                state.in_flight = None;
                state.booked_at = Some(env.clock.now());
                state.last_receipt = Some(receipt);
                SmallVec::new()
            },

            BookingAction::BookingRejected { request_id, error } => {
                if state.in_flight != Some(request_id) {
                    tracing::debug!(%request_id, "Stale booking rejection ignored");
                    return SmallVec::new();
                }
                tracing::warn!(%error, "Booking rejected");
                state.in_flight = None;
                state.phase = state.selection_phase();
                state.last_error = Some(error);
                SmallVec::new()
            },

            // Already recorded when the submit was refused.
            BookingAction::SubmitRefused { .. } => SmallVec::new(),
        }
    }
}
