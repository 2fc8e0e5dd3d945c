//! # ShowMaster Booking
//!
//! Everything between "what's playing" and "here is your ticket":
//!
//! - [`catalog`]: movie and show listings with bounded retries
//! - [`seats`]: seat layout, ordered selection, display-only pricing
//! - [`reducer`]: the booking flow as a [`Reducer`](showmaster_core::reducer::Reducer)
//! - [`submitter`]: the flow driven through the runtime `Store`
//! - [`admin`]: create forms with submit guards and idempotency keys
//! - [`tickets`]: a user's booking history
//!
//! ## Example
//!
//! ```ignore
//! let booking = BookingSubmitter::new(BookingEnvironment::new(
//!     Arc::clone(&api),
//!     Arc::new(session.clone()),
//!     Arc::new(SystemClock),
//! ));
//!
//! booking.open_show(ShowId::new(12), SeatLayout::standard()).await;
//! booking.toggle("A1").await;
//! booking.toggle("A2").await;
//! let receipt = booking.submit(Some(UserId::new(3))).await?;
//! println!("{}", receipt.summary());
//! ```

pub mod admin;
pub mod catalog;
pub mod reducer;
pub mod seats;
pub mod submitter;
pub mod tickets;

pub use admin::{
    AdminForm, FormSubmitter, MovieForm, SeatPricingForm, ShowForm, TheaterForm, TheaterSeatForm,
};
pub use catalog::{CatalogView, MovieFilter, NO_SHOWS_MESSAGE, ShowListing};
pub use reducer::{BookingAction, BookingEnvironment, BookingPhase, BookingReducer, BookingState};
pub use seats::{RowPricing, SeatLayout, SeatSelection, ToggleOutcome, is_valid_seat_id};
pub use submitter::BookingSubmitter;
pub use tickets::TicketHistory;
