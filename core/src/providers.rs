//! Remote capabilities.
//!
//! Every backend call the client makes goes through one of these traits. The
//! REST client implements all of them; tests use an in-memory backend.
//!
//! Bearer tokens are passed per call rather than held by the implementation,
//! so a single client can serve whatever session is current.

use crate::error::Result;
use crate::requests::{LoginRequest, RegisterRequest, TicketRequest};
use crate::types::{Movie, MovieId, Profile, Show, Ticket, UserId};
use serde::Serialize;
use std::future::Future;

/// Account endpoints under `/api/user`.
pub trait AccountApi: Send + Sync {
    /// Create an account. Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `Remote` with the server message if the account is rejected.
    fn register(&self, request: &RegisterRequest) -> impl Future<Output = Result<String>> + Send;

    /// Exchange credentials for an opaque bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` or `Remote` if the credentials are rejected.
    fn get_token(&self, request: &LoginRequest) -> impl Future<Output = Result<String>> + Send;

    /// Resolve a token into the profile it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` on HTTP 401, `Remote` on any other failure.
    fn profile(&self, token: &str) -> impl Future<Output = Result<Profile>> + Send;
}

/// Public catalog reads.
pub trait CatalogApi: Send + Sync {
    /// Every movie. Non-array bodies decode as an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Remote` on transport failure or a non-2xx status.
    fn list_movies(&self) -> impl Future<Output = Result<Vec<Movie>>> + Send;

    /// Shows of one movie. Non-array bodies decode as an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Remote` on transport failure or a non-2xx status.
    fn list_shows(&self, movie_id: MovieId) -> impl Future<Output = Result<Vec<Show>>> + Send;
}

/// Ticket endpoints.
pub trait BookingApi: Send + Sync {
    /// Book seats for a show.
    ///
    /// # Errors
    ///
    /// Returns `Remote` with the server message verbatim when the booking is
    /// rejected (for example, a seat is already taken).
    fn book(
        &self,
        token: &str,
        request: &TicketRequest,
    ) -> impl Future<Output = Result<Ticket>> + Send;

    /// Tickets booked by one user.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` or `Remote` if the call fails.
    fn user_tickets(
        &self,
        token: &str,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Ticket>>> + Send;
}

/// Admin create endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminEndpoint {
    /// `POST /api/movie/addNew`
    AddMovie,
    /// `POST /api/theater/addNew`
    AddTheater,
    /// `POST /api/theater/addTheaterSeat`
    AddTheaterSeat,
    /// `POST /api/show/addNew`
    AddShow,
    /// `POST /api/show/associateSeats`
    AssociateSeats,
}

impl AdminEndpoint {
    /// Request path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AddMovie => "/api/movie/addNew",
            Self::AddTheater => "/api/theater/addNew",
            Self::AddTheaterSeat => "/api/theater/addTheaterSeat",
            Self::AddShow => "/api/show/addNew",
            Self::AssociateSeats => "/api/show/associateSeats",
        }
    }
}

/// Authenticated create calls used by the admin forms.
pub trait AdminApi: Send + Sync {
    /// Submit one create request. Returns the server's confirmation text.
    ///
    /// `idempotency_key` is sent as the `Idempotency-Key` header.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` on 401 and `Remote` with the server message
    /// on any other rejection.
    fn create<R>(
        &self,
        token: &str,
        endpoint: AdminEndpoint,
        body: &R,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<String>> + Send
    where
        R: Serialize + Sync;
}

/// Source of the current bearer token.
///
/// Object-safe so reducers can hold it as `Arc<dyn Credentials>`.
pub trait Credentials: Send + Sync {
    /// The token to send, if any.
    fn bearer(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths() {
        assert_eq!(AdminEndpoint::AddTheaterSeat.path(), "/api/theater/addTheaterSeat");
        assert_eq!(AdminEndpoint::AssociateSeats.path(), "/api/show/associateSeats");
    }
}
