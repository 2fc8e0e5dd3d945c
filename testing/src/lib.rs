//! # ShowMaster Testing
//!
//! Testing utilities for the ShowMaster client crates.
//!
//! This crate provides:
//! - [`MockBackend`]: a scriptable in-memory backend implementing every
//!   provider trait, with a call log
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - Deterministic clock and static credentials
//! - proptest strategies for seat identifiers
//!
//! ## Example
//!
//! ```ignore
//! use showmaster_testing::{MockBackend, fixtures};
//!
//! #[tokio::test]
//! async fn shows_are_listed() {
//!     let backend = MockBackend::new().with_shows(vec![fixtures::show(12)]);
//!     let catalog = CatalogView::new(Arc::new(backend.clone()), RetryPolicy::none());
//!     // ...
//! }
//! ```

use chrono::{DateTime, Utc};
use showmaster_core::environment::Clock;

pub mod backend;
mod reducer_test;

pub use backend::{Call, MockBackend};
pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use showmaster_core::providers::Credentials;

    /// Clock that always returns the same instant.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at `time`.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A fixed clock at 2025-01-01 00:00:00 UTC.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// Credentials that never change.
    #[derive(Debug, Clone, Default)]
    pub struct StaticCredentials(pub Option<String>);

    impl StaticCredentials {
        /// Credentials holding `token`.
        #[must_use]
        pub fn token(token: &str) -> Self {
            Self(Some(token.to_string()))
        }

        /// No token at all.
        #[must_use]
        pub const fn anonymous() -> Self {
            Self(None)
        }
    }

    impl Credentials for StaticCredentials {
        fn bearer(&self) -> Option<String> {
            self.0.clone()
        }
    }
}

/// Ready-made domain values.
pub mod fixtures {
    use showmaster_core::types::{
        Genre, Movie, MovieId, Profile, ROLE_ADMIN, ROLE_USER, Show, ShowId, TheaterSummary,
        Ticket, UserId,
    };

    /// A movie with the given id and name.
    #[must_use]
    pub fn movie(id: u32, name: &str, genre: Genre) -> Movie {
        Movie {
            id: MovieId::new(id),
            movie_name: name.to_string(),
            genre,
            language: "ENGLISH".to_string(),
            duration: Some(120),
            rating: Some(7.5),
            release_date: None,
            poster_url: None,
        }
    }

    /// A show at the PVR theater.
    #[must_use]
    pub fn show(id: u32) -> Show {
        Show {
            id: ShowId::new(id),
            movie_id: None,
            theater: Some(TheaterSummary {
                id: None,
                name: "PVR".to_string(),
                address: "Main St".to_string(),
            }),
            date: None,
            time: Some("18:30:00".to_string()),
        }
    }

    /// A customer profile.
    #[must_use]
    pub fn user(id: u32, username: &str) -> Profile {
        Profile {
            id: UserId::new(id),
            username: username.to_string(),
            authorities: [ROLE_USER.to_string()].into(),
        }
    }

    /// An admin profile.
    #[must_use]
    pub fn admin(id: u32, username: &str) -> Profile {
        Profile {
            id: UserId::new(id),
            username: username.to_string(),
            authorities: [ROLE_ADMIN.to_string()].into(),
        }
    }

    /// A booking receipt.
    #[must_use]
    pub fn receipt(amount: f64, seats: &[&str], movie: &str) -> Ticket {
        Ticket {
            amount: Some(amount),
            seats: seats.iter().map(ToString::to_string).collect(),
            movie_name: movie.to_string(),
            theater_name: None,
            address: None,
            date: None,
            time: None,
        }
    }
}

/// Property-based testing strategies.
pub mod properties {
    use proptest::prelude::*;

    /// Seat labels in an 8x10 hall: `A1` through `H10`.
    pub fn seat_label() -> impl Strategy<Value = String> {
        (0u8..8, 1u8..=10).prop_map(|(row, n)| format!("{}{n}", char::from(b'A' + row)))
    }

    /// A sequence of seat labels to toggle.
    pub fn toggle_sequence(max_len: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(seat_label(), 0..max_len)
    }
}

pub use mocks::{FixedClock, StaticCredentials, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use showmaster_core::providers::Credentials;

    #[test]
    fn test_clock_is_new_year_2025() {
        let now = test_clock().now();
        assert_eq!((now.year(), now.month(), now.day()), (2025, 1, 1));
        assert_eq!(now, test_clock().now());
    }

    #[test]
    fn static_credentials() {
        assert_eq!(StaticCredentials::token("abc").bearer().as_deref(), Some("abc"));
        assert_eq!(StaticCredentials::anonymous().bearer(), None);
    }
}
