//! # ShowMaster REST Client
//!
//! Typed client for every endpoint of the movie-booking backend.
//!
//! ## Example
//!
//! ```no_run
//! use showmaster_client::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The CLI reads the URL from its `Config` (SHOWMASTER_API_URL).
//!     let client = ApiClient::new("http://localhost:8080");
//!
//!     for movie in client.list_movies().await? {
//!         println!("{} ({})", movie.movie_name, movie.genre);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - Collection endpoints decode anything but a JSON array as an empty list
//! - HTTP 401 becomes [`ApiError::Unauthorized`]; other rejections carry the
//!   backend's message verbatim
//! - [`ApiClient`] implements every provider trait from `showmaster-core`

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_URL, IDEMPOTENCY_HEADER};
pub use error::ApiError;
