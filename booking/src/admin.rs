//! Admin create forms.
//!
//! Each form holds raw strings as typed. [`AdminForm::validate`] turns them
//! into a request or names the first bad field; [`FormSubmitter`] sends the
//! request and resets the form only on success.

use serde::Serialize;
use showmaster_core::providers::{AdminApi, AdminEndpoint, Credentials};
use showmaster_core::requests::{
    MovieRequest, ShowRequest, ShowSeatRequest, TheaterRequest, TheaterSeatRequest,
    parse_show_time,
};
use showmaster_core::types::{Genre, MovieId, SeatType, ShowId, TheaterId};
use showmaster_core::{Result, ShowMasterError, ValidationError};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// A form backed by one admin create endpoint.
pub trait AdminForm: Default {
    /// Body sent to the endpoint.
    type Request: Serialize + Send + Sync;

    /// Where the request goes.
    const ENDPOINT: AdminEndpoint;

    /// Check required fields and parse the typed ones.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    fn validate(&self) -> std::result::Result<Self::Request, ValidationError>;

    /// Blank every field.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn required<'a>(field: &str, value: &'a str) -> std::result::Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(value)
    }
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parsed<T: FromStr>(field: &str, value: &str) -> std::result::Result<T, ValidationError> {
    let value = required(field, value)?;
    value
        .parse()
        .map_err(|_| ValidationError::invalid(field, value))
}

fn date(field: &str, value: &str) -> std::result::Result<chrono::NaiveDate, ValidationError> {
    let value = required(field, value)?;
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::new(field, format!("'{value}' is not YYYY-MM-DD")))
}

fn price(field: &str, value: &str) -> std::result::Result<f64, ValidationError> {
    let price: f64 = parsed(field, value)?;
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ValidationError::new(field, "must not be negative"))
    }
}

/// Add a movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieForm {
    /// Title
    pub movie_name: String,
    /// Genre name, e.g. `DRAMA`
    pub genre: String,
    /// Language, e.g. `ENGLISH`
    pub language: String,
    /// Length in minutes
    pub duration: String,
    /// 0 to 10; optional
    pub rating: String,
    /// `YYYY-MM-DD`
    pub release_date: String,
    /// Poster image; optional
    pub poster_url: String,
}

impl AdminForm for MovieForm {
    type Request = MovieRequest;
    const ENDPOINT: AdminEndpoint = AdminEndpoint::AddMovie;

    fn validate(&self) -> std::result::Result<MovieRequest, ValidationError> {
        let movie_name = required("movieName", &self.movie_name)?.to_string();
        let genre_raw = required("genre", &self.genre)?;
        let genre =
            Genre::from_str(genre_raw).map_err(|_| ValidationError::invalid("genre", genre_raw))?;
        let language = required("language", &self.language)?.to_ascii_uppercase();
        let duration: u32 = parsed("duration", &self.duration)?;
        if duration == 0 {
            return Err(ValidationError::new("duration", "must be positive"));
        }
        let rating = optional(&self.rating)
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|r| (0.0..=10.0).contains(r))
                    .ok_or_else(|| ValidationError::new("rating", "must be between 0 and 10"))
            })
            .transpose()?;
        let release_date = date("releaseDate", &self.release_date)?;

        Ok(MovieRequest {
            movie_name,
            genre,
            language,
            duration,
            rating,
            release_date,
            poster_url: optional(&self.poster_url).map(str::to_string),
        })
    }
}

/// Add a theater.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TheaterForm {
    /// Theater name
    pub name: String,
    /// Street address
    pub address: String,
}

impl AdminForm for TheaterForm {
    type Request = TheaterRequest;
    const ENDPOINT: AdminEndpoint = AdminEndpoint::AddTheater;

    fn validate(&self) -> std::result::Result<TheaterRequest, ValidationError> {
        Ok(TheaterRequest {
            name: required("name", &self.name)?.to_string(),
            address: required("address", &self.address)?.to_string(),
        })
    }
}

/// Add one seat to a theater.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TheaterSeatForm {
    /// Seat label, e.g. `A1`
    pub seat_no: String,
    /// `CLASSIC` or `PREMIUM`
    pub seat_type: String,
    /// Theater the seat belongs to
    pub theater_id: String,
}

impl AdminForm for TheaterSeatForm {
    type Request = TheaterSeatRequest;
    const ENDPOINT: AdminEndpoint = AdminEndpoint::AddTheaterSeat;

    fn validate(&self) -> std::result::Result<TheaterSeatRequest, ValidationError> {
        let seat_no = required("seatNo", &self.seat_no)?.to_ascii_uppercase();
        let seat_type: SeatType = parsed("seatType", &self.seat_type)?;
        let theater_id: TheaterId = parsed("theaterId", &self.theater_id)?;
        Ok(TheaterSeatRequest {
            seat_no,
            seat_type,
            theater_id,
        })
    }
}

/// Schedule a show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowForm {
    /// Movie shown
    pub movie_id: String,
    /// Where
    pub theater_id: String,
    /// `HH:mm` or `HH:mm:ss`
    pub show_time: String,
    /// `YYYY-MM-DD`
    pub show_date: String,
}

impl AdminForm for ShowForm {
    type Request = ShowRequest;
    const ENDPOINT: AdminEndpoint = AdminEndpoint::AddShow;

    fn validate(&self) -> std::result::Result<ShowRequest, ValidationError> {
        let movie_id: MovieId = parsed("movieId", &self.movie_id)?;
        let theater_id: TheaterId = parsed("theaterId", &self.theater_id)?;
        let time_raw = required("showStartTime", &self.show_time)?;
        let show_start_time = parse_show_time(time_raw).ok_or_else(|| {
            ValidationError::new("showStartTime", format!("'{time_raw}' is not HH:mm or HH:mm:ss"))
        })?;
        let show_date = date("showDate", &self.show_date)?;
        Ok(ShowRequest {
            show_start_time,
            show_date,
            theater_id,
            movie_id,
        })
    }
}

/// Set per-type seat prices for a show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatPricingForm {
    /// Show to price
    pub show_id: String,
    /// Price of a classic seat
    pub classic_price: String,
    /// Price of a premium seat
    pub premium_price: String,
}

impl AdminForm for SeatPricingForm {
    type Request = ShowSeatRequest;
    const ENDPOINT: AdminEndpoint = AdminEndpoint::AssociateSeats;

    fn validate(&self) -> std::result::Result<ShowSeatRequest, ValidationError> {
        let show_id: ShowId = parsed("showId", &self.show_id)?;
        Ok(ShowSeatRequest {
            show_id,
            price_for_classic_seats: price("priceForClassicSeats", &self.classic_price)?,
            price_for_premium_seats: price("priceForPremiumSeats", &self.premium_price)?,
        })
    }
}

/// Clears the in-flight flag when a submit ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends admin forms, one at a time.
///
/// Back one form screen with one submitter: a submit while another is in
/// flight is rejected.
pub struct FormSubmitter<A> {
    api: Arc<A>,
    credentials: Arc<dyn Credentials>,
    in_flight: AtomicBool,
}

impl<A> std::fmt::Debug for FormSubmitter<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSubmitter")
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<A: AdminApi> FormSubmitter<A> {
    /// Create a submitter.
    pub fn new(api: Arc<A>, credentials: Arc<dyn Credentials>) -> Self {
        Self {
            api,
            credentials,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submit is running.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate, send, and reset `form` on success.
    ///
    /// Returns the server's confirmation text. Every call uses a fresh
    /// idempotency key.
    ///
    /// # Errors
    ///
    /// - `SubmissionInFlight` if another submit is running
    /// - `Validation` for a missing or malformed field (no remote call)
    /// - `Authentication` if no token is held (no remote call)
    /// - the remote error, verbatim; the form keeps its fields
    #[tracing::instrument(skip_all, fields(endpoint = F::ENDPOINT.path()))]
    pub async fn submit<F: AdminForm>(&self, form: &mut F) -> Result<String> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Submit ignored, another is in flight");
            return Err(ShowMasterError::SubmissionInFlight);
        }
        let _in_flight = InFlight(&self.in_flight);

        let request = form.validate()?;
        let token = self
            .credentials
            .bearer()
            .ok_or_else(|| ShowMasterError::Authentication("login required".to_string()))?;
        let key = Uuid::new_v4().to_string();

        match self.api.create(&token, F::ENDPOINT, &request, &key).await {
            Ok(message) => {
                tracing::info!(idempotency_key = %key, "Created");
                form.reset();
                Ok(message)
            },
            Err(error) => {
                tracing::warn!(idempotency_key = %key, %error, "Create failed");
                Err(error)
            },
        }
    }
}
