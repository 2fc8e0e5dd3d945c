//! Domain types as the booking backend returns them.

use crate::wire::{flexible_date, flexible_seats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw backend id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// The raw backend id.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Movie identifier
    MovieId
);
numeric_id!(
    /// Show identifier
    ShowId
);
numeric_id!(
    /// User identifier
    UserId
);
numeric_id!(
    /// Theater identifier
    TheaterId
);

// ============================================================================
// Enumerations
// ============================================================================

/// Movie genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    /// Action
    Action,
    /// Animation
    Animation,
    /// Comedy
    Comedy,
    /// Drama
    Drama,
    /// Historical
    Historical,
    /// Romantic
    Romantic,
    /// Social
    Social,
    /// Sports
    Sports,
    /// Thriller
    Thriller,
    /// War
    War,
    /// Any genre this client does not know about
    #[serde(other)]
    Other,
}

impl Genre {
    /// Every genre the backend accepts on create.
    pub const ALL: [Self; 10] = [
        Self::Action,
        Self::Animation,
        Self::Comedy,
        Self::Drama,
        Self::Historical,
        Self::Romantic,
        Self::Social,
        Self::Sports,
        Self::Thriller,
        Self::War,
    ];

    /// Wire name (`"ACTION"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Animation => "ANIMATION",
            Self::Comedy => "COMEDY",
            Self::Drama => "DRAMA",
            Self::Historical => "HISTORICAL",
            Self::Romantic => "ROMANTIC",
            Self::Social => "SOCIAL",
            Self::Sports => "SPORTS",
            Self::Thriller => "THRILLER",
            Self::War => "WAR",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Case-insensitive; `Other` is never parsed from user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| format!("unknown genre '{s}'"))
    }
}

/// Seat category within a theater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    /// Standard seat
    Classic,
    /// Premium seat
    Premium,
}

impl FromStr for SeatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASSIC" => Ok(Self::Classic),
            "PREMIUM" => Ok(Self::Premium),
            _ => Err(format!("unknown seat type '{s}'")),
        }
    }
}

/// Gender as accepted by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("unknown gender '{s}'")),
        }
    }
}

/// Role string granting admin forms.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Role string of an ordinary customer.
pub const ROLE_USER: &str = "ROLE_USER";

// ============================================================================
// Catalog
// ============================================================================

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Backend id
    pub id: MovieId,
    /// Display name
    pub movie_name: String,
    /// Genre
    pub genre: Genre,
    /// Language
    #[serde(default)]
    pub language: String,
    /// Running time in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    /// Rating on a 0-10 scale
    #[serde(default)]
    pub rating: Option<f64>,
    /// Release date
    #[serde(default, deserialize_with = "flexible_date")]
    pub release_date: Option<NaiveDate>,
    /// Poster image URL
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// The theater a show runs in, as embedded in show payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterSummary {
    /// Backend id, when the payload carries one
    #[serde(default)]
    pub id: Option<TheaterId>,
    /// Theater name
    #[serde(default)]
    pub name: String,
    /// Street address
    #[serde(default)]
    pub address: String,
}

/// One screening of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Backend id (`showId` or `id` on the wire)
    #[serde(alias = "showId")]
    pub id: ShowId,
    /// Movie this show belongs to; filled in by the client from the request path
    #[serde(default, skip_deserializing)]
    pub movie_id: Option<MovieId>,
    /// Theater
    #[serde(default)]
    pub theater: Option<TheaterSummary>,
    /// Screening date (`date` or `showDate`)
    #[serde(default, alias = "showDate", deserialize_with = "flexible_date")]
    pub date: Option<NaiveDate>,
    /// Start time as sent by the backend (`time` or `showTime`)
    #[serde(default, alias = "showTime")]
    pub time: Option<String>,
}

impl Show {
    /// Theater name, or an empty string.
    #[must_use]
    pub fn theater_name(&self) -> &str {
        self.theater.as_ref().map_or("", |t| t.name.as_str())
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// A booked ticket.
///
/// Returned both by the booking call and by the ticket history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Amount charged (`amount` or `totalPrice`); `None` if the backend
    /// left it out
    #[serde(default, alias = "totalPrice")]
    pub amount: Option<f64>,
    /// Seats allotted (`allottedSeats` or `bookedSeats`)
    #[serde(
        default,
        alias = "allottedSeats",
        alias = "bookedSeats",
        deserialize_with = "flexible_seats"
    )]
    pub seats: Vec<String>,
    /// Movie name
    #[serde(default)]
    pub movie_name: String,
    /// Theater name
    #[serde(default)]
    pub theater_name: Option<String>,
    /// Theater address
    #[serde(default)]
    pub address: Option<String>,
    /// Show date
    #[serde(default, deserialize_with = "flexible_date")]
    pub date: Option<NaiveDate>,
    /// Show time
    #[serde(default)]
    pub time: Option<String>,
}

impl Ticket {
    /// Seats joined as `A1, A2`.
    #[must_use]
    pub fn seat_list(&self) -> String {
        self.seats.join(", ")
    }

    /// Amount as shown to the user.
    #[must_use]
    pub fn amount_label(&self) -> String {
        self.amount
            .map_or_else(|| "not reported".to_string(), |amount| amount.to_string())
    }

    /// The confirmation line shown after a successful booking.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Ticket booked successfully! Amount: {}, Allotted Seats: {}, Movie: {}",
            self.amount_label(),
            self.seat_list(),
            self.movie_name
        )
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// The logged-in user as resolved from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User id (`userId` on the wire)
    #[serde(rename = "userId", alias = "id")]
    pub id: UserId,
    /// Login name
    pub username: String,
    /// Granted role strings
    #[serde(default)]
    pub authorities: BTreeSet<String>,
}

impl Profile {
    /// Whether the profile carries `ROLE_ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.authorities.contains(ROLE_ADMIN)
    }
}
