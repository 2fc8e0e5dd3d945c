//! Request bodies, serialized with the backend's camelCase field names.
//!
//! These are the validated forms of user input; building them is the job of
//! the account and admin forms.

use crate::types::{Gender, Genre, MovieId, SeatType, ShowId, TheaterId, UserId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// `POST /api/user/addNew`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name (also the login username)
    pub name: String,
    /// Email address
    pub email_id: String,
    /// Password
    pub password: String,
    /// Age
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Mobile number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    /// Postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Gender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Comma-separated roles; omitted to get the server default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<String>,
}

/// `POST /api/user/getToken`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/movie/addNew`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    /// Display name
    pub movie_name: String,
    /// Genre
    pub genre: Genre,
    /// Language (backend enum name, e.g. `ENGLISH`)
    pub language: String,
    /// Running time in minutes
    pub duration: u32,
    /// Rating on a 0-10 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Release date
    pub release_date: NaiveDate,
    /// Poster image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// `POST /api/theater/addNew`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterRequest {
    /// Theater name
    pub name: String,
    /// Street address
    pub address: String,
}

/// `POST /api/theater/addTheaterSeat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheaterSeatRequest {
    /// Seat label, e.g. `A1`
    pub seat_no: String,
    /// Seat category
    pub seat_type: SeatType,
    /// Owning theater
    pub theater_id: TheaterId,
}

/// `POST /api/show/addNew`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    /// Start time, sent as `HH:mm:ss`
    #[serde(with = "show_time")]
    pub show_start_time: NaiveTime,
    /// Screening date
    pub show_date: NaiveDate,
    /// Theater
    pub theater_id: TheaterId,
    /// Movie
    pub movie_id: MovieId,
}

mod show_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_show_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid show time '{raw}'")))
    }
}

/// Parse a show time in `HH:mm` or `HH:mm:ss` (24-hour).
#[must_use]
pub fn parse_show_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// `POST /api/show/associateSeats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowSeatRequest {
    /// Show to price
    pub show_id: ShowId,
    /// Price of every CLASSIC seat
    pub price_for_classic_seats: f64,
    /// Price of every PREMIUM seat
    pub price_for_premium_seats: f64,
}

/// `POST /api/ticket/book`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    /// Show to book
    pub show_id: ShowId,
    /// Booking user
    pub user_id: UserId,
    /// Requested seats in selection order
    pub seat_nos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticket_request_wire_shape() {
        let req = TicketRequest {
            show_id: ShowId::new(12),
            user_id: UserId::new(3),
            seat_nos: vec!["A1".into(), "A2".into()],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"showId": 12, "userId": 3, "seatNos": ["A1", "A2"]})
        );
    }

    #[test]
    fn show_request_sends_seconds() {
        let req = ShowRequest {
            show_start_time: parse_show_time("18:30").unwrap(),
            show_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            theater_id: TheaterId::new(1),
            movie_id: MovieId::new(5),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"showStartTime": "18:30:00", "showDate": "2025-01-02", "theaterId": 1, "movieId": 5})
        );
    }

    #[test]
    fn show_time_formats() {
        assert!(parse_show_time("09:05").is_some());
        assert!(parse_show_time("21:15:30").is_some());
        assert!(parse_show_time("9pm").is_none());
        assert!(parse_show_time("25:00").is_none());
    }

    #[test]
    fn register_omits_empty_optionals() {
        let req = RegisterRequest {
            name: "ann".into(),
            email_id: "ann@example.com".into(),
            password: "pw".into(),
            age: None,
            mobile_no: None,
            address: None,
            gender: Some(Gender::Female),
            roles: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"name": "ann", "emailId": "ann@example.com", "password": "pw", "gender": "FEMALE"})
        );
    }

    #[test]
    fn login_debug_redacts_password() {
        let req = LoginRequest {
            username: "ann".into(),
            password: "secret".into(),
        };
        assert!(!format!("{req:?}").contains("secret"));
    }
}
