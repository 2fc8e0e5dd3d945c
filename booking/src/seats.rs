//! Seat layout and selection for one show.
//!
//! The backend decides which seats exist, which are taken, and what they
//! cost. The client keeps an ordered selection and a display-only total.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether `seat` looks like a seat label: row letters followed by a number
/// (`A1`, `H10`, `AA3`).
#[must_use]
pub fn is_valid_seat_id(seat: &str) -> bool {
    let row_len = seat.chars().take_while(char::is_ascii_uppercase).count();
    let number = &seat[row_len..];
    row_len > 0 && !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
}

/// Normalize user input into a seat label (`" a1 "` → `"A1"`).
#[must_use]
pub fn normalize_seat(seat: &str) -> String {
    seat.trim().to_ascii_uppercase()
}

/// The seats of a show and which of them are already booked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLayout {
    seats: Vec<String>,
    booked: BTreeSet<String>,
}

impl SeatLayout {
    /// A rectangular hall: `rows` rows lettered from `A`, seats numbered from 1.
    ///
    /// Rows beyond `Z` are not generated.
    #[must_use]
    pub fn grid(rows: u8, per_row: u8) -> Self {
        let seats = (b'A'..b'A'.saturating_add(rows.min(26)))
            .flat_map(|row| (1..=per_row).map(move |n| format!("{}{n}", char::from(row))))
            .collect();
        Self {
            seats,
            booked: BTreeSet::new(),
        }
    }

    /// The default 8x10 hall (`A1`..`H10`).
    #[must_use]
    pub fn standard() -> Self {
        Self::grid(8, 10)
    }

    /// Same layout with `seats` marked booked.
    #[must_use]
    pub fn with_booked<I, S>(mut self, seats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mark_booked(seats);
        self
    }

    /// Mark seats booked, e.g. the ones the server just allotted.
    pub fn mark_booked<I, S>(&mut self, seats: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.booked
            .extend(seats.into_iter().map(|s| normalize_seat(s.as_ref())));
    }

    /// Every seat in layout order.
    #[must_use]
    pub fn seats(&self) -> &[String] {
        &self.seats
    }

    /// Whether the layout contains `seat`.
    #[must_use]
    pub fn contains(&self, seat: &str) -> bool {
        self.seats.iter().any(|s| s == seat)
    }

    /// Whether `seat` is already taken.
    #[must_use]
    pub fn is_booked(&self, seat: &str) -> bool {
        self.booked.contains(seat)
    }

    /// Seats still free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.seats.iter().filter(|s| !self.is_booked(s)).count()
    }
}

/// Result of toggling one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOutcome {
    /// The seat was added
    Selected,
    /// The seat was removed
    Deselected,
    /// The seat is booked; nothing changed
    Unavailable,
}

/// Seats picked for one show, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSelection {
    seats: Vec<String>,
}

impl SeatSelection {
    /// Flip membership of `seat`; booked seats are left alone.
    pub fn toggle(&mut self, seat: &str, layout: &SeatLayout) -> ToggleOutcome {
        let seat = normalize_seat(seat);
        if layout.is_booked(&seat) {
            return ToggleOutcome::Unavailable;
        }
        if let Some(pos) = self.seats.iter().position(|s| *s == seat) {
            self.seats.remove(pos);
            ToggleOutcome::Deselected
        } else {
            self.seats.push(seat);
            ToggleOutcome::Selected
        }
    }

    /// Drop every seat.
    pub fn clear(&mut self) {
        self.seats.clear();
    }

    /// Selected seats in selection order.
    #[must_use]
    pub fn seats(&self) -> &[String] {
        &self.seats
    }

    /// Whether `seat` is selected.
    #[must_use]
    pub fn contains(&self, seat: &str) -> bool {
        self.seats.iter().any(|s| s == seat)
    }

    /// Number of selected seats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Display-only total under `pricing`.
    #[must_use]
    pub fn total(&self, pricing: &RowPricing) -> u32 {
        self.seats.iter().map(|s| pricing.price_for(s)).sum()
    }
}

/// Row-threshold price estimate: rows up to `last_premium_row` are premium.
///
/// Only for display before booking. The booking response carries the amount
/// actually charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPricing {
    /// Last premium row letter
    pub last_premium_row: char,
    /// Price of a premium seat
    pub premium: u32,
    /// Price of any other seat
    pub classic: u32,
}

impl Default for RowPricing {
    fn default() -> Self {
        Self {
            last_premium_row: 'D',
            premium: 200,
            classic: 150,
        }
    }
}

impl RowPricing {
    /// Price of one seat.
    #[must_use]
    pub fn price_for(&self, seat: &str) -> u32 {
        match seat.chars().next() {
            Some(row) if row.is_ascii_uppercase() && row <= self.last_premium_row => self.premium,
            _ => self.classic,
        }
    }
}
