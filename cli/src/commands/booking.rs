//! Booking and ticket history.

use super::App;
use crate::output::{self, OutputFormat};
use clap::Args;
use showmaster_booking::{
    BookingEnvironment, BookingState, BookingSubmitter, SeatLayout, TicketHistory, ToggleOutcome,
};
use showmaster_core::environment::SystemClock;
use showmaster_core::types::{ShowId, Ticket, UserId};
use showmaster_core::wire::split_seats;
use showmaster_core::Result;
use std::sync::Arc;
use tabled::Tabled;

/// Arguments for `book`
#[derive(Debug, Args)]
pub struct BookArgs {
    /// Show id
    #[arg(long)]
    pub show: u32,
    /// Comma-separated seats, e.g. A1,A2
    #[arg(long)]
    pub seats: String,
    /// Book for this user id instead of the logged-in one
    #[arg(long)]
    pub user: Option<u32>,
}

/// Ticket display row for table output
#[derive(Debug, Tabled)]
struct TicketRow {
    #[tabled(rename = "Movie")]
    movie: String,
    #[tabled(rename = "Theater")]
    theater: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            movie: ticket.movie_name.clone(),
            theater: ticket.theater_name.clone().unwrap_or_default(),
            date: ticket.date.map(|d| d.to_string()).unwrap_or_default(),
            time: ticket.time.clone().unwrap_or_default(),
            seats: ticket.seat_list(),
            amount: ticket
                .amount
                .map(|amount| format!("{amount:.2}"))
                .unwrap_or_default(),
        }
    }
}

/// `book --show <id> --seats A1,A2 [--user <id>]`
pub async fn book(app: &App, args: &BookArgs) -> Result<()> {
    let user_id = match args.user {
        Some(id) => UserId::new(id),
        None => app.require_profile().await?.id,
    };

    let booking = BookingSubmitter::new(BookingEnvironment::new(
        Arc::clone(&app.api),
        app.credentials(),
        Arc::new(SystemClock),
    ));
    booking
        .open_show(ShowId::new(args.show), SeatLayout::default())
        .await;
    for seat in split_seats(&args.seats) {
        if booking.toggle(&seat).await == Some(ToggleOutcome::Deselected) {
            // Listed twice; keep it selected
            booking.toggle(&seat).await;
        }
    }

    let estimate = booking.state(BookingState::total).await;
    tracing::debug!(estimate, "Estimated total before booking");

    let receipt = booking.submit(Some(user_id)).await?;
    match app.format {
        OutputFormat::Table => println!("{}", receipt.summary()),
        OutputFormat::Json => output::print_json(&receipt),
    }
    Ok(())
}

/// `tickets`
pub async fn tickets(app: &App) -> Result<()> {
    let profile = app.require_profile().await?;
    let history = TicketHistory::new(Arc::clone(&app.api), app.credentials());

    let tickets = history.load(Some(&profile)).await?;
    let rows: Vec<TicketRow> = tickets.iter().map(TicketRow::from).collect();
    output::print_list(&tickets, &rows, "No tickets yet.", app.format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_row_formats_amount_and_seats() {
        let ticket = Ticket {
            amount: Some(400.0),
            seats: vec!["A1".into(), "A2".into()],
            movie_name: "Dunkirk".into(),
            theater_name: Some("PVR".into()),
            address: None,
            date: None,
            time: Some("18:30:00".into()),
        };
        let row = TicketRow::from(&ticket);
        assert_eq!(row.amount, "400.00");
        assert_eq!(row.seats, "A1, A2");
        assert_eq!(row.theater, "PVR");
        assert_eq!(row.date, "");
    }
}
