//! Catalog administration commands.

use super::App;
use crate::output;
use clap::{Args, Subcommand};
use showmaster_booking::{
    AdminForm, FormSubmitter, MovieForm, SeatPricingForm, ShowForm, TheaterForm, TheaterSeatForm,
};
use showmaster_core::{Result, ShowMasterError};
use std::sync::Arc;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Add a movie
    AddMovie {
        /// Title
        #[arg(long)]
        name: String,
        /// Genre, e.g. DRAMA
        #[arg(long)]
        genre: String,
        /// Language, e.g. ENGLISH
        #[arg(long)]
        language: String,
        /// Length in minutes
        #[arg(long)]
        duration: String,
        /// Release date, YYYY-MM-DD
        #[arg(long)]
        release_date: String,
        /// Rating from 0 to 10
        #[arg(long)]
        rating: Option<String>,
        /// Poster image URL
        #[arg(long)]
        poster_url: Option<String>,
    },
    /// Add a theater
    AddTheater {
        /// Theater name
        #[arg(long)]
        name: String,
        /// Street address
        #[arg(long)]
        address: String,
    },
    /// Add a seat to a theater
    AddSeat {
        /// Seat label, e.g. A1
        #[arg(long)]
        seat_no: String,
        /// CLASSIC or PREMIUM
        #[arg(long)]
        seat_type: String,
        /// Theater id
        #[arg(long)]
        theater_id: String,
    },
    /// Schedule a show
    AddShow {
        /// Movie id
        #[arg(long)]
        movie_id: String,
        /// Theater id
        #[arg(long)]
        theater_id: String,
        /// Start time, HH:mm or HH:mm:ss
        #[arg(long)]
        time: String,
        /// Date, YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Set seat prices for a show
    AssociateSeats {
        /// Show id
        #[arg(long)]
        show_id: String,
        /// Price of a classic seat
        #[arg(long)]
        classic: String,
        /// Price of a premium seat
        #[arg(long)]
        premium: String,
    },
}

impl AdminCommand {
    async fn submit(&self, submitter: &FormSubmitter<showmaster_client::ApiClient>) -> Result<String> {
        match self {
            Self::AddMovie {
                name,
                genre,
                language,
                duration,
                release_date,
                rating,
                poster_url,
            } => {
                send(submitter, MovieForm {
                    movie_name: name.clone(),
                    genre: genre.clone(),
                    language: language.clone(),
                    duration: duration.clone(),
                    rating: rating.clone().unwrap_or_default(),
                    release_date: release_date.clone(),
                    poster_url: poster_url.clone().unwrap_or_default(),
                })
                .await
            },
            Self::AddTheater { name, address } => {
                send(submitter, TheaterForm {
                    name: name.clone(),
                    address: address.clone(),
                })
                .await
            },
            Self::AddSeat {
                seat_no,
                seat_type,
                theater_id,
            } => {
                send(submitter, TheaterSeatForm {
                    seat_no: seat_no.clone(),
                    seat_type: seat_type.clone(),
                    theater_id: theater_id.clone(),
                })
                .await
            },
            Self::AddShow {
                movie_id,
                theater_id,
                time,
                date,
            } => {
                send(submitter, ShowForm {
                    movie_id: movie_id.clone(),
                    theater_id: theater_id.clone(),
                    show_time: time.clone(),
                    show_date: date.clone(),
                })
                .await
            },
            Self::AssociateSeats {
                show_id,
                classic,
                premium,
            } => {
                send(submitter, SeatPricingForm {
                    show_id: show_id.clone(),
                    classic_price: classic.clone(),
                    premium_price: premium.clone(),
                })
                .await
            },
        }
    }
}

async fn send<F: AdminForm>(
    submitter: &FormSubmitter<showmaster_client::ApiClient>,
    mut form: F,
) -> Result<String> {
    submitter.submit(&mut form).await
}

/// Execute admin commands. Requires an admin session.
pub async fn execute(app: &App, args: &AdminArgs) -> Result<()> {
    let profile = app.require_profile().await?;
    if !profile.is_admin() {
        return Err(ShowMasterError::Authentication(format!(
            "{} is not an admin",
            profile.username
        )));
    }

    let submitter = FormSubmitter::new(Arc::clone(&app.api), app.credentials());
    let message = args.command.submit(&submitter).await?;
    output::print_message(&message, app.format);
    Ok(())
}
