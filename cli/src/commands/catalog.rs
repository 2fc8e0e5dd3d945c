//! Movie and show listings.

use super::App;
use crate::output;
use clap::Args;
use showmaster_booking::{CatalogView, MovieFilter, NO_SHOWS_MESSAGE, ShowListing};
use showmaster_core::types::{Genre, Movie, MovieId, Show};
use showmaster_core::{Result, ValidationError};
use showmaster_runtime::retry::RetryPolicy;
use std::sync::Arc;
use tabled::Tabled;

/// Arguments for `movies`
#[derive(Debug, Args)]
pub struct MoviesArgs {
    /// Case-insensitive text to find in the name or language
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only this genre (e.g. DRAMA)
    #[arg(short, long)]
    pub genre: Option<String>,
}

/// Arguments for `shows`
#[derive(Debug, Args)]
pub struct ShowsArgs {
    /// Movie id
    pub movie_id: u32,
}

/// Movie display row for table output
#[derive(Debug, Tabled)]
struct MovieRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Minutes")]
    duration: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Released")]
    release_date: String,
}

impl From<&Movie> for MovieRow {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.get(),
            name: movie.movie_name.clone(),
            genre: movie.genre.to_string(),
            language: movie.language.clone(),
            duration: movie.duration.map(|d| d.to_string()).unwrap_or_default(),
            rating: movie.rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
            release_date: movie.release_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

/// Show display row for table output
#[derive(Debug, Tabled)]
struct ShowRow {
    #[tabled(rename = "Show")]
    id: u32,
    #[tabled(rename = "Theater")]
    theater: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&Show> for ShowRow {
    fn from(show: &Show) -> Self {
        Self {
            id: show.id.get(),
            theater: show.theater_name().to_string(),
            date: show.date.map(|d| d.to_string()).unwrap_or_default(),
            time: show.time.clone().unwrap_or_default(),
        }
    }
}

fn catalog(app: &App) -> CatalogView<showmaster_client::ApiClient> {
    CatalogView::new(
        Arc::clone(&app.api),
        RetryPolicy::catalog(app.config.catalog_retries),
    )
}

/// `movies`
pub async fn movies(app: &App, args: &MoviesArgs) -> Result<()> {
    let genre = args
        .genre
        .as_deref()
        .map(|raw| raw.parse::<Genre>().map_err(|_| ValidationError::invalid("genre", raw)))
        .transpose()?;
    let filter = MovieFilter {
        search: args.search.clone(),
        genre,
    };

    let mut view = catalog(app);
    view.load_movies().await?;
    let movies: Vec<&Movie> = view.filtered(&filter);
    let rows: Vec<MovieRow> = movies.iter().map(|m| MovieRow::from(*m)).collect();
    output::print_list(&movies, &rows, "No movies found.", app.format);
    Ok(())
}

/// `shows <movie-id>`
pub async fn shows(app: &App, args: &ShowsArgs) -> Result<()> {
    let mut view = catalog(app);
    let listing = view.select_movie(MovieId::new(args.movie_id)).await?;

    let shows = listing.shows();
    let rows: Vec<ShowRow> = shows.iter().map(ShowRow::from).collect();
    let empty = match listing {
        ShowListing::NoShows | ShowListing::NotSelected => NO_SHOWS_MESSAGE,
        ShowListing::Available(_) => "",
    };
    output::print_list(shows, &rows, empty, app.format);
    Ok(())
}
