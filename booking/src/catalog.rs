//! Movie and show listings.
//!
//! Both reads go through [`retry_with_predicate`] so transient remote
//! failures are retried a small, fixed number of times. Filtering happens
//! locally on the fetched collection.

use showmaster_core::Result;
use showmaster_core::ShowMasterError;
use showmaster_core::providers::CatalogApi;
use showmaster_core::types::{Genre, Movie, MovieId, Show, ShowId};
use showmaster_runtime::retry::{RetryPolicy, retry_with_predicate};
use std::sync::Arc;

/// Text shown when a movie has no shows.
pub const NO_SHOWS_MESSAGE: &str = "no shows available";

/// Local filter over the fetched movie collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    /// Case-insensitive substring of the movie name or language
    pub search: Option<String>,
    /// Exact genre
    pub genre: Option<Genre>,
}

impl MovieFilter {
    /// Whether `movie` passes the filter. An empty filter passes everything.
    #[must_use]
    pub fn matches(&self, movie: &Movie) -> bool {
        let text_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|needle| {
                let needle = needle.to_lowercase();
                movie.movie_name.to_lowercase().contains(&needle)
                    || movie.language.to_lowercase().contains(&needle)
            });
        let genre_ok = self.genre.is_none_or(|genre| movie.genre == genre);
        text_ok && genre_ok
    }

    /// Movies passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, movies: &'a [Movie]) -> Vec<&'a Movie> {
        movies.iter().filter(|m| self.matches(m)).collect()
    }
}

/// Shows for the selected movie.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ShowListing {
    /// No movie selected; nothing is fetched.
    #[default]
    NotSelected,
    /// The movie has no shows. Booking is not offered.
    NoShows,
    /// Shows to pick from.
    Available(Vec<Show>),
}

impl ShowListing {
    fn from_shows(shows: Vec<Show>) -> Self {
        if shows.is_empty() {
            Self::NoShows
        } else {
            Self::Available(shows)
        }
    }

    /// Shows in the listing; empty unless [`Available`](Self::Available).
    #[must_use]
    pub fn shows(&self) -> &[Show] {
        match self {
            Self::Available(shows) => shows,
            Self::NotSelected | Self::NoShows => &[],
        }
    }

    /// Placeholder text, if the listing has nothing to show.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoShows => Some(NO_SHOWS_MESSAGE),
            Self::NotSelected | Self::Available(_) => None,
        }
    }
}

/// Catalog browsing state: movies, the selected movie, and its shows.
pub struct CatalogView<C> {
    api: Arc<C>,
    retry: RetryPolicy,
    movies: Vec<Movie>,
    selected_movie: Option<MovieId>,
    listing: ShowListing,
    selected_show: Option<ShowId>,
}

impl<C> std::fmt::Debug for CatalogView<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogView")
            .field("movies", &self.movies.len())
            .field("selected_movie", &self.selected_movie)
            .field("listing", &self.listing)
            .field("selected_show", &self.selected_show)
            .finish_non_exhaustive()
    }
}

impl<C: CatalogApi> CatalogView<C> {
    /// Empty view; nothing is fetched until asked.
    pub fn new(api: Arc<C>, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            movies: Vec::new(),
            selected_movie: None,
            listing: ShowListing::NotSelected,
            selected_show: None,
        }
    }

    /// Fetch every movie, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last `Remote`/`Decode` error once retries run out, or the
    /// first error of any other kind.
    #[tracing::instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let movies = retry_with_predicate(
            &self.retry,
            || self.api.list_movies(),
            ShowMasterError::is_remote,
        )
        .await?;
        tracing::debug!(count = movies.len(), "Fetched movies");
        Ok(movies)
    }

    /// Fetch the shows of one movie, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Same policy as [`list_movies`](Self::list_movies).
    #[tracing::instrument(skip(self), fields(movie_id = %movie_id))]
    pub async fn list_shows(&self, movie_id: MovieId) -> Result<Vec<Show>> {
        let shows = retry_with_predicate(
            &self.retry,
            || self.api.list_shows(movie_id),
            ShowMasterError::is_remote,
        )
        .await?;
        tracing::debug!(count = shows.len(), "Fetched shows");
        Ok(shows)
    }

    /// Refresh the cached movie collection.
    ///
    /// # Errors
    ///
    /// See [`list_movies`](Self::list_movies). The cache is left as it was.
    pub async fn load_movies(&mut self) -> Result<&[Movie]> {
        self.movies = self.list_movies().await?;
        Ok(&self.movies)
    }

    /// Select a movie and fetch its shows. Any selected show is dropped.
    ///
    /// # Errors
    ///
    /// See [`list_shows`](Self::list_shows). The movie stays selected with
    /// shows suspended, so the call can be repeated.
    pub async fn select_movie(&mut self, movie_id: MovieId) -> Result<&ShowListing> {
        self.selected_movie = Some(movie_id);
        self.selected_show = None;
        self.listing = ShowListing::NotSelected;

        let shows = self.list_shows(movie_id).await?;
        self.listing = ShowListing::from_shows(shows);
        Ok(&self.listing)
    }

    /// Back to browsing movies.
    pub fn clear_selection(&mut self) {
        self.selected_movie = None;
        self.selected_show = None;
        self.listing = ShowListing::NotSelected;
    }

    /// Pick a show from the current listing.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on `showId` if the show is not in the listing.
    pub fn select_show(&mut self, show_id: ShowId) -> Result<&Show> {
        let show = self
            .listing
            .shows()
            .iter()
            .find(|s| s.id == show_id)
            .ok_or_else(|| {
                ShowMasterError::validation("showId", format!("show {show_id} is not listed"))
            })?;
        self.selected_show = Some(show_id);
        Ok(show)
    }

    /// Cached movies from the last [`load_movies`](Self::load_movies).
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Cached movies passing `filter`.
    #[must_use]
    pub fn filtered(&self, filter: &MovieFilter) -> Vec<&Movie> {
        filter.apply(&self.movies)
    }

    /// The selected movie id.
    #[must_use]
    pub const fn selected_movie(&self) -> Option<MovieId> {
        self.selected_movie
    }

    /// Shows of the selected movie.
    #[must_use]
    pub const fn listing(&self) -> &ShowListing {
        &self.listing
    }

    /// The selected show id.
    #[must_use]
    pub const fn selected_show(&self) -> Option<ShowId> {
        self.selected_show
    }

    /// Booking is offered only for a show picked from an available listing.
    #[must_use]
    pub fn booking_offered(&self) -> bool {
        self.selected_show
            .is_some_and(|id| self.listing.shows().iter().any(|s| s.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showmaster_testing::fixtures;

    fn movies() -> Vec<Movie> {
        let mut hindi = fixtures::movie(2, "Lagaan", Genre::Sports);
        hindi.language = "HINDI".into();
        vec![
            fixtures::movie(1, "Dunkirk", Genre::War),
            hindi,
            fixtures::movie(3, "Up", Genre::Animation),
        ]
    }

    #[test]
    fn empty_filter_passes_all() {
        assert_eq!(MovieFilter::default().apply(&movies()).len(), 3);
        let blank = MovieFilter {
            search: Some("  ".into()),
            genre: None,
        };
        assert_eq!(blank.apply(&movies()).len(), 3);
    }

    #[test]
    fn search_matches_name_or_language() {
        let movies = movies();
        let by_name = MovieFilter {
            search: Some("dUnK".into()),
            genre: None,
        };
        assert_eq!(by_name.apply(&movies)[0].movie_name, "Dunkirk");

        let by_language = MovieFilter {
            search: Some("hindi".into()),
            genre: None,
        };
        let found = by_language.apply(&movies);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].movie_name, "Lagaan");
    }

    #[test]
    fn genre_and_search_combine() {
        let movies = movies();
        let filter = MovieFilter {
            search: Some("u".into()),
            genre: Some(Genre::Animation),
        };
        let found = filter.apply(&movies);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, MovieId::new(3));
    }

    #[test]
    fn listing_messages() {
        assert_eq!(ShowListing::NoShows.message(), Some(NO_SHOWS_MESSAGE));
        assert_eq!(ShowListing::NotSelected.message(), None);
        assert!(ShowListing::from_shows(Vec::new()) == ShowListing::NoShows);
        assert_eq!(
            ShowListing::from_shows(vec![fixtures::show(1)]).shows().len(),
            1
        );
    }
}
