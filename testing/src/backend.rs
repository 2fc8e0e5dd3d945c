//! In-memory stand-in for the booking backend.
//!
//! Every endpoint answers from a script: queued one-shot results first, then
//! a fallback. Every call is recorded for later inspection.

use serde::Serialize;
use showmaster_core::providers::{AccountApi, AdminApi, AdminEndpoint, BookingApi, CatalogApi};
use showmaster_core::requests::{LoginRequest, RegisterRequest, TicketRequest};
use showmaster_core::types::{Movie, MovieId, Profile, Show, Ticket, UserId};
use showmaster_core::{Result, ShowMasterError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `POST /api/user/addNew`
    Register(RegisterRequest),
    /// `POST /api/user/getToken`
    GetToken {
        /// Submitted username
        username: String,
    },
    /// `GET /api/user/profile`
    Profile {
        /// Bearer token
        token: String,
    },
    /// `GET /api/movie/all`
    ListMovies,
    /// `GET /api/show/movie/{id}`
    ListShows(MovieId),
    /// `POST /api/ticket/book`
    Book {
        /// Bearer token
        token: String,
        /// Request body
        request: TicketRequest,
    },
    /// `GET /api/ticket/user/{id}`
    UserTickets {
        /// Bearer token
        token: String,
        /// Requested user
        user_id: UserId,
    },
    /// Any admin create endpoint
    Create {
        /// Bearer token
        token: String,
        /// Endpoint hit
        endpoint: AdminEndpoint,
        /// Request body as JSON
        body: serde_json::Value,
        /// `Idempotency-Key` header
        idempotency_key: String,
    },
}

struct Script<T> {
    queued: VecDeque<Result<T>>,
    fallback: Result<T>,
}

impl<T: Clone> Script<T> {
    const fn new(fallback: Result<T>) -> Self {
        Self {
            queued: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> Result<T> {
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

struct Account {
    password: String,
    token: String,
}

struct MockState {
    accounts: HashMap<String, Account>,
    profiles: HashMap<String, Script<Profile>>,
    register: Script<String>,
    movies: Script<Vec<Movie>>,
    shows: Script<Vec<Show>>,
    booking: Script<Ticket>,
    tickets: Script<Vec<Ticket>>,
    admin: Script<String>,
    calls: Vec<Call>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            profiles: HashMap::new(),
            register: Script::new(Ok("User registered successfully".to_string())),
            movies: Script::new(Ok(Vec::new())),
            shows: Script::new(Ok(Vec::new())),
            booking: Script::new(Err(ShowMasterError::Remote {
                status: Some(500),
                message: "no booking scripted".to_string(),
            })),
            tickets: Script::new(Ok(Vec::new())),
            admin: Script::new(Ok("Saved successfully".to_string())),
            calls: Vec::new(),
        }
    }
}

/// Scriptable backend implementing every provider trait.
///
/// Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("calls", &self.calls().len())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl MockBackend {
    /// A backend with empty catalogs and no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn respond<T: Clone>(
        &self,
        call: Call,
        pick: impl FnOnce(&mut MockState) -> Result<T>,
    ) -> Result<T> {
        let result = {
            let mut state = self.lock();
            state.calls.push(call);
            pick(&mut state)
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        result
    }

    // ═══════════════════════════════════════════════════════════
    // Scripting
    // ═══════════════════════════════════════════════════════════

    /// Delay every response, to keep calls in flight.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Register credentials and the profile their token resolves to.
    #[must_use]
    pub fn with_account(self, password: &str, token: &str, profile: Profile) -> Self {
        {
            let mut state = self.lock();
            state.accounts.insert(
                profile.username.clone(),
                Account {
                    password: password.to_string(),
                    token: token.to_string(),
                },
            );
            state
                .profiles
                .insert(token.to_string(), Script::new(Ok(profile)));
        }
        self
    }

    /// Make `token` resolve to `profile` without registering credentials.
    #[must_use]
    pub fn with_profile(self, token: &str, profile: Profile) -> Self {
        self.lock()
            .profiles
            .insert(token.to_string(), Script::new(Ok(profile)));
        self
    }

    /// Make profile lookups for `token` fail with `error`.
    #[must_use]
    pub fn with_profile_error(self, token: &str, error: ShowMasterError) -> Self {
        self.lock()
            .profiles
            .insert(token.to_string(), Script::new(Err(error)));
        self
    }

    /// Movie list returned by default.
    #[must_use]
    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.lock().movies.fallback = Ok(movies);
        self
    }

    /// Queue a one-shot movie list result.
    pub fn push_movies(&self, result: Result<Vec<Movie>>) {
        self.lock().movies.queued.push_back(result);
    }

    /// Show list returned by default, for any movie.
    #[must_use]
    pub fn with_shows(self, shows: Vec<Show>) -> Self {
        self.lock().shows.fallback = Ok(shows);
        self
    }

    /// Queue a one-shot show list result.
    pub fn push_shows(&self, result: Result<Vec<Show>>) {
        self.lock().shows.queued.push_back(result);
    }

    /// Booking result returned by default.
    #[must_use]
    pub fn with_booking(self, result: Result<Ticket>) -> Self {
        self.lock().booking.fallback = result;
        self
    }

    /// Queue a one-shot booking result.
    pub fn push_booking(&self, result: Result<Ticket>) {
        self.lock().booking.queued.push_back(result);
    }

    /// Ticket history returned by default.
    #[must_use]
    pub fn with_tickets(self, tickets: Vec<Ticket>) -> Self {
        self.lock().tickets.fallback = Ok(tickets);
        self
    }

    /// Registration result returned by default.
    #[must_use]
    pub fn with_registration(self, result: Result<String>) -> Self {
        self.lock().register.fallback = result;
        self
    }

    /// Queue a one-shot admin create result.
    pub fn push_admin(&self, result: Result<String>) {
        self.lock().admin.queued.push_back(result);
    }

    // ═══════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

impl AccountApi for MockBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<String> {
        self.respond(Call::Register(request.clone()), |s| s.register.next())
            .await
    }

    async fn get_token(&self, request: &LoginRequest) -> Result<String> {
        let call = Call::GetToken {
            username: request.username.clone(),
        };
        self.respond(call, |s| match s.accounts.get(&request.username) {
            Some(account) if account.password == request.password => Ok(account.token.clone()),
            _ => Err(ShowMasterError::Authentication("Bad credentials".to_string())),
        })
        .await
    }

    async fn profile(&self, token: &str) -> Result<Profile> {
        let call = Call::Profile {
            token: token.to_string(),
        };
        self.respond(call, |s| match s.profiles.get_mut(token) {
            Some(script) => script.next(),
            None => Err(ShowMasterError::Authentication("invalid token".to_string())),
        })
        .await
    }
}

impl CatalogApi for MockBackend {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.respond(Call::ListMovies, |s| s.movies.next()).await
    }

    async fn list_shows(&self, movie_id: MovieId) -> Result<Vec<Show>> {
        let shows = self
            .respond(Call::ListShows(movie_id), |s| s.shows.next())
            .await?;
        Ok(shows
            .into_iter()
            .map(|mut show| {
                show.movie_id = Some(movie_id);
                show
            })
            .collect())
    }
}

impl BookingApi for MockBackend {
    async fn book(&self, token: &str, request: &TicketRequest) -> Result<Ticket> {
        let call = Call::Book {
            token: token.to_string(),
            request: request.clone(),
        };
        self.respond(call, |s| s.booking.next()).await
    }

    async fn user_tickets(&self, token: &str, user_id: UserId) -> Result<Vec<Ticket>> {
        let call = Call::UserTickets {
            token: token.to_string(),
            user_id,
        };
        self.respond(call, |s| s.tickets.next()).await
    }
}

impl AdminApi for MockBackend {
    async fn create<R>(
        &self,
        token: &str,
        endpoint: AdminEndpoint,
        body: &R,
        idempotency_key: &str,
    ) -> Result<String>
    where
        R: Serialize + Sync,
    {
        let body = serde_json::to_value(body).map_err(|e| ShowMasterError::Decode(e.to_string()))?;
        let call = Call::Create {
            token: token.to_string(),
            endpoint,
            body,
            idempotency_key: idempotency_key.to_string(),
        };
        self.respond(call, |s| s.admin.next()).await
    }
}
