//! Booking backend client implementation

use crate::error::{ApiError, error_message};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use showmaster_core::providers::{AccountApi, AdminApi, AdminEndpoint, BookingApi, CatalogApi};
use showmaster_core::requests::{LoginRequest, RegisterRequest, TicketRequest};
use showmaster_core::types::{Movie, MovieId, Profile, Show, Ticket, UserId};
use showmaster_core::wire::normalize_collection;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Header carrying the per-submission idempotency key.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Booking backend client
///
/// Cheap to clone; clones share the connection pool. Bearer tokens are
/// passed per call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// The backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and turn non-2xx statuses into errors.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("request rejected");
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, reason);
        tracing::debug!(status = status.as_u16(), %message, "Backend rejected request");

        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized(message))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.text().await?)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.text(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// Collection endpoints: anything but a JSON array is an empty list.
    async fn collection<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let body = self.text(request).await?;
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) else {
            tracing::debug!(bytes = body.len(), "Collection body is not JSON, treating as empty");
            return Ok(Vec::new());
        };
        normalize_collection(value).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    // ═══════════════════════════════════════════════════════════
    // Accounts
    // ═══════════════════════════════════════════════════════════

    /// `POST /api/user/addNew`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, ApiError> {
        self.text(self.client.post(self.url("/api/user/addNew")).json(request))
            .await
    }

    /// `POST /api/user/getToken`
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the body is empty.
    #[tracing::instrument(skip_all, fields(username = %request.username))]
    pub async fn get_token(&self, request: &LoginRequest) -> Result<String, ApiError> {
        let token = self
            .text(self.client.post(self.url("/api/user/getToken")).json(request))
            .await?;
        let token = token.trim().trim_matches('"').to_string();
        if token.is_empty() {
            return Err(ApiError::ResponseParseFailed("empty token".to_string()));
        }
        Ok(token)
    }

    /// `GET /api/user/profile`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is rejected.
    #[tracing::instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> Result<Profile, ApiError> {
        self.json(self.client.get(self.url("/api/user/profile")).bearer_auth(token))
            .await
    }

    // ═══════════════════════════════════════════════════════════
    // Catalog
    // ═══════════════════════════════════════════════════════════

    /// `GET /api/movie/all`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[tracing::instrument(skip_all)]
    pub async fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.collection(self.client.get(self.url("/api/movie/all")))
            .await
    }

    /// `GET /api/show/movie/{movieId}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[tracing::instrument(skip(self))]
    pub async fn list_shows(&self, movie_id: MovieId) -> Result<Vec<Show>, ApiError> {
        let mut shows: Vec<Show> = self
            .collection(self.client.get(self.url(&format!("/api/show/movie/{movie_id}"))))
            .await?;
        for show in &mut shows {
            show.movie_id = Some(movie_id);
        }
        Ok(shows)
    }

    // ═══════════════════════════════════════════════════════════
    // Tickets
    // ═══════════════════════════════════════════════════════════

    /// `POST /api/ticket/book`
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection message verbatim in [`ApiError::Status`].
    #[tracing::instrument(skip_all, fields(show_id = %request.show_id, seats = request.seat_nos.len()))]
    pub async fn book(&self, token: &str, request: &TicketRequest) -> Result<Ticket, ApiError> {
        self.json(
            self.client
                .post(self.url("/api/ticket/book"))
                .bearer_auth(token)
                .json(request),
        )
        .await
    }

    /// `GET /api/ticket/user/{userId}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[tracing::instrument(skip(self, token))]
    pub async fn user_tickets(&self, token: &str, user_id: UserId) -> Result<Vec<Ticket>, ApiError> {
        self.collection(
            self.client
                .get(self.url(&format!("/api/ticket/user/{user_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // ═══════════════════════════════════════════════════════════
    // Admin
    // ═══════════════════════════════════════════════════════════

    /// `POST` one of the admin create endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[tracing::instrument(skip(self, token, body), fields(path = endpoint.path()))]
    pub async fn create<R>(
        &self,
        token: &str,
        endpoint: AdminEndpoint,
        body: &R,
        idempotency_key: &str,
    ) -> Result<String, ApiError>
    where
        R: Serialize + Sync,
    {
        let message = self
            .text(
                self.client
                    .post(self.url(endpoint.path()))
                    .bearer_auth(token)
                    .header(IDEMPOTENCY_HEADER, idempotency_key)
                    .json(body),
            )
            .await?;
        Ok(message.trim().to_string())
    }
}

impl AccountApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> showmaster_core::Result<String> {
        Ok(Self::register(self, request).await?)
    }

    async fn get_token(&self, request: &LoginRequest) -> showmaster_core::Result<String> {
        Ok(Self::get_token(self, request).await?)
    }

    async fn profile(&self, token: &str) -> showmaster_core::Result<Profile> {
        Ok(Self::profile(self, token).await?)
    }
}

impl CatalogApi for ApiClient {
    async fn list_movies(&self) -> showmaster_core::Result<Vec<Movie>> {
        Ok(Self::list_movies(self).await?)
    }

    async fn list_shows(&self, movie_id: MovieId) -> showmaster_core::Result<Vec<Show>> {
        Ok(Self::list_shows(self, movie_id).await?)
    }
}

impl BookingApi for ApiClient {
    async fn book(&self, token: &str, request: &TicketRequest) -> showmaster_core::Result<Ticket> {
        Ok(Self::book(self, token, request).await?)
    }

    async fn user_tickets(
        &self,
        token: &str,
        user_id: UserId,
    ) -> showmaster_core::Result<Vec<Ticket>> {
        Ok(Self::user_tickets(self, token, user_id).await?)
    }
}

impl AdminApi for ApiClient {
    async fn create<R>(
        &self,
        token: &str,
        endpoint: AdminEndpoint,
        body: &R,
        idempotency_key: &str,
    ) -> showmaster_core::Result<String>
    where
        R: Serialize + Sync,
    {
        Ok(Self::create(self, token, endpoint, body, idempotency_key).await?)
    }
}
