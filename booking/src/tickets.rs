//! Tickets booked by the logged-in user.

use showmaster_core::providers::{BookingApi, Credentials};
use showmaster_core::types::{Profile, Ticket};
use showmaster_core::{Result, ShowMasterError};
use std::sync::Arc;

/// Loads a user's booking history. Never retried.
pub struct TicketHistory<B> {
    api: Arc<B>,
    credentials: Arc<dyn Credentials>,
}

impl<B> std::fmt::Debug for TicketHistory<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketHistory").finish_non_exhaustive()
    }
}

impl<B: BookingApi> TicketHistory<B> {
    /// Create a loader.
    pub fn new(api: Arc<B>, credentials: Arc<dyn Credentials>) -> Self {
        Self { api, credentials }
    }

    /// Tickets of `profile`'s user.
    ///
    /// # Errors
    ///
    /// - `Authentication` ("login required") without a profile or token
    /// - whatever the remote layer reports
    pub async fn load(&self, profile: Option<&Profile>) -> Result<Vec<Ticket>> {
        let login_required = || ShowMasterError::Authentication("login required".to_string());
        let profile = profile.ok_or_else(login_required)?;
        let token = self.credentials.bearer().ok_or_else(login_required)?;

        let tickets = self.api.user_tickets(&token, profile.id).await?;
        tracing::debug!(user_id = %profile.id, count = tickets.len(), "Loaded tickets");
        Ok(tickets)
    }
}
