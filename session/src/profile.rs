//! Resolving a token into a profile.

use crate::store::SessionStore;
use showmaster_core::providers::AccountApi;
use showmaster_core::types::Profile;
use std::sync::Arc;

/// Looks up the profile behind a token.
///
/// A rejected token (401) is removed from the session, so no profile ever
/// outlives the token it came from.
pub struct ProfileFetcher<A> {
    api: Arc<A>,
    session: SessionStore,
}

impl<A> Clone for ProfileFetcher<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
        }
    }
}

impl<A: AccountApi> ProfileFetcher<A> {
    /// Create a fetcher that invalidates `session` on authentication failures.
    pub const fn new(api: Arc<A>, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Fetch the profile for `token`.
    ///
    /// - no token: `None`, without a remote call
    /// - accepted: the profile
    /// - 401: the session is cleared, `None`
    /// - any other failure: `None`, the session is kept
    #[tracing::instrument(skip_all, fields(has_token = token.is_some()))]
    pub async fn fetch(&self, token: Option<&str>) -> Option<Profile> {
        let token = token.map(str::trim).filter(|t| !t.is_empty())?;

        match self.api.profile(token).await {
            Ok(profile) => {
                tracing::debug!(user_id = %profile.id, admin = profile.is_admin(), "Profile loaded");
                Some(profile)
            },
            Err(e) if e.is_authentication() => {
                tracing::info!("Token rejected, clearing session");
                if let Err(e) = self.session.clear_if_current(token) {
                    tracing::warn!(error = %e, "Failed to clear rejected token");
                }
                None
            },
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup failed");
                None
            },
        }
    }
}
