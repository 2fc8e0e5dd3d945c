//! Session context: token, profile, and the account operations around them.

use crate::account::{LoginForm, RegistrationForm};
use crate::profile::ProfileFetcher;
use crate::store::SessionStore;
use futures::StreamExt;
use showmaster_core::providers::AccountApi;
use showmaster_core::types::Profile;
use showmaster_core::{Result, ShowMasterError};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the session store and the profile derived from it.
///
/// A profile is only reported while the session still holds the token it
/// was loaded for. Passed explicitly to whatever needs to know who is logged
/// in. Clones share state.
pub struct SessionContext<A> {
    api: Arc<A>,
    session: SessionStore,
    fetcher: ProfileFetcher<A>,
    profile: Arc<watch::Sender<Option<Profile>>>,
    accepted: Arc<Mutex<Option<String>>>,
}

impl<A> Clone for SessionContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            fetcher: self.fetcher.clone(),
            profile: Arc::clone(&self.profile),
            accepted: Arc::clone(&self.accepted),
        }
    }
}

impl<A> SessionContext<A>
where
    A: AccountApi + 'static,
{
    /// Create a context. No profile is known until [`refresh`](Self::refresh)
    /// or [`run`](Self::run).
    pub fn new(api: Arc<A>, session: SessionStore) -> Self {
        let fetcher = ProfileFetcher::new(Arc::clone(&api), session.clone());
        let (profile, _) = watch::channel(None);
        Self {
            api,
            session,
            fetcher,
            profile: Arc::new(profile),
            accepted: Arc::new(Mutex::new(None)),
        }
    }

    /// The underlying session store.
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The current profile, if the session still holds the token it was
    /// loaded for.
    ///
    /// A token cleared or replaced outside this context (`set_token`,
    /// `clear`, `reconcile`) drops the profile here, and subscribers see
    /// `None`.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        let token = self.session.token();
        if token.is_some() && token == self.accepted_token() {
            return self.profile.borrow().clone();
        }
        self.profile.send_if_modified(|profile| profile.take().is_some());
        None
    }

    /// Follow profile changes.
    #[must_use]
    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.profile.subscribe()
    }

    /// A token is held and the backend accepted it.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.profile().is_some()
    }

    /// The current profile carries `ROLE_ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile().as_ref().is_some_and(Profile::is_admin)
    }

    fn accepted_token(&self) -> Option<String> {
        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_accepted(&self, token: Option<String>) {
        *self.accepted.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Re-read storage and resolve the profile for whatever token it holds.
    pub async fn refresh(&self) -> Option<Profile> {
        self.session.reconcile();
        self.resolve(self.session.token()).await
    }

    async fn resolve(&self, token: Option<String>) -> Option<Profile> {
        self.set_accepted(None);
        self.profile.send_replace(None);
        let profile = self.fetcher.fetch(token.as_deref()).await;

        // A newer token arrived while this one was in flight.
        if self.session.token() != token {
            return None;
        }
        if profile.is_some() {
            self.set_accepted(token);
        }
        self.profile.send_replace(profile.clone());
        profile
    }

    /// Refetch the profile on every token change, forever.
    pub async fn run(&self) {
        let mut tokens = self.session.observe();
        while let Some(token) = tokens.next().await {
            tracing::debug!(logged_in = token.is_some(), "Session token changed");
            self.resolve(token).await;
        }
    }

    /// [`run`](Self::run) on a background task.
    pub fn spawn(&self) -> JoinHandle<()> {
        let context = self.clone();
        tokio::spawn(async move { context.run().await })
    }

    /// Exchange credentials for a token, store it, and load the profile.
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing (no remote call)
    /// - `Authentication`/`Remote` if the backend rejects the credentials
    /// - `Storage` if the token cannot be persisted
    /// - `Authentication` if the new token does not resolve to a profile
    #[tracing::instrument(skip_all, fields(username = %form.username.trim()))]
    pub async fn login(&self, form: &LoginForm) -> Result<Profile> {
        let request = form.validate()?;
        let token = self.api.get_token(&request).await?;
        self.session.set_token(&token)?;
        tracing::info!("Logged in");

        self.resolve(Some(token)).await.ok_or_else(|| {
            ShowMasterError::Authentication("profile unavailable for new session".to_string())
        })
    }

    /// Create an account. Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// - `Validation` if name, email or password is missing, or an optional
    ///   field does not parse (no remote call)
    /// - `Remote` with the server's message if the account is rejected
    #[tracing::instrument(skip_all, fields(name = %form.name.trim()))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<String> {
        let request = form.validate()?;
        let message = self.api.register(&request).await?;
        tracing::info!("Registered");
        Ok(message)
    }

    /// Forget the token and the profile.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the stored token cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        self.set_accepted(None);
        self.profile.send_replace(None);
        tracing::info!("Logged out");
        Ok(())
    }
}
