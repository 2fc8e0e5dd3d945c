//! # ShowMaster Session
//!
//! Who is logged in, and how that stays true across processes.
//!
//! - [`SessionStore`]: the bearer token, persisted through a [`TokenStorage`]
//!   and reconciled on change notifications and on a poll interval
//! - [`ProfileFetcher`]: token → profile, clearing the session on 401
//! - [`SessionContext`]: ties both together and hosts login, registration
//!   and logout
//!
//! ## Example
//!
//! ```ignore
//! let config = Config::from_env();
//! let storage = FileTokenStorage::new(&config.token_file);
//! let session = SessionStore::new(storage, SessionConfig::default());
//! let context = SessionContext::new(Arc::new(ApiClient::new(config.api_url)), session);
//!
//! context.login(&LoginForm::new("ann", "secret")).await?;
//! assert!(context.is_logged_in());
//! ```

pub mod account;
pub mod context;
pub mod profile;
pub mod storage;
pub mod store;

pub use account::{LoginForm, RegistrationForm};
pub use context::SessionContext;
pub use profile::ProfileFetcher;
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageEvent, TokenStorage};
pub use store::{SessionConfig, SessionStore, TokenStream};
