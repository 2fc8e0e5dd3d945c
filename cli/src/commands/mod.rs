//! CLI command definitions and dispatch.

pub mod account;
pub mod admin;
pub mod booking;
pub mod catalog;

use crate::config::Config;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use showmaster_client::ApiClient;
use showmaster_core::providers::Credentials;
use showmaster_core::types::Profile;
use showmaster_core::{Result, ShowMasterError};
use showmaster_session::{FileTokenStorage, SessionConfig, SessionContext, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;

/// ShowMaster: browse movies, book seats, manage the catalog
#[derive(Debug, Parser)]
#[command(name = "showmaster", version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL [env: SHOWMASTER_API_URL]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session token file [env: SHOWMASTER_TOKEN_FILE]
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account
    Register(account::RegisterArgs),
    /// Log in and store the session token
    Login(account::LoginArgs),
    /// Forget the session token
    Logout,
    /// Show the logged-in profile
    Whoami,
    /// Follow session changes until interrupted
    Watch,
    /// List movies
    Movies(catalog::MoviesArgs),
    /// List the shows of a movie
    Shows(catalog::ShowsArgs),
    /// Book seats for a show
    Book(booking::BookArgs),
    /// List your tickets
    Tickets,
    /// Catalog administration
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns whatever the command fails with; `main` prints it.
    pub async fn execute(&self) -> Result<()> {
        let config =
            Config::from_env().with_overrides(self.api_url.clone(), self.token_file.clone());
        tracing::debug!(api_url = %config.api_url, token_file = %config.token_file.display(), "Loaded configuration");
        let app = App::new(config, self.format);

        match &self.command {
            Commands::Register(args) => account::register(&app, args).await,
            Commands::Login(args) => account::login(&app, args).await,
            Commands::Logout => account::logout(&app),
            Commands::Whoami => account::whoami(&app).await,
            Commands::Watch => account::watch(&app).await,
            Commands::Movies(args) => catalog::movies(&app, args).await,
            Commands::Shows(args) => catalog::shows(&app, args).await,
            Commands::Book(args) => booking::book(&app, args).await,
            Commands::Tickets => booking::tickets(&app).await,
            Commands::Admin(args) => admin::execute(&app, args).await,
        }
    }
}

/// Everything a command needs: configuration, the REST client, and the
/// session.
pub struct App {
    /// Effective configuration
    pub config: Config,
    /// Selected output format
    pub format: OutputFormat,
    /// REST client
    pub api: Arc<ApiClient>,
    /// Session token and profile
    pub session: SessionContext<ApiClient>,
}

impl App {
    /// Wire the client and a file-backed session.
    #[must_use]
    pub fn new(config: Config, format: OutputFormat) -> Self {
        let api = Arc::new(ApiClient::new(config.api_url.clone()));
        let store = SessionStore::new(
            FileTokenStorage::new(config.token_file.clone()),
            SessionConfig::default().with_poll_interval(config.poll_interval),
        );
        let session = SessionContext::new(Arc::clone(&api), store);
        Self {
            config,
            format,
            api,
            session,
        }
    }

    /// The session as a token source.
    #[must_use]
    pub fn credentials(&self) -> Arc<dyn Credentials> {
        Arc::new(self.session.session().clone())
    }

    /// Resolve the stored token into a profile.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` ("login required") if no valid session exists.
    pub async fn require_profile(&self) -> Result<Profile> {
        self.session
            .refresh()
            .await
            .ok_or_else(|| ShowMasterError::Authentication("login required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn client_uses_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_lookup(|key| match key {
            "SHOWMASTER_API_URL" => Some("http://booking.test/".to_string()),
            _ => None,
        })
        .with_overrides(None, Some(dir.path().join("session.json")));

        let app = App::new(config, OutputFormat::Table);
        assert_eq!(app.api.base_url(), "http://booking.test");
        assert_eq!(app.session.session().token(), None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "showmaster",
            "movies",
            "--genre",
            "drama",
            "--format",
            "json",
            "--api-url",
            "http://api",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.api_url.as_deref(), Some("http://api"));
        assert!(matches!(cli.command, Commands::Movies(_)));
    }

    #[test]
    fn book_parses_seat_list() {
        let cli =
            Cli::try_parse_from(["showmaster", "book", "--show", "12", "--seats", "A1,A2", "--user", "3"])
                .unwrap();
        let Commands::Book(args) = cli.command else {
            panic!("expected book");
        };
        assert_eq!(args.show, 12);
        assert_eq!(args.seats, "A1,A2");
        assert_eq!(args.user, Some(3));
    }

    #[test]
    fn admin_requires_subcommand() {
        assert!(Cli::try_parse_from(["showmaster", "admin"]).is_err());
        assert!(
            Cli::try_parse_from(["showmaster", "admin", "add-theater", "--name", "PVR", "--address", "Main St"])
                .is_ok()
        );
    }
}
