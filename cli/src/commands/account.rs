//! Account and session commands.

use super::App;
use crate::output::{self, OutputFormat};
use clap::Args;
use futures::StreamExt;
use showmaster_core::Result;
use showmaster_core::types::Profile;
use showmaster_session::{LoginForm, RegistrationForm};

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Name, also the login username
    #[arg(long)]
    pub name: String,
    /// Email address
    #[arg(long)]
    pub email: String,
    /// Password
    #[arg(long, env = "SHOWMASTER_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Age in years
    #[arg(long)]
    pub age: Option<String>,
    /// Mobile number
    #[arg(long)]
    pub mobile: Option<String>,
    /// Postal address
    #[arg(long)]
    pub address: Option<String>,
    /// MALE, FEMALE or OTHER
    #[arg(long)]
    pub gender: Option<String>,
    /// ROLE_USER or ROLE_ADMIN
    #[arg(long)]
    pub role: Option<String>,
}

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login name
    #[arg(long)]
    pub username: String,
    /// Password
    #[arg(long, env = "SHOWMASTER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// `register`
pub async fn register(app: &App, args: &RegisterArgs) -> Result<()> {
    let form = RegistrationForm {
        name: args.name.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
        age: args.age.clone().unwrap_or_default(),
        mobile_no: args.mobile.clone().unwrap_or_default(),
        address: args.address.clone().unwrap_or_default(),
        gender: args.gender.clone().unwrap_or_default(),
        role: args.role.clone().unwrap_or_default(),
    };
    let message = app.session.register(&form).await?;
    output::print_message(&message, app.format);
    Ok(())
}

/// `login`
pub async fn login(app: &App, args: &LoginArgs) -> Result<()> {
    let profile = app
        .session
        .login(&LoginForm::new(args.username.clone(), args.password.clone()))
        .await?;
    print_profile(&profile, app.format);
    Ok(())
}

/// `logout`
pub fn logout(app: &App) -> Result<()> {
    app.session.logout()?;
    output::print_message("Logged out", app.format);
    Ok(())
}

/// `whoami`
pub async fn whoami(app: &App) -> Result<()> {
    match app.session.refresh().await {
        Some(profile) => print_profile(&profile, app.format),
        None => output::print_message("Not logged in", app.format),
    }
    Ok(())
}

/// `watch`: print the profile every time the session token changes.
pub async fn watch(app: &App) -> Result<()> {
    let mut tokens = app.session.session().observe();
    tracing::info!(token_file = %app.config.token_file.display(), "Watching session");

    loop {
        tokio::select! {
            token = tokens.next() => {
                let Some(token) = token else { break };
                tracing::debug!(logged_in = token.is_some(), "Session token changed");
                match app.session.refresh().await {
                    Some(profile) => print_profile(&profile, app.format),
                    None => output::print_message("Not logged in", app.format),
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn print_profile(profile: &Profile, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            output::print_kv("Username", &profile.username);
            output::print_kv("User id", &profile.id.to_string());
            let roles: Vec<&str> = profile.authorities.iter().map(String::as_str).collect();
            output::print_kv("Roles", &roles.join(", "));
        },
        OutputFormat::Json => output::print_json(profile),
    }
}
