use crate::client::ApiClient;
use crate::config::{session_dir, ApiConfig};
use crate::prelude::{println, *};
use colored::Colorize;
use evcharge_core::api::{LOGIN_PATH, REGISTER_PATH};
use evcharge_core::auth::{credentials, registration, LoginResponse, Registration};
use evcharge_core::session;
use reqwest::Method;
use std::path::Path;

#[derive(Debug, clap::Parser)]
#[command(name = "auth")]
#[command(about = "Sign up, log in and manage the stored session")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    #[clap(name = "login")]
    Login(LoginOptions),

    /// Create a new user account
    #[clap(name = "register")]
    Register(RegisterOptions),

    /// Forget the stored session token
    #[clap(name = "logout")]
    Logout,

    /// Show which session token requests will use
    #[clap(name = "status")]
    Status,
}

#[derive(Debug, clap::Args, Clone)]
pub struct LoginOptions {
    /// Username
    pub username: String,

    /// Password
    #[arg(long, env = "EVCHARGE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, clap::Args, Clone)]
pub struct RegisterOptions {
    /// Username
    pub username: String,

    /// Password
    #[arg(long)]
    pub password: String,

    /// Password, typed again
    #[arg(long)]
    pub confirm_password: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Login(options) => login(options, global).await,
        Commands::Register(options) => register(options, global).await,
        Commands::Logout => logout(),
        Commands::Status => status(&global),
    }
}

/// Exchange credentials for a session token
pub async fn login_data(client: &ApiClient, username: &str, password: &str) -> Result<String> {
    let body = credentials(username, password).map_err(Error::from)?;

    let response: LoginResponse = client
        .send_expecting(Method::POST, LOGIN_PATH, &body)
        .await
        .map_err(|e| rejected_login(e).wrap_err("Login failed"))?;

    Ok(response.token)
}

/// A 401 from the login endpoint means wrong credentials, not a missing session.
fn rejected_login(err: color_eyre::eyre::Report) -> color_eyre::eyre::Report {
    match err.downcast::<Error>() {
        Ok(Error::NotAuthenticated(message)) => Error::Api {
            status: 401,
            message,
        }
        .into(),
        Ok(other) => other.into(),
        Err(err) => err,
    }
}

/// Register a user, returning the backend's confirmation message if it sent one
pub async fn register_data(client: &ApiClient, body: &Registration) -> Result<Option<String>> {
    let response: Option<serde_json::Value> = client
        .send(Method::POST, REGISTER_PATH, body)
        .await
        .map_err(|e| e.wrap_err("Registration failed"))?;

    Ok(response
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_string))
}

async fn login(options: LoginOptions, global: crate::Global) -> Result<()> {
    let client = ApiClient::new(&ApiConfig::anonymous(&global))?;
    let token = login_data(&client, &options.username, &options.password).await?;

    let path = store_session(&session_dir()?, &token)?;
    log::info!("Session stored at {}", path.display());

    println!("{} Logged in as {}", "✓".green(), options.username.bold());
    if global.verbose {
        println!("Session file: {}", path.display());
    }

    Ok(())
}

async fn register(options: RegisterOptions, global: crate::Global) -> Result<()> {
    // Validate before touching the network
    let body = registration(
        &options.username,
        &options.password,
        &options.confirm_password,
    )
    .map_err(Error::from)?;

    let client = ApiClient::new(&ApiConfig::anonymous(&global))?;
    let message = register_data(&client, &body).await?;

    println!(
        "{} {}",
        "✓".green(),
        message.unwrap_or_else(|| "User registered successfully".to_string())
    );
    println!(
        "Log in with: {}",
        f!("evcharge auth login {} --password <password>", body.username).cyan()
    );

    Ok(())
}

fn logout() -> Result<()> {
    if forget_session(&session_dir()?)? {
        println!("{} Logged out", "✓".green());
    } else {
        println!("{}", "No session stored".yellow());
    }

    Ok(())
}

fn status(global: &crate::Global) -> Result<()> {
    let dir = session_dir()?;
    let stored = session::load_token(&dir).map_err(|e| eyre!("{}", e))?;

    println!("{}", session_status(global.token.is_some(), stored.is_some(), &dir));
    Ok(())
}

/// Describe which token requests will use. An explicit token wins over the stored session.
fn session_status(explicit_token: bool, stored_token: bool, dir: &Path) -> String {
    let session_file = dir.join(session::SESSION_FILE);

    match (explicit_token, stored_token) {
        (true, true) => f!(
            "{} Using the token from --token/EVCHARGE_TOKEN (overrides the session stored in {})",
            "✓".green(),
            session_file.display()
        ),
        (true, false) => f!(
            "{} Using the token from --token/EVCHARGE_TOKEN",
            "✓".green()
        ),
        (false, true) => f!(
            "{} Session stored in {}",
            "✓".green(),
            session_file.display()
        ),
        (false, false) => "Not logged in".yellow().to_string(),
    }
}

fn store_session(dir: &Path, token: &str) -> Result<std::path::PathBuf> {
    session::save_token(dir, token).map_err(|e| eyre!("Failed to store session: {}", e))
}

fn forget_session(dir: &Path) -> Result<bool> {
    session::clear_token(dir).map_err(|e| eyre!("Failed to remove session: {}", e))
}
