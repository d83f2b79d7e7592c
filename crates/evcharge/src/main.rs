use crate::prelude::*;
use clap::Parser;

mod auth;
mod cars;
mod charge;
mod client;
mod config;
mod error;
mod prelude;
mod stations;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Manage electric vehicles and charging stations, and estimate charging times"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the vehicle and station backend
    #[clap(
        long,
        env = "EVCHARGE_API_URL",
        global = true,
        default_value = config::DEFAULT_API_URL
    )]
    api_url: String,

    /// Request timeout in seconds
    #[clap(long, env = "EVCHARGE_TIMEOUT_SECS", global = true, default_value = "10")]
    timeout: u64,

    /// Session token; overrides the one stored by `auth login`
    #[clap(long, env = "EVCHARGE_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "EVCHARGE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Sign up, log in and manage the stored session
    Auth(crate::auth::App),

    /// Manage registered cars
    Cars(crate::cars::App),

    /// Manage charging stations
    Stations(crate::stations::App),

    /// Estimate how long a car needs to charge
    Charge(crate::charge::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    log::debug!("Using backend {}", app.global.api_url);

    match app.command {
        SubCommands::Auth(sub_app) => crate::auth::run(sub_app, app.global).await,
        SubCommands::Cars(sub_app) => crate::cars::run(sub_app, app.global).await,
        SubCommands::Stations(sub_app) => crate::stations::run(sub_app, app.global).await,
        SubCommands::Charge(sub_app) => crate::charge::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
