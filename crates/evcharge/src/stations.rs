use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::prelude::{println, *};
use colored::Colorize;
use evcharge_core::api::{item_path, STATIONS_PATH};
use evcharge_core::stations::{Station, StationDraft};
use reqwest::Method;

#[derive(Debug, clap::Parser)]
#[command(name = "stations")]
#[command(about = "Manage charging stations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List charging stations
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single charging station
    #[clap(name = "get")]
    Get(GetOptions),

    /// Add a charging station
    #[clap(name = "create")]
    Create(CreateOptions),

    /// Edit a charging station; fields left out keep their current value
    #[clap(name = "update")]
    Update(UpdateOptions),

    /// Delete a charging station
    #[clap(name = "delete")]
    Delete(DeleteOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// Station ID
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DeleteOptions {
    /// Station ID
    pub id: u64,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct StationFields {
    /// Where the station is, e.g. "City Center"
    #[arg(long)]
    pub location: Option<String>,

    /// Number of cars that can charge at once
    #[arg(long)]
    pub capacity: Option<i64>,

    /// Operational status, e.g. Active
    #[arg(long)]
    pub status: Option<String>,

    /// Power rating: 1.4kW, 22kW or 50kW
    #[arg(long)]
    pub power_rating: Option<String>,

    /// Energy source, e.g. Solar
    #[arg(long)]
    pub energy_source: Option<String>,
}

impl From<StationFields> for StationDraft {
    fn from(fields: StationFields) -> Self {
        StationDraft {
            location: fields.location,
            capacity: fields.capacity,
            status: fields.status,
            power_rating: fields.power_rating,
            energy_source: fields.energy_source,
        }
    }
}

#[derive(Debug, clap::Args, Clone)]
pub struct CreateOptions {
    #[clap(flatten)]
    pub fields: StationFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct UpdateOptions {
    /// Station ID
    pub id: u64,

    #[clap(flatten)]
    pub fields: StationFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;
    if global.verbose {
        println!("Stations API: {}/{}", config.base_url, STATIONS_PATH);
        println!();
    }

    let client = ApiClient::new(&config)?;

    match app.command {
        Commands::List(options) => {
            let stations = list_stations_data(&client).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&stations)?);
            } else {
                print!("{}", format_stations_text(&stations));
            }
        }
        Commands::Get(options) => {
            let station = get_station_data(&client, options.id).await?;
            output_station(&station, options.json)?;
        }
        Commands::Create(options) => {
            let created = create_station_data(&client, options.fields.into()).await?;
            report_saved("Charging station created", created.as_ref(), options.json)?;
        }
        Commands::Update(options) => {
            let updated =
                update_station_data(&client, options.id, options.fields.into()).await?;
            report_saved("Charging station updated", updated.as_ref(), options.json)?;
        }
        Commands::Delete(options) => {
            delete_station_data(&client, options.id).await?;
            println!("{} Charging station {} deleted", "✓".green(), options.id);
        }
    }

    Ok(())
}

pub async fn list_stations_data(client: &ApiClient) -> Result<Vec<Station>> {
    client
        .get(STATIONS_PATH)
        .await
        .map_err(|e| e.wrap_err("Failed to load charging stations"))
}

pub async fn get_station_data(client: &ApiClient, id: u64) -> Result<Station> {
    client
        .get(&item_path(STATIONS_PATH, id))
        .await
        .map_err(|e| e.wrap_err(f!("Failed to load charging station {id}")))
}

pub async fn create_station_data(
    client: &ApiClient,
    draft: StationDraft,
) -> Result<Option<Station>> {
    let payload = draft.validate().map_err(Error::from)?;
    log::info!("Creating charging station at {}", payload.location);

    client
        .send(Method::POST, STATIONS_PATH, &payload)
        .await
        .map_err(|e| e.wrap_err("Failed to create charging station"))
}

pub async fn update_station_data(
    client: &ApiClient,
    id: u64,
    edit: StationDraft,
) -> Result<Option<Station>> {
    let current = get_station_data(client, id).await?;
    let payload = edit.over(&current).validate().map_err(Error::from)?;
    log::info!("Updating charging station {id}");

    client
        .send(Method::PUT, &item_path(STATIONS_PATH, id), &payload)
        .await
        .map_err(|e| e.wrap_err(f!("Failed to update charging station {id}")))
}

pub async fn delete_station_data(client: &ApiClient, id: u64) -> Result<()> {
    log::info!("Deleting charging station {id}");
    client
        .delete(&item_path(STATIONS_PATH, id))
        .await
        .map_err(|e| e.wrap_err(f!("Failed to delete charging station {id}")))
}

fn rating_text(station: &Station) -> String {
    match (station.power_rating.as_deref(), station.rating()) {
        (_, Some(rating)) => rating.to_string().bright_yellow().to_string(),
        (Some(raw), None) => f!("{raw} (unknown)").red().to_string(),
        (None, None) => "-".bright_black().to_string(),
    }
}

fn format_stations_text(stations: &[Station]) -> String {
    if stations.is_empty() {
        return format!(
            "{}\nAdd one with: {}\n",
            "No charging stations registered.".yellow(),
            "evcharge stations create --location <place> --capacity <n> --status <status> --power-rating <rating>"
                .cyan()
        );
    }

    let mut table = new_table();
    table.set_titles(prettytable::row![
        "ID".bold().cyan(),
        "Location".bold().cyan(),
        "Capacity".bold().cyan(),
        "Status".bold().cyan(),
        "Power".bold().cyan(),
        "Energy Source".bold().cyan()
    ]);

    for station in stations {
        table.add_row(prettytable::row![
            station.id.to_string().bright_white(),
            station.location,
            station.capacity,
            station.status.green(),
            rating_text(station),
            station.energy_source.as_deref().unwrap_or("-")
        ]);
    }

    table.to_string()
}

fn format_station_text(station: &Station) -> String {
    let mut table = new_table();
    table.add_row(prettytable::row!["Capacity".bold().cyan(), station.capacity]);
    table.add_row(prettytable::row![
        "Status".bold().cyan(),
        station.status.green()
    ]);
    table.add_row(prettytable::row!["Power".bold().cyan(), rating_text(station)]);
    if let Some(source) = &station.energy_source {
        table.add_row(prettytable::row!["Energy Source".bold().cyan(), source]);
    }

    format!(
        "\n{} {}\n\n{}",
        f!("#{}", station.id).yellow().bold(),
        station.location.bold(),
        table
    )
}

fn output_station(station: &Station, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(station)?);
    } else {
        print!("{}", format_station_text(station));
    }
    Ok(())
}

fn report_saved(action: &str, station: Option<&Station>, json: bool) -> Result<()> {
    match station {
        Some(station) => {
            if !json {
                println!("{} {action}", "✓".green());
            }
            output_station(station, json)
        }
        None => {
            if json {
                println!("{}", serde_json::json!({ "status": "ok" }));
            } else {
                println!("{} {action}", "✓".green());
            }
            Ok(())
        }
    }
}
