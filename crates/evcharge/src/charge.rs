use crate::cars::{battery_colored, get_car_data};
use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::prelude::{println, *};
use crate::stations::{get_station_data, list_stations_data};
use colored::Colorize;
use evcharge_core::charging::ChargingEstimate;
use evcharge_core::plan::{build_plan, estimate_for_station, EstimateOutput, PlanOutput};

#[derive(Debug, clap::Parser)]
#[command(name = "charge")]
#[command(about = "Estimate how long a car needs to charge")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Estimate the charging time of a car at one station
    #[clap(name = "estimate")]
    Estimate(EstimateOptions),

    /// Estimate the charging time of a car at every station
    #[clap(name = "plan")]
    Plan(PlanOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct EstimateOptions {
    /// Car ID
    pub car_id: u64,

    /// Charging station ID
    pub station_id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct PlanOptions {
    /// Car ID
    pub car_id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;
    if global.verbose {
        println!("Backend: {}", config.base_url);
        println!();
    }

    let client = ApiClient::new(&config)?;

    match app.command {
        Commands::Estimate(options) => {
            let output = estimate_data(&client, options.car_id, options.station_id).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", format_estimate_text(&output));
            }
        }
        Commands::Plan(options) => {
            let plan = plan_data(&client, options.car_id).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", format_plan_text(&plan));
            }
        }
    }

    Ok(())
}

/// Load the car and the station concurrently and estimate the charging time.
pub async fn estimate_data(
    client: &ApiClient,
    car_id: u64,
    station_id: u64,
) -> Result<EstimateOutput> {
    let (car, station) = futures::try_join!(
        get_car_data(client, car_id),
        get_station_data(client, station_id)
    )?;

    let output = estimate_for_station(&car, &station).map_err(Error::from)?;
    log::debug!(
        "Car {car_id} at station {station_id}: {:?}",
        output.station.estimate
    );

    Ok(output)
}

/// Load the car and all stations concurrently and estimate each station.
pub async fn plan_data(client: &ApiClient, car_id: u64) -> Result<PlanOutput> {
    let (car, stations) = futures::try_join!(
        get_car_data(client, car_id),
        list_stations_data(client)
    )?;

    let plan = build_plan(&car, &stations).map_err(Error::from)?;
    log::debug!("Car {car_id}: estimated {} stations", plan.stations.len());

    Ok(plan)
}

fn estimate_colored(estimate: &ChargingEstimate) -> String {
    match estimate {
        ChargingEstimate::Estimate { .. } => estimate.to_string().green().bold().to_string(),
        ChargingEstimate::AlreadyFull => estimate.to_string().bright_green().to_string(),
        ChargingEstimate::UnknownPowerRating => estimate.to_string().red().to_string(),
    }
}

fn format_estimate_text(output: &EstimateOutput) -> String {
    let station = &output.station;
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n",
        output.car.bold(),
        f!("(battery {})", battery_colored(i64::from(output.battery_level.percent())))
    ));
    result.push_str(&format!(
        "{} {} - {}\n\n",
        "at".bright_black(),
        station.location.bright_white(),
        station.power_rating.as_deref().unwrap_or("no power rating")
    ));
    result.push_str(&format!("{}\n", estimate_colored(&station.estimate)));

    if station.estimate == ChargingEstimate::UnknownPowerRating {
        result.push_str(&format!(
            "\n{}: {}\n",
            "Fix the station".bright_white().bold(),
            f!(
                "evcharge stations update {} --power-rating <1.4kW|22kW|50kW>",
                station.station_id
            )
            .cyan()
        ));
    }

    result
}

fn format_plan_text(plan: &PlanOutput) -> String {
    let mut result = format!(
        "\n{} {}\n\n",
        plan.car.bold(),
        f!("(battery {})", battery_colored(i64::from(plan.battery_level.percent())))
    );

    if plan.stations.is_empty() {
        result.push_str(&format!("{}\n", "No charging stations registered.".yellow()));
        return result;
    }

    let mut table = new_table();
    table.set_titles(prettytable::row![
        "ID".bold().cyan(),
        "Location".bold().cyan(),
        "Status".bold().cyan(),
        "Power".bold().cyan(),
        "Estimate".bold().cyan()
    ]);

    for station in &plan.stations {
        table.add_row(prettytable::row![
            station.station_id.to_string().bright_white(),
            station.location,
            station.status,
            station.power_rating.as_deref().unwrap_or("-"),
            estimate_colored(&station.estimate)
        ]);
    }

    result.push_str(&table.to_string());

    if let Some(fastest) = plan.fastest() {
        result.push_str(&format!(
            "\n{}: {} (#{}) - {}\n",
            "Fastest".bright_white().bold(),
            fastest.location.green(),
            fastest.station_id,
            fastest.message
        ));
    }

    result
}
