use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::prelude::{println, *};
use colored::Colorize;
use evcharge_core::api::{item_path, CARS_PATH};
use evcharge_core::cars::{Car, CarDraft};
use reqwest::Method;

#[derive(Debug, clap::Parser)]
#[command(name = "cars")]
#[command(about = "Manage registered cars")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List registered cars
    #[clap(name = "list")]
    List(OutputOptions),

    /// Show a single car
    #[clap(name = "get")]
    Get(IdOptions),

    /// Register a new car
    #[clap(name = "create")]
    Create(CreateOptions),

    /// Edit a car; fields left out keep their current value
    #[clap(name = "update")]
    Update(UpdateOptions),

    /// Delete a car
    #[clap(name = "delete")]
    Delete(DeleteOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct IdOptions {
    /// Car ID
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DeleteOptions {
    /// Car ID
    pub id: u64,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct CarFields {
    /// Manufacturer, e.g. Toyota
    #[arg(long)]
    pub make: Option<String>,

    /// Model, e.g. Corolla
    #[arg(long)]
    pub model: Option<String>,

    /// Model year, e.g. 2022
    #[arg(long)]
    pub year: Option<i64>,

    /// ID of the owning user
    #[arg(long)]
    pub owner_id: Option<i64>,

    /// Current battery level in percent (0-100)
    #[arg(long)]
    pub battery_level: Option<i64>,
}

impl From<CarFields> for CarDraft {
    fn from(fields: CarFields) -> Self {
        CarDraft {
            make: fields.make,
            model: fields.model,
            year: fields.year,
            owner_id: fields.owner_id,
            battery_level: fields.battery_level,
        }
    }
}

#[derive(Debug, clap::Args, Clone)]
pub struct CreateOptions {
    #[clap(flatten)]
    pub fields: CarFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct UpdateOptions {
    /// Car ID
    pub id: u64,

    #[clap(flatten)]
    pub fields: CarFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;
    if global.verbose {
        println!("Cars API: {}/{}", config.base_url, CARS_PATH);
        println!();
    }

    let client = ApiClient::new(&config)?;

    match app.command {
        Commands::List(options) => {
            let cars = list_cars_data(&client).await?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&cars)?);
            } else {
                print!("{}", format_cars_text(&cars));
            }
        }
        Commands::Get(options) => {
            let car = get_car_data(&client, options.id).await?;
            output_car(&car, options.json)?;
        }
        Commands::Create(options) => {
            let created = create_car_data(&client, options.fields.into()).await?;
            report_saved("Car created", created.as_ref(), options.json)?;
        }
        Commands::Update(options) => {
            let updated = update_car_data(&client, options.id, options.fields.into()).await?;
            report_saved("Car updated", updated.as_ref(), options.json)?;
        }
        Commands::Delete(options) => {
            delete_car_data(&client, options.id).await?;
            println!("{} Car {} deleted", "✓".green(), options.id);
        }
    }

    Ok(())
}

pub async fn list_cars_data(client: &ApiClient) -> Result<Vec<Car>> {
    client
        .get(CARS_PATH)
        .await
        .map_err(|e| e.wrap_err("Failed to load cars"))
}

pub async fn get_car_data(client: &ApiClient, id: u64) -> Result<Car> {
    client
        .get(&item_path(CARS_PATH, id))
        .await
        .map_err(|e| e.wrap_err(f!("Failed to load car {id}")))
}

/// Validate the draft and create the car. Returns the stored record when the backend echoes it.
pub async fn create_car_data(client: &ApiClient, draft: CarDraft) -> Result<Option<Car>> {
    let payload = draft.validate().map_err(Error::from)?;
    log::info!("Creating car {} {}", payload.make, payload.model);

    client
        .send(Method::POST, CARS_PATH, &payload)
        .await
        .map_err(|e| e.wrap_err("Failed to create car"))
}

/// Load the current record, overlay the edited fields, validate and save.
pub async fn update_car_data(client: &ApiClient, id: u64, edit: CarDraft) -> Result<Option<Car>> {
    let current = get_car_data(client, id).await?;
    let payload = edit.over(&current).validate().map_err(Error::from)?;
    log::info!("Updating car {id}");

    client
        .send(Method::PUT, &item_path(CARS_PATH, id), &payload)
        .await
        .map_err(|e| e.wrap_err(f!("Failed to update car {id}")))
}

pub async fn delete_car_data(client: &ApiClient, id: u64) -> Result<()> {
    log::info!("Deleting car {id}");
    client
        .delete(&item_path(CARS_PATH, id))
        .await
        .map_err(|e| e.wrap_err(f!("Failed to delete car {id}")))
}

/// Battery cell for a stored record; records without a reading show a dash
fn battery_cell(level: Option<i64>) -> String {
    level.map_or_else(|| "-".bright_black().to_string(), battery_colored)
}

/// Battery percentage colored by how empty it is
pub fn battery_colored(level: i64) -> String {
    let text = format!("{level}%");
    match level {
        l if l < 20 => text.red().to_string(),
        l if l < 60 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}

fn format_cars_text(cars: &[Car]) -> String {
    if cars.is_empty() {
        return format!(
            "{}\nRegister one with: {}\n",
            "No cars registered.".yellow(),
            "evcharge cars create --make <make> --model <model> --year <year> --owner-id <id>"
                .cyan()
        );
    }

    let mut table = new_table();
    table.set_titles(prettytable::row![
        "ID".bold().cyan(),
        "Car".bold().cyan(),
        "Owner".bold().cyan(),
        "Battery".bold().cyan()
    ]);

    for car in cars {
        table.add_row(prettytable::row![
            car.id.to_string().bright_white(),
            car.label(),
            car.owner_id,
            battery_cell(car.battery_level)
        ]);
    }

    format!(
        "{}\n{}: {}\n",
        table,
        "Estimate charging time".bright_white().bold(),
        "evcharge charge plan <car-id>".cyan()
    )
}

fn format_car_text(car: &Car) -> String {
    let mut table = new_table();
    table.add_row(prettytable::row!["Make".bold().cyan(), car.make]);
    table.add_row(prettytable::row!["Model".bold().cyan(), car.model]);
    table.add_row(prettytable::row!["Year".bold().cyan(), car.year]);
    table.add_row(prettytable::row!["Owner".bold().cyan(), car.owner_id]);
    table.add_row(prettytable::row![
        "Battery".bold().cyan(),
        battery_cell(car.battery_level)
    ]);

    format!("\n{} {}\n\n{}", f!("#{}", car.id).yellow().bold(), car.label().bold(), table)
}

fn output_car(car: &Car, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(car)?);
    } else {
        print!("{}", format_car_text(car));
    }
    Ok(())
}

fn report_saved(action: &str, car: Option<&Car>, json: bool) -> Result<()> {
    match car {
        Some(car) => {
            if !json {
                println!("{} {action}", "✓".green());
            }
            output_car(car, json)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{client_for, spawn_backend};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn create_test_car(id: u64, battery_level: i64) -> Car {
        Car {
            id,
            make: "Nissan".to_string(),
            model: "Leaf".to_string(),
            year: 2021,
            owner_id: 3,
            battery_level: Some(battery_level),
        }
    }

    /// Backend with one car (id 7) that records the last body it received.
    fn cars_router(last_body: Arc<Mutex<Option<Value>>>) -> Router {
        let on_post = last_body.clone();
        let on_put = last_body;

        Router::new()
            .route(
                "/api/cars",
                get(|| async { Json(json!([create_test_car(7, 40), create_test_car(8, 90)])) })
                    .post(move |Json(body): Json<Value>| {
                        let on_post = on_post.clone();
                        async move {
                            *on_post.lock().unwrap() = Some(body.clone());
                            let mut created = body;
                            created["id"] = json!(11);
                            (StatusCode::CREATED, Json(created))
                        }
                    }),
            )
            .route(
                "/api/cars/{id}",
                get(|Path(id): Path<u64>| async move {
                    match id {
                        7 => Ok(Json(json!(create_test_car(7, 40)))),
                        // Older record without a battery reading
                        12 => Ok(Json(
                            json!({"id": 12, "make": "Fiat", "model": "500e", "year": 2020, "ownerId": 2}),
                        )),
                        _ => Err((StatusCode::NOT_FOUND, Json(json!({"message": "Car not found"})))),
                    }
                })
                .put(move |Json(body): Json<Value>| {
                    let on_put = on_put.clone();
                    async move {
                        *on_put.lock().unwrap() = Some(body);
                        StatusCode::NO_CONTENT
                    }
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            )
    }

    #[tokio::test]
    async fn test_list_cars() {
        let base = spawn_backend(cars_router(Arc::default())).await;

        let cars = list_cars_data(&client_for(&base, None)).await.unwrap();

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0], create_test_car(7, 40));
    }

    #[tokio::test]
    async fn test_get_missing_car() {
        let base = spawn_backend(cars_router(Arc::default())).await;

        let err = get_car_data(&client_for(&base, None), 99).await.unwrap_err();

        assert!(format!("{err:?}").contains("Car not found"));
    }

    #[tokio::test]
    async fn test_create_car_sends_backend_fields() {
        let last_body = Arc::new(Mutex::new(None));
        let base = spawn_backend(cars_router(last_body.clone())).await;

        let draft = CarDraft {
            make: Some("Renault".to_string()),
            model: Some("Zoe".to_string()),
            year: Some(2022),
            owner_id: Some(1),
            battery_level: Some(35),
        };

        let created = create_car_data(&client_for(&base, None), draft)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.id, 11);
        assert_eq!(created.battery_level, Some(35));
        assert_eq!(
            last_body.lock().unwrap().clone().unwrap(),
            json!({"make": "Renault", "model": "Zoe", "year": 2022, "ownerId": 1, "battery_level": 35})
        );
    }

    #[tokio::test]
    async fn test_create_car_rejects_incomplete_form() {
        let last_body = Arc::new(Mutex::new(None));
        let base = spawn_backend(cars_router(last_body.clone())).await;

        let draft = CarDraft {
            make: Some("Renault".to_string()),
            ..CarDraft::default()
        };

        let err = create_car_data(&client_for(&base, None), draft)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
        assert!(last_body.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_car_keeps_unchanged_fields() {
        let last_body = Arc::new(Mutex::new(None));
        let base = spawn_backend(cars_router(last_body.clone())).await;

        let edit = CarDraft {
            battery_level: Some(80),
            ..CarDraft::default()
        };

        let updated = update_car_data(&client_for(&base, None), 7, edit)
            .await
            .unwrap();

        assert!(updated.is_none());
        assert_eq!(
            last_body.lock().unwrap().clone().unwrap(),
            json!({"make": "Nissan", "model": "Leaf", "year": 2021, "ownerId": 3, "battery_level": 80})
        );
    }

    #[tokio::test]
    async fn test_update_car_without_battery_reading() {
        let last_body = Arc::new(Mutex::new(None));
        let base = spawn_backend(cars_router(last_body.clone())).await;

        let edit = CarDraft {
            make: Some("Abarth".to_string()),
            ..CarDraft::default()
        };

        update_car_data(&client_for(&base, None), 12, edit)
            .await
            .unwrap();

        assert_eq!(
            last_body.lock().unwrap().clone().unwrap(),
            json!({"make": "Abarth", "model": "500e", "year": 2020, "ownerId": 2})
        );
    }

    #[tokio::test]
    async fn test_delete_car() {
        let base = spawn_backend(cars_router(Arc::default())).await;
        delete_car_data(&client_for(&base, None), 7).await.unwrap();
    }

    #[test]
    fn test_format_cars_text() {
        let formatted = format_cars_text(&[create_test_car(7, 40), create_test_car(8, 90)]);

        assert!(formatted.contains("Nissan Leaf - 2021"));
        assert!(formatted.contains("40%"));
        assert!(formatted.contains("90%"));
        assert!(formatted.contains("evcharge charge plan <car-id>"));
    }

    #[test]
    fn test_format_cars_text_empty() {
        let formatted = format_cars_text(&[]);
        assert!(formatted.contains("No cars registered."));
    }

    #[test]
    fn test_format_car_text() {
        let formatted = format_car_text(&create_test_car(7, 15));

        assert!(formatted.contains("#7"));
        assert!(formatted.contains("Nissan Leaf - 2021"));
        assert!(formatted.contains("15%"));
    }

    #[test]
    fn test_format_car_text_without_battery_reading() {
        let mut car = create_test_car(12, 0);
        car.battery_level = None;

        let formatted = format_car_text(&car);

        assert!(formatted.contains("Battery"));
        assert!(!formatted.contains("0%"));
    }

    #[test]
    fn test_battery_colored_keeps_value() {
        for level in [0, 19, 20, 59, 60, 100] {
            assert!(battery_colored(level).contains(&format!("{level}%")));
        }
    }
}
