//! Charging reports for a car against one or many stations

use serde::Serialize;

use crate::cars::Car;
use crate::charging::{estimate_charging_time, BatteryLevel, ChargingEstimate};
use crate::stations::Station;
use crate::validation::ValidationError;

/// Estimate for one station
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StationEstimate {
    pub station_id: u64,
    pub location: String,
    pub status: String,
    pub power_rating: Option<String>,
    pub estimate: ChargingEstimate,
    pub message: String,
}

/// Result of `charge estimate`
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EstimateOutput {
    pub car_id: u64,
    pub car: String,
    pub battery_level: BatteryLevel,
    pub station: StationEstimate,
}

/// Result of `charge plan`: the car against every known station
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PlanOutput {
    pub car_id: u64,
    pub car: String,
    pub battery_level: BatteryLevel,
    pub stations: Vec<StationEstimate>,
}

impl PlanOutput {
    /// Station with the shortest estimate. Ties keep the first one listed.
    pub fn fastest(&self) -> Option<&StationEstimate> {
        self.stations
            .iter()
            .filter_map(|s| s.estimate.total_minutes().map(|total| (total, s)))
            .min_by_key(|(total, _)| *total)
            .map(|(_, station)| station)
    }
}

fn station_estimate(level: BatteryLevel, station: &Station) -> StationEstimate {
    let token = station.power_rating.as_deref().unwrap_or_default();
    let estimate = estimate_charging_time(token, i64::from(level.percent()));

    StationEstimate {
        station_id: station.id,
        location: station.location.clone(),
        status: station.status.clone(),
        power_rating: station.power_rating.clone(),
        estimate,
        message: estimate.to_string(),
    }
}

/// Estimate the charging time of `car` at `station`.
///
/// Fails when the car's recorded battery level is outside `0..=100`.
pub fn estimate_for_station(car: &Car, station: &Station) -> Result<EstimateOutput, ValidationError> {
    let level = BatteryLevel::new(car.battery_percent())?;

    Ok(EstimateOutput {
        car_id: car.id,
        car: car.label(),
        battery_level: level,
        station: station_estimate(level, station),
    })
}

/// Estimate the charging time of `car` at each station, preserving station order.
pub fn build_plan(car: &Car, stations: &[Station]) -> Result<PlanOutput, ValidationError> {
    let level = BatteryLevel::new(car.battery_percent())?;

    Ok(PlanOutput {
        car_id: car.id,
        car: car.label(),
        battery_level: level,
        stations: stations
            .iter()
            .map(|station| station_estimate(level, station))
            .collect(),
    })
}
