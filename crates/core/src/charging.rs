//! Charging-time estimation
//!
//! Every station advertises one of a small closed set of power ratings, and
//! each rating implies a fixed time to charge a car from 0% to 100%. The
//! estimate for a partially charged car is that duration scaled by the
//! missing battery percentage.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Maximum charging power a station can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerRating {
    /// 1.4kW domestic socket
    Slow,
    /// 22kW AC wallbox
    Fast,
    /// 50kW DC charger
    Rapid,
}

struct RatingEntry {
    rating: PowerRating,
    token: &'static str,
    full_charge_minutes: u32,
}

/// Recognized ratings with their wire token and the minutes needed for a full charge.
static RATING_TABLE: [RatingEntry; 3] = [
    RatingEntry {
        rating: PowerRating::Slow,
        token: "1.4kW",
        full_charge_minutes: 8 * 60,
    },
    RatingEntry {
        rating: PowerRating::Fast,
        token: "22kW",
        full_charge_minutes: 3 * 60,
    },
    RatingEntry {
        rating: PowerRating::Rapid,
        token: "50kW",
        full_charge_minutes: 30,
    },
];

/// Alternative spellings found in existing station records (comma decimal separator).
const RATING_ALIASES: [(&str, PowerRating); 1] = [("1,4kW", PowerRating::Slow)];

impl PowerRating {
    pub const ALL: [PowerRating; 3] = [PowerRating::Slow, PowerRating::Fast, PowerRating::Rapid];

    /// Row of `RATING_TABLE` describing this rating. Rows are in declaration order.
    fn entry(self) -> &'static RatingEntry {
        match self {
            PowerRating::Slow => &RATING_TABLE[0],
            PowerRating::Fast => &RATING_TABLE[1],
            PowerRating::Rapid => &RATING_TABLE[2],
        }
    }

    /// Canonical token, e.g. `"22kW"`.
    pub fn as_str(self) -> &'static str {
        self.entry().token
    }

    /// Minutes needed to charge from 0% to 100% at this rating.
    pub fn full_charge_minutes(self) -> u32 {
        self.entry().full_charge_minutes
    }

    /// Resolve a station's power rating token, ignoring surrounding whitespace and case.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();

        RATING_TABLE
            .iter()
            .map(|entry| (entry.token, entry.rating))
            .chain(RATING_ALIASES)
            .find(|(known, _)| known.eq_ignore_ascii_case(token))
            .map(|(_, rating)| rating)
    }
}

impl FromStr for PowerRating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| ValidationError::UnknownPowerRating(s.trim().to_string()))
    }
}

impl fmt::Display for PowerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PowerRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// State of charge of a vehicle, as a percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    pub const FULL: BatteryLevel = BatteryLevel(100);

    pub fn new(percent: i64) -> Result<Self, ValidationError> {
        u8::try_from(percent)
            .ok()
            .filter(|percent| *percent <= 100)
            .map(BatteryLevel)
            .ok_or(ValidationError::BatteryOutOfRange(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_full(self) -> bool {
        self.0 >= 100
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Outcome of a charging-time estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChargingEstimate {
    /// The battery is already at 100%.
    AlreadyFull,
    /// Time left until the battery is full; `minutes` is always below 60.
    Estimate { hours: u32, minutes: u32 },
    /// The station advertises a rating outside the recognized set.
    UnknownPowerRating,
}

impl ChargingEstimate {
    /// Total estimated minutes, if an estimate was produced.
    pub fn total_minutes(&self) -> Option<u32> {
        match self {
            ChargingEstimate::Estimate { hours, minutes } => Some(hours * 60 + minutes),
            _ => None,
        }
    }
}

impl fmt::Display for ChargingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargingEstimate::AlreadyFull => f.write_str("The car is already fully charged."),
            ChargingEstimate::UnknownPowerRating => f.write_str("Unknown power rating."),
            ChargingEstimate::Estimate { hours, minutes } => {
                write!(f, "Estimated time: {}", format_duration(*hours, *minutes))
            }
        }
    }
}

/// Human readable duration. Hours are left out when zero, minutes are always shown.
pub fn format_duration(hours: u32, minutes: u32) -> String {
    let minutes = plural(minutes, "minute");
    if hours == 0 {
        minutes
    } else {
        format!("{} {minutes}", plural(hours, "hour"))
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Estimate how long a car at `battery_level` percent needs to reach 100% on a
/// station advertising `power_rating`.
///
/// A full battery wins over an unrecognized rating. Negative levels are treated
/// as an empty battery; callers holding untrusted input should go through
/// [`BatteryLevel::new`] and [`estimate`] instead.
pub fn estimate_charging_time(power_rating: &str, battery_level: i64) -> ChargingEstimate {
    if battery_level >= 100 {
        return ChargingEstimate::AlreadyFull;
    }

    let Some(rating) = PowerRating::from_token(power_rating) else {
        return ChargingEstimate::UnknownPowerRating;
    };

    // 0 <= level < 100 here, so the narrowing cannot fail.
    let level = u8::try_from(battery_level.max(0)).unwrap_or(0);
    remaining_time(rating.full_charge_minutes(), level)
}

/// Typed variant of [`estimate_charging_time`] for already validated inputs.
pub fn estimate(rating: PowerRating, level: BatteryLevel) -> ChargingEstimate {
    if level.is_full() {
        return ChargingEstimate::AlreadyFull;
    }

    remaining_time(rating.full_charge_minutes(), level.percent())
}

fn remaining_time(full_charge_minutes: u32, battery_level: u8) -> ChargingEstimate {
    let remaining_battery = f64::from(100 - battery_level);
    let remaining_minutes = (remaining_battery / 100.0) * f64::from(full_charge_minutes);

    ChargingEstimate::Estimate {
        hours: (remaining_minutes / 60.0).floor() as u32,
        minutes: (remaining_minutes % 60.0).floor() as u32,
    }
}
