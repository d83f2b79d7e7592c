use serde::{Deserialize, Serialize};

use crate::charging::BatteryLevel;
use crate::validation::{positive, required_text, ValidationError};

/// Car record as returned by the backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Car {
    pub id: u64,
    pub make: String,
    pub model: String,
    pub year: i64,
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    /// Older records carry no battery level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i64>,
}

impl Car {
    /// Short label, e.g. "Nissan Leaf - 2021"
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.make, self.model, self.year)
    }

    /// Battery percentage used for estimates. A missing reading counts as empty.
    pub fn battery_percent(&self) -> i64 {
        self.battery_level.unwrap_or(0)
    }
}

/// Body sent on create and update
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CarPayload {
    pub make: String,
    pub model: String,
    pub year: i64,
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<BatteryLevel>,
}

/// Unvalidated form input. Every field is optional so the same type serves
/// the create form and a partial edit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CarDraft {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub owner_id: Option<i64>,
    pub battery_level: Option<i64>,
}

impl CarDraft {
    /// Pre-fill the edit form with the current record, keeping the fields the user changed.
    ///
    /// The battery level is only sent when the edit sets it.
    pub fn over(self, current: &Car) -> CarDraft {
        CarDraft {
            make: self.make.or_else(|| Some(current.make.clone())),
            model: self.model.or_else(|| Some(current.model.clone())),
            year: self.year.or(Some(current.year)),
            owner_id: self.owner_id.or(Some(current.owner_id)),
            battery_level: self.battery_level,
        }
    }

    pub fn validate(&self) -> Result<CarPayload, ValidationError> {
        Ok(CarPayload {
            make: required_text("make", self.make.as_deref())?,
            model: required_text("model", self.model.as_deref())?,
            year: positive("year", self.year)?,
            owner_id: positive("owner id", self.owner_id)?,
            battery_level: self.battery_level.map(BatteryLevel::new).transpose()?,
        })
    }
}
