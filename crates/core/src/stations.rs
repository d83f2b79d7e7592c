use serde::{Deserialize, Serialize};

use crate::charging::PowerRating;
use crate::validation::{positive, required_text, ValidationError};

/// Charging station record as returned by the backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    pub id: u64,
    pub location: String,
    pub capacity: i64,
    pub status: String,
    /// Raw token, kept as text so an unrecognized rating does not break listing.
    #[serde(rename = "potencia", alias = "power_rating", default)]
    pub power_rating: Option<String>,
    #[serde(default)]
    pub energy_source: Option<String>,
}

impl Station {
    pub fn rating(&self) -> Option<PowerRating> {
        self.power_rating.as_deref().and_then(PowerRating::from_token)
    }
}

/// Body sent on create and update
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StationPayload {
    pub location: String,
    pub capacity: i64,
    pub status: String,
    #[serde(rename = "potencia", skip_serializing_if = "Option::is_none")]
    pub power_rating: Option<PowerRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_source: Option<String>,
}

/// Unvalidated station form input
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StationDraft {
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub status: Option<String>,
    pub power_rating: Option<String>,
    pub energy_source: Option<String>,
}

impl StationDraft {
    /// Pre-fill the edit form with the current record, keeping the fields the user changed.
    ///
    /// The stored power rating is not carried over: it is only validated and
    /// sent when the edit sets it, so stations with an unrecognized rating stay editable.
    pub fn over(self, current: &Station) -> StationDraft {
        StationDraft {
            location: self.location.or_else(|| Some(current.location.clone())),
            capacity: self.capacity.or(Some(current.capacity)),
            status: self.status.or_else(|| Some(current.status.clone())),
            power_rating: self.power_rating,
            energy_source: self.energy_source.or_else(|| current.energy_source.clone()),
        }
    }

    pub fn validate(&self) -> Result<StationPayload, ValidationError> {
        let power_rating = match self.power_rating.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Some(token.parse::<PowerRating>()?),
            _ => None,
        };

        let energy_source = self
            .energy_source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .map(str::to_string);

        Ok(StationPayload {
            location: required_text("location", self.location.as_deref())?,
            capacity: positive("capacity", self.capacity)?,
            status: required_text("status", self.status.as_deref())?,
            power_rating,
            energy_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_station(power_rating: Option<&str>) -> Station {
        Station {
            id: 4,
            location: "City Center".to_string(),
            capacity: 4,
            status: "Active".to_string(),
            power_rating: power_rating.map(str::to_string),
            energy_source: Some("Solar".to_string()),
        }
    }

    fn create_test_draft() -> StationDraft {
        StationDraft {
            location: Some("Airport".to_string()),
            capacity: Some(8),
            status: Some("Active".to_string()),
            power_rating: Some("50kW".to_string()),
            energy_source: None,
        }
    }

    #[test]
    fn test_station_deserializes_backend_shape() {
        let json = r#"{"id":4,"location":"City Center","capacity":4,"status":"Active","potencia":"1,4kW","energy_source":"Solar"}"#;
        let station: Station = serde_json::from_str(json).unwrap();

        assert_eq!(station, create_test_station(Some("1,4kW")));
        assert_eq!(station.rating(), Some(PowerRating::Slow));
    }

    #[test]
    fn test_station_accepts_power_rating_alias() {
        let json = r#"{"id":1,"location":"Mall","capacity":2,"status":"Active","power_rating":"22kW"}"#;
        let station: Station = serde_json::from_str(json).unwrap();

        assert_eq!(station.rating(), Some(PowerRating::Fast));
        assert_eq!(station.energy_source, None);
    }

    #[test]
    fn test_station_with_unknown_rating_still_parses() {
        let json = r#"{"id":1,"location":"Mall","capacity":2,"status":"Active","potencia":"9kW"}"#;
        let station: Station = serde_json::from_str(json).unwrap();

        assert_eq!(station.power_rating.as_deref(), Some("9kW"));
        assert_eq!(station.rating(), None);
    }

    #[test]
    fn test_validate_complete_draft() {
        let payload = create_test_draft().validate().unwrap();

        assert_eq!(payload.location, "Airport");
        assert_eq!(payload.capacity, 8);
        assert_eq!(payload.power_rating, Some(PowerRating::Rapid));
    }

    #[test]
    fn test_validate_rejects_unknown_rating() {
        let mut draft = create_test_draft();
        draft.power_rating = Some("9kW".to_string());

        assert_eq!(
            draft.validate(),
            Err(ValidationError::UnknownPowerRating("9kW".to_string()))
        );
    }

    #[test]
    fn test_validate_blank_rating_is_omitted() {
        let mut draft = create_test_draft();
        draft.power_rating = Some("  ".to_string());

        assert_eq!(draft.validate().unwrap().power_rating, None);
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut draft = create_test_draft();
        draft.status = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingField("status")));

        let mut draft = create_test_draft();
        draft.capacity = Some(-2);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::NotPositive {
                field: "capacity",
                value: -2
            })
        );
    }

    #[test]
    fn test_payload_sends_canonical_token() {
        let mut draft = create_test_draft();
        draft.power_rating = Some("1,4kW".to_string());
        draft.energy_source = Some("Wind".to_string());

        let json = serde_json::to_value(draft.validate().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "location": "Airport",
                "capacity": 8,
                "status": "Active",
                "potencia": "1.4kW",
                "energy_source": "Wind"
            })
        );
    }

    #[test]
    fn test_edit_overlays_changed_fields() {
        let edit = StationDraft {
            status: Some("Maintenance".to_string()),
            ..StationDraft::default()
        };

        let payload = edit
            .over(&create_test_station(Some("22kW")))
            .validate()
            .unwrap();

        assert_eq!(payload.location, "City Center");
        assert_eq!(payload.status, "Maintenance");
        assert_eq!(payload.power_rating, None);
        assert_eq!(payload.energy_source.as_deref(), Some("Solar"));
    }

    #[test]
    fn test_edit_station_with_unknown_rating() {
        let edit = StationDraft {
            status: Some("Maintenance".to_string()),
            ..StationDraft::default()
        };

        let payload = edit
            .over(&create_test_station(Some("11kW")))
            .validate()
            .unwrap();

        assert_eq!(payload.status, "Maintenance");
        assert!(serde_json::to_value(&payload).unwrap().get("potencia").is_none());
    }

    #[test]
    fn test_edit_can_fix_unknown_rating() {
        let edit = StationDraft {
            power_rating: Some("1,4kW".to_string()),
            ..StationDraft::default()
        };

        let payload = edit
            .over(&create_test_station(Some("11kW")))
            .validate()
            .unwrap();

        assert_eq!(payload.power_rating, Some(PowerRating::Slow));

        let edit = StationDraft {
            power_rating: Some("11kW".to_string()),
            ..StationDraft::default()
        };
        assert_eq!(
            edit.over(&create_test_station(Some("22kW"))).validate(),
            Err(ValidationError::UnknownPowerRating("11kW".to_string()))
        );
    }
}
