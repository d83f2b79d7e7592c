//! Client-side field validation errors shared by the car, station and auth forms.

/// A form field failed validation before anything was sent to the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("battery level must be between 0 and 100, got {0}")]
    BatteryOutOfRange(i64),

    #[error("unknown power rating '{0}' (expected one of 1.4kW, 22kW, 50kW)")]
    UnknownPowerRating(String),

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Trim a text field and reject it when nothing is left.
pub fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Require a strictly positive integer.
pub fn positive(field: &'static str, value: Option<i64>) -> Result<i64, ValidationError> {
    match value {
        Some(value) if value > 0 => Ok(value),
        Some(value) => Err(ValidationError::NotPositive { field, value }),
        None => Err(ValidationError::MissingField(field)),
    }
}
