use serde::{Deserialize, Serialize};

use crate::validation::{required_text, ValidationError};

/// Login request body
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Successful login response
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
}

pub fn credentials(username: &str, password: &str) -> Result<Credentials, ValidationError> {
    Ok(Credentials {
        username: required_text("username", Some(username))?,
        password: required_password("password", password)?,
    })
}

/// All three fields are required and the two passwords must match.
pub fn registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Registration, ValidationError> {
    let username = required_text("username", Some(username))?;
    let password = required_password("password", password)?;
    let confirm_password = required_password("password confirmation", confirm_password)?;

    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(Registration {
        username,
        password,
        confirm_password,
    })
}

// Passwords are sent as typed; only emptiness is checked.
fn required_password(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}
