#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Request failed with HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated: {0}. Run `evcharge auth login <username>` first")]
    NotAuthenticated(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<evcharge_core::validation::ValidationError> for Error {
    fn from(err: evcharge_core::validation::ValidationError) -> Self {
        Error::Validation(err.to_string())
    }
}
