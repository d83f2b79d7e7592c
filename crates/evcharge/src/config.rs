use crate::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Backend connection settings, resolved from the global flags (which fall
/// back to `EVCHARGE_*` environment variables) and the stored session.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl ApiConfig {
    /// Build the configuration for a command run.
    ///
    /// An explicit `--token`/`EVCHARGE_TOKEN` wins over the session saved by `auth login`.
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let token = match &global.token {
            Some(token) => Some(token.clone()),
            None => load_session_token()?,
        };

        Ok(Self {
            base_url: global.api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(global.timeout),
            token,
        })
    }

    /// Configuration without credentials, used by login and registration.
    pub fn anonymous(global: &crate::Global) -> Self {
        Self {
            base_url: global.api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(global.timeout),
            token: None,
        }
    }
}

/// Directory holding the session file
pub fn session_dir() -> Result<PathBuf> {
    Ok(dirs_next::cache_dir()
        .ok_or_else(|| eyre!("Unable to determine cache directory"))?
        .join("evcharge"))
}

fn load_session_token() -> Result<Option<String>> {
    let dir = session_dir()?;
    evcharge_core::session::load_token(&dir)
        .map_err(|e| eyre!("Failed to read session from {}: {}", dir.display(), e))
}
