//! Session token storage and retrieval functions
//!
//! The token returned by a successful login is kept in a single file inside a
//! caller-provided directory, so the next invocation can authenticate without
//! logging in again.

use std::fs;
use std::path::{Path, PathBuf};

/// Name of the token file inside the session directory
pub const SESSION_FILE: &str = "session";

/// Error type for session operations
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Refusing to store an empty session token")]
    EmptyToken,
}

/// Save a session token, replacing any previous one
///
/// # Returns
/// The path of the written token file
pub fn save_token(session_dir: &Path, token: &str) -> Result<PathBuf, SessionError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionError::EmptyToken);
    }

    fs::create_dir_all(session_dir)?;

    let path = session_dir.join(SESSION_FILE);
    fs::write(&path, token)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(path)
}

/// Load the stored session token, if any
///
/// A missing or blank file means there is no session.
pub fn load_token(session_dir: &Path) -> Result<Option<String>, SessionError> {
    let path = session_dir.join(SESSION_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let token = fs::read_to_string(&path)?;
    let token = token.trim();

    Ok((!token.is_empty()).then(|| token.to_string()))
}

/// Remove the stored session token
///
/// # Returns
/// `true` if a token file was removed, `false` if there was none
pub fn clear_token(session_dir: &Path) -> Result<bool, SessionError> {
    let path = session_dir.join(SESSION_FILE);
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path)?;
    Ok(true)
}
