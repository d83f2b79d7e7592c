//! Pure helpers for talking to the vehicle/station backend
//!
//! URL building and error-body interpretation live here so the shell only
//! has to move bytes.

/// Cars collection path
pub const CARS_PATH: &str = "cars";
/// Charging stations collection path
pub const STATIONS_PATH: &str = "charging-stations";
pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";

/// Join the API base URL and a relative path with exactly one slash between them.
pub fn resource_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Path of a single record inside a collection, e.g. `cars/7`.
pub fn item_path(collection: &str, id: u64) -> String {
    format!("{collection}/{id}")
}

/// Pull a human readable message out of an error response body.
///
/// Looks at the `message` and `error` keys and at an `errors` array (of
/// strings or of objects with a `msg`/`message`), falling back to the
/// trimmed body. An empty body yields `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(body.to_string());
    };

    for key in ["message", "error"] {
        if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }

    if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|error| {
                error.as_str().or_else(|| {
                    error
                        .get("msg")
                        .or_else(|| error.get("message"))
                        .and_then(|m| m.as_str())
                })
            })
            .collect();

        if !messages.is_empty() {
            return Some(messages.join("; "));
        }
    }

    Some(body.to_string())
}
