use crate::config::ApiConfig;
use crate::prelude::*;
use evcharge_core::api::{extract_error_message, resource_url};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP client bound to the backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client with JSON headers, the configured timeout and, when a
    /// session token is known, a Bearer `Authorization` header.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| eyre!("Invalid header value: {}", e))?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// GET a path and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = resource_url(&self.base_url, path);
        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach {}: {}", url, e))?;

        check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
    }

    /// Send a JSON body with `method`.
    ///
    /// Returns the decoded response when the backend answers with a body of
    /// the expected shape, `None` for an empty or differently shaped body.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = resource_url(&self.base_url, path);
        log::debug!("{method} {url}");

        let response = self
            .http
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach {}: {}", url, e))?;

        let text = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| eyre!("Failed to read response from {}: {}", url, e))?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(serde_json::from_str(&text)
            .map_err(|e| log::debug!("Ignoring response body from {url}: {e}"))
            .ok())
    }

    /// Send a JSON body and require a decodable response.
    pub async fn send_expecting<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.send(method, path, body).await? {
            Some(value) => Ok(value),
            None => Err(Error::UnexpectedResponse(format!("no usable body returned by {path}")).into()),
        }
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = resource_url(&self.base_url, path);
        log::debug!("DELETE {url}");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach {}: {}", url, e))?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an [`Error`] carrying the backend's message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    log::warn!("Backend answered {status}: {message}");

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::NotAuthenticated(message).into());
    }

    Err(Error::Api {
        status: status.as_u16(),
        message,
    }
    .into())
}


#[cfg(test)]
mod tests {
    use super::test_support::{client_for, spawn_backend};
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_get_decodes_json() {
        let router = Router::new().route("/api/ping", get(|| async { Json(json!({"ok": true})) }));
        let client = client_for(&spawn_backend(router).await, None);

        let value: Value = client.get("ping").await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_error_status_carries_backend_message() {
        let router = Router::new().route(
            "/api/cars/99",
            get(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({"message": "Car not found"})),
                )
            }),
        );
        let client = client_for(&spawn_backend(router).await, None);

        let err = client.get::<Value>("cars/99").await.unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::Api { status, message }) => {
                assert_eq!(*status, 404);
                assert_eq!(message, "Car not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_not_authenticated() {
        let router = Router::new().route(
            "/api/cars",
            get(|| async { (AxumStatus::UNAUTHORIZED, "") }),
        );
        let client = client_for(&spawn_backend(router).await, None);

        let err = client.get::<Value>("cars").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotAuthenticated(message)) if message == "Unauthorized"
        ));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let router = Router::new().route(
            "/api/whoami",
            get(|headers: AxumHeaders| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "authorization": auth }))
            }),
        );
        let client = client_for(&spawn_backend(router).await, Some("abc123"));

        let value: Value = client.get("whoami").await.unwrap();
        assert_eq!(value["authorization"], "Bearer abc123");
    }

    #[tokio::test]
    async fn test_send_echoes_body() {
        let router = Router::new().route(
            "/api/echo",
            post(|Json(body): Json<Value>| async move { Json(body) }),
        );
        let client = client_for(&spawn_backend(router).await, None);

        let response: Option<Value> = client
            .send(Method::POST, "echo", &json!({"make": "Fiat"}))
            .await
            .unwrap();

        assert_eq!(response, Some(json!({"make": "Fiat"})));
    }

    #[tokio::test]
    async fn test_send_with_empty_body_returns_none() {
        let router = Router::new().route("/api/empty", post(|| async { AxumStatus::CREATED }));
        let client = client_for(&spawn_backend(router).await, None);

        let response: Option<Value> = client
            .send(Method::POST, "empty", &json!({}))
            .await
            .unwrap();

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_send_expecting_requires_body() {
        let router = Router::new().route("/api/empty", post(|| async { AxumStatus::OK }));
        let client = client_for(&spawn_backend(router).await, None);

        let err = client
            .send_expecting::<_, Value>(Method::POST, "empty", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let router = Router::new().route(
            "/api/cars/{id}",
            delete(|| async { AxumStatus::NO_CONTENT }),
        );
        let client = client_for(&spawn_backend(router).await, None);

        client.delete("cars/3").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = client_for("http://127.0.0.1:1/api", None);
        assert!(client.get::<Value>("cars").await.is_err());
    }
}
