use std::time::Duration;

use anyhow::Result;
use log::debug;
use reqwest::Method;
use serde_json::Value;

use crate::utils::config::HarnessConfig;

/// Response body as read off the wire. JSON parsing is attempted first;
/// anything that fails to parse is kept as raw text so checks can report it.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            Body::Text(_) => None,
        }
    }
}

/// Raw outcome of one HTTP call: status code plus best-effort parsed body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Body,
}

impl ApiResponse {
    pub fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }

    /// The `success` flag of the response envelope, if present.
    pub fn success_flag(&self) -> Option<bool> {
        self.json()
            .and_then(|v| v.get("success"))
            .and_then(Value::as_bool)
    }

    /// The server-provided `message` field, if present.
    pub fn server_message(&self) -> Option<&str> {
        self.json()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
    }

    /// The `data` payload of the envelope, if present.
    pub fn data(&self) -> Option<&Value> {
        self.json().and_then(|v| v.get("data"))
    }
}

/// HTTP client for the backend under test. Holds the base URL and a cookie
/// store so any session affinity the server relies on survives across calls.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one HTTP call. Network-level failures are mapped to `None` so
    /// callers can record "no response" as a distinct failure instead of
    /// aborting the scenario.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Option<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(json) = body {
            req = req.json(json);
        }

        match req.send().await {
            Ok(res) => {
                let status = res.status().as_u16();
                match res.text().await {
                    Ok(text) => {
                        let body = match serde_json::from_str::<Value>(&text) {
                            Ok(v) => Body::Json(v),
                            Err(_) => Body::Text(text),
                        };
                        debug!("{} {} -> {}", method, path, status);
                        Some(ApiResponse { status, body })
                    }
                    Err(e) => {
                        debug!("{} {} body read failed: {}", method, path, e);
                        None
                    }
                }
            }
            Err(e) => {
                debug!("{} {} failed: {}", method, path, e);
                None
            }
        }
    }

    pub async fn get(&self, path: &str) -> Option<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Option<ApiResponse> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST without a request body (e.g. logout).
    pub async fn post_empty(&self, path: &str) -> Option<ApiResponse> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Option<ApiResponse> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Option<ApiResponse> {
        self.request(Method::DELETE, path, None).await
    }
}
