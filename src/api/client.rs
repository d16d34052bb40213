use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::app::ApiSettings;
use crate::utils::ApiError;

/// Method, body, extra headers and query of a single call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json<T: serde::Serialize>(method: Method, body: &T) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            body: Some(serde_json::to_value(body)?),
            ..Self::default()
        })
    }

    pub fn with_query<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// `Authorization` header value; a caller-supplied `Bearer ` prefix is not doubled
pub fn bearer_value(token: &str) -> String {
    let clean = token.strip_prefix("Bearer ").unwrap_or(token);
    format!("Bearer {}", clean)
}

/// Thin HTTP gateway to the remote REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured base URL
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client with default settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and parse the JSON answer.
    ///
    /// Non-2xx statuses become [`ApiError::Status`] carrying the raw body. An
    /// empty successful body yields `Ok(None)`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", options.method, url);

        let mut request = self.http.request(options.method.clone(), &url);

        for (key, value) in &options.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        // Fixed headers win over caller-supplied ones
        request = request
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, bearer_value(token));
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!("{} {} failed with {}", options.method, url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Like [`request`](Self::request) but treats an empty body as the default value
    pub async fn request_or_default<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        Ok(self.request(path, options, token).await?.unwrap_or_default())
    }

    /// Fetch a collection that may come bare or wrapped under `key`
    pub async fn request_list<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
        key: &str,
    ) -> Result<Vec<T>, ApiError> {
        match self.request::<Value>(path, options, token).await? {
            Some(value) => unwrap_listing(value, key),
            None => Ok(Vec::new()),
        }
    }
}

/// Accept `[...]`, `{ key: [...] }`, or `{ key: null }`
pub fn unwrap_listing<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>, ApiError> {
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(inner) => inner,
        },
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list under '{}', got {}",
                key, other
            )))
        }
    };
    Ok(serde_json::from_value(items)?)
}
