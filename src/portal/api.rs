//! Authenticated request wrapper for the portal's same-origin JSON API.
//!
//! DESIGN
//! ======
//! Every portal call goes through [`ApiClient::request`]. Header merging
//! happens in `build_request` and status/body interpretation in
//! `parse_response`; both are pure so the header and error rules can be
//! tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! A non-success status becomes [`ApiError::Network`] whose message is the
//! response body text. A success body that is not JSON (typically empty)
//! resolves to `{}` instead of failing.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::storage::TokenStore;
use super::types::{ApiError, NETWORK_ERROR_FALLBACK};
use crate::config::PortalConfig;

// =============================================================================
// REQUEST OPTIONS
// =============================================================================

/// Request payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
    /// Multipart form data; never gets the JSON content-type default.
    Multipart(reqwest::multipart::Form),
}

/// Caller-supplied request options, merged with the client defaults.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, headers: HeaderMap::new(), body: RequestBody::Empty }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn json(method: Method, body: Value) -> Self {
        Self { method, body: RequestBody::Json(body), ..Self::default() }
    }

    #[must_use]
    pub fn multipart(method: Method, form: reqwest::multipart::Form) -> Self {
        Self { method, body: RequestBody::Multipart(form), ..Self::default() }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to the portal origin and a token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, origin: &str, store: Arc<dyn TokenStore>) -> Self {
        Self { http, origin: crate::config::trim_base_url(origin), store }
    }

    /// Build a client from portal config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &PortalConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = config
            .timeouts
            .client()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self::new(http, &config.base_url, store))
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Issue a request to `origin + path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] on a non-success status, carrying the body text.
    /// - [`ApiError::Transport`] when no response arrives.
    /// - [`ApiError::InvalidRequest`] when the request cannot be assembled.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self.build_request(path, options)?;
        let method = request.method().clone();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(%method, path, status, "portal request");
        parse_response(status, &text)
    }

    /// Like [`ApiClient::request`], then deserialize into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::request`] returns, plus [`ApiError::Decode`]
    /// when the JSON does not match `T`.
    pub async fn request_as<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        let value = self.request(path, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Assemble the outgoing request with merged headers.
    ///
    /// Caller headers win except for `Authorization`, which is replaced by
    /// the stored bearer token whenever one exists.
    pub(crate) fn build_request(&self, path: &str, options: RequestOptions) -> Result<reqwest::Request, ApiError> {
        let RequestOptions { method, mut headers, body } = options;

        let is_multipart = matches!(body, RequestBody::Multipart(_));
        if !headers.contains_key(CONTENT_TYPE) && !is_multipart {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = self.store.get() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidRequest(format!("token is not a valid header value: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let url = format!("{}{path}", self.origin);
        let builder = self.http.request(method, url).headers(headers);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                builder.body(bytes)
            }
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_response(status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        let message = if body.is_empty() { NETWORK_ERROR_FALLBACK.to_owned() } else { body.to_owned() };
        return Err(ApiError::Network { status, message });
    }
    Ok(serde_json::from_str(body).unwrap_or_else(|_| Value::Object(serde_json::Map::new())))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
