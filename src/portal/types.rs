//! Portal types — API errors and response shapes from the portal backend.

use serde::{Deserialize, Serialize};

/// Message used when a failed response carries no body text.
pub const NETWORK_ERROR_FALLBACK: &str = "Erro de rede";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by portal API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. The message is the
    /// response body, or [`NETWORK_ERROR_FALLBACK`] when the body was empty.
    #[error("{message}")]
    Network { status: u16, message: String },

    /// The request never produced a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The request could not be assembled (bad header value, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A success response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The token store could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Profile returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`. The server defaults `department` to
/// `"Geral"` when it is omitted.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<&'a str>,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

// =============================================================================
// HR RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: i64,
    pub month: u32,
    pub year: i32,
    pub url: String,
}

/// A clock-in/clock-out entry. Coordinates are named `lat`/`lng` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub timestamp: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
}
