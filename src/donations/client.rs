//! REST client for the hosted `doacoes` table.
//!
//! DESIGN
//! ======
//! The backend is a PostgREST-style service: rows live under
//! `/rest/v1/doacoes`, columns are picked with `select=`, and every call
//! carries the project's static key both as `apikey` and as a bearer token.
//! [`DonationBackend`] is the seam the dashboard depends on so tests can
//! substitute an in-memory backend.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{Donation, DonationError, NewDonation, TallyRow};
use crate::config::DonationsConfig;

const TABLE_PATH: &str = "/rest/v1/doacoes";
const SELECT_ALL: &str = "?select=*";
const SELECT_TALLY: &str = "?select=tipo_doacao,quantidade";
const PREFER_MINIMAL: &str = "return=minimal";

/// Data access used by the dashboard.
#[async_trait]
pub trait DonationBackend: Send + Sync {
    /// Every donation row, all columns.
    ///
    /// # Errors
    ///
    /// Returns a [`DonationError`] if the request fails or the body is not a
    /// list of rows.
    async fn list_donations(&self) -> Result<Vec<Donation>, DonationError>;

    /// Category and quantity of every row.
    ///
    /// # Errors
    ///
    /// Returns a [`DonationError`] if the request fails or the body is not a
    /// list of rows.
    async fn list_tally_rows(&self) -> Result<Vec<TallyRow>, DonationError>;

    /// Insert one row, asking the server for a minimal response.
    ///
    /// # Errors
    ///
    /// Returns [`DonationError::Api`] with the raw response body when the
    /// server rejects the row.
    async fn create_donation(&self, donation: &NewDonation) -> Result<(), DonationError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, api_key: String) -> Self {
        Self { http, base_url: crate::config::trim_base_url(base_url), api_key }
    }

    /// Build a client from donation backend config.
    ///
    /// # Errors
    ///
    /// Returns [`DonationError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &DonationsConfig) -> Result<Self, DonationError> {
        let http = config
            .timeouts
            .client()
            .map_err(|e| DonationError::HttpClientBuild(e.to_string()))?;
        Ok(Self::new(http, &config.base_url, config.api_key.clone()))
    }

    fn table_url(&self, query: &str) -> String {
        format!("{}{TABLE_PATH}{query}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>, DonationError> {
        let response = self
            .authorized(self.http.get(self.table_url(query)))
            .send()
            .await
            .map_err(|e| DonationError::Request(e.to_string()))?;
        let text = read_success(response).await?;
        let rows: Vec<T> = serde_json::from_str(&text).map_err(|e| DonationError::Decode(e.to_string()))?;
        debug!(query, rows = rows.len(), "fetched donation rows");
        Ok(rows)
    }
}

#[async_trait]
impl DonationBackend for RestClient {
    async fn list_donations(&self) -> Result<Vec<Donation>, DonationError> {
        self.fetch_rows(SELECT_ALL).await
    }

    async fn list_tally_rows(&self) -> Result<Vec<TallyRow>, DonationError> {
        self.fetch_rows(SELECT_TALLY).await
    }

    async fn create_donation(&self, donation: &NewDonation) -> Result<(), DonationError> {
        let body = serde_json::to_vec(donation).map_err(|e| DonationError::Request(e.to_string()))?;
        let response = self
            .authorized(self.http.post(self.table_url("")))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", PREFER_MINIMAL)
            .body(body)
            .send()
            .await
            .map_err(|e| DonationError::Request(e.to_string()))?;
        read_success(response).await?;
        debug!(kind = %donation.kind, quantity = donation.quantity, "donation created");
        Ok(())
    }
}

/// Body text of a success response, or [`DonationError::Api`] carrying it.
async fn read_success(response: reqwest::Response) -> Result<String, DonationError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DonationError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(DonationError::Api { status: status.as_u16(), body: text });
    }
    Ok(text)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
