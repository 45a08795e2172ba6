//! Typed helpers for the portal's HR endpoints.
//!
//! Each helper is a single call through [`ApiClient::request`], so every one
//! of them carries the stored bearer token. Upload and clock-in send
//! multipart form data.
//!
//! Account registration and announcement publishing live here too; the
//! server rejects the latter for non-admin users with a 403.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use super::api::{ApiClient, RequestOptions};
use super::types::{Announcement, ApiError, NewUser, Payslip, TimeEntry, UserProfile, VacationRequest};

/// Default entry type for [`ApiClient::clock_in`].
pub const CHECK_IN: &str = "check_in";

impl ApiClient {
    /// `POST /auth/register`. Does not log in.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request; a taken e-mail
    /// comes back as a 400 with the server's message.
    pub async fn register(&self, user: &NewUser<'_>) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_value(user).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.request_as("/auth/register", RequestOptions::json(Method::POST, body))
            .await
    }

    /// `GET /announcements`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn announcements(&self) -> Result<Vec<Announcement>, ApiError> {
        self.request_as("/announcements", RequestOptions::get()).await
    }

    /// `POST /announcements`. Admin only.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn publish_announcement(&self, announcement: &Announcement) -> Result<(), ApiError> {
        let body = serde_json::to_value(announcement).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.request("/announcements", RequestOptions::json(Method::POST, body))
            .await?;
        Ok(())
    }

    /// `POST /vacations` with ISO-8601 start and end timestamps.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn request_vacation(&self, start_date: &str, end_date: &str) -> Result<(), ApiError> {
        let body = json!({ "start_date": start_date, "end_date": end_date });
        self.request("/vacations", RequestOptions::json(Method::POST, body))
            .await?;
        Ok(())
    }

    /// `GET /vacations/my`.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn my_vacations(&self) -> Result<Vec<VacationRequest>, ApiError> {
        self.request_as("/vacations/my", RequestOptions::get()).await
    }

    /// Upload a payslip file for `month`/`year`. Returns the stored file URL
    /// when the server reports one.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn upload_payslip(
        &self,
        month: u32,
        year: i32,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Option<String>, ApiError> {
        let form = Form::new()
            .text("month", month.to_string())
            .text("year", year.to_string())
            .part("file", Part::bytes(contents).file_name(file_name.to_owned()));
        let value = self
            .request("/payslips/upload", RequestOptions::multipart(Method::POST, form))
            .await?;
        Ok(value.get("url").and_then(|u| u.as_str()).map(str::to_owned))
    }

    /// `GET /payslips/my`.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn my_payslips(&self) -> Result<Vec<Payslip>, ApiError> {
        self.request_as("/payslips/my", RequestOptions::get()).await
    }

    /// Record a time-clock entry at the given coordinates, optionally with a
    /// photo given as `(file_name, contents)`. Returns the new entry id when
    /// the server reports one.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn clock_in(
        &self,
        latitude: f64,
        longitude: f64,
        entry_type: &str,
        photo: Option<(&str, Vec<u8>)>,
    ) -> Result<Option<i64>, ApiError> {
        let mut form = Form::new()
            .text("latitude", latitude.to_string())
            .text("longitude", longitude.to_string())
            .text("entry_type", entry_type.to_owned());
        if let Some((file_name, contents)) = photo {
            form = form.part("photo", Part::bytes(contents).file_name(file_name.to_owned()));
        }
        let value = self
            .request("/time_entries", RequestOptions::multipart(Method::POST, form))
            .await?;
        Ok(value.get("id").and_then(serde_json::Value::as_i64))
    }

    /// `GET /time_entries/my`.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] of the underlying request.
    pub async fn my_time_entries(&self) -> Result<Vec<TimeEntry>, ApiError> {
        self.request_as("/time_entries/my", RequestOptions::get()).await
    }
}

#[cfg(test)]
#[path = "hr_test.rs"]
mod tests;
