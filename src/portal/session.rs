//! Session gate and bootstrap for protected pages.
//!
//! `load_me` is the only place where a failed authenticated call means
//! "session invalid": the token is dropped and the user is sent to login.
//! Everywhere else an [`ApiError`] propagates to the caller.

use tracing::{info, warn};

use super::api::{ApiClient, RequestOptions};
use super::navigate::{LOGIN_PAGE, Navigator};
use super::storage::TokenStore;
use super::types::{ApiError, LoginRequest, TokenResponse, UserProfile};

/// Redirect to the login page when no token is stored.
///
/// Returns `true` when a token is present and the caller may continue.
pub fn require_auth(store: &dyn TokenStore, navigator: &dyn Navigator) -> bool {
    if store.get().is_some() {
        return true;
    }
    navigator.redirect(LOGIN_PAGE);
    false
}

/// Fetch the current user, or end the session if the call fails.
///
/// On any failure the stored token is cleared, the navigator is sent to the
/// login page, and `None` is returned.
pub async fn load_me(client: &ApiClient, navigator: &dyn Navigator) -> Option<UserProfile> {
    match client.request_as::<UserProfile>("/me", RequestOptions::get()).await {
        Ok(me) => Some(me),
        Err(e) => {
            warn!(error = %e, "session bootstrap failed; clearing token");
            if let Err(clear_err) = client.store().clear() {
                warn!(error = %clear_err, "failed to clear token");
            }
            navigator.redirect(LOGIN_PAGE);
            None
        }
    }
}

/// Exchange credentials for a token and persist it.
///
/// # Errors
///
/// Returns the [`ApiError`] from the login call, [`ApiError::Decode`] when the
/// response lacks `access_token`, or [`ApiError::Storage`] if persisting fails.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
    let body = serde_json::to_value(LoginRequest { email, password })
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let token: TokenResponse = client
        .request_as("/auth/login", RequestOptions::json(reqwest::Method::POST, body))
        .await?;
    client.store().set(&token.access_token)?;
    info!("logged in");
    Ok(token)
}

/// Drop the stored token and go back to the login page.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] if the token cannot be removed.
pub fn logout(store: &dyn TokenStore, navigator: &dyn Navigator) -> Result<(), ApiError> {
    store.clear()?;
    navigator.redirect(LOGIN_PAGE);
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
