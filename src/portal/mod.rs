//! Portal — authenticated access to the HR portal's JSON API.
//!
//! DESIGN
//! ======
//! [`api::ApiClient`] attaches the stored bearer token to every request and
//! maps failures to [`types::ApiError`]. [`session`] holds the page-level
//! gates (`require_auth`, `load_me`) that turn a missing or rejected token
//! into a redirect to the login page.

pub mod api;
pub mod hr;
pub mod navigate;
pub mod session;
pub mod storage;
pub mod types;

pub use api::{ApiClient, RequestBody, RequestOptions};
pub use navigate::{LOGIN_PAGE, LoggingNavigator, Navigator};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{Announcement, ApiError, NewUser, UserProfile};
