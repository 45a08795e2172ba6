//! Session token persistence.
//!
//! DESIGN
//! ======
//! A browser page keeps its token in local storage under the key `token`.
//! `FileTokenStore` reproduces that as a small JSON object on disk so other
//! keys written by other tools survive a token update, whatever their value
//! type. A file that is not a JSON object is never overwritten: reads treat
//! it as holding no token, writes fail with [`ApiError::Storage`]. An empty
//! stored value counts as no token.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::warn;

use super::types::ApiError;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Client-side persisted session token.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when absent or empty.
    fn get(&self) -> Option<String>;

    /// Persist a new token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store cannot be written.
    fn set(&self, token: &str) -> Result<(), ApiError>;

    /// Remove the token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), ApiError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Token store backed by a JSON key/value file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries currently on disk. A missing file is an empty object.
    fn read_entries(&self) -> Result<Map<String, Value>, ApiError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.storage_error(&e)),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(self.storage_error(&"not a JSON object")),
            Err(e) => Err(self.storage_error(&e)),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), ApiError> {
        let raw = serde_json::to_string_pretty(entries).map_err(|e| ApiError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| self.storage_error(&e))
    }

    fn storage_error(&self, cause: &dyn std::fmt::Display) -> ApiError {
        ApiError::Storage(format!("{}: {cause}", self.path.display()))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "token storage unreadable; treating as no token");
                return None;
            }
        };
        entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
