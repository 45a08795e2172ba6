//! Client-side navigation side effects.

use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Page unauthenticated sessions are sent to.
pub const LOGIN_PAGE: &str = "./login.html";

/// Performs a client-side redirect.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

/// Navigator that logs each redirect and remembers the most recent target.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<String>>,
}

impl LoggingNavigator {
    /// Target of the most recent redirect, if any happened.
    #[must_use]
    pub fn last_target(&self) -> Option<String> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for LoggingNavigator {
    fn redirect(&self, target: &str) {
        info!(destination = target, "redirecting");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(target.to_owned());
    }
}
