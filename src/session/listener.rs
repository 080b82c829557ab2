// Session-expired notification seam

use crate::config::SessionConfig;
use std::sync::Arc;

/// Reaction to the backend rejecting the current credential.
///
/// Invoked after the credential and cached profile have been cleared.
/// Concurrent 401s may invoke it more than once, so implementations must be
/// idempotent.
#[cfg_attr(test, mockall::automock)]
pub trait SessionListener: Send + Sync {
    fn session_expired(&self);
}

impl<F> SessionListener for F
where
    F: Fn() + Send + Sync,
{
    fn session_expired(&self) {
        self()
    }
}

/// Listener that ignores the event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SessionListener for NoopListener {
    fn session_expired(&self) {}
}

/// Location access for hosts that route between views
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Sends the host to its login route unless it is already there
pub struct LoginRedirect {
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl LoginRedirect {
    pub fn new(navigator: Arc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Redirect to the login route named in configuration
    pub fn from_config(navigator: Arc<dyn Navigator>, session: &SessionConfig) -> Self {
        Self::new(navigator, session.login_path.clone())
    }
}

impl SessionListener for LoginRedirect {
    fn session_expired(&self) {
        let current = self.navigator.current_path();
        if current.trim_end_matches('/') == self.login_path.trim_end_matches('/') {
            tracing::debug!("Session expired while on {}, not redirecting", current);
            return;
        }
        tracing::info!("Session expired, redirecting {} -> {}", current, self.login_path);
        self.navigator.navigate(&self.login_path);
    }
}
