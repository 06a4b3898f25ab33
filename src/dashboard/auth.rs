//! Dashboard credential holder — per-call authentication, no server session.
//!
//! The operator password lives in memory only, for the lifetime of this
//! process (one CLI invocation, or one tab of the embedded web dashboard).
//! It is validated by making a privileged fetch and checking the backend's
//! `authenticated` flag; a rejected credential is discarded immediately so a
//! wrong password is never silently reused.
//!
//! Logout is destructive (the operator must re-enter the password), so it
//! follows the same two-step intent protocol as a session reset.

use anyhow::Result;

use super::client::DashboardClient;

/// Holds the dashboard credential between calls.
#[derive(Debug, Default)]
pub struct DashboardAuthSession {
    credential: Option<String>,
}

impl DashboardAuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// The stored credential, resent with every dashboard operation.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Validate `password` with a privileged fetch (a one-day log request,
    /// the cheapest authenticated action).
    ///
    /// Returns `Ok(true)` and retains the credential iff the backend reports
    /// authenticated; on rejection the credential is dropped and the caller
    /// must prompt again. Transport failures propagate without touching the
    /// stored credential decision.
    pub fn authenticate(&mut self, client: &DashboardClient, password: &str) -> Result<bool> {
        let resp = client.fetch_logs(password, 1)?;
        if resp.authenticated {
            self.credential = Some(password.to_string());
            Ok(true)
        } else {
            self.credential = None;
            Ok(false)
        }
    }

    /// Step one of logout. `None` when there is no credential to clear.
    pub fn request_logout(&self) -> Option<LogoutIntent> {
        self.credential.as_ref().map(|_| LogoutIntent { _private: () })
    }

    /// Step two of logout: clear the credential.
    pub fn confirm_logout(&mut self, _intent: LogoutIntent) {
        self.credential = None;
    }
}

/// Proof that a logout was requested. Not `Clone` — one confirmation each.
#[derive(Debug)]
pub struct LogoutIntent {
    _private: (),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
