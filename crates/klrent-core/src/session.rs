// ── Session lifecycle ──
//
// The logged-in session is explicit state: loaded from disk on start,
// saved after login or renewal, and cleared on logout or expiry. The
// background `SessionKeeper` renews it periodically while a long-running
// command is active.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::UserProfile;
use crate::portal::Portal;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: Option<UserProfile>,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: SecretString, user: Option<UserProfile>) -> Self {
        Self {
            token,
            user,
            saved_at: Utc::now(),
        }
    }
}

/// On-disk form of [`Session`].
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
    saved_at: DateTime<Utc>,
}

// ── Store ───────────────────────────────────────────────────────────

/// JSON file holding the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved session. A missing file is not an error.
    pub fn load(&self) -> Result<Option<Session>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path, &e)),
        };
        let stored: StoredSession = serde_json::from_str(&raw).map_err(|e| CoreError::Config {
            message: format!("corrupt session file {}: {e}", self.path.display()),
        })?;
        debug!(path = %self.path.display(), "loaded session");
        Ok(Some(Session {
            token: SecretString::from(stored.token),
            user: stored.user,
            saved_at: stored.saved_at,
        }))
    }

    /// Persist the session, readable by the owner only where supported.
    pub fn save(&self, session: &Session) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let stored = StoredSession {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
            saved_at: session.saved_at,
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| CoreError::Internal(format!("cannot encode session: {e}")))?;

        let mut file = open_private(&self.path).map_err(|e| io_error(&self.path, &e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| io_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    /// Forget the session. Clearing an absent session succeeds.
    pub fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared session");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.path, &e)),
        }
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::Config {
        message: format!("{}: {err}", path.display()),
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

// ── Keeper ──────────────────────────────────────────────────────────

/// Background task renewing the session through `/auth/me`.
///
/// Waits `delay`, then checks every `interval`. A renewed token replaces
/// the stored one. An authentication failure clears the session and stops
/// the task; other failures are logged and retried on the next tick.
pub struct SessionKeeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionKeeper {
    /// Spawn the keeper on the current Tokio runtime.
    pub fn spawn(portal: Portal, delay: Duration, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(keeper_task(portal, delay, interval, cancel.clone()));
        Self { cancel, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "session keeper task failed");
        }
    }

    /// Wait for the task to stop on its own (session expired).
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "session keeper task failed");
        }
    }
}

async fn keeper_task(
    portal: Portal,
    delay: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        () = tokio::time::sleep(delay) => {}
    }

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match portal.renew_session().await {
                    Ok(user) => {
                        info!(user = user.as_ref().map(|u| u.email.as_str()), "session renewed");
                    }
                    Err(
                        e @ (CoreError::SessionExpired
                        | CoreError::AuthenticationFailed { .. }
                        | CoreError::NotLoggedIn),
                    ) => {
                        warn!(error = %e, "session ended; stopping renewal");
                        break;
                    }
                    Err(e) => warn!(error = %e, "session renewal failed; will retry"),
                }
            }
        }
    }
}
