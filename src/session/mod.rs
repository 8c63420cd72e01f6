/*!
Session store: the persisted login state consulted by the guard.

File layout (`~/.cgql_config.json` unless overridden):

  { "host": "...", "token": "...", "username": "...", "expiresAt": 1700000000 }

Every key is optional. A token only counts while `expiresAt` lies in the
future; the interpreter's cookie lives for seven days, so that is the TTL
recorded on login.
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// File name below the home directory.
pub const SESSION_FILE: &str = ".cgql_config.json";

/// Lifetime of a login token.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Capability check used by the guard.
pub trait SessionStore {
    fn has_token(&self) -> bool;
    fn token(&self) -> Option<&str>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no home directory; pass --session explicitly")]
    NoHome,
}

/// On-disk session fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

/// A [`SessionStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
    state: SessionState,
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl FileSession {
    pub fn default_path() -> Result<PathBuf, SessionError> {
        dirs::home_dir()
            .map(|home| home.join(SESSION_FILE))
            .ok_or(SessionError::NoHome)
    }

    /// Read the session at `path`.
    ///
    /// A missing file is an empty session. An unreadable or corrupt file is
    /// also treated as empty (logged), so a broken file never blocks login.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                SessionState::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no session file");
                SessionState::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read session file");
                SessionState::default()
            }
        };
        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn host(&self) -> Option<&str> {
        self.state.host.as_deref().filter(|h| !h.trim().is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.state.username.as_deref()
    }

    pub fn save(&self) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(&self.state)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, raw).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.state.host = Some(host.into());
    }

    /// Record a fresh login valid for [`TOKEN_TTL`] from `now`.
    pub fn set_token(&mut self, token: impl Into<String>, username: impl Into<String>, now: u64) {
        self.state.token = Some(token.into());
        self.state.username = Some(username.into());
        self.state.expires_at = Some(now.saturating_add(TOKEN_TTL.as_secs()));
    }

    /// Forget everything, host included.
    pub fn clear(&mut self) {
        self.state = SessionState::default();
    }

    pub fn has_token_at(&self, now: u64) -> bool {
        let live = self.state.expires_at.is_some_and(|exp| exp > now);
        live && self.state.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSession {
    fn has_token(&self) -> bool {
        self.has_token_at(unix_now())
    }

    fn token(&self) -> Option<&str> {
        if self.has_token() {
            self.state.token.as_deref()
        } else {
            None
        }
    }
}
