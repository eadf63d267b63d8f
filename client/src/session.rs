//! Session context holding the access token
//!
//! The token is set on login, read on every request, and cleared on logout
//! or on any 401. State changes are broadcast so a front end can force a new
//! login.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};

pub use shared::TOKEN_STORAGE_KEY;

/// Persistence for the access token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Token kept in a small JSON file, `{"access_token": "..."}`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))?;
        let stored: StoredToken = serde_json::from_str(&raw)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(stored.access_token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(&StoredToken {
            access_token: token.to_string(),
        })
        .map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(&self.path, body).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> ClientResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Authentication state as seen by the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { token: String },
    /// The service rejected the token; a new login is required
    Expired,
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token } => Some(token),
            _ => None,
        }
    }
}

/// Shared session context, injected into the HTTP client
pub struct Session {
    store: Box<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Open a session, restoring any persisted token
    pub fn open(store: Box<dyn TokenStore>) -> ClientResult<Self> {
        let initial = match store.load()? {
            Some(token) => SessionState::Authenticated { token },
            None => SessionState::Anonymous,
        };
        let (state, _) = watch::channel(initial);
        Ok(Self { store, state })
    }

    pub fn in_memory() -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            store: Box::new(MemoryTokenStore::new()),
            state,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token().is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn login(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        self.store.save(&token)?;
        self.state.send_replace(SessionState::Authenticated { token });
        tracing::debug!("session authenticated");
        Ok(())
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.store.clear()?;
        self.state.send_replace(SessionState::Anonymous);
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Drop the token after the service rejected it.
    ///
    /// Only an authenticated session moves to `Expired`; any other state is
    /// left as it is.
    pub fn expire(&self) {
        if !self.is_authenticated() {
            tracing::debug!(state = ?self.state(), "rejected request without an active session");
            return;
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
        self.state.send_replace(SessionState::Expired);
        tracing::warn!("session expired, login required");
    }
}
