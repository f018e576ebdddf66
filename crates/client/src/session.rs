//! Session credential storage
//!
//! The store is injected into [`PledgeClient`](crate::PledgeClient) at
//! construction; there is no ambient global state. Outside of tests the CLI
//! uses [`FileSessionStore`] so the session survives across invocations.

use std::{
    path::PathBuf,
    sync::RwLock,
};

use tracing::{debug, warn};

use crate::types::TokenPair;

/// Storage for the current credential pair.
pub trait SessionStore: Send + Sync {
    /// Current credential pair, if a session exists.
    fn get(&self) -> Option<TokenPair>;

    /// Replace the stored credential pair.
    fn set(&self, tokens: TokenPair);

    /// Remove both credentials.
    fn clear(&self);

    /// Replace only the access credential, keeping the refresh credential.
    fn set_access(&self, access: String) {
        if let Some(mut tokens) = self.get() {
            tokens.access = access;
            self.set(tokens);
        }
    }
}

/// In-memory session store, used as the default and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<TokenPair> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, tokens: TokenPair) {
        *self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(tokens);
    }

    fn clear(&self) {
        *self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

/// File-based session store persisting the credential pair as JSON.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store at the platform data directory.
    pub fn new() -> Self {
        let path = directories::ProjectDirs::from("app", "Pledge", "Pledge")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("session.json");
        Self { path }
    }

    /// Create a store at a specific path (useful for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<TokenPair> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                warn!("ignoring malformed session file {}: {err}", self.path.display());
                None
            }
        }
    }

    fn set(&self, tokens: TokenPair) {
        if let Err(err) = self.write(&tokens) {
            warn!("failed to persist session to {}: {err}", self.path.display());
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("cleared session at {}", self.path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!("failed to clear session at {}: {err}", self.path.display());
            }
        }
    }
}

impl FileSessionStore {
    fn write(&self, tokens: &TokenPair) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.path, &data)?;

        // Credentials on disk are readable by the owner only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
