//! Persistence for the single bearer token that survives restarts
//!
//! Reads never fail: a missing or unreadable token is the logged-out state.
//! Only the session writes or clears the token; every API client reads it
//! fresh before each request.

use crate::error::{CoreError, CoreResult};
use arc_swap::ArcSwapOption;
use directories::ProjectDirs;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Fixed key the token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Durable storage for one bearer token
pub trait TokenStore: Send + Sync {
    /// Return the stored token, if any
    fn read(&self) -> Option<String>;

    /// Replace the stored token
    fn write(&self, token: &str) -> CoreResult<()>;

    /// Remove the stored token; removing an absent token succeeds
    fn clear(&self) -> CoreResult<()>;
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.token.store(Some(Arc::new(token.into())));
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.token.load_full().map(|token| token.as_ref().clone())
    }

    fn write(&self, token: &str) -> CoreResult<()> {
        self.token.store(Some(Arc::new(token.to_string())));
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        self.token.store(None);
        Ok(())
    }
}

/// Token store backed by a file named [`TOKEN_KEY`] in a data directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token inside `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(TOKEN_KEY),
        }
    }

    /// Store the token in the platform data directory
    pub fn from_platform_dirs() -> CoreResult<Self> {
        let dirs =
            ProjectDirs::from("com", "Banquet", "banquet").ok_or(CoreError::PlatformDirsNotFound)?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Use `dir` when given, the platform data directory otherwise
    pub fn resolve(dir: Option<&Path>) -> CoreResult<Self> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Self::from_platform_dirs(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read stored token");
                None
            }
        }
    }

    fn write(&self, token: &str) -> CoreResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        // Owner-only from creation; removed on drop if anything below fails
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Stored token");
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared stored token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
