//! Session token persistence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::ConsoleResult;

/// File name used by [`FileTokenStore::in_dir`]
pub const TOKEN_FILE_NAME: &str = "admin_token";

/// Holds at most one bearer token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ConsoleResult<Option<String>>;

    fn save(&self, token: &str) -> ConsoleResult<()>;

    /// Removing an absent token is not an error
    fn clear(&self) -> ConsoleResult<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn load(&self) -> ConsoleResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, token: &str) -> ConsoleResult<()> {
        (**self).save(token)
    }

    fn clear(&self) -> ConsoleResult<()> {
        (**self).clear()
    }
}

/// Token kept in a single file so it survives restarts
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ConsoleResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> ConsoleResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> ConsoleResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ConsoleResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> ConsoleResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ConsoleResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
