//! Token Store
//!
//! Persistence of raw token records, one entry per profile.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

use crate::error::{AurlError, StorageError, TokenError};

/// Default token directory.
pub const DEFAULT_TOKEN_DIR: &str = "~/.aurl/token";

/// Token store interface.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the raw record for a profile.
    ///
    /// A missing or unreadable entry is `TokenError::NotFound`; a profile
    /// name unusable as an entry key is a `StorageError`.
    async fn load(&self, profile: &str) -> Result<String, AurlError>;

    /// Replace the record for a profile.
    async fn save(&self, profile: &str, raw: &str) -> Result<(), StorageError>;
}

/// Token store backed by `<dir>/<profile>.json` files.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    /// Create store at `~/.aurl/token`.
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            dir: expand_home(DEFAULT_TOKEN_DIR)?,
        })
    }

    /// Create store in a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the token files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Token file for a profile.
    ///
    /// Names that could resolve outside the token directory are rejected.
    pub fn token_path(&self, profile: &str) -> Result<PathBuf, StorageError> {
        let escapes = profile.is_empty()
            || profile == "."
            || profile.contains("..")
            || profile.contains(['/', '\\'])
            || Path::new(profile).is_absolute();
        if escapes {
            return Err(StorageError::InvalidProfileName {
                profile: profile.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", profile)))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, profile: &str) -> Result<String, AurlError> {
        tokio::fs::read_to_string(self.token_path(profile)?)
            .await
            .map_err(|_| {
                TokenError::NotFound {
                    profile: profile.to_string(),
                }
                .into()
            })
    }

    async fn save(&self, profile: &str, raw: &str) -> Result<(), StorageError> {
        let path = self.token_path(profile)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::CreateDirFailed {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await.map_err(write_failed)?;
        file.write_all(raw.as_bytes()).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        // `mode` only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(write_failed)?;
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, StorageError> {
    if path == "~" {
        return dirs::home_dir().ok_or(StorageError::NoHomeDirectory);
    }
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or(StorageError::NoHomeDirectory),
        None => Ok(PathBuf::from(path)),
    }
}

/// In-memory token store.
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: Mutex<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    /// Create new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self, profile: &str) -> Result<String, AurlError> {
        self.records
            .lock()
            .unwrap()
            .get(profile)
            .cloned()
            .ok_or_else(|| {
                TokenError::NotFound {
                    profile: profile.to_string(),
                }
                .into()
            })
    }

    async fn save(&self, profile: &str, raw: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .unwrap()
            .insert(profile.to_string(), raw.to_string());
        Ok(())
    }
}

/// Mock token store for testing.
#[derive(Default)]
pub struct MockTokenStore {
    records: Mutex<HashMap<String, String>>,
    save_history: Mutex<Vec<(String, String)>>,
    should_fail_save: Mutex<bool>,
}

impl MockTokenStore {
    /// Create new mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record.
    pub fn add_record(&self, profile: &str, raw: impl Into<String>) -> &Self {
        self.records
            .lock()
            .unwrap()
            .insert(profile.to_string(), raw.into());
        self
    }

    /// Make every save fail.
    pub fn set_should_fail_save(&self, should_fail: bool) -> &Self {
        *self.should_fail_save.lock().unwrap() = should_fail;
        self
    }

    /// Current raw record for a profile.
    pub fn get_record(&self, profile: &str) -> Option<String> {
        self.records.lock().unwrap().get(profile).cloned()
    }

    /// Get save history.
    pub fn get_save_history(&self) -> Vec<(String, String)> {
        self.save_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn load(&self, profile: &str) -> Result<String, AurlError> {
        self.get_record(profile).ok_or_else(|| {
            TokenError::NotFound {
                profile: profile.to_string(),
            }
            .into()
        })
    }

    async fn save(&self, profile: &str, raw: &str) -> Result<(), StorageError> {
        self.save_history
            .lock()
            .unwrap()
            .push((profile.to_string(), raw.to_string()));

        if *self.should_fail_save.lock().unwrap() {
            return Err(StorageError::WriteFailed {
                path: format!("{}.json", profile),
                message: "mock save failure".to_string(),
            });
        }

        self.add_record(profile, raw);
        Ok(())
    }
}
