//! Profile Store
//!
//! Named OAuth2 profiles read from an INI file (`~/.aurl/profiles` unless
//! overridden).
//!
//! # Example
//!
//! ```ini
//! [default]
//! auth_server_auth_endpoint = https://accounts.example.com/o/oauth2/auth
//! auth_server_token_endpoint = https://accounts.example.com/o/oauth2/token
//! client_id = my-client
//! client_secret = my-secret
//! grant_type = authorization_code
//! scopes = openid, email
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::builders::ProfileBuilder;
use crate::error::{AurlError, ConfigurationError, StorageError};
use crate::token::expand_home;
use crate::types::{ClientAuthMethod, GrantType, Profile};

/// Default profile file.
pub const DEFAULT_PROFILES_PATH: &str = "~/.aurl/profiles";

/// Profile file environment variable.
pub const AURL_PROFILES: &str = "AURL_PROFILES";

/// Profile store interface.
pub trait ProfileStore: Send + Sync {
    /// Resolve a profile by name.
    fn load_profile(&self, name: &str) -> Result<Profile, AurlError>;
}

/// Profile store reading an INI file.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    /// Create store reading `~/.aurl/profiles`.
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            path: expand_home(DEFAULT_PROFILES_PATH)?,
        })
    }

    /// Create store reading a specific file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Profile file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_sections(&self) -> Result<HashMap<String, HashMap<String, String>>, AurlError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ConfigurationError::ProfileFileUnreadable {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(parse_ini(&content))
    }
}

impl ProfileStore for FileProfileStore {
    fn load_profile(&self, name: &str) -> Result<Profile, AurlError> {
        let sections = self.read_sections()?;
        let section =
            sections
                .get(name)
                .ok_or_else(|| ConfigurationError::ProfileNotFound {
                    name: name.to_string(),
                    path: self.path.display().to_string(),
                })?;
        profile_from_section(name, section)
    }
}

/// Parse INI content into sections of key/value pairs.
///
/// Later duplicate keys win. Keys outside any section are ignored.
pub fn parse_ini(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        if let Some(section) = &current {
            if let Some((key, value)) = line.split_once('=') {
                sections
                    .entry(section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), unquote(value.trim()).to_string());
            }
        }
    }

    sections
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split a scope list on commas and whitespace.
pub fn split_scopes(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a profile from one INI section.
pub fn profile_from_section(
    name: &str,
    section: &HashMap<String, String>,
) -> Result<Profile, AurlError> {
    let get = |key: &str| section.get(key).filter(|v| !v.is_empty());

    let mut builder = ProfileBuilder::new().name(name);

    if let Some(v) = get("auth_server_auth_endpoint") {
        builder = builder.authorization_endpoint(v);
    }
    if let Some(v) = get("auth_server_token_endpoint") {
        builder = builder.token_endpoint(v);
    }
    if let Some(v) = get("redirect") {
        builder = builder.redirect_uri(v);
    }
    if let Some(v) = get("client_id") {
        builder = builder.client_id(v);
    }
    if let Some(v) = get("client_secret") {
        builder = builder.client_secret(v);
    }
    if let Some(v) = get("client_auth_method") {
        builder = builder.auth_method(v.parse::<ClientAuthMethod>()?);
    }
    if let Some(v) = get("grant_type") {
        builder = builder.grant_type(v.parse::<GrantType>()?);
    }
    if let Some(v) = get("scopes") {
        builder = builder.scopes(split_scopes(v));
    }
    if let Some(v) = get("username") {
        builder = builder.username(v);
    }
    if let Some(v) = get("password") {
        builder = builder.password(v);
    }
    if let Some(v) = get("default_content_type") {
        builder = builder.default_content_type(v);
    }
    if let Some(v) = get("default_user_agent") {
        builder = builder.default_user_agent(v);
    }

    builder.build()
}

/// In-memory profile store for testing.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    /// Create new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile under its own name.
    pub fn add_profile(&self, profile: Profile) -> &Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.name.clone(), profile);
        self
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load_profile(&self, name: &str) -> Result<Profile, AurlError> {
        self.profiles
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| {
                ConfigurationError::ProfileNotFound {
                    name: name.to_string(),
                    path: "<memory>".to_string(),
                }
                .into()
            })
    }
}

/// Create profile store, honoring an explicit path or `AURL_PROFILES`.
pub fn create_file_profile_store(path: Option<PathBuf>) -> Result<FileProfileStore, AurlError> {
    if let Some(path) = path {
        return Ok(FileProfileStore::with_path(path));
    }
    if let Ok(path) = std::env::var(AURL_PROFILES) {
        return Ok(FileProfileStore::with_path(expand_home(&path)?));
    }
    Ok(FileProfileStore::new()?)
}
