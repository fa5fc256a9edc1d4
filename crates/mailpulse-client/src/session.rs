//! Token persistence and the session facade handed to the gateway.
//!
//! # Design
//! - Storage is a plain key/value contract (`access_token`, `refresh_token`)
//!   so hosts can back it with anything from memory to a keychain.
//! - `Session` caches the access token in memory; the refresh token is only
//!   read from storage when a refresh is attempted.
//! - Locks are never held across an `.await`.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use mailpulse_api_models::AuthTokens;
use thiserror::Error;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Convenience alias for storage results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a token store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("token store I/O failed at {path}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The backing file did not contain a JSON object of strings.
    #[error("token store at {path} is corrupt")]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value storage for session tokens.
pub trait TokenStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a value; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Process-local store; tokens vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change and removed once empty.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileTokenStore {
    /// Store backed by `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<BTreeMap<String, String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, values: &BTreeMap<String, String>) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if values.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => Err(io_err(err)),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let encoded = serde_json::to_vec_pretty(values).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("tmp");
        write_private(&staging, &encoded).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> StoreResult<()> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read()?;
        apply(&mut values);
        self.write(&values)
    }
}

/// Write `contents` to a file only the owner can read. The mode is applied
/// before any bytes land, including when a stale file already exists.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

/// Current credentials, shared between the gateway and the host.
///
/// Only one access token is considered valid at a time: [`Session::save`]
/// replaces it for every request issued afterwards, while requests already
/// in flight keep the header they were sent with.
pub struct Session {
    store: Box<dyn TokenStore>,
    access_token: RwLock<Option<String>>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.access_token().is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session over the given store. Call [`Session::restore`] to pick up
    /// previously persisted tokens.
    #[must_use]
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            access_token: RwLock::new(None),
        }
    }

    /// Session that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Load the persisted access token into memory. Returns whether one was found.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    pub fn restore(&self) -> StoreResult<bool> {
        let token = self
            .store
            .get(ACCESS_TOKEN_KEY)?
            .filter(|value| !value.is_empty());
        let found = token.is_some();
        self.set_access(token);
        Ok(found)
    }

    /// Access token to attach to the next request.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persisted refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    pub fn refresh_token(&self) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get(REFRESH_TOKEN_KEY)?
            .filter(|value| !value.is_empty()))
    }

    /// Whether an access token is persisted.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.get(ACCESS_TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
    }

    /// Replace the token pair, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn save(&self, tokens: &AuthTokens) -> StoreResult<()> {
        self.set_access(Some(tokens.access_token.clone()));
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)
    }

    /// Forget both tokens. Both keys are attempted even if the first removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn clear(&self) -> StoreResult<()> {
        self.set_access(None);
        let access = self.store.remove(ACCESS_TOKEN_KEY);
        let refresh = self.store.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    fn set_access(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }
}
