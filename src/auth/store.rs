use std::fs;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::TokenInfo;

const TOKEN_FILE_VERSION: u32 = 1;
const TOKEN_FILE_NAME: &str = "token.json";

/// Storage abstraction for the single persisted session token.
pub trait TokenStore: Send + Sync {
    /// Returns `Ok(None)` when no session has been saved.
    fn load(&self) -> Result<Option<TokenInfo>, AuthError>;
    fn save(&self, token: &TokenInfo) -> Result<(), AuthError>;
    /// Removing a token that does not exist is not an error.
    fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed token store holding one JSON record.
///
/// # Example
/// ```no_run
/// use bay_wheels::auth::{FileTokenStore, TokenInfo, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// store.save(&TokenInfo::issued_now("access")?)?;
/// # Ok::<(), bay_wheels::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn new_default() -> Self {
        Self::new(Self::default_path())
    }

    /// `~/.bay_wheels/token.json`, or a relative fallback without a home directory.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".bay_wheels"))
            .unwrap_or_else(|| PathBuf::from(".bay_wheels"))
            .join(TOKEN_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenInfo>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let token = match serde_json::from_str::<StoredToken>(&raw)? {
            StoredToken::Versioned(file) => {
                if file.version != TOKEN_FILE_VERSION {
                    return Err(AuthError::Serialization(format!(
                        "Unsupported token file version {} at {}",
                        file.version,
                        self.path.display()
                    )));
                }
                file.token
            }
            StoredToken::Bare(token) => token,
        };
        tracing::debug!(path = %self.path.display(), "loaded saved token");
        Ok(Some(token))
    }

    fn save(&self, token: &TokenInfo) -> Result<(), AuthError> {
        let file = TokenFile {
            version: TOKEN_FILE_VERSION,
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let serialized = serde_json::to_vec_pretty(&file)?;
        write_private(&self.path, &serialized).map_err(|err| {
            AuthError::Io(format!("cannot write {}: {err}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), "saved token");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed saved token");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    token: TokenInfo,
    saved_at: DateTime<Utc>,
}

/// Accepts both the versioned record and a bare `{"access_token": ...}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredToken {
    Versioned(TokenFile),
    Bare(TokenInfo),
}

/// Replace `path` with `data` through a private sibling temp file, so a
/// reader never sees a half-written token.
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "token path has no file name")
    })?;
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let staging = dir.join(format!(
        ".{}.{}.{stamp}",
        name.to_string_lossy(),
        std::process::id()
    ));

    let result = open_private(&staging)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staging, path));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}
