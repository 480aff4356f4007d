//! File-backed token store.
//!
//! The session lives in one JSON object keyed by storage name:
//! ```json
//! {
//!   "accessToken": "eyJ...",
//!   "refreshToken": "eyJ..."
//! }
//! ```
//! The file is loaded once and then served from memory; every mutation is
//! written through. Writes go to a sibling temp file that is renamed over the
//! target, so a crash never leaves a half-written session behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use taskboard_application::ports::TokenStore;
use taskboard_domain::{SessionKey, TokenPair};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

/// Token store persisted to a JSON file.
///
/// Storage failures never surface: an unreadable file is treated as an empty
/// session and a failed write keeps the in-memory value, logging a warning.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<Option<Entries>>,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. Nothing is read until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Entries {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session file unreadable, starting signed out"
                );
                return Entries::new();
            }
        };

        match from_json_bytes::<Entries>(&bytes) {
            Ok(entries) => entries
                .into_iter()
                .filter(|(name, _)| SessionKey::from_storage_name(name).is_some())
                .collect(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session file corrupt, starting signed out"
                );
                Entries::new()
            }
        }
    }

    /// Runs `change` against the cached entries and writes the result through.
    async fn update(&self, change: impl FnOnce(&mut Entries) + Send) {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await);
        }
        let Some(entries) = guard.as_mut() else {
            return;
        };
        change(entries);
        if let Err(e) = self.persist(entries).await {
            warn!(path = %self.path.display(), error = %e, "failed to persist session");
        }
    }

    async fn persist(&self, entries: &Entries) -> Result<(), SerializationError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, to_json_stable_bytes(entries)?).await?;
        restrict_permissions(&staging).await?;
        fs::rename(&staging, &self.path).await?;
        debug!(path = %self.path.display(), keys = entries.len(), "session persisted");
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: SessionKey) -> Option<String> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await);
        }
        guard.as_ref()?.get(key.as_str()).cloned()
    }

    async fn set(&self, key: SessionKey, value: &str) {
        let value = value.to_string();
        self.update(move |entries| {
            entries.insert(key.as_str().to_string(), value);
        })
        .await;
    }

    async fn clear(&self, key: SessionKey) {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
        .await;
    }

    async fn clear_all(&self) {
        self.update(Entries::clear).await;
    }

    async fn replace_session(&self, pair: &TokenPair) {
        let fresh: Entries = SessionKey::ALL
            .into_iter()
            .map(|key| (key.as_str().to_string(), pair.get(key).to_string()))
            .collect();
        self.update(move |entries| *entries = fresh).await;
    }
}
