//! Credential persistence
//!
//! Holds the single active credential in memory and mirrors it to a JSON
//! file so a session survives process restarts.

use crate::core::error::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Role string the service assigns to administrators
const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// Identity of the signed-in user, as returned alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Bearer token plus the denormalized user it was issued to.
///
/// This is also the wire shape of the login and registration responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user: UserIdentity,
}

impl Credential {
    pub fn is_admin(&self) -> bool {
        self.user.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Process-wide credential store
pub struct CredentialStore {
    path: Option<PathBuf>,
    current: RwLock<Option<Credential>>,
}

impl CredentialStore {
    /// Store with no durable copy
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: RwLock::new(None),
        }
    }

    /// Open a file-backed store, loading any persisted credential.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_credential(&path);
        Self {
            path: Some(path),
            current: RwLock::new(current),
        }
    }

    pub fn get(&self) -> Option<Credential> {
        self.current.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|c| c.token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Replace the active credential
    pub fn set(&self, credential: Credential) -> Result<()> {
        let mut current = self.current.write();
        if let Some(path) = &self.path {
            persist_credential(path, &credential)?;
        }
        debug!(user = %credential.user.username, "Stored credential");
        *current = Some(credential);
        Ok(())
    }

    /// Drop the active credential and its persisted copy.
    ///
    /// Clearing an empty store succeeds. When the file cannot be removed the
    /// credential stays in memory too, so both copies agree.
    pub fn clear(&self) -> Result<()> {
        let mut current = self.current.write();
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed persisted credential"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        *current = None;
        Ok(())
    }
}

fn load_credential(path: &Path) -> Option<Credential> {
    match std::fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(path = %path.display(), "Ignoring corrupt session file: {}", e);
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), "Failed to read session file: {}", e);
            None
        }
    }
}

fn persist_credential(path: &Path, credential: &Credential) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let payload = serde_json::to_vec_pretty(credential)?;
    write_private(path, &payload)?;
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(payload)
}

#[cfg(not(unix))]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, payload)
}
