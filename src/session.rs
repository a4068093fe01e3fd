//! # Client Session
//!
//! The signed-in state of a client: the access token and the user it was
//! issued for. Stores are passed explicitly to whoever needs them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::AuthResponse;
use crate::models::PublicUser;

/// Signed-in client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "token")]
    pub access_token: String,
    pub user: PublicUser,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            user: response.user,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for a single client session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>, SessionError>;
    async fn set_session(&self, session: &Session) -> Result<(), SessionError>;
    async fn clear_session(&self) -> Result<(), SessionError>;
}

/// Stores the session as plain JSON in a file readable only by its owner.
/// The token is not encrypted.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    async fn set_session(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_vec_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        write_private(&self.path, &json)
            .await
            .map_err(|err| self.io_error(err))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Write `contents` to `path`, readable and writable by the owner only.
#[cfg(unix)]
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    // `mode` only applies on creation; tighten files left by older clients.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .await?;
    file.write_all(contents).await?;
    file.flush().await
}

#[cfg(not(unix))]
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, contents).await
}

/// In-process store, used by tests and short-lived clients.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.read().await.clone())
    }

    async fn set_session(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), SessionError> {
        self.session.write().await.take();
        Ok(())
    }
}
