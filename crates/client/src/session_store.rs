//! Durable session storage.

use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use lms_auth::Session;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

/// Where the session lives between runs.
pub trait SessionStore: Send + Sync {
    fn get_session(&self) -> Result<Option<Session>, SessionStoreError>;
    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError>;
    fn clear_session(&self) -> Result<(), SessionStoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn get_session(&self) -> Result<Option<Session>, SessionStoreError> {
        (**self).get_session()
    }

    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        (**self).set_session(session)
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        (**self).clear_session()
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get_session(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionStoreError::Corrupt(e.to_string()))
    }

    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(session).map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store (tests, ephemeral runs).
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_session(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_auth::{AuthToken, Permission, Role};
    use lms_core::UserId;

    fn session() -> Session {
        Session::new(
            UserId::from(3),
            Role::Admin,
            [Permission::new("export_reports")],
            AuthToken::new("abc").unwrap(),
        )
    }

    fn temp_path() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("lms-session-{}", uuid::Uuid::now_v7()));
        dir.push("session.json");
        dir
    }

    #[test]
    fn file_store_round_trip_and_clear() {
        let store = FileSessionStore::new(temp_path());
        assert!(store.get_session().unwrap().is_none());

        store.set_session(&session()).unwrap();
        assert_eq!(store.get_session().unwrap(), Some(session()));

        store.clear_session().unwrap();
        assert!(store.get_session().unwrap().is_none());
        store.clear_session().unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(path).get_session().unwrap_err();
        assert!(matches!(err, SessionStoreError::Corrupt(_)));
    }

    #[test]
    fn memory_store_replaces_wholesale() {
        let store = MemorySessionStore::default();
        store.set_session(&session()).unwrap();
        assert_eq!(store.get_session().unwrap().map(|s| s.role()), Some(Role::Admin));
        store.clear_session().unwrap();
        assert!(store.get_session().unwrap().is_none());
    }
}
