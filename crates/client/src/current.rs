//! The session currently in effect.

use std::sync::{Arc, RwLock};

use lms_auth::Session;

/// Shared slot holding the active session.
///
/// Readers get an immutable snapshot. Only the controller replaces the
/// content, and always as a whole.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(Arc<RwLock<Option<Arc<Session>>>>);

impl CurrentSession {
    pub fn get(&self) -> Option<Arc<Session>> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    pub(crate) fn replace(&self, next: Option<Session>) -> Option<Arc<Session>> {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *slot, next.map(Arc::new))
    }
}
