//! Notification sink (toasts in the UI).

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(notice = "success", "{message}"),
            NoticeKind::Error => tracing::warn!(notice = "error", "{message}"),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((kind, message.to_string()));
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, kind: NoticeKind, message: &str) {
        (**self).notify(kind, message)
    }
}
