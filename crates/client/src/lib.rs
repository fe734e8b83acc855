//! `lms-client`
//!
//! **Responsibility:** application shell around the access policy and the
//! form model.
//!
//! This crate provides:
//! - Configuration from the environment
//! - The external collaborators (HTTP transport, session store,
//!   notifications, file uploads)
//! - The static navigation table and the screen schemas
//! - `AppController`, which owns the session lifecycle
//!
//! The REST backend stays the authority; nothing here caches domain data.

pub mod config;
pub mod controller;
pub mod current;
pub mod error;
pub mod menu;
pub mod notify;
pub mod screens;
pub mod session_store;
pub mod transport;
pub mod upload;

pub use config::ClientConfig;
pub use controller::AppController;
pub use current::CurrentSession;
pub use error::ClientError;
pub use notify::{NoticeKind, Notifier, RecordingNotifier, TracingNotifier};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
pub use transport::{HttpTransport, Method, Transport, TransportError};
pub use upload::{HttpUploader, StoredFile, Uploader};
