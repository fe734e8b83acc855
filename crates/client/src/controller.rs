//! Top-level process controller.
//!
//! Owns the session lifecycle: reads it once at startup, replaces it on
//! login, drops it on logout or when the backend answers 401.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use lms_auth::{AuthToken, Menu, Permission, Role, Session, VisibleItem, visible_menu};
use lms_core::{DomainError, UserId};
use lms_forms::FormModel;

use crate::current::CurrentSession;
use crate::error::ClientError;
use crate::menu::main_menu;
use crate::notify::{NoticeKind, Notifier};
use crate::screens::login;
use crate::session_store::{SessionStore, SessionStoreError};
use crate::transport::{Method, Transport, TransportError};
use crate::upload::Uploader;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: UserId,
    role: String,
    #[serde(default)]
    permissions: Vec<String>,
}

impl LoginResponse {
    fn into_session(self) -> Result<Session, DomainError> {
        let role: Role = self.user.role.parse()?;
        Ok(Session::new(
            self.user.id,
            role,
            self.user.permissions.into_iter().map(Permission::from),
            AuthToken::new(self.token)?,
        ))
    }
}

pub struct AppController<T, S, N> {
    transport: T,
    store: S,
    notifier: N,
    current: CurrentSession,
    menu: Menu,
}

impl<T, S, N> AppController<T, S, N>
where
    T: Transport,
    S: SessionStore,
    N: Notifier,
{
    /// Build the controller and restore the persisted session.
    ///
    /// An unreadable stored session is discarded and reported; a broken menu
    /// table is a startup error.
    pub fn new(transport: T, store: S, notifier: N, current: CurrentSession) -> Result<Self, ClientError> {
        let menu = main_menu()?;

        let restored = match store.get_session() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                if let Err(e) = store.clear_session() {
                    tracing::warn!(error = %e, "unreadable stored session could not be removed");
                }
                notifier.notify(NoticeKind::Error, "Your saved session could not be restored. Please sign in again.");
                None
            }
        };
        if let Some(session) = &restored {
            tracing::info!(user_id = %session.user_id(), role = %session.role(), "session restored");
        }
        current.replace(restored);

        Ok(Self {
            transport,
            store,
            notifier,
            current,
            menu,
        })
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.current.get()
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Sidebar entries for the current session; empty when signed out.
    pub fn navigation(&self, current_path: &str) -> Vec<VisibleItem> {
        match self.current.get() {
            Some(session) => visible_menu(&self.menu, &session, current_path),
            None => Vec::new(),
        }
    }

    /// Submit the login form and install the resulting session.
    pub async fn login(&self, form: &mut FormModel) -> Result<Arc<Session>, ClientError> {
        let response = self.send(form, Method::Post, login::ENDPOINT).await?;

        let session = serde_json::from_value::<LoginResponse>(response)
            .map_err(|e| ClientError::from(TransportError::Parse(e.to_string())))
            .and_then(|r| r.into_session().map_err(ClientError::from));
        let session = match session {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "login response rejected");
                self.notifier.notify(NoticeKind::Error, "Sign-in failed: unexpected response from the server.");
                return Err(e);
            }
        };

        let persisted = self.store.set_session(&session);
        self.current.replace(Some(session));
        form.reset();

        let session = self.current.get().ok_or(DomainError::Unauthenticated)?;
        tracing::info!(user_id = %session.user_id(), role = %session.role(), "signed in");
        match persisted {
            Ok(()) => self.notifier.notify(NoticeKind::Success, "Signed in"),
            Err(e) => {
                tracing::warn!(error = %e, "session not persisted");
                self.notifier.notify(
                    NoticeKind::Error,
                    "Signed in, but the session could not be saved on this device.",
                );
            }
        }
        Ok(session)
    }

    /// End the session. The in-memory session is always dropped; a store
    /// failure is notified and returned.
    pub fn logout(&self) -> Result<(), ClientError> {
        match self.end_session("signed out") {
            Ok(()) => {
                self.notifier.notify(NoticeKind::Success, "Signed out");
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(
                    NoticeKind::Error,
                    "Signed out, but the saved session could not be removed.",
                );
                Err(e.into())
            }
        }
    }

    /// Submit a screen's form and notify the outcome.
    pub async fn submit_form(
        &self,
        form: &mut FormModel,
        method: Method,
        path: &str,
        success_message: &str,
    ) -> Result<Value, ClientError> {
        let response = self.send(form, method, path).await?;
        self.notifier.notify(NoticeKind::Success, success_message);
        Ok(response)
    }

    /// Upload the form's pending files, then submit it.
    ///
    /// A failed upload stops before anything is sent.
    pub async fn submit_form_with_uploads<U: Uploader>(
        &self,
        form: &mut FormModel,
        uploader: &U,
        method: Method,
        path: &str,
        success_message: &str,
    ) -> Result<Value, ClientError> {
        self.upload_pending_files(form, uploader).await?;
        self.submit_form(form, method, path, success_message).await
    }

    /// Upload every pending file and write the stored paths into the form.
    ///
    /// Stops at the first failure; files already uploaded keep their path.
    pub async fn upload_pending_files<U: Uploader>(&self, form: &mut FormModel, uploader: &U) -> Result<usize, ClientError> {
        let pending: Vec<_> = form.pending_files().cloned().collect();
        let mut uploaded = 0;

        for file in pending {
            match uploader.upload(&file).await {
                Ok(stored) => {
                    form.complete_upload(&file.field, stored.stored_path)?;
                    uploaded += 1;
                }
                Err(e) => {
                    self.report_transport_error(&e);
                    return Err(e.into());
                }
            }
        }
        Ok(uploaded)
    }

    async fn send(&self, form: &mut FormModel, method: Method, path: &str) -> Result<Value, ClientError> {
        let outcome = form
            .submit_with(|payload| self.transport.request(method, path, Some(payload.into_value())))
            .await
            .map_err(ClientError::from);

        match outcome {
            Ok(value) => Ok(value),
            Err(ClientError::Validation(failure)) => {
                tracing::debug!(fields = failure.errors.len(), "submission blocked by validation");
                Err(ClientError::Validation(failure))
            }
            Err(ClientError::Transport(e)) => {
                self.report_transport_error(&e);
                Err(ClientError::Transport(e))
            }
            Err(e) => {
                self.notifier.notify(NoticeKind::Error, &e.to_string());
                Err(e)
            }
        }
    }

    fn report_transport_error(&self, error: &TransportError) {
        tracing::warn!(%error, "request failed");
        if error.is_unauthorized() && self.current.is_authenticated() {
            // store failure already logged by end_session
            let _ = self.end_session("session rejected by server");
            self.notifier
                .notify(NoticeKind::Error, "Your session has expired. Please sign in again.");
            return;
        }
        self.notifier.notify(NoticeKind::Error, &error.user_message());
    }

    /// The in-memory session is dropped before the store is touched.
    fn end_session(&self, reason: &str) -> Result<(), SessionStoreError> {
        if let Some(previous) = self.current.replace(None) {
            tracing::info!(user_id = %previous.user_id(), reason, "session ended");
        }
        self.store
            .clear_session()
            .inspect_err(|e| tracing::warn!(error = %e, reason, "stored session could not be cleared"))
    }
}
