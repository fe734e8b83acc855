//! `lms-admin`: print the navigation visible to the persisted session.
//!
//! Usage: `lms-admin [current-path]`

use anyhow::Context;

use lms_client::{AppController, ClientConfig, CurrentSession, FileSessionStore, HttpTransport, TracingNotifier};

fn main() -> anyhow::Result<()> {
    lms_observability::init();

    let config = ClientConfig::from_env().context("failed to load client configuration")?;
    let current = CurrentSession::default();
    let store = FileSessionStore::new(config.session_file.clone());
    let transport = HttpTransport::new(config, current.clone());

    let controller = AppController::new(transport, store, TracingNotifier, current)
        .context("failed to start the client")?;

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    if controller.session().is_none() {
        tracing::info!("no stored session; sign in to see the navigation");
    }

    let navigation = controller.navigation(&path);
    println!("{}", serde_json::to_string_pretty(&navigation)?);
    Ok(())
}
