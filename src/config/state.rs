// Application state module
// Shared state handed to every connection task

use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use super::types::Config;
use crate::session::Session;
use crate::store::ConfigStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// The single process-wide simulated session
    pub session: Mutex<Session>,
    /// Persisted server document
    pub store: ConfigStore,
    /// Fired once on SIGTERM/SIGINT
    pub shutdown_signal: Arc<Notify>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_store(config, ConfigStore::new(&config.store.path))
    }

    /// Build state around an explicit store (tests point this at a temp dir)
    pub fn with_store(config: &Config, store: ConfigStore) -> Self {
        Self {
            config: config.clone(),
            session: Mutex::new(Session::new()),
            store,
            shutdown_signal: Arc::new(Notify::new()),
        }
    }
}
