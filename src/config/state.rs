// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::render::ExtensionCatalog;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Extension catalog shared by every responder; never mutated
    pub catalog: &'static ExtensionCatalog,
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            catalog: ExtensionCatalog::standard(),
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}
