//! Shared application state.

use std::sync::Arc;

use idlhub_core::storage::Storage;

/// State handed to every handler: the storage is the only shared mutable
/// resource, and it is shared only through the filesystem itself.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}
