use std::sync::Arc;

use crate::store::RecordStore;

/// Shared application state: the record store behind a trait object so the
/// Postgres and in-memory backends are interchangeable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}
