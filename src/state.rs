//! Shared application state for all routes.

use crate::store::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Constructed once at startup; closed on shutdown by the owner of the process.
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        AppState { store }
    }
}
