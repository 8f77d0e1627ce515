pub mod api;
pub mod bot;
pub mod catalog;
pub mod docs;
pub mod payload;
pub mod recorder;
pub mod store;

use std::sync::Arc;

use crate::catalog::ItemCatalog;
use crate::store::PurchaseStore;

/// Shared state for the webhook HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: PurchaseStore,
    pub catalog: Arc<ItemCatalog>,
    /// Public bot username, used to build t.me deep links.
    pub bot_username: String,
}
