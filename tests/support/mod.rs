use std::sync::Arc;

use stars_shop::catalog::ItemCatalog;
use stars_shop::store::PurchaseStore;
use stars_shop::AppState;

pub fn build_state() -> AppState {
    AppState {
        store: PurchaseStore::new(),
        catalog: Arc::new(ItemCatalog::game_default()),
        bot_username: "TestShopBot".to_string(),
    }
}
