// src/catalog.rs

use serde::Serialize;
use utoipa::ToSchema;

/// An in-game item sold for Telegram Stars.
///
/// `price` is in whole Stars; this is the canonical value, the invoice layer
/// sends it unscaled (XTR has no minor units).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
}

/// Static, read-only item table. Constant for process lifetime.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// The catalog the game ships with.
    pub fn game_default() -> Self {
        Self::new(vec![
            Item {
                id: "coins_100".to_string(),
                name: "100 Coins Pack".to_string(),
                description: "Get 100 in-game coins".to_string(),
                price: 5,
            },
            Item {
                id: "coins_500".to_string(),
                name: "500 Coins Pack".to_string(),
                description: "Get 500 in-game coins".to_string(),
                price: 20,
            },
            Item {
                id: "special_character".to_string(),
                name: "Special Character".to_string(),
                description: "Unlock a special character".to_string(),
                price: 50,
            },
        ])
    }

    pub fn lookup(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Items in listing order, for the shop keyboard.
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}
