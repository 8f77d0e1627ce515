// src/payload.rs
//
// Wire formats round-tripped through Telegram: the invoice payload the
// payment provider echoes back on pre-checkout and completion, and the
// `?start=` parameter of the t.me deep link handed to the game client.

use serde::{Deserialize, Serialize};

/// Opaque payload attached to an invoice and returned verbatim by the
/// platform. Encoded as JSON so identifiers containing underscores survive
/// the round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub item_id: String,
    pub user_id: String,
}

impl InvoicePayload {
    pub fn new(item_id: &str, user_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
        }
    }

    pub fn encode(&self) -> String {
        serde_json::json!({ "item_id": self.item_id, "user_id": self.user_id }).to_string()
    }

    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Parses a `/start` deep-link parameter of the form
/// `pay_<item_id>_<user_id>` into `(item_id, user_id)`.
///
/// Item ids may contain underscores (`coins_100`), user ids may not, so the
/// split happens at the last underscore. Anything else is not a payment
/// deep link.
pub fn parse_start_param(param: &str) -> Option<(String, String)> {
    let rest = param.strip_prefix("pay_")?;
    let (item_id, user_id) = rest.rsplit_once('_')?;
    if item_id.is_empty() || user_id.is_empty() {
        return None;
    }
    Some((item_id.to_string(), user_id.to_string()))
}

/// Builds the t.me deep link the game client opens to reach the bot.
/// This format is an external contract; do not change it.
pub fn deep_link(bot_username: &str, item_id: &str, user_id: &str) -> String {
    format!("https://t.me/{bot_username}?start=pay_{item_id}_{user_id}")
}
