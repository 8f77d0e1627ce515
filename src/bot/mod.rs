// src/bot/mod.rs

pub mod handlers;

use std::sync::Arc;

use teloxide::prelude::*;
use url::Url;

use crate::catalog::ItemCatalog;
use crate::recorder::PurchaseRecorder;

/// Everything the bot handlers need, injected through the dispatcher.
#[derive(Clone)]
pub struct BotContext {
    pub recorder: Arc<dyn PurchaseRecorder>,
    pub catalog: Arc<ItemCatalog>,
    /// Payment provider token. Empty for Telegram Stars.
    pub provider_token: String,
    /// Where the launch-game affordance points.
    pub game_url: Url,
}

pub async fn run(bot: Bot, ctx: BotContext) {
    log::info!("starting bot dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::filter(|msg: Message| msg.successful_payment().is_some())
                        .endpoint(handlers::successful_payment),
                )
                .branch(
                    dptree::entry()
                        .filter_command::<handlers::Command>()
                        .endpoint(handlers::command),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handlers::callback))
        .branch(Update::filter_pre_checkout_query().endpoint(handlers::pre_checkout));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd: std::sync::Arc<Update>| async move {
            log::warn!("unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
