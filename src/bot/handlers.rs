// src/bot/handlers.rs
//
// The purchase conversation: deep-link entry, shop listing, invoice
// issuance, the pre-checkout gate and payment completion. Conversation
// state lives in Telegram itself; the only state this side touches is the
// purchase recorder.

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, LabeledPrice};
use teloxide::utils::command::BotCommands;

use crate::payload::{parse_start_param, InvoicePayload};

use super::BotContext;

/// Telegram Stars currency code. Amounts are whole Stars, no minor units.
const STARS_CURRENCY: &str = "XTR";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case")]
pub enum Command {
    /// Entry point, optionally carrying a `pay_<item_id>_<user_id>` deep link.
    Start(String),
    /// Launch the game.
    PlayGame,
    /// Browse the item shop.
    Shop,
}

pub async fn command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> ResponseResult<()> {
    match cmd {
        Command::Start(param) => {
            if let Some((item_id, user_id)) = parse_start_param(param.trim()) {
                send_invoice_for(&bot, msg.chat.id, &ctx, &item_id, &user_id).await?;
            } else {
                bot.send_message(
                    msg.chat.id,
                    "Welcome! Type /play_game to start playing or /shop to see available items.",
                )
                .await?;
            }
        }
        Command::PlayGame => {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
                "Play the game",
                ctx.game_url.clone(),
            )]]);
            bot.send_message(msg.chat.id, "Ready when you are:")
                .reply_markup(keyboard)
                .await?;
        }
        Command::Shop => {
            let keyboard = InlineKeyboardMarkup::new(ctx.catalog.items().iter().map(|item| {
                vec![InlineKeyboardButton::callback(
                    format!("{} - {} Stars", item.name, item.price),
                    format!("buy_{}", item.id),
                )]
            }));
            bot.send_message(msg.chat.id, "Welcome to the shop! Choose an item to purchase:")
                .reply_markup(keyboard)
                .await?;
        }
    }
    Ok(())
}

pub async fn callback(bot: Bot, q: CallbackQuery, ctx: BotContext) -> ResponseResult<()> {
    // The launch-game button is not part of the purchase flow; just point
    // the player at the game.
    if q.game_short_name.is_some() {
        bot.answer_callback_query(q.id.clone()).await?;
        if let Some(msg) = q.message {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
                "Play the game",
                ctx.game_url.clone(),
            )]]);
            bot.send_message(msg.chat().id, "Ready when you are:")
                .reply_markup(keyboard)
                .await?;
        }
        return Ok(());
    }

    let data = q.data.as_deref().unwrap_or_default();
    if let Some(item_id) = data.strip_prefix("buy_") {
        // The pressing user's own id; the shop path never trusts callback
        // data for identity.
        let user_id = q.from.id.to_string();
        let chat_id = q
            .message
            .as_ref()
            .map(|msg| msg.chat().id)
            .unwrap_or(ChatId(q.from.id.0 as i64));
        send_invoice_for(&bot, chat_id, &ctx, item_id, &user_id).await?;
        bot.answer_callback_query(q.id).await?;
    } else {
        log::warn!("unrecognized callback data: {data:?}");
        bot.answer_callback_query(q.id)
            .text("Something went wrong")
            .await?;
    }
    Ok(())
}

/// Validates the item, records the pending purchase, and sends the invoice.
/// Recording happens first: an invoice must never go out for a purchase the
/// store does not know about.
async fn send_invoice_for(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &BotContext,
    item_id: &str,
    user_id: &str,
) -> ResponseResult<()> {
    let Some(item) = ctx.catalog.lookup(item_id) else {
        log::warn!("invoice requested for unknown item_id={item_id} user_id={user_id}");
        bot.send_message(chat_id, "Invalid item selection.").await?;
        return Ok(());
    };

    if let Err(e) = ctx.recorder.record_pending(user_id, item_id).await {
        log::error!("failed to record pending purchase user_id={user_id} item_id={item_id}: {e}");
        bot.send_message(chat_id, "Error: Payment initiation failed. Please try again.")
            .await?;
        return Ok(());
    }

    let payload = InvoicePayload::new(&item.id, user_id).encode();
    let prices = vec![LabeledPrice {
        label: item.name.clone(),
        amount: item.price,
    }];

    let mut request = bot.send_invoice(
        chat_id,
        item.name.clone(),
        item.description.clone(),
        payload,
        STARS_CURRENCY,
        prices,
    );
    if !ctx.provider_token.is_empty() {
        request = request.provider_token(ctx.provider_token.clone());
    }
    request.await?;
    Ok(())
}

/// The last gate before money moves: approve only what decodes to a known
/// item, reject everything ambiguous.
pub async fn pre_checkout(bot: Bot, q: PreCheckoutQuery, ctx: BotContext) -> ResponseResult<()> {
    match InvoicePayload::decode(&q.invoice_payload) {
        Some(payload) if ctx.catalog.lookup(&payload.item_id).is_some() => {
            bot.answer_pre_checkout_query(q.id, true).await?;
        }
        Some(payload) => {
            log::warn!(
                "pre-checkout for unknown item_id={} user_id={}; rejecting",
                payload.item_id,
                payload.user_id
            );
            bot.answer_pre_checkout_query(q.id, false)
                .error_message("Invalid item")
                .await?;
        }
        None => {
            log::warn!(
                "pre-checkout with undecodable payload {:?}; rejecting",
                q.invoice_payload
            );
            bot.answer_pre_checkout_query(q.id, false)
                .error_message("Invalid payment data")
                .await?;
        }
    }
    Ok(())
}

pub async fn successful_payment(bot: Bot, msg: Message, ctx: BotContext) -> ResponseResult<()> {
    let Some(payment) = msg.successful_payment() else {
        return Ok(());
    };

    let Some(payload) = InvoicePayload::decode(&payment.invoice_payload) else {
        // Money has been captured; this needs manual reconciliation.
        log::error!(
            "successful payment with undecodable payload {:?}",
            payment.invoice_payload
        );
        bot.send_message(
            msg.chat.id,
            "Payment received, but we could not match it to an item. Please contact support.",
        )
        .await?;
        return Ok(());
    };

    let item_name = ctx
        .catalog
        .lookup(&payload.item_id)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| payload.item_id.clone());

    match ctx
        .recorder
        .record_completed(&payload.user_id, &payload.item_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            log::warn!(
                "captured payment had no pending record user_id={} item_id={}",
                payload.user_id,
                payload.item_id
            );
        }
        Err(e) => {
            // Capture already happened; do not fail the user confirmation.
            log::error!(
                "failed to record completed purchase user_id={} item_id={}: {e}",
                payload.user_id,
                payload.item_id
            );
        }
    }

    bot.send_message(
        msg.chat.id,
        format!("Payment successful! You've purchased {item_name}. Return to the game to claim your item."),
    )
    .await?;
    Ok(())
}
