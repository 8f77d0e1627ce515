// src/main.rs
use std::env;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use teloxide::Bot;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use stars_shop::api::client::WebhookClient;
use stars_shop::bot::BotContext;
use stars_shop::catalog::ItemCatalog;
use stars_shop::recorder::{LocalRecorder, PurchaseRecorder, RemoteRecorder};
use stars_shop::store::PurchaseStore;
use stars_shop::{api, bot, docs, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let bot_token = env::var("TELOXIDE_TOKEN").expect("TELOXIDE_TOKEN must be set");
    let provider_token =
        env::var("PAYMENT_PROVIDER_TOKEN").expect("PAYMENT_PROVIDER_TOKEN must be set");
    let bot_username = env::var("BOT_USERNAME").expect("BOT_USERNAME must be set");

    let port: u16 = env::var("PORT")
        .ok()
        .map(|raw| raw.parse().expect("PORT must be a number"))
        .unwrap_or(5000);
    let game_url: Url = env::var("GAME_URL")
        .unwrap_or_else(|_| "https://vkss.itch.io/tls".to_string())
        .parse()
        .expect("GAME_URL must be a valid URL");
    let pending_ttl_secs: u64 = env::var("PENDING_TTL_SECS")
        .ok()
        .map(|raw| raw.parse().expect("PENDING_TTL_SECS must be a number"))
        .unwrap_or(0);
    let remote_store_url = env::var("REMOTE_STORE_URL").ok();

    let store = PurchaseStore::default();
    let catalog = Arc::new(ItemCatalog::game_default());

    let state = web::Data::new(AppState {
        store: store.clone(),
        catalog: catalog.clone(),
        bot_username,
    });

    // With REMOTE_STORE_URL set, another process owns the store and this one
    // only forwards purchase events to it.
    let recorder: Arc<dyn PurchaseRecorder> = match &remote_store_url {
        Some(url) => {
            log::info!("recording purchases via remote store at {url}");
            Arc::new(RemoteRecorder::new(WebhookClient::new(url.clone())))
        }
        None => Arc::new(LocalRecorder::new(store.clone())),
    };

    if pending_ttl_secs > 0 {
        let store = store.clone();
        let ttl = Duration::from_secs(pending_ttl_secs);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(60));
            loop {
                tick.tick().await;
                let purged = store.purge_stale(ttl).await;
                if purged > 0 {
                    log::info!("purged {purged} stale pending purchases");
                }
            }
        });
    }

    let tg_bot = Bot::new(bot_token);
    let ctx = BotContext {
        recorder,
        catalog,
        provider_token,
        game_url,
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
            )
            .service(api::payments::health)
            .service(api::payments::initiate_payment)
            .service(api::payments::check_payment_status)
            .service(api::payments::update_payment_status)
    })
    .bind(("0.0.0.0", port))?
    .run();

    log::info!("webhook service listening on port {port}");

    tokio::select! {
        result = server => result,
        _ = bot::run(tg_bot, ctx) => Ok(()),
    }
}
