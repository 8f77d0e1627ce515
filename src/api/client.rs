// src/api/client.rs
//
// Client for a remote webhook service, used when the bot runs in a separate
// process from the store owner.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const COMPLETION_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook api error status={status} body={body}")]
    Api { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct UpdateStatusResponse {
    #[allow(dead_code)]
    success: bool,
    #[serde(default)]
    updated: bool,
}

#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    base_url: String,
}

impl WebhookClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<String, WebhookError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(WebhookError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Records a `pending` purchase on the remote store. Not retried: the
    /// user is told to try again and nothing has been charged yet.
    pub async fn initiate_payment(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<(), WebhookError> {
        self.post_json(
            "/initiate_payment",
            json!({ "user_id": user_id, "item_id": item_id }),
        )
        .await?;
        Ok(())
    }

    /// Reports a captured payment to the remote store. Retried with backoff:
    /// the money has already moved, so losing this call means the game client
    /// never learns the purchase completed.
    pub async fn update_payment_status(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<bool, WebhookError> {
        let body = json!({ "user_id": user_id, "item_id": item_id, "status": "completed" });

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.post_json("/update_payment_status", body.clone()).await {
                Ok(raw) => {
                    let parsed: UpdateStatusResponse = serde_json::from_str(&raw)
                        .map_err(|e| WebhookError::InvalidResponse(format!("{e}; body={raw}")))?;
                    return Ok(parsed.updated);
                }
                Err(e) if attempt < COMPLETION_ATTEMPTS => {
                    log::warn!(
                        "update_payment_status attempt {attempt} failed for user_id={user_id}: {e}; retrying"
                    );
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
