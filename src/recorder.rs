// src/recorder.rs
//
// Seam between the bot handlers and the purchase store. The merged topology
// writes to the in-process store; the split topology calls the remote
// webhook service. Same contract either way.

use async_trait::async_trait;

use crate::api::client::{WebhookClient, WebhookError};
use crate::store::PurchaseStore;

#[async_trait]
pub trait PurchaseRecorder: Send + Sync {
    /// Records a `pending` purchase before the invoice goes out.
    async fn record_pending(&self, user_id: &str, item_id: &str) -> Result<(), WebhookError>;

    /// Records a captured payment. Returns whether a record was actually
    /// updated; `false` means there was nothing pending to complete.
    async fn record_completed(&self, user_id: &str, item_id: &str) -> Result<bool, WebhookError>;
}

/// Writes straight into the shared in-process store.
pub struct LocalRecorder {
    store: PurchaseStore,
}

impl LocalRecorder {
    pub fn new(store: PurchaseStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PurchaseRecorder for LocalRecorder {
    async fn record_pending(&self, user_id: &str, item_id: &str) -> Result<(), WebhookError> {
        self.store.put(user_id, item_id).await;
        Ok(())
    }

    async fn record_completed(&self, user_id: &str, item_id: &str) -> Result<bool, WebhookError> {
        Ok(self.store.mark_completed(user_id, item_id).await)
    }
}

/// Notifies a webhook service in another process.
pub struct RemoteRecorder {
    client: WebhookClient,
}

impl RemoteRecorder {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PurchaseRecorder for RemoteRecorder {
    async fn record_pending(&self, user_id: &str, item_id: &str) -> Result<(), WebhookError> {
        self.client.initiate_payment(user_id, item_id).await
    }

    async fn record_completed(&self, user_id: &str, item_id: &str) -> Result<bool, WebhookError> {
        self.client.update_payment_status(user_id, item_id).await
    }
}
