//! CloudInventoryProvider - IRemoteInventory implementation
//!
//! Wraps the [`ApiClient`] and delegates to the endpoint module to fulfil
//! the [`IRemoteInventory`] port contract. Authentication is fully owned by
//! the shared [`TokenManager`]; the engine never sees a token.

use std::sync::Arc;

use stocklink_core::domain::errors::RemoteError;
use stocklink_core::ports::remote_inventory::{
    AssociationPayload, IRemoteInventory, RemoteItem, TargetWarehouse,
};

use crate::auth::TokenManager;
use crate::client::ApiClient;
use crate::inventory;

/// Port implementation backed by the remote inventory REST API
pub struct CloudInventoryProvider {
    client: ApiClient,
    tokens: Arc<TokenManager>,
}

impl CloudInventoryProvider {
    /// Creates a provider over an already-configured client.
    pub fn new(client: ApiClient, tokens: Arc<TokenManager>) -> Self {
        Self { client, tokens }
    }
}

#[async_trait::async_trait]
impl IRemoteInventory for CloudInventoryProvider {
    async fn verify_credentials(&self) -> Result<(), RemoteError> {
        self.tokens.bearer_token().await.map(|_| ())
    }

    async fn get_warehouse(&self, code: &str) -> Result<Option<TargetWarehouse>, RemoteError> {
        inventory::get_warehouse_by_code(&self.client, code).await
    }

    async fn create_warehouse(
        &self,
        warehouse: &TargetWarehouse,
    ) -> Result<TargetWarehouse, RemoteError> {
        inventory::create_warehouse(&self.client, warehouse).await
    }

    async fn get_item(&self, item_code: &str) -> Result<Option<RemoteItem>, RemoteError> {
        inventory::get_inventory_by_code(&self.client, item_code).await
    }

    async fn update_association(&self, payload: &AssociationPayload) -> Result<(), RemoteError> {
        inventory::update_inventory(&self.client, payload).await
    }

    async fn associate_warehouse(&self, payload: &AssociationPayload) -> Result<(), RemoteError> {
        inventory::associate_item_to_warehouse(&self.client, payload).await
    }
}
