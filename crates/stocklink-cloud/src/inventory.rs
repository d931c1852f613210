//! Warehouse and inventory endpoint operations
//!
//! Typed wrappers over the remote REST resources. The remote wraps lookup
//! responses in a `{success, data}` envelope, and the item-detail endpoint
//! sometimes returns `data` as a one-element array instead of an object;
//! both quirks are normalized here so callers only ever see port DTOs.
//!
//! Lookup 404s become `Ok(None)`; "not found" is control flow for the
//! reconciler and the provisioner, not an error.

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use stocklink_core::domain::errors::RemoteError;
use stocklink_core::ports::remote_inventory::{AssociationPayload, RemoteItem, TargetWarehouse};

use crate::client::ApiClient;

/// Warehouse collection resource
const WAREHOUSES_PATH: &str = "/warehouses";

/// Item detail resource
const INVENTORIES_PATH: &str = "/inventories";

/// Association creation resource (trailing slash is part of the contract)
const ASSOCIATE_PATH: &str = "/inventories_associate_warehouse/";

// ============================================================================
// Response envelope types
// ============================================================================

/// The `{success, data}` wrapper the remote puts around responses
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

/// `data` that may be a single object or an array of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

// ============================================================================
// Warehouse operations
// ============================================================================

/// Looks up a warehouse by code.
///
/// Returns `Ok(None)` on a remote 404 or an unsuccessful/empty envelope.
pub async fn get_warehouse_by_code(
    client: &ApiClient,
    code: &str,
) -> Result<Option<TargetWarehouse>, RemoteError> {
    let path = format!("{WAREHOUSES_PATH}/{code}");
    debug!(code, "Looking up warehouse");

    match client.get_json::<Envelope<TargetWarehouse>>(&path).await {
        Ok(envelope) if envelope.success => Ok(envelope.data),
        Ok(_) => Ok(None),
        Err(RemoteError::NotFound(_)) => {
            debug!(code, "Warehouse not found (404)");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Creates a warehouse from the given attributes.
pub async fn create_warehouse(
    client: &ApiClient,
    warehouse: &TargetWarehouse,
) -> Result<TargetWarehouse, RemoteError> {
    info!(
        code = %warehouse.code,
        description = %warehouse.description,
        "Creating warehouse"
    );

    let body = serde_json::to_value(warehouse)
        .map_err(|err| RemoteError::InvalidResponse(err.to_string()))?;
    let envelope: Envelope<TargetWarehouse> = client
        .post_json(&format!("{WAREHOUSES_PATH}/"), &body)
        .await?;

    info!(code = %warehouse.code, "Warehouse created");
    // Some deployments echo the created resource back, some don't.
    Ok(envelope.data.unwrap_or_else(|| warehouse.clone()))
}

// ============================================================================
// Inventory operations
// ============================================================================

/// Fetches the remote item detail, including its warehouse associations.
///
/// Returns `Ok(None)` when the item does not exist remotely (404, an
/// unsuccessful envelope, or an empty `data` array).
pub async fn get_inventory_by_code(
    client: &ApiClient,
    code: &str,
) -> Result<Option<RemoteItem>, RemoteError> {
    let path = format!("{INVENTORIES_PATH}/{code}");
    debug!(code, "Fetching item detail");

    match client
        .get_json::<Envelope<OneOrMany<RemoteItem>>>(&path)
        .await
    {
        Ok(envelope) if envelope.success => Ok(envelope.data.and_then(OneOrMany::into_first)),
        Ok(_) => Ok(None),
        Err(RemoteError::NotFound(_)) => {
            debug!(code, "Item not found (404)");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Applies a stock/cost adjustment to an existing warehouse association.
pub async fn update_inventory(
    client: &ApiClient,
    payload: &AssociationPayload,
) -> Result<(), RemoteError> {
    info!(
        code = %payload.code,
        warehouse = %payload.code_warehouse,
        stock = payload.stock,
        "Updating inventory association"
    );

    let body = serde_json::to_value(payload)
        .map_err(|err| RemoteError::InvalidResponse(err.to_string()))?;
    client
        .execute(
            Method::PUT,
            &format!("{INVENTORIES_PATH}/{}", payload.code),
            Some(&body),
        )
        .await
        .map(|_| ())
}

/// Creates a warehouse association for an item.
///
/// Also the Create path: when the item does not exist remotely, the full
/// payload posted here materializes it (see DESIGN.md).
pub async fn associate_item_to_warehouse(
    client: &ApiClient,
    payload: &AssociationPayload,
) -> Result<(), RemoteError> {
    info!(
        code = %payload.code,
        warehouse = %payload.code_warehouse,
        stock = payload.stock,
        "Associating item with warehouse"
    );

    let body = serde_json::to_value(payload)
        .map_err(|err| RemoteError::InvalidResponse(err.to_string()))?;
    client
        .execute(Method::POST, ASSOCIATE_PATH, Some(&body))
        .await
        .map(|_| ())
}
