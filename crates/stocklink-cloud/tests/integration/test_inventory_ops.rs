//! Warehouse and inventory endpoint tests
//!
//! Exercises the IRemoteInventory port implementation end to end against a
//! mock server: envelope unwrapping, 404 normalization, array-wrapped item
//! details, and the exact payloads sent on update/associate.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stocklink_core::ports::remote_inventory::{AssociationPayload, IRemoteInventory, TargetWarehouse};

use crate::common;

async fn setup() -> (
    MockServer,
    stocklink_cloud::provider::CloudInventoryProvider,
    tempfile::TempDir,
) {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", None, 1).await;
    let (provider, _token_file, dir) = common::harness(&server).provider();
    (server, provider, dir)
}

fn payload() -> AssociationPayload {
    AssociationPayload {
        code: "201001001".to_string(),
        code_warehouse: "ALM-GRAL".to_string(),
        stock: 15.0,
        unit_cost_stock: 3.37,
        min_stock_level: 0.0,
        max_stock_level: 100.0,
        location: "GRAL".to_string(),
    }
}

#[tokio::test]
async fn warehouse_lookup_unwraps_envelope() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "code": "ALM-GRAL",
                "description": "General warehouse",
                "active": true,
                "external_integration": true
            }
        })))
        .mount(&server)
        .await;

    let warehouse = provider
        .get_warehouse("ALM-GRAL")
        .await
        .expect("lookup")
        .expect("present");

    assert_eq!(warehouse.code, "ALM-GRAL");
    assert!(warehouse.active);
    assert!(warehouse.external_integration);
}

#[tokio::test]
async fn warehouse_404_normalizes_to_none() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-MISSING"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "success": false,
            "message": "not found"
        })))
        .mount(&server)
        .await;

    let warehouse = provider.get_warehouse("ALM-MISSING").await.expect("lookup");
    assert!(warehouse.is_none());
}

#[tokio::test]
async fn create_warehouse_posts_full_attributes() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("POST"))
        .and(path("/warehouses/"))
        .and(body_partial_json(serde_json::json!({
            "code": "ALM-NEW",
            "description": "Warehouse ALM-NEW (ERP sync)",
            "active": true,
            "external_integration": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "code": "ALM-NEW",
                "description": "Warehouse ALM-NEW (ERP sync)",
                "active": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = TargetWarehouse {
        code: "ALM-NEW".to_string(),
        description: "Warehouse ALM-NEW (ERP sync)".to_string(),
        address: String::new(),
        city: String::new(),
        state: String::new(),
        country: String::new(),
        zip_code: String::new(),
        active: true,
        external_integration: true,
        transfer_approval: false,
        visible_to_all: false,
    };

    let created = provider.create_warehouse(&spec).await.expect("create");
    assert_eq!(created.code, "ALM-NEW");
}

#[tokio::test]
async fn item_detail_handles_array_wrapped_data() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path("/inventories/201001001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": [{
                "code": "201001001",
                "description": "Oil filter",
                "warehouses": [{
                    "code_warehouse": "ALM-GRAL",
                    "stock": 4.0,
                    "min_stock_level": 1.0,
                    "max_stock_level": 3.0,
                    "unit_cost_stock": 3.10,
                    "location": "GRAL"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let item = provider
        .get_item("201001001")
        .await
        .expect("fetch")
        .expect("present");

    assert_eq!(item.code, "201001001");
    let assoc = item.association_with("ALM-GRAL").expect("association");
    assert_eq!(assoc.stock, 4.0);
    assert!(item.association_with("ALM-OTHER").is_none());
}

#[tokio::test]
async fn missing_item_normalizes_to_none() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path("/inventories/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inventories/888"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": []
        })))
        .mount(&server)
        .await;

    assert!(provider.get_item("999").await.expect("404 fetch").is_none());
    assert!(provider.get_item("888").await.expect("empty fetch").is_none());
}

#[tokio::test]
async fn update_puts_payload_to_item_resource() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/inventories/201001001"))
        .and(body_partial_json(serde_json::json!({
            "code": "201001001",
            "code_warehouse": "ALM-GRAL",
            "stock": 15.0,
            "unit_cost_stock": 3.37,
            "min_stock_level": 0.0,
            "max_stock_level": 100.0,
            "location": "GRAL"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider.update_association(&payload()).await.expect("update");
}

#[tokio::test]
async fn associate_posts_payload_to_association_resource() {
    let (server, provider, _dir) = setup().await;

    Mock::given(method("POST"))
        .and(path("/inventories_associate_warehouse/"))
        .and(body_partial_json(serde_json::json!({
            "code": "201001001",
            "code_warehouse": "ALM-GRAL",
            "stock": 15.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider
        .associate_warehouse(&payload())
        .await
        .expect("associate");
}
