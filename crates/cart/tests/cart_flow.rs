//! End-to-end cart flow: real catalog client against a mock server, file
//! store on a temp directory.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rocket_shoes_cart::catalog::{CatalogClient, ProductCatalog};
use rocket_shoes_cart::config::{CartConfig, DEFAULT_STORAGE_KEY};
use rocket_shoes_cart::notify::TracingNotifier;
use rocket_shoes_cart::service::CartService;
use rocket_shoes_cart::store::FileStore;
use rocket_shoes_core::ProductId;

async fn mount_catalog(server: &MockServer, id: u64, stock: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/products/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "title": format!("Shoe {id}"),
            "price": 179.9,
            "image": format!("https://cdn.example.com/shoes/{id}.jpg")
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/stock/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "amount": stock
            })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn cart_survives_a_restart() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 5).await;
    mount_catalog(&server, 2, 3).await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("cart.json");
    let config = CartConfig::for_base_url(&server.uri()).unwrap();
    let catalog = Arc::new(CatalogClient::new(&config).unwrap());

    {
        let service = CartService::new(
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>,
            Arc::new(FileStore::new(store_path.clone())),
            Arc::new(TracingNotifier),
            DEFAULT_STORAGE_KEY,
        );
        service.add_product(ProductId::new(1)).await.unwrap();
        service.add_product(ProductId::new(1)).await.unwrap();
        service.add_product(ProductId::new(2)).await.unwrap();
    }

    // "Restart": a new service over the same file sees the same cart.
    let service = CartService::new(
        catalog,
        Arc::new(FileStore::new(store_path)),
        Arc::new(TracingNotifier),
        DEFAULT_STORAGE_KEY,
    );

    let cart = service.cart();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart[0].id, ProductId::new(1));
    assert_eq!(cart[0].amount, 2);
    assert_eq!(cart[1].id, ProductId::new(2));
    assert_eq!(cart[1].amount, 1);

    // The cart stays fully operable after the reload.
    service
        .update_product_amount(ProductId::new(2), 3)
        .await
        .unwrap();
    assert_eq!(service.cart()[1].amount, 3);

    service.remove_product(ProductId::new(1)).await.unwrap();
    assert_eq!(service.cart().len(), 1);
}
