//! Minimal wiring demo for the cart manager.
//!
//! Points the cart at a running catalog service (e.g. a local json-server
//! with `/products` and `/stock` routes) and walks through the operations:
//!
//! ```sh
//! CATALOG_BASE_URL=http://localhost:3333 cargo run -p rocket-shoes-cart --example demo
//! ```

#![allow(clippy::print_stdout)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rocket_shoes_cart::catalog::{CatalogClient, ProductCatalog};
use rocket_shoes_cart::config::CartConfig;
use rocket_shoes_cart::notify::{Notifier, TracingNotifier};
use rocket_shoes_cart::service::CartService;
use rocket_shoes_cart::store::{FileStore, SnapshotStore};
use rocket_shoes_core::ProductId;

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocket_shoes_cart=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CartConfig::from_env().expect("Failed to load configuration");
    tracing::info!(?config, "configuration loaded");

    let catalog = CatalogClient::new(&config).expect("Failed to build catalog client");
    let store = FileStore::new(config.store_path.clone());

    let cart = CartService::new(
        Arc::new(catalog) as Arc<dyn ProductCatalog>,
        Arc::new(store) as Arc<dyn SnapshotStore>,
        Arc::new(TracingNotifier) as Arc<dyn Notifier>,
        &config.storage_key,
    );

    println!("cart at startup: {} entries", cart.cart().len());

    let id = ProductId::new(1);
    if cart.add_product(id).await.is_ok() {
        println!("added product {id}");
    }

    for entry in cart.cart() {
        println!("  {} x{} @ {}", entry.title, entry.amount, entry.price);
    }
}
