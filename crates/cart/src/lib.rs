//! RocketShoes cart manager.
//!
//! Tracks the products a visitor has selected, validates quantities against
//! the catalog's stock endpoint, and mirrors every change to a durable
//! snapshot store so the cart survives restarts.
//!
//! # Architecture
//!
//! - [`service::CartService`] - the four cart operations, built around a
//!   single-writer lock so concurrent mutations cannot lose updates
//! - [`catalog`] - `reqwest` client for the product/stock service, product
//!   lookups cached via `moka`
//! - [`store`] - opaque string snapshot store (file-backed or in-memory)
//! - [`notify`] - fire-and-forget user notification channel
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use rocket_shoes_cart::{
//!     catalog::CatalogClient, config::CartConfig, notify::TracingNotifier,
//!     service::CartService, store::FileStore,
//! };
//!
//! let config = CartConfig::from_env()?;
//! let cart = CartService::new(
//!     Arc::new(CatalogClient::new(&config)?),
//!     Arc::new(FileStore::new(config.store_path.clone())),
//!     Arc::new(TracingNotifier),
//!     &config.storage_key,
//! );
//!
//! cart.add_product(ProductId::new(1)).await?;
//! for entry in cart.cart() {
//!     println!("{} x{}", entry.title, entry.amount);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod service;
pub mod store;

pub use catalog::{CatalogClient, ProductCatalog};
pub use config::CartConfig;
pub use error::CartError;
pub use notify::Notifier;
pub use service::CartService;
pub use store::{FileStore, MemoryStore, SnapshotStore};
