//! RocketShoes Core - Shared domain types.
//!
//! This crate provides the types shared between the cart manager and any
//! consumer of it (UI layers, tooling):
//!
//! - [`types::ProductId`] - type-safe product identifier
//! - [`types::Product`] - a cart entry (catalog record plus cart quantity)
//! - [`types::Stock`] - maximum purchasable quantity for a product
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
