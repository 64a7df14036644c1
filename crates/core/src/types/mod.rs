//! Domain types for the RocketShoes cart.

mod id;
mod product;

pub use id::ProductId;
pub use product::{Product, Stock};
