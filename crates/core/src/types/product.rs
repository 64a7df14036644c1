//! Cart entry and stock records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A cart entry: the catalog fields of a product plus the quantity held in
/// the cart.
///
/// `amount` is cart state, not a catalog field - a product fetched from the
/// catalog enters the cart with `amount = 1`. Entries are unique by `id`
/// within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price as reported by the catalog service (JSON number on the wire).
    pub price: Decimal,
    /// URL of the product image.
    pub image: String,
    /// Quantity of this product held in the cart.
    pub amount: u32,
}

/// Maximum purchasable quantity for a product, as reported by the stock
/// endpoint of the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_snapshot_wire_format() {
        // Shape of a persisted cart entry (price is a JSON number).
        let json = r#"{
            "id": 1,
            "title": "Tenis de Caminhada Leve Confortavel",
            "price": 179.9,
            "image": "https://cdn.example.com/shoes/1.jpg",
            "amount": 2
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.to_string(), "179.9");
        assert_eq!(product.amount, 2);
    }

    #[test]
    fn test_product_round_trip() {
        let product = Product {
            id: ProductId::new(3),
            title: "Sneaker".to_string(),
            price: Decimal::new(2499, 2),
            image: "https://cdn.example.com/shoes/3.jpg".to_string(),
            amount: 1,
        };

        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_stock_deserializes() {
        let stock: Stock = serde_json::from_str(r#"{"id": 1, "amount": 3}"#).unwrap();
        assert_eq!(stock.id, ProductId::new(1));
        assert_eq!(stock.amount, 3);
    }
}
