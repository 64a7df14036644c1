//! Cart operation errors and the user-facing messages derived from them.
//!
//! Every failure is also surfaced to the user through the injected
//! [`crate::notify::Notifier`]; the typed variants exist so programmatic
//! callers can distinguish outcomes a toast-only channel would hide.

use rocket_shoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Errors produced by the cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Catalog (product/stock service) call failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Snapshot store read or write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Persisted snapshot could not be serialized or deserialized.
    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Requested quantity exceeds the available stock.
    #[error("requested amount {requested} exceeds stock {available} for product {id}")]
    ExceedsStock {
        id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Operation targeted a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// No persisted snapshot exists to operate on.
    #[error("no cart snapshot exists")]
    SnapshotMissing,
}

/// Which cart operation an error message is phrased for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    /// The generic user-facing error message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "failed to add product",
            Self::Remove => "failed to remove product",
            Self::Update => "failed to update product quantity",
        }
    }
}

impl CartError {
    /// User-facing warning text, for validation failures only.
    ///
    /// Details (ids, raw causes) stay out of the message on purpose - the
    /// notification channel is visible to end users.
    #[must_use]
    pub const fn warning_message(&self) -> Option<&'static str> {
        match self {
            Self::ExceedsStock { .. } => Some("requested quantity exceeds stock"),
            _ => None,
        }
    }
}
