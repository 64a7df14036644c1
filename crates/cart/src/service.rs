//! Cart service: the four cart operations over a persisted snapshot.
//!
//! The persisted snapshot is the source of truth - every mutation re-reads
//! it, computes the full new cart, writes it back, and only then publishes
//! the new in-memory state. A failure anywhere leaves both copies untouched.
//!
//! Mutations serialize on a single writer lock held across the whole
//! read-validate-commit sequence, so two overlapping operations cannot
//! overwrite each other's result with a stale snapshot.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use rocket_shoes_core::{Product, ProductId};

use crate::catalog::ProductCatalog;
use crate::error::{CartError, Operation};
use crate::notify::Notifier;
use crate::store::SnapshotStore;

/// Shopping-cart state manager.
///
/// Cheaply cloneable; constructed once per application session with its
/// collaborators injected, then passed by reference (or clone) to consumers.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    catalog: Arc<dyn ProductCatalog>,
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    /// Single-writer lock; held across read-snapshot, catalog call and commit.
    write_lock: Mutex<()>,
    /// Current in-memory cart, observable by consumers.
    cart_tx: watch::Sender<Vec<Product>>,
}

impl CartService {
    /// Create a cart service, loading the initial cart from the store.
    ///
    /// A missing snapshot yields an empty cart. A snapshot that cannot be
    /// read or parsed is treated the same way, with a logged warning - a
    /// corrupt store must not take the whole session down.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: &str,
    ) -> Self {
        let initial = match store.load(storage_key) {
            Ok(Some(raw)) => decode_snapshot(&raw).unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cart store unreadable at startup, starting empty");
                Vec::new()
            }
        };

        let (cart_tx, _) = watch::channel(initial);

        Self {
            inner: Arc::new(CartServiceInner {
                catalog,
                store,
                notifier,
                storage_key: storage_key.to_string(),
                write_lock: Mutex::new(()),
                cart_tx,
            }),
        }
    }

    /// Current cart contents, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<Product> {
        self.inner.cart_tx.borrow().clone()
    }

    /// Subscribe to cart changes. The receiver always holds the latest cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.inner.cart_tx.subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a product to the cart.
    ///
    /// A product already in the cart has its quantity incremented when stock
    /// allows; otherwise the user sees an exceeds-stock warning and the cart
    /// is left as it was. A product not yet in the cart is fetched from the
    /// catalog and appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if a catalog call, the store, or snapshot
    /// encoding fails; the user is notified through the injected `Notifier`
    /// and no state changes.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn add_product(&self, id: ProductId) -> Result<(), CartError> {
        let _guard = self.inner.write_lock.lock().await;
        let result = self.try_add(id).await;
        self.report(Operation::Add, result)
    }

    /// Remove a product from the cart.
    ///
    /// Removing an id that is not in the cart is a silent success - the
    /// removal is already true. Calling this before any snapshot exists is
    /// a reported failure. Performs no catalog call.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if no snapshot exists or the store fails; the
    /// user is notified and no state changes.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), CartError> {
        let _guard = self.inner.write_lock.lock().await;
        let result = self.try_remove(id);
        self.report(Operation::Remove, result)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// An `amount` of zero is rejected as a silent no-op. An amount above
    /// the available stock warns the user and leaves the cart unchanged.
    /// Unlike [`Self::remove_product`], targeting a product that is not in
    /// the cart is a caller error and is reported as a failure.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ExceedsStock`, `CartError::NotInCart`, or an
    /// underlying catalog/store error; the user is notified accordingly and
    /// no state changes.
    #[instrument(skip(self), fields(id = %id, amount))]
    pub async fn update_product_amount(
        &self,
        id: ProductId,
        amount: u32,
    ) -> Result<(), CartError> {
        if amount == 0 {
            return Ok(());
        }

        let _guard = self.inner.write_lock.lock().await;
        let result = self.try_update(id, amount).await;
        self.report(Operation::Update, result)
    }

    // =========================================================================
    // Operation bodies (run under the write lock)
    // =========================================================================

    async fn try_add(&self, id: ProductId) -> Result<(), CartError> {
        // Absent snapshot means an empty cart for add.
        let mut cart = self.read_snapshot()?.unwrap_or_default();

        let stock = self.inner.catalog.stock(id).await?;

        if let Some(entry) = cart.iter_mut().find(|entry| entry.id == id) {
            // `>=` rather than `amount + 1 >` so a snapshot carrying
            // u32::MAX cannot overflow the comparison.
            if entry.amount >= stock.amount {
                self.inner
                    .notifier
                    .warning("requested quantity exceeds stock");
                tracing::warn!(
                    current = entry.amount,
                    available = stock.amount,
                    "add capped by stock"
                );
                // The unchanged cart is still written back, matching what
                // earlier clients persisted on this path.
                return self.commit(cart);
            }
            entry.amount += 1;
        } else {
            let entry = self.inner.catalog.product(id, 1).await?;
            cart.push(entry);
        }

        self.commit(cart)
    }

    fn try_remove(&self, id: ProductId) -> Result<(), CartError> {
        let mut cart = self.read_snapshot()?.ok_or(CartError::SnapshotMissing)?;

        // Filtering an absent id is a no-op, and that is fine.
        cart.retain(|entry| entry.id != id);

        self.commit(cart)
    }

    async fn try_update(&self, id: ProductId, amount: u32) -> Result<(), CartError> {
        let mut cart = self.read_snapshot()?.unwrap_or_default();

        let stock = self.inner.catalog.stock(id).await?;
        if amount > stock.amount {
            return Err(CartError::ExceedsStock {
                id,
                requested: amount,
                available: stock.amount,
            });
        }

        let entry = cart
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(CartError::NotInCart(id))?;
        entry.amount = amount;

        self.commit(cart)
    }

    // =========================================================================
    // Snapshot plumbing
    // =========================================================================

    /// Read and decode the persisted snapshot.
    ///
    /// `Ok(None)` means no snapshot has ever been written. A snapshot that
    /// fails to parse is also reported as absent, with a logged warning.
    fn read_snapshot(&self) -> Result<Option<Vec<Product>>, CartError> {
        let Some(raw) = self.inner.store.load(&self.inner.storage_key)? else {
            return Ok(None);
        };
        Ok(decode_snapshot(&raw))
    }

    /// Persist the full new cart, then publish it as the in-memory state.
    ///
    /// Ordering matters: the store write happens first, so a failed write
    /// never leaves consumers observing state that was not persisted.
    fn commit(&self, cart: Vec<Product>) -> Result<(), CartError> {
        let encoded = serde_json::to_string(&cart)?;
        self.inner.store.save(&self.inner.storage_key, &encoded)?;
        self.inner.cart_tx.send_replace(cart);
        Ok(())
    }

    /// Convert a failed operation into its user-facing notification.
    ///
    /// Validation failures carry their own warning text; everything else
    /// collapses into the operation's generic error message.
    fn report(&self, op: Operation, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(e) = &result {
            if let Some(warning) = e.warning_message() {
                self.inner.notifier.warning(warning);
            } else {
                self.inner.notifier.error(op.failure_message());
            }
        }
        result
    }
}

/// Decode a persisted snapshot, logging (not propagating) corruption.
fn decode_snapshot(raw: &str) -> Option<Vec<Product>> {
    match serde_json::from_str(raw) {
        Ok(cart) => Some(cart),
        Err(e) => {
            tracing::warn!(error = %e, "persisted cart snapshot is corrupt, treating as empty");
            None
        }
    }
}
