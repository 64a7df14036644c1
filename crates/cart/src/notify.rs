//! User notification side-channel.
//!
//! The cart reports validation warnings and operation failures to the user
//! through an injected [`Notifier`] (toast-style, fire-and-forget). Keeping
//! it a trait keeps the core testable without any UI dependency.

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    /// Non-fatal, user-visible warning (e.g. a quantity above stock).
    fn warning(&self, message: &str);

    /// User-visible error for a failed operation.
    fn error(&self, message: &str);
}

/// Notifier that routes messages into the `tracing` pipeline.
///
/// The default when no UI is wired up; a real frontend supplies its own
/// implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warning(&self, message: &str) {
        tracing::warn!(target: "rocket_shoes_cart::user", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "rocket_shoes_cart::user", "{message}");
    }
}
