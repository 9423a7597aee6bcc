//! HTTP clients for the remote storefront backend.
//!
//! Everything here is a thin, typed layer over the backend's REST API: the
//! location hierarchy source (with its fetch-once cache), order creation,
//! the order timeline and review submission. Business logic — pricing,
//! inventory, order lifecycle, payments — stays on the backend.

pub mod error;
pub mod locations;
pub mod orders;
mod retry;
pub mod session;
pub mod types;

pub use error::ApiError;
pub use locations::{HierarchyCache, LocationsClient};
pub use orders::{OrderDraft, OrdersClient, Review};
pub use session::Session;
pub use types::PaymentRedirect;

/// Retry settings shared by the read endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
        }
    }
}
