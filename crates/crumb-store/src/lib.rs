//! Durable client-side persistence for the storefront's selection state.
//!
//! Four independent entities survive page reloads: the cake customization,
//! the selected cake reference, the delivery details and the vendor
//! selection. Each lives in its own [`PersistedStore`] under a reserved
//! store key, on top of a pluggable [`StorageBackend`].

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{StorageError, StoreError};
pub use store::{keys, PersistedStore};
