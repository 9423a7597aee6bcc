//! Typed persisted stores with hydration and synchronous change listeners.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crumb_core::Validate;

use crate::backend::StorageBackend;
use crate::error::StoreError;

/// Reserved store keys, one per persisted entity.
pub mod keys {
    pub const CUSTOMIZATION: &str = "crumb.customization";
    pub const SELECTED_CAKE: &str = "crumb.cake";
    pub const DELIVERY: &str = "crumb.delivery";
    pub const VENDOR: &str = "crumb.vendor";
}

type Listener<T> = Box<dyn Fn(Option<&T>)>;

/// Durable, rehydratable holder for one entity.
///
/// The entity is validated and written through to the backend on every
/// [`PersistedStore::set`]; `get` never touches storage after hydration.
/// Listeners registered via [`PersistedStore::subscribe`] run synchronously
/// after each committed write, in registration order.
///
/// One writer at a time per entity is assumed (the host environment
/// serializes UI events); `&mut self` on the write path enforces it at the
/// type level.
pub struct PersistedStore<T, B> {
    key: String,
    backend: B,
    value: Option<T>,
    listeners: Vec<Listener<T>>,
}

impl<T, B> PersistedStore<T, B>
where
    T: Validate + Serialize + DeserializeOwned,
    B: StorageBackend,
{
    /// Open the store and hydrate the last persisted value.
    ///
    /// Corrupt or foreign-format stored data is treated as absent — logged,
    /// never surfaced to the caller. A read fault hydrates as absent too;
    /// the session starts empty rather than failing at startup.
    pub fn open(key: impl Into<String>, backend: B) -> Self {
        let key = key.into();
        let value = match backend.get_item(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    tracing::warn!(key = %key, %error, "stored value unparseable; treating as absent");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(key = %key, %error, "storage unreadable; hydrating as absent");
                None
            }
        };
        Self {
            key,
            backend,
            value,
            listeners: Vec::new(),
        }
    }

    /// Replace the stored value. No partial merges — callers supply the
    /// complete entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] (nothing written) when the entity
    /// fails its shape check, or [`StoreError::Storage`] when the durable
    /// write fails (the in-memory value is left unchanged).
    pub fn set(&mut self, entity: T) -> Result<(), StoreError> {
        entity.validate()?;
        let raw = serde_json::to_string(&entity)?;
        self.backend.set_item(&self.key, &raw)?;
        self.value = Some(entity);
        self.notify();
        Ok(())
    }

    /// The last committed value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Clear the in-memory value and remove the durable record. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] when the durable removal fails; the
    /// in-memory value is kept so state and storage stay in step.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.backend.remove_item(&self.key)?;
        self.value = None;
        self.notify();
        Ok(())
    }

    /// Register a listener invoked synchronously after each committed write,
    /// with the new value (`None` after a reset).
    pub fn subscribe(&mut self, listener: impl Fn(Option<&T>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(self.value.as_ref());
        }
    }
}
