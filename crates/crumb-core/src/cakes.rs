//! Cake customization and the checkout-time cake reference.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Validate, ValidationError};

/// Icing applied when the buyer leaves the field untouched.
pub const DEFAULT_ICING: &str = "buttercream";

fn default_icing() -> String {
    DEFAULT_ICING.to_string()
}

/// A buyer's customization of a cake, created when the customization form is
/// opened and kept until a new selection or checkout completion resets it.
///
/// `layers` is the display string the form offers (e.g. `"3 layers"`); the
/// numeric count the backend wants is derived via
/// [`CakeCustomization::layer_count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakeCustomization {
    pub flavour: String,
    pub size: String,
    pub layers: String,
    #[serde(default = "default_icing")]
    pub icing: String,
}

impl CakeCustomization {
    #[must_use]
    pub fn new(
        flavour: impl Into<String>,
        size: impl Into<String>,
        layers: impl Into<String>,
    ) -> Self {
        Self {
            flavour: flavour.into(),
            size: size.into(),
            layers: layers.into(),
            icing: default_icing(),
        }
    }

    /// Numeric layer count parsed from the leading digits of `layers`.
    ///
    /// `"3 layers"`, `"3"` and `"12-tier"` all parse; a string with no
    /// leading digits yields `None` and fails validation.
    #[must_use]
    pub fn layer_count(&self) -> Option<u32> {
        let digits: String = self
            .layers
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

impl Validate for CakeCustomization {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.flavour.trim().is_empty() {
            return Err(ValidationError::new("flavour", "must be non-empty"));
        }
        if self.size.trim().is_empty() {
            return Err(ValidationError::new("size", "must be non-empty"));
        }
        if self.layers.trim().is_empty() {
            return Err(ValidationError::new("layers", "must be non-empty"));
        }
        if self.layer_count().is_none() {
            return Err(ValidationError::new(
                "layers",
                format!("'{}' must start with a numeric layer count", self.layers),
            ));
        }
        if self.icing.trim().is_empty() {
            return Err(ValidationError::new("icing", "must be non-empty"));
        }
        Ok(())
    }
}

/// The cake currently being customized or checked out: its identifier plus
/// the denormalized display fields the checkout screens need without another
/// round-trip.
///
/// Owned by the checkout flow; cleared on successful order submission or
/// explicit cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCakeReference {
    pub cake_id: Uuid,
    pub name: String,
    pub vendor_name: String,
    pub base_price: Decimal,
    /// Price per layer count, keyed by the count itself.
    #[serde(default)]
    pub layer_prices: BTreeMap<u32, Decimal>,
}

impl SelectedCakeReference {
    /// Price for the given layer count: the table entry when present, the
    /// base price otherwise.
    #[must_use]
    pub fn price_for_layers(&self, layers: u32) -> Decimal {
        self.layer_prices
            .get(&layers)
            .copied()
            .unwrap_or(self.base_price)
    }
}

impl Validate for SelectedCakeReference {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "must be non-empty"));
        }
        if self.vendor_name.trim().is_empty() {
            return Err(ValidationError::new("vendor_name", "must be non-empty"));
        }
        if self.base_price < Decimal::ZERO {
            return Err(ValidationError::new("base_price", "must not be negative"));
        }
        if let Some((layers, price)) = self.layer_prices.iter().find(|(_, p)| **p < Decimal::ZERO)
        {
            return Err(ValidationError::new(
                "layer_prices",
                format!("price for {layers} layers must not be negative ({price})"),
            ));
        }
        Ok(())
    }
}
