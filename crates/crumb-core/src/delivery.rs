//! Delivery details captured once per search session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::selection::Selection;
use crate::{Validate, ValidationError};

/// Where and when an order should be delivered.
///
/// Captured once per search session and persisted so a returning buyer does
/// not re-enter it; the location triple comes from a completed cascading
/// [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub address: String,
    pub date: NaiveDate,
    pub country: String,
    pub state: String,
    pub city: String,
}

impl DeliveryDetails {
    /// Build delivery details from a completed selection.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the selection is missing a level or
    /// the address is empty.
    pub fn from_selection(
        address: impl Into<String>,
        date: NaiveDate,
        selection: &Selection,
    ) -> Result<Self, ValidationError> {
        let level = |field: &'static str, value: &Option<String>| {
            value
                .clone()
                .ok_or_else(|| ValidationError::new(field, "must be selected"))
        };
        let details = Self {
            address: address.into(),
            date,
            country: level("country", &selection.country)?,
            state: level("state", &selection.state)?,
            city: level("city", &selection.city)?,
        };
        details.validate()?;
        Ok(details)
    }

    /// The location triple as a selection, for re-seeding the form.
    #[must_use]
    pub fn to_selection(&self) -> Selection {
        Selection {
            country: Some(self.country.clone()),
            state: Some(self.state.clone()),
            city: Some(self.city.clone()),
        }
    }
}

impl Validate for DeliveryDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.address.trim().is_empty() {
            return Err(ValidationError::new("address", "must be non-empty"));
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::new("country", "must be non-empty"));
        }
        if self.state.trim().is_empty() {
            return Err(ValidationError::new("state", "must be non-empty"));
        }
        if self.city.trim().is_empty() {
            return Err(ValidationError::new("city", "must be non-empty"));
        }
        Ok(())
    }
}
