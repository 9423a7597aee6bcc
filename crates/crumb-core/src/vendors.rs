//! The vendor a buyer is currently browsing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Validate, ValidationError};

/// Set when a buyer lands on a vendor's storefront; cleared explicitly when
/// they leave for another vendor or finish checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSelection {
    pub vendor_id: Uuid,
    pub name: String,
    pub picture: Option<String>,
    pub country: String,
    pub state: String,
    pub city: String,
}

impl Validate for VendorSelection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "must be non-empty"));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor() -> VendorSelection {
        VendorSelection {
            vendor_id: Uuid::new_v4(),
            name: "Ada's Ovens".to_string(),
            picture: Some("https://cdn.crumb.example/vendors/ada.png".to_string()),
            country: "Nigeria".to_string(),
            state: "Lagos".to_string(),
            city: "Ikeja".to_string(),
        }
    }

    #[test]
    fn valid_vendor_passes() {
        assert!(vendor().validate().is_ok());
    }

    #[test]
    fn picture_is_optional() {
        let mut v = vendor();
        v.picture = None;
        assert!(v.validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut v = vendor();
        v.name = " ".to_string();
        assert_eq!(v.validate().unwrap_err().field, "name");
    }

    #[test]
    fn blank_state_is_rejected() {
        let mut v = vendor();
        v.state = String::new();
        assert_eq!(v.validate().unwrap_err().field, "state");
    }
}
