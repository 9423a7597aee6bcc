use thiserror::Error;

pub mod app_config;
pub mod cakes;
pub mod config;
pub mod delivery;
pub mod hierarchy;
pub mod selection;
pub mod timeline;
pub mod vendors;

pub use app_config::{AppConfig, Environment};
pub use cakes::{CakeCustomization, SelectedCakeReference};
pub use config::{load_app_config, load_app_config_from_env};
pub use delivery::DeliveryDetails;
pub use hierarchy::LocationHierarchy;
pub use selection::{Cascade, Selection, SelectionError};
pub use timeline::{current_stage, is_stage_complete, Stage, TimelineEvent};
pub use vendors::VendorSelection;

/// A persisted entity violated one of its field-level invariants.
///
/// Replaces the dynamic schema validation of the original client: each entity
/// exposes an explicit [`Validate::validate`] that names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Shape validation for entities held in a persisted store.
pub trait Validate {
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first invalid field.
    fn validate(&self) -> Result<(), ValidationError>;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
