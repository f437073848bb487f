//! fin-config
//!
//! Persistent preferences for the finance engine: locale, currency, storage location,
//! backup retention and log filter. Owns the Config model and its disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_base_dir, ConfigManager, HOME_ENV};
pub use model::Config;
