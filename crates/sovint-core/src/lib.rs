//! Shared domain types and configuration for sovint.
//!
//! Holds the mention/platform model consumed by both the collection layer
//! and the analysis pipeline, the YAML brand registry, and env-based
//! application configuration.

pub mod app_config;
pub mod brands;
pub mod config;
pub mod error;
pub mod mention;

pub use app_config::AppConfig;
pub use brands::{load_brands, BrandProfile, BrandsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use mention::{MentionRecord, Platform};
