//! Cache configuration
//!
//! `CacheConfig` carries every tunable of the engine. `validation` holds the
//! shared validation helpers and the `ConfigurationError` type.

pub mod cache_config;
pub mod validation;

pub use cache_config::CacheConfig;
pub use validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};
