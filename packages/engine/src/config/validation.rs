//! Configuration validation utilities

use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid size limit: {0}")]
    InvalidSize(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),

    #[error("Malformed configuration document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidSize` - if a size limit is zero where a positive value is required
    /// - `InvalidDuration` - if a lifetime is out of range
    /// - `InvalidParameter` - if parameters are outside valid ranges
    /// - `Conflict` - if configuration settings conflict with each other
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a byte size limit
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSize` if the size is zero or exceeds `max`.
    pub fn validate_size(size: u64, max: u64, name: &str) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidSize(format!(
                "{name} cannot be zero"
            )));
        }

        if size > max {
            return Err(ConfigurationError::InvalidSize(format!(
                "{name} cannot exceed {max} bytes"
            )));
        }

        Ok(())
    }

    /// Validate a lifetime duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidDuration` if the duration exceeds one year.
    pub fn validate_lifetime(lifetime: Duration, name: &str) -> ConfigResult<()> {
        if lifetime > ConfigDefaults::MAX_LIFETIME {
            return Err(ConfigurationError::InvalidDuration(format!(
                "{name} cannot exceed one year"
            )));
        }

        Ok(())
    }

    /// Validate numeric range
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if the value is outside
    /// the specified range [min, max] (inclusive).
    pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> ConfigResult<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} must be between {min} and {max}, got {value}"
            )));
        }

        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const DEFAULT_MAX_OBJECT_SIZE: u64 = 8192;
    pub const DEFAULT_MAX_ENTRIES: usize = 1000;
    pub const DEFAULT_HEURISTIC_COEFFICIENT: f32 = 0.1;
    pub const DEFAULT_HEURISTIC_LIFETIME: Duration = Duration::ZERO;
    pub const DEFAULT_REVALIDATION_WORKERS: usize = 1;
    pub const DEFAULT_REVALIDATION_QUEUE_SIZE: usize = 100;
    pub const MAX_OBJECT_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;
    pub const MAX_LIFETIME: Duration = Duration::from_secs(365 * 24 * 3600);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size_rejects_zero() {
        let err = ConfigValidator::validate_size(0, 10, "max_object_size")
            .expect_err("zero size must be rejected");
        assert!(err.to_string().contains("cannot be zero"));
    }

    #[test]
    fn test_validate_range_bounds_are_inclusive() {
        assert!(ConfigValidator::validate_range(1.0_f32, 0.0, 1.0, "coefficient").is_ok());
        assert!(ConfigValidator::validate_range(1.5_f32, 0.0, 1.0, "coefficient").is_err());
    }
}
