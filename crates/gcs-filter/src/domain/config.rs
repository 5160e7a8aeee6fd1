//! Filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use gcs_filter::domain::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .precision(19)
//!     .max_items(100_000)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use super::gcs_filter::{GOLOMB_P, MAX_ITEMS, MAX_PRECISION};
use super::header::{Hash, ZERO_HASH};
use crate::error::FilterError;

/// Parameters used when building block filters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Rice parameter (0 to 32)
    pub precision: u8,
    /// Maximum distinct items per filter
    pub max_items: u64,
    /// Previous header of the first filter in the chain
    pub genesis_header: Hash,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            precision: GOLOMB_P,
            max_items: MAX_ITEMS,
            genesis_header: ZERO_HASH,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(precision: u8, max_items: u64, genesis_header: Hash) -> Result<Self, FilterError> {
        let config = Self {
            precision,
            max_items,
            genesis_header,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.precision > MAX_PRECISION {
            return Err(FilterError::InvalidPrecision { p: self.precision });
        }

        if self.max_items == 0 {
            return Err(FilterError::InvalidParameters(
                "max_items cannot be 0".to_string(),
            ));
        }

        if self.max_items > MAX_ITEMS {
            return Err(FilterError::InvalidParameters(format!(
                "max_items cannot exceed {}",
                MAX_ITEMS
            )));
        }

        Ok(())
    }

    /// Whether filters use the canonical network parameter
    pub fn is_basic(&self) -> bool {
        self.precision == GOLOMB_P
    }

    /// Builder-style method to set the Rice parameter
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Builder-style method to set max items
    pub fn with_max_items(mut self, max: u64) -> Self {
        self.max_items = max;
        self
    }

    /// Builder-style method to set the genesis previous header
    pub fn with_genesis_header(mut self, header: Hash) -> Self {
        self.genesis_header = header;
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    precision: Option<u8>,
    max_items: Option<u64>,
    genesis_header: Option<Hash>,
}

impl FilterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Rice parameter (must be at most 32)
    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set maximum number of distinct items per filter
    pub fn max_items(mut self, items: u64) -> Self {
        self.max_items = Some(items);
        self
    }

    /// Set the previous header of the first filter
    pub fn genesis_header(mut self, header: Hash) -> Self {
        self.genesis_header = Some(header);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> FilterConfig {
        let defaults = FilterConfig::default();

        FilterConfig {
            precision: self.precision.unwrap_or(defaults.precision),
            max_items: self.max_items.unwrap_or(defaults.max_items),
            genesis_header: self.genesis_header.unwrap_or(defaults.genesis_header),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FilterConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_basic());
        assert_eq!(config.genesis_header, ZERO_HASH);
    }

    #[test]
    fn test_config_validation_rejects_precision_too_high() {
        let config = FilterConfig::default().with_precision(33);
        assert_eq!(
            config.validate(),
            Err(FilterError::InvalidPrecision { p: 33 })
        );
    }

    #[test]
    fn test_config_validation_rejects_item_bounds() {
        let config = FilterConfig::default().with_max_items(0);
        assert!(matches!(
            config.validate(),
            Err(FilterError::InvalidParameters(_))
        ));

        let config = FilterConfig::default().with_max_items(MAX_ITEMS + 1);
        assert!(matches!(
            config.validate(),
            Err(FilterError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_new_validates() {
        assert!(FilterConfig::new(0, 1, ZERO_HASH).is_ok());
        assert!(FilterConfig::new(40, 1, ZERO_HASH).is_err());
    }

    #[test]
    fn test_builder_creates_valid_config() {
        let config = FilterConfigBuilder::new()
            .precision(20)
            .max_items(5_000)
            .genesis_header([0x01; 32])
            .build()
            .expect("Should create valid config");

        assert_eq!(config.precision, 20);
        assert_eq!(config.max_items, 5_000);
        assert_eq!(config.genesis_header, [0x01; 32]);
        assert!(!config.is_basic());
    }

    #[test]
    fn test_builder_rejects_invalid_precision() {
        let result = FilterConfigBuilder::new().precision(64).build();
        assert!(matches!(result, Err(FilterError::InvalidPrecision { p: 64 })));
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = FilterConfigBuilder::new()
            .max_items(10)
            .build()
            .expect("Should use defaults for other fields");

        let defaults = FilterConfig::default();
        assert_eq!(config.precision, defaults.precision);
        assert_eq!(config.genesis_header, defaults.genesis_header);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = FilterConfig::default().with_precision(12);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
