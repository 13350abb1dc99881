//! Parameter cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Parameter cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached parameter entries, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Get the entry TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_config_defaults_to_one_hour() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl_secs, 3600);
        assert_eq!(config.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn validation_rejects_zero_ttl() {
        let config = CacheConfig { ttl_secs: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_accepts_positive_ttl() {
        let config = CacheConfig { ttl_secs: 60 };
        assert!(config.validate().is_ok());
    }
}
