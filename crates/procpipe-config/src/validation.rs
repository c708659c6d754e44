use crate::error::ConfigError;

use super::Config;

/// Smallest accepted initial stdout buffer.
const MIN_INITIAL_BUFFER_BYTES: usize = 1024;
/// Largest accepted initial stdout buffer (64 MiB).
const MAX_INITIAL_BUFFER_BYTES: usize = 64 * 1024 * 1024;

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(initial) = self.runner.initial_buffer_bytes {
            if initial < MIN_INITIAL_BUFFER_BYTES {
                return Err(ConfigError::InvalidValue {
                    key: "initial_buffer_bytes".to_string(),
                    value: format!("must be at least {MIN_INITIAL_BUFFER_BYTES} bytes"),
                });
            }
            if initial > MAX_INITIAL_BUFFER_BYTES {
                return Err(ConfigError::InvalidValue {
                    key: "initial_buffer_bytes".to_string(),
                    value: "exceeds maximum limit of 64MiB".to_string(),
                });
            }
        }

        if let Some(threshold) = self.runner.growth_threshold_bytes {
            if threshold == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "growth_threshold_bytes".to_string(),
                    value: "must be greater than 0".to_string(),
                });
            }
            if let Some(initial) = self.runner.initial_buffer_bytes
                && threshold >= initial
            {
                return Err(ConfigError::InvalidValue {
                    key: "growth_threshold_bytes".to_string(),
                    value: format!("must be smaller than initial_buffer_bytes ({initial})"),
                });
            }
        }

        Ok(())
    }
}
