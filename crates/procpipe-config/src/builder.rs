use std::collections::HashMap;

use crate::error::ConfigError;

use super::{Config, ConfigSource, LoggingConfig, RunnerConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use procpipe_config::Config;
    ///
    /// let config = Config::builder()
    ///     .initial_buffer_bytes(64 * 1024)
    ///     .verbose(true)
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.buffer_config().initial_bytes, 64 * 1024);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] that bypasses file discovery.
///
/// Values set on the builder are attributed to [`ConfigSource::Programmatic`];
/// everything else keeps its default.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    initial_buffer_bytes: Option<usize>,
    growth_threshold_bytes: Option<usize>,
    verbose: Option<bool>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_buffer_bytes(mut self, bytes: usize) -> Self {
        self.initial_buffer_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub fn growth_threshold_bytes(mut self, bytes: usize) -> Self {
        self.growth_threshold_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let defaults = Config::defaults();
        let mut source_attribution = HashMap::new();

        let mut pick = |key: &str, value: Option<usize>, default: Option<usize>| match value {
            Some(v) => {
                source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
                Some(v)
            }
            None => {
                source_attribution.insert(key.to_string(), ConfigSource::Default);
                default
            }
        };

        let runner = RunnerConfig {
            initial_buffer_bytes: pick(
                "initial_buffer_bytes",
                self.initial_buffer_bytes,
                defaults.runner.initial_buffer_bytes,
            ),
            growth_threshold_bytes: pick(
                "growth_threshold_bytes",
                self.growth_threshold_bytes,
                defaults.runner.growth_threshold_bytes,
            ),
        };

        let verbose_source = if self.verbose.is_some() {
            ConfigSource::Programmatic
        } else {
            ConfigSource::Default
        };
        source_attribution.insert("verbose".to_string(), verbose_source);

        let config = Config {
            runner,
            logging: LoggingConfig {
                verbose: self.verbose.or(defaults.logging.verbose),
            },
            config_path: None,
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attributes_programmatic_values() {
        let config = Config::builder()
            .initial_buffer_bytes(4096)
            .growth_threshold_bytes(128)
            .build()
            .unwrap();

        assert_eq!(config.buffer_config().initial_bytes, 4096);
        assert_eq!(config.buffer_config().growth_threshold_bytes, 128);
        assert_eq!(
            config.source_attribution.get("initial_buffer_bytes"),
            Some(&ConfigSource::Programmatic)
        );
        assert_eq!(
            config.source_attribution.get("verbose"),
            Some(&ConfigSource::Default)
        );
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_builder_validates() {
        let err = Config::builder()
            .initial_buffer_bytes(2048)
            .growth_threshold_bytes(2048)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_builder_verbose() {
        let config = Config::builder().verbose(true).build().unwrap();
        assert!(config.verbose());
        assert_eq!(config.effective_config()["verbose"].1, "programmatic");
    }
}
