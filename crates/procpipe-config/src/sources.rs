use std::collections::HashMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.unwrap_or(&ConfigSource::Default).label().to_string()
}

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    #[must_use]
    pub fn effective_config(&self) -> HashMap<String, (String, String)> {
        let mut config = HashMap::new();

        let mut add_config = |key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = source_label(self.source_attribution.get(key));
                config.insert(key.to_string(), (val, source));
            }
        };

        add_config(
            "initial_buffer_bytes",
            self.runner.initial_buffer_bytes.map(|v| v.to_string()),
        );
        add_config(
            "growth_threshold_bytes",
            self.runner.growth_threshold_bytes.map(|v| v.to_string()),
        );
        add_config("verbose", self.logging.verbose.map(|v| v.to_string()));

        config
    }
}
