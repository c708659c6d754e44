use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use procpipe_runner::BufferConfig;
use procpipe_runner::types::{DEFAULT_GROWTH_THRESHOLD_BYTES, DEFAULT_INITIAL_BUFFER_BYTES};

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from the configuration file at this path.
    ConfigFile(PathBuf),
    /// Value provided programmatically via [`Config::builder()`].
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    /// Stable label used in `procpipe config` output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::ConfigFile(_) => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

/// Configuration for procpipe.
///
/// # Discovery
///
/// [`Config::discover()`] searches upward from the current directory for
/// `.procpipe/config.toml`, stopping at a repository root (`.git`, `.hg`,
/// `.svn`). An explicit `--config` path skips the search.
///
/// # Configuration File Format
///
/// ```toml
/// [runner]
/// initial_buffer_bytes = 65536
/// growth_threshold_bytes = 256
///
/// [logging]
/// verbose = true
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Runner buffering settings.
    pub runner: RunnerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    /// Source attribution for each setting (for `procpipe config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[runner]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Initial stdout buffer capacity in bytes
    pub initial_buffer_bytes: Option<usize>,
    /// Headroom below which the stdout buffer doubles
    pub growth_threshold_bytes: Option<usize>,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit debug-level runner events
    pub verbose: Option<bool>,
}

/// Command-line overrides fed into discovery
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    pub initial_buffer_bytes: Option<usize>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Built-in defaults with every key attributed to [`ConfigSource::Default`].
    #[must_use]
    pub fn defaults() -> Self {
        let mut source_attribution = HashMap::new();
        for key in ["initial_buffer_bytes", "growth_threshold_bytes", "verbose"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        Self {
            runner: RunnerConfig {
                initial_buffer_bytes: Some(DEFAULT_INITIAL_BUFFER_BYTES),
                growth_threshold_bytes: Some(DEFAULT_GROWTH_THRESHOLD_BYTES),
            },
            logging: LoggingConfig {
                verbose: Some(false),
            },
            config_path: None,
            source_attribution,
        }
    }

    /// Buffer configuration for [`procpipe_runner::NativeRunner`].
    #[must_use]
    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig::new(
            self.runner
                .initial_buffer_bytes
                .unwrap_or(DEFAULT_INITIAL_BUFFER_BYTES),
            self.runner
                .growth_threshold_bytes
                .unwrap_or(DEFAULT_GROWTH_THRESHOLD_BYTES),
        )
    }

    /// Whether verbose logging is enabled.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }
}
