use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{CliArgs, Config, ConfigSource, LoggingConfig, RunnerConfig};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    runner: Option<RunnerConfig>,
    logging: Option<LoggingConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Self::defaults();

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            Some(explicit_path.clone())
        } else {
            Self::discover_config_file_from(start_dir)?
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file_config, ConfigSource::ConfigFile(path.clone()));
            config.config_path = Some(path.clone());
        }

        if let Some(bytes) = cli_args.initial_buffer_bytes {
            config.runner.initial_buffer_bytes = Some(bytes);
            config
                .source_attribution
                .insert("initial_buffer_bytes".to_string(), ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            config.logging.verbose = Some(verbose);
            config
                .source_attribution
                .insert("verbose".to_string(), ConfigSource::Cli);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file_config: TomlConfig, source: ConfigSource) {
        if let Some(runner) = file_config.runner {
            if runner.initial_buffer_bytes.is_some() {
                self.runner.initial_buffer_bytes = runner.initial_buffer_bytes;
                self.source_attribution
                    .insert("initial_buffer_bytes".to_string(), source.clone());
            }
            if runner.growth_threshold_bytes.is_some() {
                self.runner.growth_threshold_bytes = runner.growth_threshold_bytes;
                self.source_attribution
                    .insert("growth_threshold_bytes".to_string(), source.clone());
            }
        }

        if let Some(logging) = file_config.logging
            && logging.verbose.is_some()
        {
            self.logging.verbose = logging.verbose;
            self.source_attribution
                .insert("verbose".to_string(), source);
        }
    }

    /// Search upward from `start_dir` for `.procpipe/config.toml`
    ///
    /// Stops at the filesystem root or at the first directory that looks like
    /// a repository root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(".procpipe").join("config.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })?;
                Ok(config)
            }
            // Missing config file is OK - defaults apply
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}
