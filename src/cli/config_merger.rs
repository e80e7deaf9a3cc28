//! Applies CLI overrides on top of file and environment configuration.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};

/// CLI flags take precedence over every configuration source.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the layered configuration for `environment`, or only
    /// `config_path` when one is given.
    pub fn load(config_path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?.with_environment(environment);
        if let Some(path) = config_path {
            loader = loader.with_file(path);
        }
        Ok(Self::new(loader.load()?))
    }

    /// Returns the merged settings, validated again after the overrides.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Wins over --verbose/--quiet
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
