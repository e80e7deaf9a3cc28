//! Configuration validation logic
//!
//! Checks that loaded values are within acceptable ranges and formats.
//! JWT settings are validated separately when the server starts.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, ImageHostSettings, LoggerSettings, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Port must be non-zero and at least one CORS origin must be listed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.cors_origins.iter().all(|origin| origin.trim().is_empty()) {
            return Err(ConfigError::validation(
                "server.cors_origins",
                "At least one CORS origin is required. Use \"*\" to allow any origin.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl ImageHostSettings {
    /// Credentials are only required once the image host is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        for (field, value) in [
            ("image_host.cloud_name", &self.cloud_name),
            ("image_host.api_key", &self.api_key),
            ("image_host.api_secret", &self.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: "Required when the image host is enabled.".to_string(),
                });
            }
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::validation(
                "image_host.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::validation(
                "image_host.width",
                "Image dimensions must be greater than 0.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "image_host.timeout",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validates every section and returns the first error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.image_host.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got: {:?}", other),
        }
    }

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_requires_cors_origin() {
        let config = ServerConfig {
            cors_origins: vec![" ".to_string()],
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.cors_origins");
    }

    #[test]
    fn test_database_config_valid() {
        let config = DatabaseConfig {
            url: "postgres://localhost/dating".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_empty_url() {
        let err = DatabaseConfig::default().validate().unwrap_err();
        assert_eq!(field_of(err), "database.url");
    }

    #[test]
    fn test_database_config_rejects_non_postgres_url() {
        let config = DatabaseConfig {
            url: "mysql://localhost/dating".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.url");
    }

    #[test]
    fn test_database_config_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/dating".to_string(),
            max_connections: 2,
            min_connections: 5,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.min_connections");
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_settings_enabled_file_without_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                path: "  ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.file.path");
    }

    #[test]
    fn test_image_host_disabled_needs_nothing() {
        assert!(ImageHostSettings::default().validate().is_ok());
    }

    #[test]
    fn test_image_host_enabled_requires_credentials() {
        let settings = ImageHostSettings {
            enabled: true,
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "image_host.api_secret");

        let settings = ImageHostSettings {
            api_secret: "secret".to_string(),
            ..settings
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validate_reports_first_failure() {
        let settings = Settings::default();
        assert_eq!(field_of(settings.validate().unwrap_err()), "database.url");
    }
}
