//! Serve command handler

use crate::config::Environment;
use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Runs the server until shutdown, or only validates with `dry_run`.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.config, self.environment).run().await
    }

    /// Checks everything the server checks before it touches the network.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;

        println!("✓ Configuration is valid ({})", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ CORS origins: {}", self.config.server.cors_origins.join(", "));
        println!(
            "✓ Image host: {}",
            if self.config.image_host.enabled {
                self.config.image_host.cloud_name.as_str()
            } else {
                "disabled"
            }
        );
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/dating_test".to_string();
        config.jwt.secret = "s".repeat(40);
        config
    }

    #[tokio::test]
    async fn test_dry_run_accepts_valid_config() {
        let handler = ServeCommandHandler::new(valid_config(), Environment::Test);
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_port() {
        let mut config = valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config, Environment::Test);
        assert!(handler.execute(true).await.is_err());
    }

    #[test]
    fn test_dry_run_requires_jwt_secret() {
        let mut config = valid_config();
        config.jwt.secret.clear();
        let handler = ServeCommandHandler::new(config, Environment::Test);

        match handler.validate_only() {
            Err(AppError::Configuration { key, .. }) => assert_eq!(key, "jwt.secret"),
            other => panic!("Expected configuration error, got: {:?}", other),
        }
    }
}
