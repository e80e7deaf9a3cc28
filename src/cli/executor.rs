//! Dispatches parsed commands to their handlers.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Runs the parsed command. No subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, cli.environment())
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings, cli.environment())
                .execute(false)
                .await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback
                && *steps > 10
            {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/dating_test".to_string();
        config.jwt.secret = "s".repeat(40);
        config
    }

    #[tokio::test]
    async fn test_serve_dry_run() {
        let cli = Cli::try_parse_from(["dating-api", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_argument_combination() {
        let cli = Cli::try_parse_from(["dating-api", "serve", "--host", "0.0.0.0", "--port", "443"])
            .unwrap();
        match execute_command(&cli, valid_config()).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "cli_arguments"),
            other => panic!("Expected validation error, got: {:?}", other),
        }
    }
}
