//! Migrate command handler

use crate::config::settings::Settings;
use crate::db::{MigrationAction, MigrationOutcome, run_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Lists, applies or reverts migrations.
    ///
    /// # Errors
    /// - Invalid database configuration or zero rollback steps
    /// - Connection and migration failures
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        let action = Self::action(dry_run, rollback)?;
        self.config.database.validate()?;

        match run_migrations(&self.config.database.url, action).await? {
            MigrationOutcome::Pending(names) if names.is_empty() => {
                println!("✓ No pending migrations, database is up to date");
            }
            MigrationOutcome::Pending(names) => {
                println!("Found {} pending migration(s):", names.len());
                for name in &names {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply them");
            }
            MigrationOutcome::Applied(names) if names.is_empty() => {
                println!("✓ No migrations to apply, database is up to date");
            }
            MigrationOutcome::Applied(names) => {
                println!("✓ Applied {} migration(s):", names.len());
                for name in &names {
                    println!("  - {}", name);
                }
            }
            MigrationOutcome::Reverted(names) => {
                println!("✓ Rolled back {} migration(s):", names.len());
                for name in &names {
                    println!("  - {}", name);
                }
            }
        }

        Ok(())
    }

    fn action(dry_run: bool, rollback: Option<u32>) -> AppResult<MigrationAction> {
        match (dry_run, rollback) {
            (_, Some(0)) => Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            }),
            (true, Some(_)) => Err(AppError::Validation {
                field: "cli_arguments".to_string(),
                reason: "Cannot use --dry-run and --rollback together".to_string(),
            }),
            (true, None) => Ok(MigrationAction::Pending),
            (false, Some(steps)) => Ok(MigrationAction::Revert(steps)),
            (false, None) => Ok(MigrationAction::Apply),
        }
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
