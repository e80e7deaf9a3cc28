use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::db::MIGRATIONS;
use crate::error::{AppError, AppResult};

/// What a migration run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Names of migrations that are not applied yet
    Pending(Vec<String>),
    /// Names of migrations applied by this run
    Applied(Vec<String>),
    /// Names of migrations reverted by this run, newest first
    Reverted(Vec<String>),
}

/// The migration actions the `migrate` command and `auto_migrate` share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    Pending,
    Apply,
    Revert(u32),
}

/// Runs `action` on a dedicated blocking connection.
///
/// The migration harness is synchronous, so the work happens on the blocking
/// thread pool rather than through the async pool.
pub async fn run_migrations(database_url: &str, action: MigrationAction) -> AppResult<MigrationOutcome> {
    let url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url).map_err(|e| AppError::Database {
            operation: "establish migration connection".to_string(),
            source: anyhow::Error::from(e),
        })?;
        migrate_blocking(&mut conn, action)
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}

fn migrate_blocking(conn: &mut PgConnection, action: MigrationAction) -> AppResult<MigrationOutcome> {
    let harness_error = |operation: &str| {
        let operation = operation.to_string();
        move |e: Box<dyn std::error::Error + Send + Sync>| AppError::Database {
            operation,
            source: anyhow::anyhow!(e),
        }
    };

    match action {
        MigrationAction::Pending => {
            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(harness_error("list pending migrations"))?;
            Ok(MigrationOutcome::Pending(
                pending.iter().map(|m| m.name().to_string()).collect(),
            ))
        }
        MigrationAction::Apply => {
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(harness_error("run pending migrations"))?;
            Ok(MigrationOutcome::Applied(
                applied.iter().map(ToString::to_string).collect(),
            ))
        }
        MigrationAction::Revert(steps) => {
            let applied = conn
                .applied_migrations()
                .map_err(harness_error("list applied migrations"))?;
            if applied.len() < steps as usize {
                return Err(AppError::Validation {
                    field: "rollback_steps".to_string(),
                    reason: format!(
                        "Cannot roll back {} migrations, only {} applied",
                        steps,
                        applied.len()
                    ),
                });
            }

            let mut reverted = Vec::with_capacity(steps as usize);
            for _ in 0..steps {
                let version = conn
                    .revert_last_migration(MIGRATIONS)
                    .map_err(harness_error("revert migration"))?;
                reverted.push(version.to_string());
            }
            Ok(MigrationOutcome::Reverted(reverted))
        }
    }
}
