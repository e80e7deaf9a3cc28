//! Database connection pool module.
//!
//! Async PostgreSQL pooling through diesel_async and bb8, plus the embedded
//! schema migrations.

mod migrate;
mod pool;

pub use migrate::{MigrationAction, MigrationOutcome, run_migrations};
pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool};
