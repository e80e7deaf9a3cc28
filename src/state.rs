//! Shared state handed to every Axum handler.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::external::ImageHost;
use crate::repositories::Repositories;
use crate::services::Services;

/// Services plus the resources middleware needs directly.
///
/// Cloning is cheap: the pool and the image host are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used by the readiness probe
    pub db_pool: AsyncDbPool,
    /// Used by the auth middleware to verify access tokens
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig, image_host: Arc<dyn ImageHost>) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, jwt_config.clone(), image_host);
        Self {
            services,
            db_pool: pool,
            jwt_config,
        }
    }
}
