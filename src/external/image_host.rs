//! Image host abstraction.
//!
//! Photos are stored at a third-party host; the database only keeps the
//! returned URL and the host's public id.

use std::sync::Arc;

use async_trait::async_trait;

use super::cloudinary::CloudinaryHost;
use crate::config::ImageHostSettings;
use crate::error::{AppError, AppResult};

/// What the host hands back after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// Remote image storage.
///
/// Implementations must be `Send + Sync`; services hold them behind
/// `Arc<dyn ImageHost>`.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads the raw file, applying the configured crop on the host side.
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> AppResult<UploadedImage>;

    /// Deletes a hosted image. `Ok(false)` means the host answered but did
    /// not confirm the deletion.
    async fn destroy(&self, public_id: &str) -> AppResult<bool>;

    fn name(&self) -> &'static str;
}

/// Stand-in used while `image_host.enabled` is off. Every call fails.
pub struct DisabledImageHost;

#[async_trait]
impl ImageHost for DisabledImageHost {
    async fn upload(&self, _bytes: Vec<u8>, _file_name: &str) -> AppResult<UploadedImage> {
        Err(disabled())
    }

    async fn destroy(&self, _public_id: &str) -> AppResult<bool> {
        Err(disabled())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

fn disabled() -> AppError {
    AppError::ExternalService {
        service: "image_host".to_string(),
        message: "Image hosting is not configured".to_string(),
    }
}

/// Picks the host implementation for the given settings.
pub fn build_image_host(settings: &ImageHostSettings) -> Arc<dyn ImageHost> {
    if settings.enabled {
        tracing::info!(cloud_name = %settings.cloud_name, "Image host enabled");
        Arc::new(CloudinaryHost::new(settings.clone()))
    } else {
        tracing::warn!("Image host disabled, photo uploads will be rejected");
        Arc::new(DisabledImageHost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_host_rejects_calls() {
        let host = DisabledImageHost;
        let upload = host.upload(vec![1, 2, 3], "a.jpg").await;
        assert!(matches!(upload, Err(AppError::ExternalService { .. })));
        assert!(host.destroy("abc").await.is_err());
    }

    #[test]
    fn test_build_image_host_follows_enabled_flag() {
        let mut settings = ImageHostSettings::default();
        assert_eq!(build_image_host(&settings).name(), "disabled");

        settings.enabled = true;
        settings.cloud_name = "demo".to_string();
        assert_eq!(build_image_host(&settings).name(), "cloudinary");
    }
}
