//! Cloudinary-compatible image host.
//!
//! Requests are signed: the non-file parameters are sorted by name, joined as
//! `k=v&k=v`, suffixed with the API secret and hashed with SHA-256.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::client::HTTP_CLIENT;
use super::image_host::{ImageHost, UploadedImage};
use crate::config::ImageHostSettings;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "image_host";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryHost {
    settings: ImageHostSettings,
}

impl CloudinaryHost {
    pub fn new(settings: ImageHostSettings) -> Self {
        Self { settings }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.cloud_name,
            action
        )
    }

    /// Adds `api_key`, `signature` and `signature_algorithm` to a form
    /// carrying `params`.
    fn signed_form(&self, params: BTreeMap<&'static str, String>) -> Form {
        let signature = sign(&params, &self.settings.api_secret);
        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        form.text("api_key", self.settings.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn post(&self, action: &str, form: Form) -> AppResult<reqwest::Response> {
        let response = HTTP_CLIENT
            .post(self.endpoint(action))
            .timeout(Duration::from_secs(self.settings.timeout))
            .multipart(form)
            .send()
            .await
            .map_err(|e| external(format!("{} request failed: {}", action, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(action, status = status.as_u16(), body = %body, "Image host refused request");
            return Err(external(format!("{} returned {}", action, status)));
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> AppResult<UploadedImage> {
        let size = bytes.len();
        let mut params = BTreeMap::new();
        params.insert("timestamp", unix_timestamp());
        params.insert("transformation", self.settings.transformation());

        let file = Part::bytes(bytes).file_name(file_name.to_string());
        let form = self.signed_form(params).part("file", file);

        let body: UploadResponse = self
            .post("upload", form)
            .await?
            .json()
            .await
            .map_err(|e| external(format!("unreadable upload response: {}", e)))?;

        tracing::info!(public_id = %body.public_id, size, "Image uploaded");
        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> AppResult<bool> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", unix_timestamp());

        let body: DestroyResponse = self
            .post("destroy", self.signed_form(params))
            .await?
            .json()
            .await
            .map_err(|e| external(format!("unreadable destroy response: {}", e)))?;

        tracing::info!(public_id, result = %body.result, "Image destroy answered");
        Ok(body.result == "ok")
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

/// Hex SHA-256 of the sorted `k=v` pairs followed by `secret`.
pub fn sign(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> String {
    jiff::Timestamp::now().as_second().to_string()
}

fn external(message: String) -> AppError {
    AppError::ExternalService {
        service: SERVICE.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_sorts_parameters() {
        let mut params = BTreeMap::new();
        params.insert("timestamp", "1315060510".to_string());
        params.insert("public_id", "sample".to_string());

        assert_eq!(
            sign(&params, "abcd"),
            "0d4fe14b2b4a3f68a97ccc5097c43908b623d24293c296826a9390c14d891509"
        );
    }

    #[test]
    fn test_sign_upload_parameters() {
        let settings = ImageHostSettings::default();
        let mut params = BTreeMap::new();
        params.insert("transformation", settings.transformation());
        params.insert("timestamp", "1315060510".to_string());

        assert_eq!(
            sign(&params, "abcd"),
            "2f1158dada720fd33c297d17b113efeba57d0bbbd8d8cc4f51719fddee65d027"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let host = CloudinaryHost::new(ImageHostSettings {
            cloud_name: "demo".to_string(),
            base_url: "https://api.cloudinary.com/v1_1/".to_string(),
            ..Default::default()
        });
        assert_eq!(
            host.endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }
}
