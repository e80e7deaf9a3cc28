//! Photo upload, main-photo selection and deletion.

use std::future::Future;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::{ImageHost, UploadedImage};
use crate::models::{NewPhoto, Photo};
use crate::repositories::{PhotoRepository, UserRepository};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct PhotoService {
    photos: PhotoRepository,
    users: UserRepository,
    host: Arc<dyn ImageHost>,
}

impl PhotoService {
    pub fn new(photos: PhotoRepository, users: UserRepository, host: Arc<dyn ImageHost>) -> Self {
        Self {
            photos,
            users,
            host,
        }
    }

    pub async fn get_photo(&self, id: i32) -> AppResult<Photo> {
        self.photos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("photo", "id", id))
    }

    /// Sends the file to the image host and records it. A member's first
    /// photo becomes their main photo. If the row cannot be written the
    /// hosted image is destroyed again.
    pub async fn upload(&self, user_id: i32, upload: PhotoUpload) -> AppResult<Photo> {
        if upload.bytes.is_empty() {
            return Err(AppError::Validation {
                field: "file".to_string(),
                reason: "File is empty".to_string(),
            });
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user", "id", user_id));
        }

        let hosted = self.host.upload(upload.bytes, &upload.file_name).await?;
        let description = upload.description.filter(|text| !text.trim().is_empty());
        let is_main = match self.photos.count_for_user(user_id).await {
            Ok(count) => count == 0,
            Err(e) => {
                discard_hosted(self.host.as_ref(), &hosted.public_id).await;
                return Err(e);
            }
        };

        let photos = &self.photos;
        let photo = record_hosted(self.host.as_ref(), &hosted, is_main, |is_main| {
            photos.create(NewPhoto {
                url: hosted.url.clone(),
                description: description.clone(),
                is_main,
                public_id: Some(hosted.public_id.clone()),
                user_id,
            })
        })
        .await?;

        tracing::info!(user_id, photo_id = photo.id, is_main = photo.is_main, "Photo added");
        Ok(photo)
    }

    pub async fn set_main(&self, user_id: i32, photo_id: i32) -> AppResult<Photo> {
        let photo = self.owned_photo(user_id, photo_id).await?;
        if photo.is_main {
            return Err(AppError::bad_request("This is already the main photo"));
        }

        self.photos.set_main(user_id, photo_id).await
    }

    /// Removes a photo. Hosted photos are destroyed at the host first and the
    /// row survives unless the host confirms.
    pub async fn delete(&self, user_id: i32, photo_id: i32) -> AppResult<()> {
        let photo = self.owned_photo(user_id, photo_id).await?;
        if photo.is_main {
            return Err(AppError::bad_request("You cannot delete your main photo"));
        }

        if let Some(public_id) = photo.public_id.as_deref() {
            match self.host.destroy(public_id).await {
                Ok(true) => {}
                Ok(false) => return Err(delete_failed()),
                Err(e) => {
                    tracing::warn!(error = %e, photo_id, host = self.host.name(), "Image host destroy failed");
                    return Err(delete_failed());
                }
            }
        }

        if self.photos.delete(photo_id).await? == 0 {
            return Err(delete_failed());
        }
        tracing::info!(user_id, photo_id, "Photo deleted");
        Ok(())
    }

    /// The photo, provided `user_id` owns it.
    async fn owned_photo(&self, user_id: i32, photo_id: i32) -> AppResult<Photo> {
        let photo = self.get_photo(photo_id).await?;
        if photo.user_id != user_id {
            return Err(AppError::unauthorized("Photo belongs to another member"));
        }
        Ok(photo)
    }
}

/// Writes the row for an image that is already hosted.
///
/// Two concurrent first uploads can both see an empty album; the loser hits
/// the one-main index and is stored as a regular photo instead. Any other
/// failure destroys the hosted image before the error is returned.
async fn record_hosted<F, Fut>(
    host: &dyn ImageHost,
    hosted: &UploadedImage,
    is_main: bool,
    mut insert: F,
) -> AppResult<Photo>
where
    F: FnMut(bool) -> Fut,
    Fut: Future<Output = AppResult<Photo>>,
{
    let result = match insert(is_main).await {
        Err(AppError::Duplicate { .. }) if is_main => insert(false).await,
        result => result,
    };

    if result.is_err() {
        discard_hosted(host, &hosted.public_id).await;
    }
    result
}

async fn discard_hosted(host: &dyn ImageHost, public_id: &str) {
    match host.destroy(public_id).await {
        Ok(true) => {}
        Ok(false) => tracing::warn!(public_id, host = host.name(), "Orphaned hosted image was not removed"),
        Err(e) => {
            tracing::warn!(error = %e, public_id, host = host.name(), "Orphaned hosted image was not removed")
        }
    }
}

fn delete_failed() -> AppError {
    AppError::bad_request("Failed to delete the photo")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use jiff::civil::date;

    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        destroyed: Mutex<Vec<String>>,
    }

    impl RecordingHost {
        fn destroyed(&self) -> Vec<String> {
            self.destroyed.lock().map(|ids| ids.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ImageHost for RecordingHost {
        async fn upload(&self, _bytes: Vec<u8>, _file_name: &str) -> AppResult<UploadedImage> {
            Ok(hosted())
        }

        async fn destroy(&self, public_id: &str) -> AppResult<bool> {
            self.destroyed.lock().unwrap().push(public_id.to_string());
            Ok(true)
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn hosted() -> UploadedImage {
        UploadedImage {
            url: "https://img.example/abc.jpg".to_string(),
            public_id: "abc".to_string(),
        }
    }

    fn photo(is_main: bool) -> Photo {
        Photo {
            id: 9,
            url: hosted().url,
            description: None,
            date_added: date(2024, 5, 1).at(10, 0, 0, 0).into(),
            is_main,
            public_id: Some(hosted().public_id),
            user_id: 4,
        }
    }

    fn one_main_violation() -> AppError {
        AppError::Duplicate {
            entity: "photos".to_string(),
            field: "user_id".to_string(),
            value: "4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lost_main_race_is_stored_as_regular_photo() {
        let host = RecordingHost::default();
        let attempts = Mutex::new(Vec::new());

        let stored = record_hosted(&host, &hosted(), true, |is_main| {
            attempts.lock().unwrap().push(is_main);
            async move {
                if is_main {
                    Err(one_main_violation())
                } else {
                    Ok(photo(false))
                }
            }
        })
        .await
        .unwrap();

        assert!(!stored.is_main);
        assert_eq!(*attempts.lock().unwrap(), vec![true, false]);
        assert!(host.destroyed().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_destroys_hosted_image() {
        let host = RecordingHost::default();

        let result = record_hosted(&host, &hosted(), false, |_| async {
            Err(AppError::ConnectionPool {
                source: anyhow::anyhow!("pool timed out"),
            })
        })
        .await;

        assert!(matches!(result, Err(AppError::ConnectionPool { .. })));
        assert_eq!(host.destroyed(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_on_retry_destroys_hosted_image() {
        let host = RecordingHost::default();

        let result = record_hosted(&host, &hosted(), true, |_| async { Err(one_main_violation()) }).await;

        assert!(matches!(result, Err(AppError::Duplicate { .. })));
        assert_eq!(host.destroyed(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_successful_insert_keeps_hosted_image() {
        let host = RecordingHost::default();

        let stored = record_hosted(&host, &hosted(), true, |is_main| async move { Ok(photo(is_main)) })
            .await
            .unwrap();

        assert!(stored.is_main);
        assert!(host.destroyed().is_empty());
    }
}
