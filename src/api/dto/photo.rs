//! Photo DTOs.

use jiff::civil::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Photo;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/sample.jpg")]
    pub url: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub date_added: DateTime,
    pub is_main: bool,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            description: photo.description,
            date_added: photo.date_added.to_jiff(),
            is_main: photo.is_main,
        }
    }
}

/// Multipart body of a photo upload. Only used for the API document.
#[derive(Debug, ToSchema)]
pub struct PhotoUploadForm {
    /// The image file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub description: Option<String>,
}
