//! Clients for services outside the process.

pub mod client;
pub mod cloudinary;
pub mod image_host;

pub use cloudinary::CloudinaryHost;
pub use image_host::{DisabledImageHost, ImageHost, UploadedImage, build_image_host};
