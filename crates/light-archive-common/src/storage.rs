//! Object storage for archive images

use std::path::Path;

use async_trait::async_trait;
use image::ImageFormat;
use tracing::{info, instrument};

use crate::{
    error::{Error, Result},
    types::generate_archive_id,
};

/// Folder inside the bucket holding archive images
pub const IMAGE_FOLDER: &str = "archive-images";

/// A bucket of publicly readable objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data` to `path`; fails if the object already exists
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL of the object at `path`
    fn public_url(&self, path: &str) -> String;
}

/// Detect the image format from the file's magic bytes
pub fn sniff_format(data: &[u8]) -> Result<ImageFormat> {
    image::guess_format(data)
        .map_err(|e| Error::InvalidParameter(format!("not a supported image: {e}")))
}

/// File extension for a detected format, spelled like the format name
/// (`jpeg`, not `jpg`)
pub fn extension(format: ImageFormat) -> &'static str {
    format.extensions_str().last().copied().unwrap_or("png")
}

/// Object path for an image: `archive-images/{stem}.{ext}`
pub fn image_object_path(stem: &str, format: ImageFormat) -> String {
    format!("{IMAGE_FOLDER}/{stem}.{}", extension(format))
}

/// Read a local image, upload it and return its public URL.
///
/// Without `filename` the object gets a freshly generated archive-style id.
#[instrument(skip(store))]
pub async fn upload_image(
    store: &dyn ObjectStore,
    image_path: &Path,
    filename: Option<&str>,
) -> Result<String> {
    if !tokio::fs::try_exists(image_path).await.unwrap_or(false) {
        return Err(Error::NotFound(format!(
            "이미지 파일을 찾을 수 없습니다: {}",
            image_path.display()
        )));
    }

    let data = tokio::fs::read(image_path).await?;
    let format = sniff_format(&data)?;

    let stem = match filename.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => generate_archive_id(),
    };
    let object_path = image_object_path(&stem, format);

    store
        .upload(&object_path, data, format.to_mime_type())
        .await?;

    let url = store.public_url(&object_path);
    info!(path = %object_path, "Image uploaded");
    Ok(url)
}
