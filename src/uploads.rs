// src/uploads.rs

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, ImageFormat};

use crate::errors::AppError;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
pub const LOGO_MAX_SIZE: (u32, u32) = (400, 300);
pub const PRODUCT_IMAGE_MAX_SIZE: (u32, u32) = (600, 400);
const JPEG_QUALITY: u8 = 85;

pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Folder-safe form of a business name: lowercased, trimmed, and every
/// character outside `[a-zA-Z0-9_-]` replaced with `_`.
pub fn sanitize_business_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Strips a client supplied filename down to something safe to store:
/// whitespace runs become `_`, path separators and non-ASCII are dropped,
/// leading/trailing dots and underscores are trimmed.
pub fn secure_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Writes an uploaded image into `dir` and shrinks it to fit `max_size`.
/// Resize failures are logged and the original bytes kept.
pub async fn store_image(
    dir: &Path,
    filename: &str,
    bytes: &[u8],
    max_size: (u32, u32),
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());

    let resize_path = path.clone();
    match tokio::task::spawn_blocking(move || resize_image(&resize_path, max_size)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Error resizing image {}: {}", path.display(), e),
        Err(e) => tracing::warn!("Resize task for {} failed: {}", path.display(), e),
    }
    Ok(path)
}

/// Shrinks the image at `path` to fit within `max_size`, keeping the aspect
/// ratio. Images already small enough are left untouched.
pub fn resize_image(path: &Path, max_size: (u32, u32)) -> Result<(), image::ImageError> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    if width <= max_size.0 && height <= max_size.1 {
        return Ok(());
    }
    let resized = img.thumbnail(max_size.0, max_size.1);

    match ImageFormat::from_path(path)? {
        ImageFormat::Jpeg => {
            let writer = BufWriter::new(File::create(path)?);
            let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
            resized.to_rgb8().write_with_encoder(encoder)
        }
        format => resized.save_with_format(path, format),
    }
}
