// src/form/preview.rs

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{GenericImageView, ImageFormat};

use super::products::BlockKey;

/// Largest edge of a preview thumbnail, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 150;

/// A file field that can show a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewField {
    Logo,
    Product(BlockKey),
}

impl PreviewField {
    /// Name of the file input this field previews.
    pub fn input_name(&self) -> String {
        match self {
            PreviewField::Logo => "logo".to_string(),
            PreviewField::Product(key) => format!("product_image_{}", key),
        }
    }
}

impl fmt::Display for PreviewField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewField::Logo => f.write_str("logo"),
            PreviewField::Product(key) => write!(f, "product-{}", key),
        }
    }
}

impl FromStr for PreviewField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "logo" {
            return Ok(PreviewField::Logo);
        }
        s.strip_prefix("product-")
            .and_then(|key| key.parse().ok())
            .map(PreviewField::Product)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// At most one thumbnail per field; a new one replaces the old.
#[derive(Debug, Clone, Default)]
pub struct Previews {
    slots: HashMap<PreviewField, Thumbnail>,
}

impl Previews {
    /// Stores `thumbnail` for `field`, returning `true` when it replaced an
    /// existing preview.
    pub fn set(&mut self, field: PreviewField, thumbnail: Thumbnail) -> bool {
        self.slots.insert(field, thumbnail).is_some()
    }

    pub fn get(&self, field: PreviewField) -> Option<&Thumbnail> {
        self.slots.get(&field)
    }

    pub fn forget(&mut self, field: PreviewField) {
        self.slots.remove(&field);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Decodes `bytes` and renders a PNG thumbnail as a data URL. Returns `None`
/// for empty or undecodable input; the caller shows nothing in that case.
pub async fn read_thumbnail(bytes: Vec<u8>) -> Option<Thumbnail> {
    if bytes.is_empty() {
        return None;
    }
    match tokio::task::spawn_blocking(move || make_thumbnail(&bytes)).await {
        Ok(Ok(thumbnail)) => Some(thumbnail),
        Ok(Err(e)) => {
            tracing::debug!("Image preview skipped, file unreadable: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Image preview task failed: {}", e);
            None
        }
    }
}

fn make_thumbnail(bytes: &[u8]) -> Result<Thumbnail, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    if width > PREVIEW_MAX_EDGE || height > PREVIEW_MAX_EDGE {
        img = img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE);
    }

    let mut encoded = Vec::new();
    img.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
    let (width, height) = img.dimensions();

    Ok(Thumbnail {
        data_url: format!("data:image/png;base64,{}", STANDARD.encode(&encoded)),
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 90]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}
