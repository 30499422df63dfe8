// src/submission.rs

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::form::FormSnapshot;
use crate::models::{
    BusinessForm, MicrositeSubmission, ProductForm, Theme, Upload, parse_price_cents,
};

/// Raw fields collected from the multipart body before they are paired up.
#[derive(Debug, Default)]
struct RawFields {
    text: HashMap<String, String>,
    product_keys: Vec<String>,
    product_names: Vec<String>,
    product_prices: Vec<String>,
    product_descriptions: Vec<String>,
    /// Images posted as a repeated `product_image` field, by index.
    indexed_images: Vec<Option<Upload>>,
    /// Images posted as `product_image_<key>`.
    keyed_images: HashMap<String, Upload>,
    logo: Option<Upload>,
}

pub async fn read_submission(mut multipart: Multipart) -> Result<MicrositeSubmission, AppError> {
    let mut raw = RawFields::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Received unnamed multipart field, skipping");
                continue;
            }
        };
        let filename = field.file_name().map(|s| s.to_string());

        if field_name == "logo" || field_name.starts_with("product_image") {
            let bytes = field.bytes().await?;
            let upload = match filename {
                Some(filename) if !filename.is_empty() && !bytes.is_empty() => Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                }),
                _ => None,
            };
            if let Some(upload) = &upload {
                tracing::debug!(
                    "File field {}: {} ({} bytes)",
                    field_name,
                    upload.filename,
                    upload.bytes.len()
                );
            }
            match field_name.as_str() {
                "logo" => raw.logo = upload,
                "product_image" => raw.indexed_images.push(upload),
                keyed => {
                    if let (Some(key), Some(upload)) =
                        (keyed.strip_prefix("product_image_"), upload)
                    {
                        raw.keyed_images.insert(key.to_string(), upload);
                    }
                }
            }
            continue;
        }

        let value = field.text().await?;
        match field_name.as_str() {
            "product_key" => raw.product_keys.push(value),
            "product_name" => raw.product_names.push(value),
            "product_price" => raw.product_prices.push(value),
            "product_description" => raw.product_descriptions.push(value),
            _ => {
                raw.text.insert(field_name, value);
            }
        }
    }

    Ok(assemble(raw))
}

fn assemble(mut raw: RawFields) -> MicrositeSubmission {
    let theme_raw = raw.text.get("theme").cloned().unwrap_or_default();
    let theme = Theme::from_str(&theme_raw).unwrap_or_else(|_| {
        if !theme_raw.is_empty() {
            tracing::warn!("Unknown theme '{}', falling back to default", theme_raw);
        }
        Theme::default()
    });

    let business = BusinessForm {
        name: raw.text.get("business_name").map(|s| s.trim().to_string()).unwrap_or_default(),
        tagline: non_empty(raw.text.remove("tagline")),
        email: non_empty(raw.text.remove("email")),
        phone: non_empty(raw.text.remove("phone")),
        address: non_empty(raw.text.remove("address")),
        facebook: non_empty(raw.text.remove("facebook")),
        instagram: non_empty(raw.text.remove("instagram")),
        twitter: non_empty(raw.text.remove("twitter")),
        theme,
    };

    let mut products = Vec::with_capacity(raw.product_names.len());
    let mut product_images = Vec::with_capacity(raw.product_names.len());
    for (i, name) in raw.product_names.iter().enumerate() {
        let raw_price = raw.product_prices.get(i).cloned().unwrap_or_default();
        products.push(ProductForm {
            name: name.clone(),
            price_cents: parse_price_cents(&raw_price),
            description: non_empty(raw.product_descriptions.get(i).cloned()),
        });

        let keyed = raw
            .product_keys
            .get(i)
            .and_then(|key| raw.keyed_images.remove(key));
        let indexed = raw.indexed_images.get_mut(i).and_then(Option::take);
        product_images.push(keyed.or(indexed));
    }

    MicrositeSubmission {
        business,
        logo: raw.logo,
        products,
        product_images,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl MicrositeSubmission {
    /// The form as the builder controller sees it.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            business_name: self.business.name.clone(),
            product_names: self.products.iter().map(|p| p.name.clone()).collect(),
        }
    }

    pub fn product_names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.name.as_str())
    }
}
