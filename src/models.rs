// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use validator::Validate;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    sqlx::Type,
    EnumString,
    Display,
    EnumIter,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Minimal,
    Modern,
    Fancy,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Minimal => "Minimal",
            Theme::Modern => "Modern",
            Theme::Fancy => "Fancy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Theme::Minimal => "Clean typography and lots of white space",
            Theme::Modern => "Bold hero banner with card-based layout",
            Theme::Fancy => "Elegant serif fonts and warm accents",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub tagline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub logo_path: Option<String>,
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub business_id: i64,
    pub position: i64,
    pub name: String,
    /// Price in cents.
    pub price: i64,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A business together with its products in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct Microsite {
    pub business: Business,
    pub products: Vec<Product>,
}

// --- Create form payloads ---

#[derive(Debug, Clone, Default, Validate)]
pub struct BusinessForm {
    #[validate(length(min = 1, max = 100, message = "Business name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 200))]
    pub tagline: Option<String>,

    #[validate(email(message = "Email address is invalid"), length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[validate(url(message = "Facebook link must be a URL"), length(max = 200))]
    pub facebook: Option<String>,

    #[validate(url(message = "Instagram link must be a URL"), length(max = 200))]
    pub instagram: Option<String>,

    #[validate(url(message = "Twitter link must be a URL"), length(max = 200))]
    pub twitter: Option<String>,

    pub theme: Theme,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ProductForm {
    #[validate(length(max = 100, message = "Product name must be at most 100 characters"))]
    pub name: String,

    #[validate(range(min = 0))]
    pub price_cents: i64,

    pub description: Option<String>,
}

/// An uploaded file as received from the multipart body.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything `/create` received, still unvalidated. Product entries keep the
/// index they had in the form so uploaded images line up with their names.
#[derive(Debug, Clone, Default)]
pub struct MicrositeSubmission {
    pub business: BusinessForm,
    pub logo: Option<Upload>,
    pub products: Vec<ProductForm>,
    pub product_images: Vec<Option<Upload>>,
}

/// Parses a price typed into the form into cents. Anything unparsable or
/// negative counts as zero.
pub fn parse_price_cents(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => (value * 100.0).round() as i64,
        _ => 0,
    }
}

pub fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
