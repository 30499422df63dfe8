// src/services.rs

use std::path::Path;

use chrono::Utc;
use validator::Validate;

use crate::errors::AppError;
use crate::generator::generate_microsite;
use crate::models::{Business, Microsite, MicrositeSubmission, Product, Upload};
use crate::state::AppState;
use crate::uploads::{
    LOGO_MAX_SIZE, PRODUCT_IMAGE_MAX_SIZE, allowed_file, sanitize_business_name, secure_filename,
    store_image,
};

/// Validates a submission, stores its images, persists the business and its
/// products in one transaction, then renders the static site.
pub async fn create_microsite(
    app_state: &AppState,
    submission: MicrositeSubmission,
) -> Result<Microsite, AppError> {
    let MicrositeSubmission {
        business: form,
        logo,
        products,
        product_images,
    } = submission;

    form.validate()?;
    for product in &products {
        product.validate()?;
    }

    let slug = sanitize_business_name(&form.name);
    let upload_dir = &app_state.config.upload_dir;

    let logo_path = match logo {
        Some(upload) => {
            save_upload(upload_dir, &upload, &format!("{}_logo", slug), LOGO_MAX_SIZE).await?
        }
        None => None,
    };

    let now = Utc::now();
    let mut tx = app_state.db_pool.begin().await?;

    let business_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO businesses
            (name, tagline, email, phone, address, facebook, instagram, twitter, logo_path, theme, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&form.name)
    .bind(&form.tagline)
    .bind(&form.email)
    .bind(&form.phone)
    .bind(&form.address)
    .bind(&form.facebook)
    .bind(&form.instagram)
    .bind(&form.twitter)
    .bind(&logo_path)
    .bind(form.theme)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut images = product_images.into_iter();
    let mut position: i64 = 0;
    for (index, product) in products.iter().enumerate() {
        let image = images.next().flatten();
        let name = product.name.trim();
        if name.is_empty() {
            continue;
        }

        let image_path = match &image {
            Some(upload) => {
                save_upload(
                    upload_dir,
                    upload,
                    &format!("{}_product_{}", slug, index),
                    PRODUCT_IMAGE_MAX_SIZE,
                )
                .await?
            }
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO products (business_id, position, name, price, description, image_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(business_id)
        .bind(position)
        .bind(name)
        .bind(product.price_cents)
        .bind(&product.description)
        .bind(&image_path)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        position += 1;
    }

    tx.commit().await?;
    tracing::info!(
        "Created business {} '{}' with {} products",
        business_id,
        form.name,
        position
    );

    let site = load_microsite(app_state, business_id).await?;
    generate_microsite(&app_state.config.sites_dir, &site).await?;
    Ok(site)
}

/// Stores an upload as `<prefix>_<secure filename>`. Disallowed extensions
/// are ignored.
async fn save_upload(
    dir: &Path,
    upload: &Upload,
    prefix: &str,
    max_size: (u32, u32),
) -> Result<Option<String>, AppError> {
    if !allowed_file(&upload.filename) {
        tracing::warn!("Ignoring upload with disallowed type: {}", upload.filename);
        return Ok(None);
    }
    let filename = format!("{}_{}", prefix, secure_filename(&upload.filename));
    let path = store_image(dir, &filename, &upload.bytes, max_size).await?;
    Ok(Some(path.display().to_string()))
}

pub async fn load_microsite(app_state: &AppState, business_id: i64) -> Result<Microsite, AppError> {
    let business = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = ?")
        .bind(business_id)
        .fetch_optional(&app_state.db_pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE business_id = ? ORDER BY position ASC",
    )
    .bind(business_id)
    .fetch_all(&app_state.db_pool)
    .await?;

    Ok(Microsite { business, products })
}
