// src/generator.rs

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::AppError;
use crate::models::Microsite;
use crate::themes::{SiteImages, SitePage, render_page, stylesheet};
use crate::uploads::sanitize_business_name;

/// Directory a business' microsite is written to.
pub fn site_dir(sites_dir: &Path, slug: &str) -> PathBuf {
    sites_dir.join(slug)
}

/// Renders the microsite into `sites_dir/<slug>/`: three pages, the theme
/// stylesheet, and copies of the logo and product images.
pub async fn generate_microsite(sites_dir: &Path, site: &Microsite) -> Result<PathBuf, AppError> {
    let business = &site.business;
    let slug = sanitize_business_name(&business.name);
    let root = site_dir(sites_dir, &slug);
    tracing::info!(
        "Generating microsite for {} with theme {}",
        business.name,
        business.theme
    );

    fs::create_dir_all(root.join("assets")).await?;
    fs::create_dir_all(root.join("images")).await?;

    let mut images = SiteImages::default();
    if let Some(logo) = &business.logo_path {
        images.logo = copy_image(Path::new(logo), &root, "logo").await?;
    }
    for (index, product) in site.products.iter().enumerate() {
        let copied = match &product.image_path {
            Some(path) => copy_image(Path::new(path), &root, &format!("product_{}", index)).await?,
            None => None,
        };
        images.products.push(copied);
    }

    for page in SitePage::ALL {
        let html = render_page(page, site, &images).into_string();
        fs::write(root.join(page.file_name()), html).await?;
    }
    fs::write(root.join("assets").join("style.css"), stylesheet(business.theme)).await?;

    tracing::info!("Microsite generated successfully at {}", root.display());
    Ok(root)
}

/// Copies `source` to `images/<stem>.<ext>` and returns the site-relative
/// path. A source that vanished is skipped.
async fn copy_image(source: &Path, root: &Path, stem: &str) -> Result<Option<String>, AppError> {
    if !fs::try_exists(source).await? {
        tracing::warn!("Image {} no longer exists, skipping", source.display());
        return Ok(None);
    }
    let file_name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
        None => stem.to_string(),
    };
    fs::copy(source, root.join("images").join(&file_name)).await?;
    Ok(Some(format!("images/{}", file_name)))
}
