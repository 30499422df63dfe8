// src/htmx_handlers.rs

use std::str::FromStr;

use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::errors::AppError;
use crate::extractor::BuilderSession;
use crate::form::render::{preview_content, product_block, product_headers_oob, theme_picker};
use crate::form::preview::read_thumbnail;
use crate::form::{BlockKey, Event, Outcome, PreviewField};
use crate::models::Theme;

/// New block appended to `#productsContainer`, plus refreshed headers for the
/// blocks already on the page.
pub async fn add_product_htmx_handler(
    BuilderSession(session): BuilderSession,
) -> Result<Markup, AppError> {
    let mut form = session.lock().await;
    let Outcome::ProductAdded(key) = form.dispatch(Event::AddProduct) else {
        return Err(AppError::InternalServerError(
            "adding a product block failed".to_string(),
        ));
    };
    let index = form
        .products()
        .position(key)
        .ok_or_else(|| AppError::InternalServerError("new block vanished".to_string()))?;
    let block = form
        .products()
        .get(key)
        .ok_or_else(|| AppError::InternalServerError("new block vanished".to_string()))?;
    tracing::debug!(
        "Session {}: added product block {} as {}",
        session.id,
        key,
        form.products().label_of(key).unwrap_or_default()
    );

    Ok(html! {
        (product_block(&form, index, block))
        (product_headers_oob(&form, Some(key)))
    })
}

/// Removes a block. The swap target is the block itself, so the body only
/// carries out-of-band header updates. Removing the last block is a no-op.
pub async fn remove_product_htmx_handler(
    BuilderSession(session): BuilderSession,
    Path(key): Path<BlockKey>,
) -> Result<Response, AppError> {
    let mut form = session.lock().await;
    match form.dispatch(Event::RemoveProduct(key)) {
        Outcome::ProductRemoved(removed) => {
            tracing::debug!(
                "Session {}: removed product block {}, {} left",
                session.id,
                removed,
                form.products().len()
            );
            Ok(product_headers_oob(&form, None).into_response())
        }
        _ => {
            tracing::debug!("Session {}: ignoring removal of block {}", session.id, key);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

pub async fn select_theme_htmx_handler(
    BuilderSession(session): BuilderSession,
    Path(theme): Path<String>,
) -> Result<Markup, AppError> {
    let theme = Theme::from_str(&theme)
        .map_err(|_| AppError::UnprocessableEntity(format!("Unknown theme: {}", theme)))?;
    let mut form = session.lock().await;
    form.dispatch(Event::SelectTheme(theme));
    Ok(theme_picker(form.theme()))
}

/// Thumbnail for a freshly chosen image. The file is decoded before the form
/// is locked, so the last read to finish wins. No file or an unreadable one
/// leaves the slot untouched.
pub async fn preview_image_htmx_handler(
    BuilderSession(session): BuilderSession,
    Path(field): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let field = PreviewField::from_str(&field)
        .map_err(|_| AppError::UnprocessableEntity(format!("Unknown preview field: {}", field)))?;

    let mut bytes = Vec::new();
    while let Some(part) = multipart.next_field().await? {
        if part.file_name().is_some_and(|name| !name.is_empty()) {
            bytes = part.bytes().await?.to_vec();
            break;
        }
    }

    let thumbnail = read_thumbnail(bytes).await;
    let mut form = session.lock().await;
    match form.dispatch(Event::PreviewLoaded { field, thumbnail }) {
        Outcome::PreviewShown(shown) => {
            tracing::debug!(
                "Session {}: preview for {} ready ({} held)",
                session.id,
                shown,
                form.previews().len()
            );
            Ok(preview_content(form.previews().get(shown)).into_response())
        }
        _ => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
