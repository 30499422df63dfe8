// src/handlers.rs

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use maud::{Markup, html};

use crate::archive::zip_directory;
use crate::errors::AppError;
use crate::extractor::OptionalBuilderSession;
use crate::flash::{self, FlashKind};
use crate::form::render::submit_button;
use crate::form::{Event, Outcome, SubmitRejection, validate_submission};
use crate::generator::site_dir;
use crate::models::Microsite;
use crate::pages::{builder_page, preview_page};
use crate::response::{hx_redirect_headers, is_htmx, show_message_headers};
use crate::services::create_microsite;
use crate::state::AppState;
use crate::submission::read_submission;
use crate::uploads::sanitize_business_name;

const CREATED_MESSAGE: &str = "Microsite created successfully!";
const NOT_FOUND_MESSAGE: &str = "Microsite not found";

/// Builder page. Every load gets its own form, so two tabs never share
/// block keys.
pub async fn index_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Markup), AppError> {
    let session = app_state.sessions.start().await;
    let (jar, flashes) = flash::take(jar);

    let form = session.lock().await;
    let page = builder_page(
        session.id,
        &form,
        app_state.config.submit_reset_after,
        &flashes,
    );
    Ok((jar, page))
}

pub async fn create_microsite_handler(
    State(app_state): State<AppState>,
    OptionalBuilderSession(session): OptionalBuilderSession,
    headers: HeaderMap,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let htmx = is_htmx(&headers);
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => return Ok(creation_failed(jar, htmx, &e)),
    };

    let Some(session) = session else {
        // Plain form post without a live builder session.
        if let Err(rejection) =
            validate_submission(&submission.business.name, submission.product_names())
        {
            return Ok(rejected(jar, htmx, &rejection, None));
        }
        return Ok(match create_microsite(&app_state, submission).await {
            Ok(site) => created(jar, htmx, &site),
            Err(e) => creation_failed(jar, htmx, &e),
        });
    };

    let outcome = session
        .lock()
        .await
        .dispatch(Event::Submit(submission.snapshot()));
    let ticket = match outcome {
        Outcome::SubmitAccepted(ticket) => ticket,
        Outcome::SubmitRejected(rejection) => {
            let button = submit_button(session.lock().await.submit_button(), true);
            return Ok(rejected(jar, htmx, &rejection, Some(button)));
        }
        other => {
            tracing::warn!("Unexpected outcome for a submission: {:?}", other);
            return Err(AppError::InternalServerError(
                "unexpected form state".to_string(),
            ));
        }
    };

    tracing::info!(
        "Session {} submitting '{}' (attempt {})",
        session.id,
        submission.business.name,
        ticket.attempt
    );
    session.arm_submit_reset(&ticket, app_state.config.submit_reset_after);

    let result = create_microsite(&app_state, submission).await;
    session.lock().await.submit_finished(ticket.attempt);

    Ok(match result {
        Ok(site) => created(jar, htmx, &site),
        Err(e) => creation_failed(jar, htmx, &e),
    })
}

fn navigate(jar: CookieJar, htmx: bool, to: &str) -> Response {
    if htmx {
        (jar, hx_redirect_headers(to)).into_response()
    } else {
        (jar, Redirect::to(to)).into_response()
    }
}

fn created(jar: CookieJar, htmx: bool, site: &Microsite) -> Response {
    let slug = sanitize_business_name(&site.business.name);
    let jar = flash::push(jar, FlashKind::Success, CREATED_MESSAGE);
    navigate(jar, htmx, &format!("/preview/{}", slug))
}

fn creation_failed(jar: CookieJar, htmx: bool, error: &AppError) -> Response {
    tracing::error!("Error creating microsite: {}", error);
    let jar = flash::push(
        jar,
        FlashKind::Error,
        format!("Error creating microsite: {}", error),
    );
    navigate(jar, htmx, "/")
}

/// A submission that failed the form preconditions. htmx callers get a
/// blocking message and keep their form; plain posts bounce back with a flash.
fn rejected(
    jar: CookieJar,
    htmx: bool,
    rejection: &SubmitRejection,
    button: Option<Markup>,
) -> Response {
    tracing::info!("Submission rejected: {}", rejection);
    if !htmx {
        let jar = flash::push(jar, FlashKind::Error, rejection.to_string());
        return (jar, Redirect::to("/")).into_response();
    }

    let headers = match rejection {
        SubmitRejection::AlreadySubmitting => HeaderMap::new(),
        _ => show_message_headers(&rejection.to_string(), "error"),
    };
    let body = button.unwrap_or_else(|| html! {});
    (jar, headers, body).into_response()
}

/// Checks that `slug` names an existing generated site.
async fn existing_site(app_state: &AppState, slug: &str) -> Result<bool, AppError> {
    if slug.is_empty() || sanitize_business_name(slug) != slug {
        return Ok(false);
    }
    let index = site_dir(&app_state.config.sites_dir, slug).join("index.html");
    Ok(tokio::fs::try_exists(index).await?)
}

pub async fn preview_handler(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if !existing_site(&app_state, &slug).await? {
        tracing::warn!("Preview requested for unknown microsite '{}'", slug);
        let jar = flash::push(jar, FlashKind::Error, NOT_FOUND_MESSAGE);
        return Ok((jar, Redirect::to("/")).into_response());
    }
    let (jar, flashes) = flash::take(jar);
    Ok((jar, preview_page(&slug, &flashes)).into_response())
}

pub async fn download_handler(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    if !existing_site(&app_state, &slug).await? {
        return Err(AppError::NotFound);
    }
    let bytes = zip_directory(&site_dir(&app_state.config.sites_dir, &slug)).await?;
    tracing::info!("Serving archive for '{}' ({} bytes)", slug, bytes.len());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    let disposition = format!("attachment; filename=\"{}_microsite.zip\"", slug);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?,
    );
    Ok((StatusCode::OK, headers, bytes).into_response())
}
