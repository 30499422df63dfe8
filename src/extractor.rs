// src/extractor.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{FORM_HEADER, FormSession};
use crate::state::AppState;

fn session_id(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get(FORM_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}

/// The caller's live builder form. Requests without one are rejected with
/// `AppError::SessionExpired`.
pub struct BuilderSession(pub FormSession);

impl<S> FromRequestParts<S> for BuilderSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id(parts) else {
            tracing::debug!("Builder request without a form id");
            return Err(AppError::SessionExpired);
        };
        let app_state = AppState::from_ref(state);
        match app_state.sessions.get(id).await {
            Some(session) => Ok(BuilderSession(session)),
            None => {
                tracing::debug!("Builder session {} not found or expired", id);
                Err(AppError::SessionExpired)
            }
        }
    }
}

/// Like `BuilderSession`, but plain form posts without a live session are
/// still served.
pub struct OptionalBuilderSession(pub Option<FormSession>);

impl<S> FromRequestParts<S> for OptionalBuilderSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id(parts) else {
            return Ok(OptionalBuilderSession(None));
        };
        let app_state = AppState::from_ref(state);
        Ok(OptionalBuilderSession(app_state.sessions.get(id).await))
    }
}
