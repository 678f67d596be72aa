use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde_json::json;
use thiserror::Error;

use crate::{identity, state::AppState};

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid form token. Please reload the page and submit again.")]
    Csrf,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Attached to every error response so the top-level layer can render it.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg.clone())
            }
            AppError::Csrf => {
                tracing::warn!("Rejected request with a bad form token");
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE.to_string())
            }
        };

        let mut response = error_body(status, &message, None).into_response();
        response.extensions_mut().insert(ErrorReport { status, message });
        response
    }
}

fn error_body(status: StatusCode, message: &str, viewer: Option<identity::Viewer>) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({
            "error": { "message": message, "status": status.as_u16() },
            "viewer": viewer,
        })),
    )
}

/// Outermost handler for every error: re-renders the error page with
/// whatever viewer identity can still be resolved from the cookies.
pub async fn render_errors(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let viewer = match identity::resolve_viewer(&state.db, &jar).await {
        Ok(viewer) => viewer,
        Err(e) => {
            tracing::warn!("Could not resolve viewer for error page: {:#}", e);
            None
        }
    };

    error_body(report.status, &report.message, viewer).into_response()
}
