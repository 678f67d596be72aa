//! Access-code sign-in for invitees.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{cookie::SignedCookieJar, Form};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::AccessToken;

use crate::{
    credentials, csrf,
    error::AppError,
    identity::{self, Viewer},
    session::{self, ACCESS_COOKIE},
    state::AppState,
};

/// Only same-site paths are followed after sign-in.
fn safe_next(raw: Option<&str>) -> String {
    match raw {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_string(),
        _ => "/".to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessView {
    pub next: String,
    pub error: Option<String>,
    pub viewer: Option<Viewer>,
    pub csrf_token: String,
}

/// GET /access
pub async fn access_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<AccessQuery>,
) -> Result<(SignedCookieJar, Json<AccessView>), AppError> {
    let viewer = identity::resolve_viewer(&state.db, &jar).await?;
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    Ok((
        jar,
        Json(AccessView {
            next: safe_next(query.next.as_deref()),
            error: None,
            viewer,
            csrf_token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AccessForm {
    #[serde(rename = "_csrf", default)]
    pub csrf: String,
    #[serde(default)]
    pub code: String,
    pub next: Option<String>,
}

/// POST /access
pub async fn access_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AccessForm>,
) -> Result<Response, AppError> {
    csrf::verify(&jar, &form.csrf)?;
    let next = safe_next(form.next.as_deref());

    if form.code.trim().is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Access code is required. Please try again." })),
        )
            .into_response());
    }

    match credentials::find_invite_by_code(&state.db, &form.code, None).await? {
        Some(invite_id) => {
            tracing::info!("Invite {} signed in with an access code", invite_id);
            let jar = jar.add(session::access_cookie(
                AccessToken::Invite(invite_id),
                &state.config.auth,
            ));
            Ok((jar, Json(json!({ "success": true, "next": next }))).into_response())
        }
        None => {
            tracing::warn!("Access code sign-in failed");
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "The access code you entered is incorrect. Please try again."
                })),
            )
                .into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CsrfOnlyForm {
    #[serde(rename = "_csrf", default)]
    pub csrf: String,
}

/// POST /access/logout
pub async fn access_logout(
    jar: SignedCookieJar,
    Form(form): Form<CsrfOnlyForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    csrf::verify(&jar, &form.csrf)?;
    Ok((jar.remove(session::removal(ACCESS_COOKIE)), Redirect::to("/")))
}
