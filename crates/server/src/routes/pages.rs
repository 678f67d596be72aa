//! Informational pages. Public ones show who is signed in (if anyone);
//! the gallery and wedding-party pages need an access code.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use shared::Role;

use crate::{
    csrf,
    error::AppError,
    identity::{self, Invitee, Viewer},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub viewer: Option<Viewer>,
    pub csrf_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_admin_link: Option<bool>,
}

async fn render(
    state: &AppState,
    jar: SignedCookieJar,
    page: &'static str,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    let viewer = identity::resolve_viewer(&state.db, &jar).await?;
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    Ok((
        jar,
        Json(PageView {
            page,
            viewer,
            csrf_token,
            show_admin_link: None,
        }),
    ))
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    let (jar, Json(mut view)) = render(&state, jar, "home").await?;
    view.show_admin_link = Some(state.config.site.show_admin_link);
    Ok((jar, Json(view)))
}

/// GET /travel
pub async fn travel(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    render(&state, jar, "travel").await
}

/// GET /story
pub async fn story(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    render(&state, jar, "story").await
}

/// GET /gallery
pub async fn gallery(
    State(state): State<AppState>,
    _invitee: Invitee,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    render(&state, jar, "gallery").await
}

async fn party_page(
    state: &AppState,
    invitee: Invitee,
    jar: SignedCookieJar,
    role: Role,
    page: &'static str,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    let invite = state.db.find_invite(invitee.invite_id).await?;
    match invite {
        Some(invite) if invite.role() == role => render(state, jar, page).await,
        _ => Err(AppError::Forbidden("Access Denied".to_string())),
    }
}

/// GET /bridesmaids
pub async fn bridesmaids(
    State(state): State<AppState>,
    invitee: Invitee,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    party_page(&state, invitee, jar, Role::Bridesmaids, "bridesmaids").await
}

/// GET /groomsmen
pub async fn groomsmen(
    State(state): State<AppState>,
    invitee: Invitee,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<PageView>), AppError> {
    party_page(&state, invitee, jar, Role::Groomsmen, "groomsmen").await
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Page Not Found".to_string())
}
