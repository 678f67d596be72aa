//! Who is looking at the page, and the request guards built on that.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{CookieJar, Key, SignedCookieJar};
use serde::Serialize;
use shared::Role;

use crate::{
    db::{Database, InviteProfile},
    session::{self, ACCESS_COOKIE},
    state::AppState,
};

#[derive(Debug, Clone, Serialize)]
pub struct Viewer {
    pub invite_id: i64,
    pub name: Option<String>,
    pub role: Role,
}

impl Viewer {
    pub fn from_profile(invite: &InviteProfile) -> Self {
        Self {
            invite_id: invite.id,
            name: invite.display_name().map(str::to_string),
            role: invite.role(),
        }
    }
}

/// `None` for visitors without a valid token, or whose invite no longer exists.
pub async fn resolve_viewer(db: &Database, jar: &SignedCookieJar) -> anyhow::Result<Option<Viewer>> {
    let Some(token) = session::access_token(jar) else {
        return Ok(None);
    };
    let invite = db.find_invite(token.invite_id()).await?;
    Ok(invite.as_ref().map(Viewer::from_profile))
}

async fn signed_jar(parts: &mut Parts, state: &AppState) -> SignedCookieJar {
    match SignedCookieJar::<Key>::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    }
}

/// Send the visitor to the access-code prompt, then back to `uri`.
/// Any stale or forged access cookie is cleared on the way.
pub fn access_redirect(uri: &Uri) -> Response {
    let next = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let location = format!("/?showAccessModal=true&next={}", urlencoding::encode(next));
    // A forged cookie never makes it into the signed jar, so expire it by name.
    let cleared = CookieJar::new().add(session::expired(ACCESS_COOKIE));
    (cleared, Redirect::to(&location)).into_response()
}

/// An invitee holding a well-formed, correctly signed access token.
#[derive(Debug, Clone, Copy)]
pub struct Invitee {
    pub invite_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for Invitee {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = signed_jar(parts, state).await;
        match session::access_token(&jar) {
            Some(token) => Ok(Invitee { invite_id: token.invite_id() }),
            None => {
                if CookieJar::from_headers(&parts.headers).get(ACCESS_COOKIE).is_some() {
                    tracing::warn!("Clearing invalid access cookie");
                }
                Err(access_redirect(&parts.uri))
            }
        }
    }
}

pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = signed_jar(parts, state).await;
        if session::is_admin(&jar) {
            Ok(AdminSession)
        } else {
            Err(Redirect::to("/admin/login"))
        }
    }
}
