//! Cookie-backed sessions. There is no server-side session store: the
//! invitee and admin sessions are nothing more than signed cookies.

use anyhow::{anyhow, Result};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use shared::AccessToken;
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

pub const ACCESS_COOKIE: &str = "acc";
pub const ADMIN_COOKIE: &str = "admin";
pub const CSRF_COOKIE: &str = "csrf";

pub fn signing_key(secret: &str) -> Result<Key> {
    if secret.is_empty() {
        tracing::warn!("No cookie secret configured, generating a random key (sessions will not survive a restart)");
        return Ok(Key::generate());
    }
    Key::try_from(secret.as_bytes()).map_err(|_| anyhow!("cookie_secret must be at least 64 bytes long"))
}

fn base_cookie(name: &'static str, value: String, auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(auth.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn access_cookie(token: AccessToken, auth: &AuthConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(ACCESS_COOKIE, token.to_string(), auth);
    cookie.set_max_age(time::Duration::days(auth.access_cookie_days));
    cookie
}

/// Session-length: no max-age.
pub fn admin_cookie(auth: &AuthConfig) -> Cookie<'static> {
    base_cookie(ADMIN_COOKIE, "true".to_string(), auth)
}

pub fn csrf_cookie(token: String, auth: &AuthConfig) -> Cookie<'static> {
    base_cookie(CSRF_COOKIE, token, auth)
}

pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// An already-expired cookie, for clearing values the signed jar refused.
pub fn expired(name: &'static str) -> Cookie<'static> {
    let mut cookie = removal(name);
    cookie.make_removal();
    cookie
}

/// `None` for a missing cookie, a bad signature or a malformed value.
pub fn access_token(jar: &SignedCookieJar) -> Option<AccessToken> {
    let cookie = jar.get(ACCESS_COOKIE)?;
    let token = AccessToken::parse(cookie.value());
    if token.is_none() {
        tracing::warn!("Rejecting malformed access cookie");
    }
    token
}

pub fn is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(ADMIN_COOKIE).is_some_and(|cookie| cookie.value() == "true")
}

/// Compares secrets without short-circuiting on the first differing byte.
pub fn secrets_match(expected: &str, submitted: &str) -> bool {
    bool::from(expected.as_bytes().ct_eq(submitted.as_bytes()))
}
