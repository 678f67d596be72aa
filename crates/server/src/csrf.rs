//! Anti-forgery tokens: one random token per browser session, kept in a
//! signed cookie and echoed back as the `_csrf` field of every form.

use axum_extra::extract::cookie::SignedCookieJar;
use rand::Rng;

use crate::{
    config::AuthConfig,
    error::AppError,
    session::{self, CSRF_COOKIE},
};

const TOKEN_LEN: usize = 32;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// The session's current token, minting one if the browser has none yet.
pub fn issue(jar: SignedCookieJar, auth: &AuthConfig) -> (SignedCookieJar, String) {
    if let Some(cookie) = jar.get(CSRF_COOKIE) {
        let token = cookie.value().to_string();
        return (jar, token);
    }
    let token = generate_token();
    let jar = jar.add(session::csrf_cookie(token.clone(), auth));
    (jar, token)
}

pub fn verify(jar: &SignedCookieJar, submitted: &str) -> Result<(), AppError> {
    let expected = jar.get(CSRF_COOKIE).ok_or(AppError::Csrf)?;
    if submitted.is_empty() || !session::secrets_match(expected.value(), submitted) {
        return Err(AppError::Csrf);
    }
    Ok(())
}
