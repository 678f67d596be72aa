use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{config::Config, db::Database, session};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub key: Key,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let key = session::signing_key(&config.auth.cookie_secret)?;
        Ok(Self { db, config, key })
    }
}

// Lets `SignedCookieJar` be extracted straight from the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
