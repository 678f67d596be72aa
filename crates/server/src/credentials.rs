//! Access-code hashing and lookup.
//!
//! Every stored hash carries its own salt, so a submitted code cannot be
//! looked up by hash. Finding the matching invite means verifying the code
//! against each stored hash in turn. Hashing and verifying both run on the
//! blocking pool.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::db::{Database, InviteCode};

pub fn hash_code(code: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash access code: {}", e))
}

fn verify_code(code: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(code.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!("Skipping unparseable access code hash: {}", e);
            false
        }
    }
}

/// First invite (by id) whose stored hash verifies against `code`.
pub fn find_match(code: &str, candidates: &[InviteCode]) -> Option<i64> {
    candidates.iter().find_map(|candidate| {
        let hash = candidate.access_code_hash.as_deref()?;
        verify_code(code, hash).then_some(candidate.id)
    })
}

pub async fn hash_code_blocking(code: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_code(&code)).await?
}

/// Scans every invite that has a code. Pass `exclude` to ignore one invite
/// (used when an invite's own code is being replaced).
pub async fn find_invite_by_code(db: &Database, code: &str, exclude: Option<i64>) -> Result<Option<i64>> {
    let candidates: Vec<InviteCode> = db
        .list_invite_codes()
        .await?
        .into_iter()
        .filter(|candidate| Some(candidate.id) != exclude)
        .collect();

    let code = code.to_string();
    let found = tokio::task::spawn_blocking(move || find_match(&code, &candidates)).await?;
    Ok(found)
}
