use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SEARCH_PATHS: [&str; 3] = [
    "wedding-server.toml",
    "config/wedding-server.toml",
    "/etc/wedding/server.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Signing secret for cookies, at least 64 bytes. Empty means a random
    /// key per process, which logs everyone out on restart.
    #[serde(default)]
    pub cookie_secret: String,
    /// Empty disables admin login entirely.
    #[serde(default)]
    pub admin_password: String,
    #[serde(default = "default_access_cookie_days")]
    pub access_cookie_days: i64,
    /// Mark cookies `Secure` (set this when served over HTTPS)
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_true")]
    pub show_admin_link: bool,
}

fn default_true() -> bool { true }
fn default_access_cookie_days() -> i64 { 90 }

impl Default for SiteConfig {
    fn default() -> Self {
        Self { show_admin_link: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                path: "./data/wedding.db".to_string(),
            },
            auth: AuthConfig {
                cookie_secret: String::new(),
                admin_password: String::new(),
                access_cookie_days: default_access_cookie_days(),
                secure_cookies: false,
            },
            site: SiteConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self::load_file()?;
        Ok(config.with_env_overrides())
    }

    fn load_file() -> Result<Self> {
        if let Ok(path) = std::env::var("WEDDING_CONFIG") {
            return Self::load_from_path(Path::new(&path));
        }

        match SEARCH_PATHS.iter().map(Path::new).find(|path| path.exists()) {
            Some(path) => Self::load_from_path(path),
            None => {
                tracing::warn!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Secrets usually come from the environment (or `.env`) rather than the file.
    fn with_env_overrides(mut self) -> Self {
        if let Ok(password) = std::env::var("WEDDING_ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Ok(secret) = std::env::var("WEDDING_COOKIE_SECRET") {
            self.auth.cookie_secret = secret;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        self
    }
}
