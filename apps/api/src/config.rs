use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
///
/// Only `SESSION_SECRET` is required. The AI key and SMTP credentials are
/// optional: a missing key disables resume analysis/generation, missing SMTP
/// credentials disable email delivery, and the rest of the app keeps working.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub session_secret: String,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub smtp_relay: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_secret = require_env("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            bail!("SESSION_SECRET must be at least 32 bytes");
        }

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:resume_ai.db".to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            session_secret,
            sender_email: optional_env("SENDER_EMAIL"),
            sender_password: optional_env("SENDER_PASSWORD"),
            smtp_relay: std::env::var("SMTP_RELAY")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional environment variable, treating the empty string as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use tower_sessions::cookie::Key;

    // The minimum length enforced by `from_env` must be enough to derive a
    // cookie signing key.
    #[test]
    fn test_minimum_session_secret_derives_signing_key() {
        let secret = "0123456789abcdef0123456789abcdef";
        assert_eq!(secret.len(), 32);
        let key = Key::derive_from(secret.as_bytes());
        assert!(!key.signing().is_empty());
    }
}
