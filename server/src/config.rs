use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};

const MIN_SECRET_BYTES: usize = 64;
const DEFAULT_IDLE_MINUTES: u64 = 60;

#[derive(Clone)]
pub struct AppConfig {
    pub cookie_key: Key,
    pub cookie_secure: bool,
    pub seed_roster: bool,
    pub session_idle: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cookie_key = match lookup("COOKIE_SECRET_BASE64") {
            Some(secret) => {
                let secret_bytes = STANDARD
                    .decode(secret.trim())
                    .context("invalid COOKIE_SECRET_BASE64")?;
                if secret_bytes.len() < MIN_SECRET_BYTES {
                    return Err(anyhow!(
                        "COOKIE_SECRET_BASE64 must decode to at least {MIN_SECRET_BYTES} bytes"
                    ));
                }
                Key::from(&secret_bytes[..])
            }
            // Sessions live in memory only, so a per-process key loses nothing on restart.
            None => Key::try_generate().context("failed to generate cookie key")?,
        };

        let cookie_secure = lookup("COOKIE_SECURE").is_some_and(|val| parse_flag(&val));
        let seed_roster = lookup("SEED_ROSTER").is_none_or(|val| parse_flag(&val));

        let idle_minutes = match lookup("SESSION_IDLE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid SESSION_IDLE_MINUTES `{raw}`"))?,
            None => DEFAULT_IDLE_MINUTES,
        };

        let idle_secs = idle_minutes
            .checked_mul(60)
            .context("SESSION_IDLE_MINUTES too large")?;

        Ok(Self {
            cookie_key,
            cookie_secure,
            seed_roster,
            session_idle: Duration::from_secs(idle_secs),
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("cookie_secure", &self.cookie_secure)
            .field("seed_roster", &self.seed_roster)
            .field("session_idle", &self.session_idle)
            .finish_non_exhaustive()
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
