use std::path::PathBuf;

use anyhow::ensure;
use serde::Deserialize;

use crate::auth::sessions::DEFAULT_SESSION_TTL;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_days: i64,
    /// How often expired sessions are swept; 0 disables the sweep.
    pub sweep_minutes: u64,
}

/// Upper bound accepted for `SESSION_TTL_DAYS`.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

impl SessionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_SESSION_TTL_DAYS).contains(&self.ttl_days),
            "SESSION_TTL_DAYS must be between 1 and {MAX_SESSION_TTL_DAYS}, got {}",
            self.ttl_days
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub session: SessionConfig,
    pub exercises_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            ttl_days: env_or("SESSION_TTL_DAYS", DEFAULT_SESSION_TTL.whole_days()),
            sweep_minutes: env_or("SESSION_SWEEP_MINUTES", 60),
        };
        session.validate()?;
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            session,
            exercises_path: std::env::var("EXERCISES_PATH")
                .unwrap_or_else(|_| "exercises.json".into())
                .into(),
        })
    }

    pub fn session_ttl(&self) -> time::Duration {
        time::Duration::days(self.session.ttl_days)
    }

    pub fn sweep_interval(&self) -> Option<std::time::Duration> {
        match self.session.sweep_minutes {
            0 => None,
            m => Some(std::time::Duration::from_secs(m.saturating_mul(60))),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
