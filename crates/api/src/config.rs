//! Environment-driven configuration.

use std::path::PathBuf;

use anyhow::bail;

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address, `STATSVC_ADDR`.
    pub addr: String,
    /// Storage backend, `STATSVC_BACKEND` (`memory` or `sqlite`).
    pub backend: Backend,
    /// SQLite URL, `DATABASE_URL`. Only read for the sqlite backend.
    pub database_url: String,
    /// Seed file for the in-memory earthquake repository,
    /// `STATSVC_EARTHQUAKES_CSV`.
    pub earthquakes_csv: PathBuf,
    /// Seed file for the in-memory player repository, `STATSVC_PLAYERS_CSV`.
    pub players_csv: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = match env_or("STATSVC_BACKEND", "memory").to_lowercase().as_str() {
            "memory" => Backend::Memory,
            "sqlite" => Backend::Sqlite,
            other => bail!("unknown STATSVC_BACKEND '{other}' (expected memory or sqlite)"),
        };

        Ok(Self {
            addr: env_or("STATSVC_ADDR", "0.0.0.0:8080"),
            backend,
            database_url: env_or("DATABASE_URL", "sqlite://statsvc.db"),
            earthquakes_csv: env_or("STATSVC_EARTHQUAKES_CSV", "data/earthquakes.csv").into(),
            players_csv: env_or("STATSVC_PLAYERS_CSV", "data/players.csv").into(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
