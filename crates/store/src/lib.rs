//! `statsvc-store` — persistent SQLite repositories.
//!
//! The in-memory repository lives in `statsvc-core`; this crate adds the
//! SQLite-backed counterparts behind the same `EntityRepository` trait, so
//! the backend is an injection choice made once at startup.

pub mod sqlite;

pub use sqlite::{connect, SqliteEarthquakeRepository, SqlitePlayerRepository};
