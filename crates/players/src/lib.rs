//! `statsvc-players` — sports-player records: model, CSV handling, service.

pub mod csv;
pub mod model;
pub mod service;

pub use model::Player;
pub use service::{ImportReport, OverallStatistics, PlayerService, RangeStats, TeamStatistics};
