//! `statsvc-earthquakes` — earthquake records: model, CSV seeding, service.

pub mod csv;
pub mod model;
pub mod service;

pub use model::Earthquake;
pub use service::EarthquakesService;
