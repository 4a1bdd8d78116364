//! `statsvc-api` — HTTP surface: router, auth middleware, configuration.

pub mod access;
pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
