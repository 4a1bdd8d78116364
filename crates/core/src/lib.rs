//! `statsvc-core` — storage-agnostic building blocks shared by both resources.
//!
//! This crate contains the domain error model, the entity/repository
//! contracts, the reference in-memory backend, and the full-scan statistics
//! helpers. No HTTP or database concerns live here.

pub mod entity;
pub mod error;
pub mod memory;
pub mod repository;
pub mod stats;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use memory::MemoryRepository;
pub use repository::EntityRepository;
