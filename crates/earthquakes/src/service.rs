//! Earthquake service: CRUD plus magnitude/place queries.
//!
//! The service validates input, enforces existence/uniqueness, and reduces
//! over the full record set for statistics. It holds no state of its own —
//! storage is the single source of truth.

use std::sync::Arc;

use statsvc_core::{stats, DomainError, DomainResult, EntityRepository};

use crate::model::Earthquake;

#[derive(Clone)]
pub struct EarthquakesService {
    repo: Arc<dyn EntityRepository<Earthquake>>,
}

impl EarthquakesService {
    pub fn new(repo: Arc<dyn EntityRepository<Earthquake>>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Earthquake>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Earthquake> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("earthquake not found"))
    }

    /// Insert-if-absent is a single storage operation, so two racing
    /// creates for the same id produce exactly one success and one
    /// `Conflict`, never a silent overwrite.
    pub async fn create(&self, earthquake: Earthquake) -> DomainResult<Earthquake> {
        if earthquake.id.is_empty() {
            return Err(DomainError::bad_request("id is required"));
        }
        self.repo
            .insert_if_absent(earthquake)
            .await?
            .ok_or_else(|| DomainError::conflict("earthquake already exists"))
    }

    /// Full overwrite under an existing id; the caller has already forced
    /// the id from the route path.
    pub async fn update(&self, earthquake: Earthquake) -> DomainResult<Earthquake> {
        if !self.repo.exists(&earthquake.id).await? {
            return Err(DomainError::not_found("earthquake not found"));
        }
        self.repo.save(earthquake).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        if !self.repo.exists(id).await? {
            return Err(DomainError::not_found("earthquake not found"));
        }
        self.repo.delete(id).await
    }

    /// Mean magnitude across all records; 0.0 when the set is empty or no
    /// record carries a magnitude.
    pub async fn avg_magnitude(&self) -> DomainResult<f64> {
        let quakes = self.get_all().await?;
        Ok(stats::average(&quakes, |q| q.magnitude))
    }

    pub async fn with_magnitude_above(&self, min: f64) -> DomainResult<Vec<Earthquake>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|q| q.magnitude.is_some_and(|m| m > min))
            .collect())
    }

    /// Case-insensitive substring match on the place description.
    pub async fn search_by_place(&self, fragment: &str) -> DomainResult<Vec<Earthquake>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|q| {
                q.place
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase().contains(&needle))
            })
            .collect())
    }
}
