//! Storage backend contract.
//!
//! Every backend (in-memory map, SQL) implements this trait with the same
//! semantics, so services are wired against `Arc<dyn EntityRepository<_>>`
//! and the concrete backend is chosen once at startup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::DomainResult;

/// Uniform persistence contract for a single record type.
///
/// Existence checking is the service's responsibility: `save` upserts,
/// `delete` is a no-op for absent ids, and `find_by_id` returns `None`
/// rather than an error for missing records.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Upsert by id. Fails with `BadRequest` if the entity has an empty id.
    async fn save(&self, entity: E) -> DomainResult<E>;

    /// Insert only if the id is absent, atomically: `Some(entity)` when the
    /// insert happened, `None` when a record with that id already existed.
    /// Two racing inserts for the same id see exactly one `Some`.
    async fn insert_if_absent(&self, entity: E) -> DomainResult<Option<E>>;

    /// Bulk upsert; same semantics as `save` per element.
    async fn save_all(&self, entities: Vec<E>) -> DomainResult<Vec<E>>;

    /// Remove by id if present. Absent ids are not an error at this layer.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// The stored record, or `None` if absent.
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<E>>;

    /// All currently stored records. Insertion order for the in-memory
    /// backend, unspecified otherwise.
    async fn find_all(&self) -> DomainResult<Vec<E>>;

    async fn exists(&self, id: &str) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<u64>;

    /// Remove every record, returning how many were deleted.
    async fn clear(&self) -> DomainResult<u64>;
}

#[async_trait]
impl<E, R> EntityRepository<E> for Arc<R>
where
    E: Entity,
    R: EntityRepository<E> + ?Sized,
{
    async fn save(&self, entity: E) -> DomainResult<E> {
        (**self).save(entity).await
    }

    async fn insert_if_absent(&self, entity: E) -> DomainResult<Option<E>> {
        (**self).insert_if_absent(entity).await
    }

    async fn save_all(&self, entities: Vec<E>) -> DomainResult<Vec<E>> {
        (**self).save_all(entities).await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        (**self).delete(id).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<E>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<E>> {
        (**self).find_all().await
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        (**self).exists(id).await
    }

    async fn count(&self) -> DomainResult<u64> {
        (**self).count().await
    }

    async fn clear(&self) -> DomainResult<u64> {
        (**self).clear().await
    }
}
