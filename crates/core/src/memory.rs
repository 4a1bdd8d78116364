//! In-memory storage backend.
//!
//! A `RwLock`-guarded map with an insertion-order index, used as the
//! CSV-seeded backend and as the reference implementation of the
//! repository contract in service tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::repository::EntityRepository;

#[derive(Debug, Default)]
struct Inner<E> {
    records: HashMap<String, E>,
    // Ids in first-insertion order; kept in sync with `records`.
    order: Vec<String>,
}

/// In-memory repository for any entity type.
///
/// Each operation is a single critical section, so an upsert racing a read
/// observes either the old or the new record, never a torn one.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    inner: RwLock<Inner<E>>,
}

impl<E> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::internal("in-memory store lock poisoned")
}

impl<E: Entity> MemoryRepository<E> {
    fn put(inner: &mut Inner<E>, entity: E) {
        let id = entity.id().to_string();
        if inner.records.insert(id.clone(), entity).is_none() {
            inner.order.push(id);
        }
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for MemoryRepository<E> {
    async fn save(&self, entity: E) -> DomainResult<E> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        Self::put(&mut inner, entity.clone());
        Ok(entity)
    }

    async fn insert_if_absent(&self, entity: E) -> DomainResult<Option<E>> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if inner.records.contains_key(entity.id()) {
            return Ok(None);
        }
        Self::put(&mut inner, entity.clone());
        Ok(Some(entity))
    }

    async fn save_all(&self, entities: Vec<E>) -> DomainResult<Vec<E>> {
        if entities.iter().any(|e| e.id().is_empty()) {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        for entity in &entities {
            Self::put(&mut inner, entity.clone());
        }
        Ok(entities)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        if inner.records.remove(id).is_some() {
            inner.order.retain(|stored| stored != id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<E>> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner.records.get(id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<E>> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect())
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner.records.contains_key(id))
    }

    async fn count(&self) -> DomainResult<u64> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner.records.len() as u64)
    }

    async fn clear(&self) -> DomainResult<u64> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        let removed = inner.records.len() as u64;
        inner.records.clear();
        inner.order.clear();
        Ok(removed)
    }
}
