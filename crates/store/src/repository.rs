// SPDX-License-Identifier: MIT

//! Generic in-memory repository: get/save/create/delete/exists/count/list,
//! with list results filtered by the caller's identity before pagination.

use crate::entity::Entity;
use async_trait::async_trait;
use fulcrum_core::{CoreError, CoreResult, Identity, PageRequest, PageResponse};
use parking_lot::RwLock;
use std::collections::HashMap;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, id: &T::Id) -> CoreResult<T>;
    async fn find(&self, id: &T::Id) -> CoreResult<Option<T>>;
    async fn create(&self, entity: T) -> CoreResult<T>;
    async fn save(&self, entity: T) -> CoreResult<T>;
    async fn delete(&self, id: &T::Id) -> CoreResult<()>;
    async fn exists(&self, id: &T::Id) -> CoreResult<bool>;
    async fn count(&self) -> CoreResult<usize>;
    async fn list(&self, identity: &Identity, page: PageRequest) -> CoreResult<PageResponse<T>>;
}

pub struct InMemoryRepository<T: Entity> {
    label: &'static str,
    rows: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(label: &'static str) -> Self {
        Self { label, rows: RwLock::new(HashMap::new()) }
    }

    fn not_found(&self) -> CoreError {
        CoreError::not_found(format!("{} not found", self.label))
    }

    /// Full unfiltered snapshot, for lookups keyed by something other than
    /// the entity's id (e.g. a token's hash).
    pub fn all(&self) -> Vec<T> {
        self.rows.read().values().cloned().collect()
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new("entity")
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: &T::Id) -> CoreResult<T> {
        self.rows.read().get(id).cloned().ok_or_else(|| self.not_found())
    }

    async fn find(&self, id: &T::Id) -> CoreResult<Option<T>> {
        Ok(self.rows.read().get(id).cloned())
    }

    async fn create(&self, entity: T) -> CoreResult<T> {
        let mut rows = self.rows.write();
        let id = entity.id();
        if rows.contains_key(&id) {
            return Err(CoreError::conflict(format!("{} already exists", self.label)));
        }
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn save(&self, entity: T) -> CoreResult<T> {
        let mut rows = self.rows.write();
        let id = entity.id();
        if !rows.contains_key(&id) {
            return Err(self.not_found());
        }
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &T::Id) -> CoreResult<()> {
        let mut rows = self.rows.write();
        if rows.remove(id).is_none() {
            return Err(self.not_found());
        }
        Ok(())
    }

    async fn exists(&self, id: &T::Id) -> CoreResult<bool> {
        Ok(self.rows.read().contains_key(id))
    }

    async fn count(&self) -> CoreResult<usize> {
        Ok(self.rows.read().len())
    }

    async fn list(&self, identity: &Identity, page: PageRequest) -> CoreResult<PageResponse<T>> {
        page.validate().map_err(CoreError::invalid_input)?;

        let rows = self.rows.read();
        let mut visible: Vec<T> = rows
            .values()
            .filter(|row| row.scope().matches(identity))
            .cloned()
            .collect();
        drop(rows);

        // Deterministic ordering so paging is stable across calls; callers
        // that need a different sort key apply it themselves afterwards.
        visible.sort_by_key(|row| row.id());

        let total = visible.len() as u64;
        let offset = page.offset();
        let items = visible.into_iter().skip(offset).take(page.page_size as usize).collect();

        Ok(PageResponse { items, total, page: page.page, page_size: page.page_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulcrum_core::{DefaultScopeTarget, IdentityScope, ObjectScope, Role};

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Widget {
        id: u32,
        owner: Option<String>,
    }

    impl Entity for Widget {
        type Id = u32;
        fn id(&self) -> Self::Id {
            self.id
        }
        fn scope(&self) -> ObjectScope {
            match &self.owner {
                None => ObjectScope::always(),
                Some(owner) => ObjectScope::default_scope(DefaultScopeTarget {
                    participant_id: Some(owner.clone()),
                    ..Default::default()
                }),
            }
        }
    }

    fn identity(participant_id: &str) -> Identity {
        Identity::new(
            "p",
            Role::Participant,
            IdentityScope { participant_id: Some(participant_id.into()), agent_id: None },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryRepository::<Widget>::new("widget");
        repo.create(Widget { id: 1, owner: None }).await.unwrap();
        let found = repo.get(&1).await.unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let repo = InMemoryRepository::<Widget>::new("widget");
        repo.create(Widget { id: 1, owner: None }).await.unwrap();
        let err = repo.create(Widget { id: 1, owner: None }).await.unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn save_missing_row_not_found() {
        let repo = InMemoryRepository::<Widget>::new("widget");
        let err = repo.save(Widget { id: 9, owner: None }).await.unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_filters_by_scope() {
        let repo = InMemoryRepository::<Widget>::new("widget");
        repo.create(Widget { id: 1, owner: Some("p1".into()) }).await.unwrap();
        repo.create(Widget { id: 2, owner: Some("p2".into()) }).await.unwrap();
        repo.create(Widget { id: 3, owner: None }).await.unwrap();

        let page = repo.list(&identity("p1"), PageRequest::default()).await.unwrap();
        let ids: Vec<u32> = page.items.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(page.total, 2);
    }
}
