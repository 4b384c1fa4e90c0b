//! Relationship accessors keyed by business identifiers.
//!
//! A State points at its Country through `countryId`, a City at its State
//! through `stateId`, and so on. The accessors below scope every operation to
//! one owner's business id.

use std::sync::Arc;

use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::modules::storage::{Document, Resource};
use crate::shared::crud::CrudService;
use crate::shared::filter::{coerce_value, Filter, Where};

/// Owner → children, e.g. Country → States through `countryId`
pub struct HasMany<C: Resource> {
    records: Arc<CrudService<C>>,
    foreign_key: &'static str,
}

impl<C: Resource> HasMany<C> {
    pub fn new(records: Arc<CrudService<C>>, foreign_key: &'static str) -> Self {
        Self {
            records,
            foreign_key,
        }
    }

    fn scope(&self, owner: i64) -> Where {
        Where::eq(self.foreign_key, owner)
    }

    pub async fn find(&self, owner: i64, filter: Filter) -> Result<Vec<C>> {
        self.records.find(&filter.scoped(self.scope(owner))).await
    }

    /// Create a child; the foreign key always points at `owner`
    pub async fn create(&self, owner: i64, mut draft: Document) -> Result<C> {
        draft.insert(self.foreign_key.to_string(), Value::from(owner));
        self.records.create(draft).await
    }

    /// Patch the owner's children matching `where_clause`
    pub async fn patch(
        &self,
        owner: i64,
        patch: &Document,
        where_clause: Option<Where>,
    ) -> Result<u64> {
        self.ensure_foreign_key_kept(owner, patch)?;
        self.records
            .update_all(patch, Some(&Where::scoped(self.scope(owner), where_clause)))
            .await
    }

    pub async fn delete(&self, owner: i64, where_clause: Option<Where>) -> Result<u64> {
        self.records
            .delete_all(Some(&Where::scoped(self.scope(owner), where_clause)))
            .await
    }

    fn ensure_foreign_key_kept(&self, owner: i64, patch: &Document) -> Result<()> {
        let (Some(value), Some(column)) = (patch.get(self.foreign_key), C::column(self.foreign_key))
        else {
            return Ok(());
        };

        let unchanged = coerce_value(column, value)
            .ok()
            .and_then(|v| v.as_i64())
            .is_some_and(|v| v == owner);

        if unchanged {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "{} cannot be changed through this relation",
                self.foreign_key
            )))
        }
    }
}

/// Child → parent, e.g. State → Country through `countryId`
pub struct BelongsTo<P: Resource> {
    records: Arc<CrudService<P>>,
    key: &'static str,
}

impl<P: Resource> BelongsTo<P> {
    pub fn new(records: Arc<CrudService<P>>, key: &'static str) -> Self {
        Self { records, key }
    }

    /// The parent whose business id is `key`; the first one wins on duplicates
    pub async fn get(&self, key: i64) -> Result<P> {
        let filter = Filter {
            where_clause: Some(Where::eq(self.key, key)),
            limit: Some(1),
            ..Default::default()
        };

        self.records
            .find(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::NotFound(format!("{} with {} {} not found", P::NAME, self.key, key))
            })
    }

    /// Parents matching the caller's filter and the key
    pub async fn find_mapped(&self, key: i64, filter: Filter) -> Result<Vec<P>> {
        self.records
            .find(&filter.scoped(Where::eq(self.key, key)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::states::models::State;
    use crate::modules::storage::MemoryRepository;
    use crate::shared::test_helpers::state_draft;
    use serde_json::json;

    fn states() -> HasMany<State> {
        let records = Arc::new(CrudService::new(Arc::new(MemoryRepository::<State>::new())));
        HasMany::new(records, "countryId")
    }

    #[tokio::test]
    async fn test_create_forces_foreign_key() {
        let states = states();

        let mut draft = state_draft(99);
        draft.insert("countryId".to_string(), json!(99));
        let created = states.create(7, draft).await.unwrap();
        assert_eq!(created.country_id, 7);

        assert_eq!(states.find(7, Filter::default()).await.unwrap().len(), 1);
        assert!(states.find(99, Filter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_patch_and_delete_are_scoped_to_owner() {
        let states = states();
        states.create(1, state_draft(1)).await.unwrap();
        states.create(1, state_draft(1)).await.unwrap();
        states.create(2, state_draft(2)).await.unwrap();

        let patch = json!({"stateCode": "XX"});
        let patched = states
            .patch(1, patch.as_object().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(patched, 2);

        let deleted = states
            .delete(2, Some(Where::eq("stateCode", "XX")))
            .await
            .unwrap();
        assert_eq!(deleted, 0);

        assert_eq!(states.delete(1, None).await.unwrap(), 2);
        assert_eq!(states.find(2, Filter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_patch_cannot_move_children() {
        let states = states();
        states.create(1, state_draft(1)).await.unwrap();

        let moved = json!({"countryId": 2});
        assert!(matches!(
            states.patch(1, moved.as_object().unwrap(), None).await,
            Err(AppError::BadRequest(_))
        ));

        let same = json!({"countryId": "1", "name": "Renamed"});
        assert_eq!(
            states
                .patch(1, same.as_object().unwrap(), None)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_belongs_to_missing_parent_is_not_found() {
        let records = Arc::new(CrudService::new(Arc::new(MemoryRepository::<State>::new())));
        let state = BelongsTo::new(records.clone(), "stateId");

        assert!(matches!(state.get(3).await, Err(AppError::NotFound(_))));

        let created = records.create(state_draft(1)).await.unwrap();
        assert_eq!(state.get(created.state_id).await.unwrap().id, created.id);
        assert_eq!(
            state
                .find_mapped(created.state_id, Filter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
