use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::{from_document, to_document, Document, Repository, Resource};
use crate::shared::filter::{Filter, OrderBy, Where};

/// CRUD operations over one collection.
///
/// Assigns storage ids (UUIDv7) and, for resources with a business id, the
/// next business id (current maximum + 1, starting at 1). Creation is
/// serialized per service so two concurrent creates cannot read the same
/// maximum.
pub struct CrudService<E: Resource> {
    repository: Arc<dyn Repository<E>>,
    create_lock: Mutex<()>,
}

impl<E: Resource> std::fmt::Debug for CrudService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("resource", &E::NAME)
            .finish()
    }
}

impl<E: Resource> CrudService<E> {
    pub fn new(repository: Arc<dyn Repository<E>>) -> Self {
        Self {
            repository,
            create_lock: Mutex::new(()),
        }
    }

    /// Create a record from a draft document
    pub async fn create(&self, mut draft: Document) -> Result<E> {
        let _guard = self.create_lock.lock().await;

        draft.insert("id".to_string(), Value::String(Uuid::now_v7().to_string()));

        if let Some(field) = E::BUSINESS_ID {
            if draft.get(field).map_or(true, Value::is_null) {
                let next = self.next_business_id(field).await?;
                draft.insert(field.to_string(), Value::from(next));
            }
        }

        let record: E = from_document(draft)?;
        let created = self.repository.create(record).await?;

        tracing::info!(
            "Created {} {} (business id {:?})",
            E::NAME,
            created.id(),
            created.business_id()
        );

        Ok(created)
    }

    async fn next_business_id(&self, field: &str) -> Result<i64> {
        let latest = Filter {
            order: vec![OrderBy::desc(field)],
            limit: Some(1),
            ..Default::default()
        };

        let max = self
            .repository
            .find(&latest)
            .await?
            .first()
            .and_then(E::business_id);

        match max {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                AppError::Conflict(format!(
                    "{} has no {} left after {}; supply one explicitly",
                    E::NAME,
                    field,
                    max
                ))
            }),
        }
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<E>> {
        self.repository.find(filter).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<E> {
        self.repository.find_by_id(id).await
    }

    /// Point lookup whose filter is still checked against the columns
    pub async fn find_by_id_with(&self, id: Uuid, filter: &Filter) -> Result<E> {
        filter.resolve(E::COLUMNS, E::NAME)?;
        self.repository.find_by_id(id).await
    }

    pub async fn count(&self, where_clause: Option<&Where>) -> Result<i64> {
        self.repository.count(where_clause).await
    }

    pub async fn update_all(&self, patch: &Document, where_clause: Option<&Where>) -> Result<u64> {
        let count = self.repository.update_all(patch, where_clause).await?;
        tracing::debug!("Updated {} {} record(s)", count, E::NAME);
        Ok(count)
    }

    pub async fn update_by_id(&self, id: Uuid, patch: &Document) -> Result<()> {
        self.repository.update_by_id(id, patch).await
    }

    /// Replace every field of a record; a draft without a business id keeps the stored one
    pub async fn replace_by_id(&self, id: Uuid, mut draft: Document) -> Result<()> {
        let existing = self.repository.find_by_id(id).await?;

        draft.insert("id".to_string(), Value::String(id.to_string()));

        if let Some(field) = E::BUSINESS_ID {
            if draft.get(field).map_or(true, Value::is_null) {
                let stored = to_document(&existing)?
                    .remove(field)
                    .unwrap_or(Value::Null);
                draft.insert(field.to_string(), stored);
            }
        }

        let record: E = from_document(draft)?;
        self.repository.replace_by_id(id, record).await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        self.repository.delete_by_id(id).await?;
        tracing::info!("Deleted {} {}", E::NAME, id);
        Ok(())
    }

    pub async fn delete_all(&self, where_clause: Option<&Where>) -> Result<u64> {
        let count = self.repository.delete_all(where_clause).await?;
        tracing::info!("Deleted {} {} record(s)", count, E::NAME);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::countries::models::Country;
    use crate::modules::storage::MemoryRepository;
    use crate::shared::test_helpers::country_draft;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn service() -> CrudService<Country> {
        CrudService::new(Arc::new(MemoryRepository::<Country>::new()))
    }

    #[tokio::test]
    async fn test_first_business_id_is_one_then_max_plus_one() {
        let service = service();

        let first = service.create(country_draft()).await.unwrap();
        assert_eq!(first.country_id, 1);

        let mut draft = country_draft();
        draft.insert("countryId".to_string(), json!(41));
        let supplied = service.create(draft).await.unwrap();
        assert_eq!(supplied.country_id, 41);

        let next = service.create(country_draft()).await.unwrap();
        assert_eq!(next.country_id, 42);
    }

    #[tokio::test]
    async fn test_create_then_find_by_id_returns_input() {
        let service = service();
        let draft = country_draft();

        let created = service.create(draft.clone()).await.unwrap();
        let found = service.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.name, draft["name"].as_str().unwrap());
        assert_eq!(found.iso2, draft["iso2"].as_str().unwrap());
        assert_eq!(found.id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_partial_patch_only_changes_patched_fields() {
        let service = service();
        let created = service.create(country_draft()).await.unwrap();

        let patch = json!({"capital": "Lima"});
        assert_ok!(
            service
                .update_by_id(created.id, patch.as_object().unwrap())
                .await
        );

        let found = service.find_by_id(created.id).await.unwrap();
        assert_eq!(found.capital.as_deref(), Some("Lima"));
        assert_eq!(
            Country {
                capital: created.capital.clone(),
                ..found
            },
            created
        );
    }

    #[tokio::test]
    async fn test_replace_keeps_business_id_when_absent() {
        let service = service();
        let created = service.create(country_draft()).await.unwrap();

        let mut draft = country_draft();
        draft.remove("countryId");
        draft.insert("name".to_string(), json!("Replaced"));
        assert_ok!(service.replace_by_id(created.id, draft).await);

        let found = service.find_by_id(created.id).await.unwrap();
        assert_eq!(found.name, "Replaced");
        assert_eq!(found.country_id, created.country_id);
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let service = service();
        let created = service.create(country_draft()).await.unwrap();

        assert_ok!(service.delete_by_id(created.id).await);
        assert!(matches!(
            service.find_by_id(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let service = Arc::new(service());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create(country_draft()).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().country_id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_next_business_id_past_i64_max_is_conflict() {
        let service = service();

        let mut draft = country_draft();
        draft.insert("countryId".to_string(), json!(i64::MAX));
        let largest = service.create(draft).await.unwrap();
        assert_eq!(largest.country_id, i64::MAX);

        assert!(matches!(
            service.create(country_draft()).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(service.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_with_rejects_unknown_fields() {
        let service = service();
        let created = service.create(country_draft()).await.unwrap();

        let unknown = Filter::parse(Some(r#"{"fields":["bogus"]}"#)).unwrap();
        assert!(matches!(
            service.find_by_id_with(created.id, &unknown).await,
            Err(AppError::BadRequest(_))
        ));

        let known = Filter::parse(Some(r#"{"fields":["name"]}"#)).unwrap();
        assert_eq!(
            service.find_by_id_with(created.id, &known).await.unwrap(),
            created
        );
    }
}
