use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::modules::storage::{Document, Resource};
use crate::shared::filter::{Filter, Where};

/// CRUD accessor bound to one collection.
///
/// Filters and patches are validated against `E::COLUMNS` by the
/// implementation, so callers may pass them straight from the request.
#[async_trait]
pub trait Repository<E: Resource>: Send + Sync {
    /// Insert a fully formed record (ids already assigned)
    async fn create(&self, record: E) -> Result<E>;

    async fn find(&self, filter: &Filter) -> Result<Vec<E>>;

    /// Fails with `NotFound` when no record has this storage id
    async fn find_by_id(&self, id: Uuid) -> Result<E>;

    async fn count(&self, where_clause: Option<&Where>) -> Result<i64>;

    /// Apply `patch` to every matching record, returning how many matched
    async fn update_all(&self, patch: &Document, where_clause: Option<&Where>) -> Result<u64>;

    async fn update_by_id(&self, id: Uuid, patch: &Document) -> Result<()>;

    async fn replace_by_id(&self, id: Uuid, record: E) -> Result<()>;

    async fn delete_by_id(&self, id: Uuid) -> Result<()>;

    async fn delete_all(&self, where_clause: Option<&Where>) -> Result<u64>;
}
