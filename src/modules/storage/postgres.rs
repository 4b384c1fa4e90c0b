use async_trait::async_trait;
use sqlx::{
    postgres::{PgDatabaseError, PgRow},
    FromRow, PgPool,
};
use std::borrow::Cow;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::sql;
use crate::modules::storage::{patch_assignments, to_document, Document, Repository, Resource};
use crate::shared::filter::{Filter, Where};

/// Convert database error to a more specific AppError
fn handle_db_error<E: Resource>(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            return AppError::Conflict(format!(
                "{} with the same identifier already exists",
                E::NAME
            ));
        }

        // Not-null violation
        if db_err.code() == Some(Cow::Borrowed("23502")) {
            let column = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(PgDatabaseError::column)
                .unwrap_or("a required field");
            return AppError::Validation(format!("{} is missing {}", E::NAME, column));
        }
    }

    tracing::error!("Database error on {}: {:?}", E::COLLECTION, e);
    AppError::Database(e)
}

/// Postgres-backed repository; one table per resource
pub struct PgRepository<E> {
    pool: PgPool,
    _marker: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for PgRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

impl<E: Resource> PgRepository<E> {
    fn resolve_where(&self, where_clause: Option<&Where>) -> Result<Option<Where>> {
        Ok(where_clause
            .map(|w| w.resolve(E::COLUMNS, E::NAME))
            .transpose()?)
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("{} with id {} not found", E::NAME, id))
    }
}

#[async_trait]
impl<E> Repository<E> for PgRepository<E>
where
    E: Resource + for<'r> FromRow<'r, PgRow>,
{
    async fn create(&self, record: E) -> Result<E> {
        let doc = to_document(&record)?;
        let mut qb = sql::insert::<E>(&doc)?;

        qb.build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error::<E>)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<E>> {
        let filter = filter.resolve(E::COLUMNS, E::NAME)?;
        let mut qb = sql::select::<E>(&filter)?;

        qb.build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error::<E>)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<E> {
        let filter = Filter {
            where_clause: Some(sql::by_id(id)),
            limit: Some(1),
            ..Default::default()
        };
        let mut qb = sql::select::<E>(&filter)?;

        qb.build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn count(&self, where_clause: Option<&Where>) -> Result<i64> {
        let where_clause = self.resolve_where(where_clause)?;
        let mut qb = sql::count::<E>(where_clause.as_ref())?;

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error::<E>)
    }

    async fn update_all(&self, patch: &Document, where_clause: Option<&Where>) -> Result<u64> {
        let where_clause = self.resolve_where(where_clause)?;
        let assignments = patch_assignments::<E>(patch)?;

        if assignments.is_empty() {
            return Ok(self.count(where_clause.as_ref()).await? as u64);
        }

        let mut qb = sql::update::<E>(&assignments, where_clause.as_ref())?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?;

        Ok(result.rows_affected())
    }

    async fn update_by_id(&self, id: Uuid, patch: &Document) -> Result<()> {
        let assignments = patch_assignments::<E>(patch)?;

        if assignments.is_empty() {
            self.find_by_id(id).await?;
            return Ok(());
        }

        let mut qb = sql::update::<E>(&assignments, Some(&sql::by_id(id)))?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    async fn replace_by_id(&self, id: Uuid, record: E) -> Result<()> {
        let doc = to_document(&record)?;
        let mut qb = sql::replace::<E>(id, &doc)?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        let mut qb = sql::delete::<E>(Some(&sql::by_id(id)))?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    async fn delete_all(&self, where_clause: Option<&Where>) -> Result<u64> {
        let where_clause = self.resolve_where(where_clause)?;
        let mut qb = sql::delete::<E>(where_clause.as_ref())?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(handle_db_error::<E>)?;

        Ok(result.rows_affected())
    }
}
