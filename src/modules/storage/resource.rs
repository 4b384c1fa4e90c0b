use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::filter::coerce_value;

/// A JSON object keyed by API field names, used for drafts and patches
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Integer,
    Text,
    Json,
}

/// Mapping between an API field (`countryId`) and its SQL column (`country_id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(field: &'static str, column: &'static str, kind: ColumnKind) -> Self {
        Self {
            field,
            column,
            kind,
        }
    }
}

/// Describes a stored record type: where it lives and what it is made of
///
/// Records serialize to and from the API's JSON shape; the first column is
/// always the storage identifier `id`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Human-readable name used in error messages
    const NAME: &'static str;
    /// Table or collection name
    const COLLECTION: &'static str;
    const COLUMNS: &'static [Column];
    /// Field holding the numeric business identifier, if the resource has one
    const BUSINESS_ID: Option<&'static str> = None;

    fn id(&self) -> Uuid;

    fn business_id(&self) -> Option<i64> {
        None
    }

    fn column(field: &str) -> Option<&'static Column> {
        Self::COLUMNS.iter().find(|c| c.field == field)
    }
}

/// Resolve a patch document into `(column, value)` assignments.
///
/// The storage id is immutable and unknown fields are rejected; scalar values
/// are coerced to the column type.
pub fn patch_assignments<E: Resource>(patch: &Document) -> Result<Vec<(&'static Column, Value)>> {
    patch
        .iter()
        .map(|(field, value)| {
            let column = E::column(field).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown field '{}' for {}", field, E::NAME))
            })?;

            if column.kind == ColumnKind::Uuid {
                return Err(AppError::BadRequest(format!(
                    "Field '{}' of {} cannot be modified",
                    field,
                    E::NAME
                )));
            }

            let value = coerce_value(column, value)
                .map_err(|e| AppError::Validation(e.to_string()))?;
            Ok((column, value))
        })
        .collect()
}

/// Serialize a record into its document form
pub fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(AppError::Internal(
            "record did not serialize to an object".to_string(),
        )),
        Err(e) => Err(AppError::Internal(format!(
            "failed to serialize record: {}",
            e
        ))),
    }
}

/// Rebuild a record from its document form; shape errors are validation errors
pub fn from_document<E: Resource>(doc: Document) -> Result<E> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| AppError::Validation(format!("Invalid {}: {}", E::NAME, e)))
}
