//! SQL generation for [`PgRepository`](super::PgRepository).
//!
//! Identifiers come from the static column tables; every value is bound.

use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::{Column, ColumnKind, Document, Resource};
use crate::shared::filter::{Condition, Filter, Where};

pub type PgQuery = QueryBuilder<'static, Postgres>;

/// Comma-separated column list of a resource
pub fn column_list<E: Resource>() -> String {
    E::COLUMNS
        .iter()
        .map(|c| c.column)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn select<E: Resource>(filter: &Filter) -> Result<PgQuery> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        column_list::<E>(),
        E::COLLECTION
    ));

    push_where_clause::<E>(&mut qb, filter.where_clause.as_ref())?;

    if !filter.order.is_empty() {
        let order = filter
            .order
            .iter()
            .map(|o| Ok(format!("{} {}", column::<E>(&o.field)?.column, o.direction.as_sql())))
            .collect::<Result<Vec<_>>>()?;
        qb.push(" ORDER BY ").push(order.join(", "));
    }

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(skip) = filter.skip {
        qb.push(" OFFSET ").push_bind(skip);
    }

    Ok(qb)
}

pub fn count<E: Resource>(where_clause: Option<&Where>) -> Result<PgQuery> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::COLLECTION));
    push_where_clause::<E>(&mut qb, where_clause)?;
    Ok(qb)
}

pub fn insert<E: Resource>(doc: &Document) -> Result<PgQuery> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        E::COLLECTION,
        column_list::<E>()
    ));

    for (i, column) in E::COLUMNS.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, column, doc.get(column.field).unwrap_or(&Value::Null))?;
    }

    qb.push(") RETURNING ").push(column_list::<E>());
    Ok(qb)
}

/// `UPDATE ... SET` for the given assignments; callers ensure the list is non-empty
pub fn update<E: Resource>(
    assignments: &[(&'static Column, Value)],
    where_clause: Option<&Where>,
) -> Result<PgQuery> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", E::COLLECTION));

    for (i, (column, value)) in assignments.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(column.column).push(" = ");
        push_value(&mut qb, column, value)?;
    }

    push_where_clause::<E>(&mut qb, where_clause)?;
    Ok(qb)
}

/// Overwrite every column except the storage id
pub fn replace<E: Resource>(id: Uuid, doc: &Document) -> Result<PgQuery> {
    let assignments: Vec<(&'static Column, Value)> = E::COLUMNS
        .iter()
        .filter(|c| c.kind != ColumnKind::Uuid)
        .map(|c| (c, doc.get(c.field).cloned().unwrap_or(Value::Null)))
        .collect();

    update::<E>(&assignments, Some(&by_id(id)))
}

pub fn delete<E: Resource>(where_clause: Option<&Where>) -> Result<PgQuery> {
    let mut qb = QueryBuilder::new(format!("DELETE FROM {}", E::COLLECTION));
    push_where_clause::<E>(&mut qb, where_clause)?;
    Ok(qb)
}

pub fn by_id(id: Uuid) -> Where {
    Where::eq("id", id.to_string())
}

fn column<E: Resource>(field: &str) -> Result<&'static Column> {
    E::column(field)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown field '{}' for {}", field, E::NAME)))
}

fn push_where_clause<E: Resource>(qb: &mut PgQuery, where_clause: Option<&Where>) -> Result<()> {
    if let Some(w) = where_clause {
        qb.push(" WHERE ");
        push_where::<E>(qb, w)?;
    }
    Ok(())
}

fn push_where<E: Resource>(qb: &mut PgQuery, w: &Where) -> Result<()> {
    match w {
        Where::And(parts) => push_group::<E>(qb, parts, " AND ", "TRUE"),
        Where::Or(parts) => push_group::<E>(qb, parts, " OR ", "FALSE"),
        Where::Field { field, op } => push_condition(qb, column::<E>(field)?, op),
    }
}

fn push_group<E: Resource>(
    qb: &mut PgQuery,
    parts: &[Where],
    joiner: &str,
    empty: &str,
) -> Result<()> {
    if parts.is_empty() {
        qb.push(empty);
        return Ok(());
    }

    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(joiner);
        }
        push_where::<E>(qb, part)?;
    }
    qb.push(")");
    Ok(())
}

fn push_condition(qb: &mut PgQuery, column: &Column, op: &Condition) -> Result<()> {
    let name = column.column;

    match op {
        Condition::Eq(Value::Null) => {
            qb.push(name).push(" IS NULL");
        }
        Condition::Neq(Value::Null) => {
            qb.push(name).push(" IS NOT NULL");
        }
        Condition::Eq(v) => push_comparison(qb, column, "=", v)?,
        Condition::Neq(v) => push_comparison(qb, column, "IS DISTINCT FROM", v)?,
        Condition::Gt(v) => push_comparison(qb, column, ">", v)?,
        Condition::Gte(v) => push_comparison(qb, column, ">=", v)?,
        Condition::Lt(v) => push_comparison(qb, column, "<", v)?,
        Condition::Lte(v) => push_comparison(qb, column, "<=", v)?,
        Condition::Inq(values) => push_list(qb, column, "IN", values, "FALSE")?,
        Condition::Nin(values) => push_list(qb, column, "NOT IN", values, "TRUE")?,
        Condition::Between(low, high) => {
            qb.push(name).push(" BETWEEN ");
            push_value(qb, column, low)?;
            qb.push(" AND ");
            push_value(qb, column, high)?;
        }
        Condition::Like(pattern) => {
            qb.push(name).push(" LIKE ").push_bind(pattern.clone());
        }
        Condition::NotLike(pattern) => {
            qb.push(name).push(" NOT LIKE ").push_bind(pattern.clone());
        }
        Condition::ILike(pattern) => {
            qb.push(name).push(" ILIKE ").push_bind(pattern.clone());
        }
    }

    Ok(())
}

fn push_comparison(qb: &mut PgQuery, column: &Column, op: &str, value: &Value) -> Result<()> {
    qb.push(column.column).push(" ").push(op).push(" ");
    push_value(qb, column, value)
}

fn push_list(
    qb: &mut PgQuery,
    column: &Column,
    op: &str,
    values: &[Value],
    empty: &str,
) -> Result<()> {
    // `IN ()` is not valid SQL
    if values.is_empty() {
        qb.push(empty);
        return Ok(());
    }

    qb.push(column.column).push(" ").push(op).push(" (");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(qb, column, value)?;
    }
    qb.push(")");
    Ok(())
}

/// Bind a canonical JSON value with the SQL type of its column
fn push_value(qb: &mut PgQuery, column: &Column, value: &Value) -> Result<()> {
    let mismatch = || {
        AppError::Validation(format!(
            "Field '{}' has an invalid value: {}",
            column.field, value
        ))
    };

    match (column.kind, value) {
        (ColumnKind::Uuid, Value::String(s)) => {
            let id = Uuid::parse_str(s).map_err(|_| mismatch())?;
            qb.push_bind(id);
        }
        (ColumnKind::Integer, Value::Null) => {
            qb.push_bind(None::<i64>);
        }
        (ColumnKind::Integer, Value::Number(n)) => {
            qb.push_bind(n.as_i64().ok_or_else(mismatch)?);
        }
        (ColumnKind::Text, Value::Null) => {
            qb.push_bind(None::<String>);
        }
        (ColumnKind::Text, Value::String(s)) => {
            qb.push_bind(s.clone());
        }
        (ColumnKind::Json, Value::Null) => {
            qb.push_bind(None::<Value>);
        }
        (ColumnKind::Json, v) => {
            qb.push_bind(v.clone());
        }
        _ => return Err(mismatch()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::filter::OrderBy;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Town {
        id: Uuid,
        town_id: i64,
        name: String,
        tags: Option<Value>,
    }

    impl Resource for Town {
        const NAME: &'static str = "Town";
        const COLLECTION: &'static str = "towns";
        const COLUMNS: &'static [Column] = &[
            Column::new("id", "id", ColumnKind::Uuid),
            Column::new("townId", "town_id", ColumnKind::Integer),
            Column::new("name", "name", ColumnKind::Text),
            Column::new("tags", "tags", ColumnKind::Json),
        ];
        const BUSINESS_ID: Option<&'static str> = Some("townId");

        fn id(&self) -> Uuid {
            self.id
        }
    }

    #[test]
    fn test_select_with_where_order_and_paging() {
        let filter = Filter {
            where_clause: Some(Where::And(vec![
                Where::inq("townId", [1, 2]),
                Where::Field {
                    field: "name".to_string(),
                    op: Condition::ILike("san%".to_string()),
                },
            ])),
            order: vec![OrderBy::desc("townId")],
            limit: Some(1),
            skip: Some(5),
            ..Default::default()
        };

        let qb = select::<Town>(&filter).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT id, town_id, name, tags FROM towns \
             WHERE (town_id IN ($1, $2) AND name ILIKE $3) \
             ORDER BY town_id DESC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn test_empty_inq_never_emits_empty_list() {
        let qb = count::<Town>(Some(&Where::inq::<i64>("townId", []))).unwrap();
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM towns WHERE FALSE");

        let nin = Where::Field {
            field: "townId".to_string(),
            op: Condition::Nin(vec![]),
        };
        let qb = count::<Town>(Some(&nin)).unwrap();
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM towns WHERE TRUE");
    }

    #[test]
    fn test_null_comparisons() {
        let w = Where::Or(vec![
            Where::eq("name", Value::Null),
            Where::Field {
                field: "townId".to_string(),
                op: Condition::Neq(Value::Null),
            },
        ]);
        let qb = delete::<Town>(Some(&w)).unwrap();
        assert_eq!(
            qb.sql(),
            "DELETE FROM towns WHERE (name IS NULL OR town_id IS NOT NULL)"
        );
    }

    #[test]
    fn test_insert_binds_every_column() {
        let doc = json!({"id": Uuid::nil().to_string(), "townId": 3, "name": "Lima"});
        let qb = insert::<Town>(doc.as_object().unwrap()).unwrap();
        assert_eq!(
            qb.sql(),
            "INSERT INTO towns (id, town_id, name, tags) VALUES ($1, $2, $3, $4) \
             RETURNING id, town_id, name, tags"
        );
    }

    #[test]
    fn test_replace_skips_storage_id() {
        let doc = json!({"townId": 3, "name": "Lima", "tags": ["coastal"]});
        let qb = replace::<Town>(Uuid::nil(), doc.as_object().unwrap()).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE towns SET town_id = $1, name = $2, tags = $3 WHERE id = $4"
        );
    }

    #[test]
    fn test_value_type_mismatch_is_rejected() {
        let w = Where::eq("townId", "three");
        assert!(count::<Town>(Some(&w)).is_err());
    }
}
