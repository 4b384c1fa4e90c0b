use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::{
    from_document, patch_assignments, to_document, Document, Repository, Resource,
};
use crate::shared::filter::{Condition, Filter, OrderBy, SortDirection, Where};

/// Process-local repository used by the `memory` backend and by tests.
///
/// Filters are evaluated against each record's serialized form, after the same
/// resolution step the Postgres backend applies, so both backends agree on
/// which records match.
pub struct MemoryRepository<E> {
    records: RwLock<Vec<E>>,
}

impl<E: Resource> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("{} with id {} not found", E::NAME, id))
    }

    fn resolve_where(where_clause: Option<&Where>) -> Result<Option<Where>> {
        Ok(where_clause
            .map(|w| w.resolve(E::COLUMNS, E::NAME))
            .transpose()?)
    }
}

impl<E: Resource> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Resource> Repository<E> for MemoryRepository<E> {
    async fn create(&self, record: E) -> Result<E> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Conflict(format!(
                "{} with id {} already exists",
                E::NAME,
                record.id()
            )));
        }
        if let Some(bid) = record.business_id() {
            if records.iter().any(|r| r.business_id() == Some(bid)) {
                return Err(duplicate_business_id::<E>(bid));
            }
        }

        records.push(record.clone());
        Ok(record)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<E>> {
        let filter = filter.resolve(E::COLUMNS, E::NAME)?;
        let records = self.records.read().await;

        let mut matched = Vec::new();
        for record in records.iter() {
            let doc = to_document(record)?;
            if matches(filter.where_clause.as_ref(), &doc)? {
                matched.push((doc, record));
            }
        }

        if !filter.order.is_empty() {
            matched.sort_by(|(a, _), (b, _)| compare_by(&filter.order, a, b));
        }

        let skip = filter.skip.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<E> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn count(&self, where_clause: Option<&Where>) -> Result<i64> {
        let where_clause = Self::resolve_where(where_clause)?;
        let records = self.records.read().await;

        let mut count = 0;
        for record in records.iter() {
            if matches(where_clause.as_ref(), &to_document(record)?)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_all(&self, patch: &Document, where_clause: Option<&Where>) -> Result<u64> {
        let where_clause = Self::resolve_where(where_clause)?;
        let assignments = patch_assignments::<E>(patch)?;
        let mut records = self.records.write().await;

        // Build every updated record first so a bad patch leaves nothing half-applied
        let mut updated = records.clone();
        let mut affected = 0;
        for record in updated.iter_mut() {
            let mut doc = to_document(record)?;
            if !matches(where_clause.as_ref(), &doc)? {
                continue;
            }
            for (column, value) in &assignments {
                doc.insert(column.field.to_string(), value.clone());
            }
            *record = from_document(doc)?;
            affected += 1;
        }

        ensure_unique_business_ids(&updated)?;
        *records = updated;
        Ok(affected)
    }

    async fn update_by_id(&self, id: Uuid, patch: &Document) -> Result<()> {
        let assignments = patch_assignments::<E>(patch)?;
        let mut records = self.records.write().await;

        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let mut doc = to_document(&records[index])?;
        for (column, value) in assignments {
            doc.insert(column.field.to_string(), value);
        }
        let record: E = from_document(doc)?;

        if let Some(bid) = record.business_id() {
            if records
                .iter()
                .any(|r| r.id() != id && r.business_id() == Some(bid))
            {
                return Err(duplicate_business_id::<E>(bid));
            }
        }

        records[index] = record;
        Ok(())
    }

    async fn replace_by_id(&self, id: Uuid, record: E) -> Result<()> {
        let mut records = self.records.write().await;

        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        if let Some(bid) = record.business_id() {
            if records
                .iter()
                .any(|r| r.id() != id && r.business_id() == Some(bid))
            {
                return Err(duplicate_business_id::<E>(bid));
            }
        }

        records[index] = record;
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn delete_all(&self, where_clause: Option<&Where>) -> Result<u64> {
        let where_clause = Self::resolve_where(where_clause)?;
        let mut records = self.records.write().await;

        let mut doomed = HashSet::new();
        for record in records.iter() {
            if matches(where_clause.as_ref(), &to_document(record)?)? {
                doomed.insert(record.id());
            }
        }

        records.retain(|r| !doomed.contains(&r.id()));
        Ok(doomed.len() as u64)
    }
}

fn duplicate_business_id<E: Resource>(bid: i64) -> AppError {
    AppError::Conflict(format!(
        "{} with {} {} already exists",
        E::NAME,
        E::BUSINESS_ID.unwrap_or("id"),
        bid
    ))
}

fn ensure_unique_business_ids<E: Resource>(records: &[E]) -> Result<()> {
    let mut seen = HashSet::new();
    for bid in records.iter().filter_map(E::business_id) {
        if !seen.insert(bid) {
            return Err(duplicate_business_id::<E>(bid));
        }
    }
    Ok(())
}

fn matches(where_clause: Option<&Where>, doc: &Document) -> Result<bool> {
    let Some(w) = where_clause else {
        return Ok(true);
    };

    match w {
        Where::And(parts) => {
            for part in parts {
                if !matches(Some(part), doc)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Where::Or(parts) => {
            for part in parts {
                if matches(Some(part), doc)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Where::Field { field, op } => {
            let value = doc.get(field).unwrap_or(&Value::Null);
            evaluate(value, op)
        }
    }
}

fn evaluate(value: &Value, op: &Condition) -> Result<bool> {
    let ordered = |expected: &Value, accept: fn(Ordering) -> bool| {
        compare(value, expected).is_some_and(accept)
    };

    Ok(match op {
        Condition::Eq(Value::Null) => value.is_null(),
        Condition::Neq(Value::Null) => !value.is_null(),
        Condition::Eq(expected) => same(value, expected),
        Condition::Neq(expected) => !same(value, expected),
        Condition::Gt(expected) => ordered(expected, Ordering::is_gt),
        Condition::Gte(expected) => ordered(expected, Ordering::is_ge),
        Condition::Lt(expected) => ordered(expected, Ordering::is_lt),
        Condition::Lte(expected) => ordered(expected, Ordering::is_le),
        Condition::Inq(values) => values.iter().any(|v| same(value, v)),
        Condition::Nin(values) => !value.is_null() && !values.iter().any(|v| same(value, v)),
        Condition::Between(low, high) => {
            ordered(low, Ordering::is_ge) && ordered(high, Ordering::is_le)
        }
        Condition::Like(pattern) => like(value, pattern, false, false)?,
        Condition::NotLike(pattern) => like(value, pattern, false, true)?,
        Condition::ILike(pattern) => like(value, pattern, true, false)?,
    })
}

fn same(a: &Value, b: &Value) -> bool {
    !a.is_null() && compare(a, b) == Some(Ordering::Equal)
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// SQL `LIKE` semantics: `%` matches any run, `_` a single character
fn like(value: &Value, pattern: &str, case_insensitive: bool, negate: bool) -> Result<bool> {
    let Value::String(text) = value else {
        return Ok(false);
    };

    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');
    for c in pattern.chars() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');

    let re = RegexBuilder::new(&regex)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| AppError::BadRequest(format!("Invalid pattern '{}': {}", pattern, e)))?;

    Ok(re.is_match(text) != negate)
}

/// Order like Postgres: nulls sort after values ascending and before them descending
fn compare_by(order: &[OrderBy], a: &Document, b: &Document) -> Ordering {
    for key in order {
        let left = a.get(&key.field).unwrap_or(&Value::Null);
        let right = b.get(&key.field).unwrap_or(&Value::Null);

        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare(left, right).unwrap_or(Ordering::Equal),
        };

        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::{Column, ColumnKind};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Town {
        id: Uuid,
        town_id: i64,
        name: String,
        region: Option<String>,
    }

    impl Resource for Town {
        const NAME: &'static str = "Town";
        const COLLECTION: &'static str = "towns";
        const COLUMNS: &'static [Column] = &[
            Column::new("id", "id", ColumnKind::Uuid),
            Column::new("townId", "town_id", ColumnKind::Integer),
            Column::new("name", "name", ColumnKind::Text),
            Column::new("region", "region", ColumnKind::Text),
        ];
        const BUSINESS_ID: Option<&'static str> = Some("townId");

        fn id(&self) -> Uuid {
            self.id
        }

        fn business_id(&self) -> Option<i64> {
            Some(self.town_id)
        }
    }

    fn town(town_id: i64, name: &str, region: Option<&str>) -> Town {
        Town {
            id: Uuid::now_v7(),
            town_id,
            name: name.to_string(),
            region: region.map(str::to_string),
        }
    }

    fn repo() -> MemoryRepository<Town> {
        MemoryRepository::with_records(vec![
            town(1, "Arequipa", Some("south")),
            town(2, "Cusco", Some("south")),
            town(3, "Trujillo", None),
            town(4, "Iquitos", Some("east")),
        ])
    }

    fn filter(raw: &str) -> Filter {
        Filter::parse(Some(raw)).unwrap()
    }

    fn names(records: &[Town]) -> Vec<&str> {
        records.iter().map(|t| t.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_find_with_operators() {
        let repo = repo();

        let found = repo
            .find(&filter(r#"{"where": {"townId": {"inq": ["2", 4]}}}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Cusco", "Iquitos"]);

        let found = repo
            .find(&filter(r#"{"where": {"townId": {"between": [2, 3]}}}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Cusco", "Trujillo"]);

        let found = repo
            .find(&filter(r#"{"where": {"or": [{"name": {"ilike": "a%"}}, {"region": "east"}]}}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Arequipa", "Iquitos"]);
    }

    #[tokio::test]
    async fn test_null_matching() {
        let repo = repo();

        let found = repo
            .find(&filter(r#"{"where": {"region": null}}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Trujillo"]);

        let count = repo
            .count(Some(&Where::Field {
                field: "region".to_string(),
                op: Condition::Neq(json!("south")),
            }))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_order_skip_limit() {
        let repo = repo();

        let found = repo
            .find(&filter(r#"{"order": ["townId DESC"], "skip": 1, "limit": 2}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Trujillo", "Cusco"]);

        let found = repo
            .find(&filter(r#"{"order": "region ASC, name DESC"}"#))
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Iquitos", "Cusco", "Arequipa", "Trujillo"]);
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let err = repo()
            .find(&filter(r#"{"where": {"population": 3}}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_business_id() {
        let repo = repo();
        let err = repo.create(town(2, "Lima", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        repo.create(town(5, "Lima", None)).await.unwrap();
        assert_eq!(repo.count(None).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_update_all_is_all_or_nothing() {
        let repo = repo();

        let patch = json!({"region": "north"});
        let updated = repo
            .update_all(patch.as_object().unwrap(), Some(&Where::eq("region", Value::Null)))
            .await
            .unwrap();
        assert_eq!(updated, 1);
        assert_eq!(
            repo.count(Some(&Where::eq("region", "north"))).await.unwrap(),
            1
        );

        // would give every record townId 9
        let patch = json!({"townId": 9});
        let err = repo
            .update_all(patch.as_object().unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.count(Some(&Where::eq("townId", 9))).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_by_id_rejects_id_and_null_required() {
        let repo = repo();
        let target = repo.find(&Filter::default()).await.unwrap()[0].clone();

        let patch = json!({"id": Uuid::now_v7().to_string()});
        assert!(matches!(
            repo.update_by_id(target.id, patch.as_object().unwrap()).await,
            Err(AppError::BadRequest(_))
        ));

        let patch = json!({"name": null});
        assert!(matches!(
            repo.update_by_id(target.id, patch.as_object().unwrap()).await,
            Err(AppError::Validation(_))
        ));

        let patch = json!({"name": "Arequipa Norte"});
        repo.update_by_id(target.id, patch.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(
            repo.find_by_id(target.id).await.unwrap().name,
            "Arequipa Norte"
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let removed = repo
            .delete_all(Some(&Where::eq("region", "south")))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let missing = Uuid::now_v7();
        assert!(matches!(
            repo.delete_by_id(missing).await,
            Err(AppError::NotFound(_))
        ));
    }
}
