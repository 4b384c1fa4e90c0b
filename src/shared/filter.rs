//! Query filter grammar shared by every list, count and search endpoint.
//!
//! Filters arrive as JSON in the `filter` (or `where`) query parameter:
//!
//! ```json
//! {
//!   "where": {"countryId": {"inq": [1, 2]}, "name": {"ilike": "new%"}},
//!   "fields": ["id", "name"],
//!   "order": ["countryId DESC"],
//!   "limit": 10,
//!   "skip": 20
//! }
//! ```
//!
//! Parsing only checks shape. [`Filter::resolve`] checks field names against a
//! resource's columns and coerces literal values to the column type, so both
//! storage backends receive the same canonical predicate.

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::modules::storage::{Column, ColumnKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid filter JSON: {0}")]
    Json(String),

    #[error("Invalid filter: {0}")]
    Invalid(String),

    #[error("Unknown field '{field}' for {resource}")]
    UnknownField {
        field: String,
        resource: &'static str,
    },

    #[error("Field '{0}' cannot be used for filtering or ordering")]
    NotFilterable(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

type FilterResult<T> = std::result::Result<T, FilterError>;

/// Predicate tree of a `where` clause
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    And(Vec<Where>),
    Or(Vec<Where>),
    Field { field: String, op: Condition },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Inq(Vec<Value>),
    Nin(Vec<Value>),
    Between(Value, Value),
    Like(String),
    NotLike(String),
    ILike(String),
}

impl Where {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Where::Field {
            field: field.to_string(),
            op: Condition::Eq(value.into()),
        }
    }

    pub fn inq<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Where::Field {
            field: field.to_string(),
            op: Condition::Inq(values.into_iter().map(Into::into).collect()),
        }
    }

    /// `scope AND other`, or just `scope` when there is nothing to combine
    pub fn scoped(scope: Where, other: Option<Where>) -> Self {
        match other {
            Some(other) => Where::And(vec![scope, other]),
            None => scope,
        }
    }

    pub fn from_value(value: &Value) -> FilterResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| FilterError::Invalid("where must be a JSON object".to_string()))?;

        let mut clauses = Vec::with_capacity(obj.len());
        for (key, operand) in obj {
            match key.as_str() {
                "and" | "or" => {
                    let items = operand.as_array().ok_or_else(|| {
                        FilterError::Invalid(format!("'{}' expects an array of conditions", key))
                    })?;
                    let parts = items
                        .iter()
                        .map(Where::from_value)
                        .collect::<FilterResult<Vec<_>>>()?;
                    clauses.push(if key == "and" {
                        Where::And(parts)
                    } else {
                        Where::Or(parts)
                    });
                }
                field => clauses.extend(parse_field(field, operand)?),
            }
        }

        Ok(match clauses.len() {
            1 => clauses.remove(0),
            _ => Where::And(clauses),
        })
    }

    /// Check field names and coerce literals to the column types
    pub fn resolve(&self, columns: &[Column], resource: &'static str) -> FilterResult<Where> {
        match self {
            Where::And(parts) => Ok(Where::And(
                parts
                    .iter()
                    .map(|p| p.resolve(columns, resource))
                    .collect::<FilterResult<_>>()?,
            )),
            Where::Or(parts) => Ok(Where::Or(
                parts
                    .iter()
                    .map(|p| p.resolve(columns, resource))
                    .collect::<FilterResult<_>>()?,
            )),
            Where::Field { field, op } => {
                let column = filterable_column(columns, field, resource)?;
                Ok(Where::Field {
                    field: field.clone(),
                    op: resolve_condition(column, op)?,
                })
            }
        }
    }
}

fn parse_field(field: &str, operand: &Value) -> FilterResult<Vec<Where>> {
    let Some(ops) = operand.as_object() else {
        return Ok(vec![Where::eq(field, operand.clone())]);
    };

    if ops.is_empty() {
        return Err(FilterError::Invalid(format!(
            "empty condition on field '{}'",
            field
        )));
    }

    ops.iter()
        .map(|(op, value)| {
            let op = parse_operator(field, op, value)?;
            Ok(Where::Field {
                field: field.to_string(),
                op,
            })
        })
        .collect()
}

fn parse_operator(field: &str, op: &str, value: &Value) -> FilterResult<Condition> {
    let list = |value: &Value| -> FilterResult<Vec<Value>> {
        value.as_array().cloned().ok_or_else(|| {
            FilterError::Invalid(format!("'{}' on field '{}' expects an array", op, field))
        })
    };
    let pattern = |value: &Value| -> FilterResult<String> {
        value.as_str().map(str::to_string).ok_or_else(|| {
            FilterError::Invalid(format!("'{}' on field '{}' expects a string", op, field))
        })
    };

    let condition = match op {
        "eq" => Condition::Eq(value.clone()),
        "neq" => Condition::Neq(value.clone()),
        "gt" => Condition::Gt(value.clone()),
        "gte" => Condition::Gte(value.clone()),
        "lt" => Condition::Lt(value.clone()),
        "lte" => Condition::Lte(value.clone()),
        "inq" => Condition::Inq(list(value)?),
        "nin" => Condition::Nin(list(value)?),
        "between" => match list(value)?.as_slice() {
            [low, high] => Condition::Between(low.clone(), high.clone()),
            _ => {
                return Err(FilterError::Invalid(format!(
                    "'between' on field '{}' expects exactly two values",
                    field
                )))
            }
        },
        "like" => Condition::Like(pattern(value)?),
        "nlike" => Condition::NotLike(pattern(value)?),
        "ilike" => Condition::ILike(pattern(value)?),
        other => {
            return Err(FilterError::Invalid(format!(
                "unknown operator '{}' on field '{}'",
                other, field
            )))
        }
    };

    Ok(condition)
}

fn filterable_column<'a>(
    columns: &'a [Column],
    field: &str,
    resource: &'static str,
) -> FilterResult<&'a Column> {
    let column = columns
        .iter()
        .find(|c| c.field == field)
        .ok_or_else(|| FilterError::UnknownField {
            field: field.to_string(),
            resource,
        })?;

    if column.kind == ColumnKind::Json {
        return Err(FilterError::NotFilterable(field.to_string()));
    }

    Ok(column)
}

fn resolve_condition(column: &Column, op: &Condition) -> FilterResult<Condition> {
    let coerce = |value: &Value| coerce_value(column, value);
    let coerce_all = |values: &[Value]| -> FilterResult<Vec<Value>> {
        values.iter().map(|v| coerce_value(column, v)).collect()
    };
    let text_only = |pattern: &String| -> FilterResult<String> {
        if column.kind != ColumnKind::Text {
            return Err(FilterError::InvalidValue {
                field: column.field.to_string(),
                reason: "pattern matching applies to text fields only".to_string(),
            });
        }
        Ok(pattern.clone())
    };

    Ok(match op {
        Condition::Eq(v) => Condition::Eq(coerce(v)?),
        Condition::Neq(v) => Condition::Neq(coerce(v)?),
        Condition::Gt(v) => Condition::Gt(coerce(v)?),
        Condition::Gte(v) => Condition::Gte(coerce(v)?),
        Condition::Lt(v) => Condition::Lt(coerce(v)?),
        Condition::Lte(v) => Condition::Lte(coerce(v)?),
        Condition::Inq(vs) => Condition::Inq(coerce_all(vs)?),
        Condition::Nin(vs) => Condition::Nin(coerce_all(vs)?),
        Condition::Between(low, high) => Condition::Between(coerce(low)?, coerce(high)?),
        Condition::Like(p) => Condition::Like(text_only(p)?),
        Condition::NotLike(p) => Condition::NotLike(text_only(p)?),
        Condition::ILike(p) => Condition::ILike(text_only(p)?),
    })
}

/// Convert a JSON literal to the canonical JSON form of a column type
pub fn coerce_value(column: &Column, value: &Value) -> FilterResult<Value> {
    let invalid = |reason: &str| FilterError::InvalidValue {
        field: column.field.to_string(),
        reason: reason.to_string(),
    };

    if value.is_null() {
        return Ok(Value::Null);
    }

    match column.kind {
        ColumnKind::Integer => match value {
            Value::Number(n) => n
                .as_i64()
                .map(|i| Value::Number(Number::from(i)))
                .ok_or_else(|| invalid("expected an integer")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| Value::Number(Number::from(i)))
                .map_err(|_| invalid("expected an integer")),
            _ => Err(invalid("expected an integer")),
        },
        ColumnKind::Text => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(invalid("expected a string")),
        },
        ColumnKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(|id| Value::String(id.to_string()))
            .ok_or_else(|| invalid("expected a UUID")),
        ColumnKind::Json => Ok(value.clone()),
    }
}

// =============================================================================
// ORDER
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `"name"`, `"name ASC"` or `"countryId DESC"`
    fn parse(raw: &str) -> FilterResult<Self> {
        let mut parts = raw.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| FilterError::Invalid("empty order clause".to_string()))?;

        let direction = match parts.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => SortDirection::Asc,
            Some("DESC") => SortDirection::Desc,
            Some(other) => {
                return Err(FilterError::Invalid(format!(
                    "invalid sort direction '{}' in '{}'",
                    other, raw
                )))
            }
        };

        if parts.next().is_some() {
            return Err(FilterError::Invalid(format!("invalid order clause '{}'", raw)));
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Field projection applied to serialized records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Fields {
    fn from_value(value: &Value) -> FilterResult<Self> {
        match value {
            Value::Array(items) => {
                let include = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            FilterError::Invalid("fields must be strings".to_string())
                        })
                    })
                    .collect::<FilterResult<Vec<_>>>()?;
                Ok(Self {
                    include,
                    exclude: Vec::new(),
                })
            }
            Value::Object(map) => {
                let mut fields = Self::default();
                for (name, flag) in map {
                    match flag.as_bool() {
                        Some(true) => fields.include.push(name.clone()),
                        Some(false) => fields.exclude.push(name.clone()),
                        None => {
                            return Err(FilterError::Invalid(format!(
                                "fields.{} must be true or false",
                                name
                            )))
                        }
                    }
                }
                Ok(fields)
            }
            _ => Err(FilterError::Invalid(
                "fields must be an array or an object".to_string(),
            )),
        }
    }

    fn validate(&self, columns: &[Column], resource: &'static str) -> FilterResult<()> {
        for name in self.include.iter().chain(self.exclude.iter()) {
            if !columns.iter().any(|c| c.field == name) {
                return Err(FilterError::UnknownField {
                    field: name.clone(),
                    resource,
                });
            }
        }
        Ok(())
    }

    /// Keep the included keys (all when none listed), then drop the excluded
    pub fn project(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let projected: Map<String, Value> = map
                    .into_iter()
                    .filter(|(key, _)| self.include.is_empty() || self.include.contains(key))
                    .filter(|(key, _)| !self.exclude.contains(key))
                    .collect();
                Value::Object(projected)
            }
            other => other,
        }
    }
}

// =============================================================================
// FILTER
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub where_clause: Option<Where>,
    pub fields: Option<Fields>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl Filter {
    /// Parse the raw `filter` query parameter; absent or blank means "everything"
    pub fn parse(raw: Option<&str>) -> FilterResult<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => {
                let value: Value =
                    serde_json::from_str(raw).map_err(|e| FilterError::Json(e.to_string()))?;
                Self::from_value(&value)
            }
        }
    }

    pub fn from_value(value: &Value) -> FilterResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| FilterError::Invalid("filter must be a JSON object".to_string()))?;

        let mut filter = Self::default();
        for (key, v) in obj {
            match key.as_str() {
                "where" => filter.where_clause = Some(Where::from_value(v)?),
                "fields" => filter.fields = Some(Fields::from_value(v)?),
                "order" => {
                    filter.order = match v {
                        Value::String(s) => s
                            .split(',')
                            .map(OrderBy::parse)
                            .collect::<FilterResult<_>>()?,
                        Value::Array(items) => items
                            .iter()
                            .map(|item| {
                                item.as_str().ok_or_else(|| {
                                    FilterError::Invalid("order entries must be strings".to_string())
                                })
                            })
                            .map(|item| item.and_then(OrderBy::parse))
                            .collect::<FilterResult<_>>()?,
                        _ => {
                            return Err(FilterError::Invalid(
                                "order must be a string or an array of strings".to_string(),
                            ))
                        }
                    }
                }
                "limit" => filter.limit = Some(non_negative(key, v)?),
                "skip" | "offset" => filter.skip = Some(non_negative(key, v)?),
                other => {
                    return Err(FilterError::Invalid(format!(
                        "unsupported filter key '{}'",
                        other
                    )))
                }
            }
        }

        Ok(filter)
    }

    /// Validate every field reference against a resource's columns
    pub fn resolve(&self, columns: &[Column], resource: &'static str) -> FilterResult<Self> {
        let where_clause = self
            .where_clause
            .as_ref()
            .map(|w| w.resolve(columns, resource))
            .transpose()?;

        for order in &self.order {
            filterable_column(columns, &order.field, resource)?;
        }

        if let Some(fields) = &self.fields {
            fields.validate(columns, resource)?;
        }

        Ok(Self {
            where_clause,
            ..self.clone()
        })
    }

    /// Restrict the filter to records that also match `scope`
    pub fn scoped(mut self, scope: Where) -> Self {
        self.where_clause = Some(Where::scoped(scope, self.where_clause.take()));
        self
    }

    /// Never return more than `cap` rows
    pub fn capped(mut self, cap: i64) -> Self {
        self.limit = Some(self.limit.map_or(cap, |limit| limit.min(cap)));
        self
    }

    /// Serialize a record and apply the `fields` projection
    pub fn project<T: serde::Serialize>(&self, record: &T) -> serde_json::Result<Value> {
        let value = serde_json::to_value(record)?;
        Ok(match &self.fields {
            Some(fields) => fields.project(value),
            None => value,
        })
    }
}

/// Parse the raw `where` query parameter used by count and bulk endpoints
pub fn parse_where(raw: Option<&str>) -> FilterResult<Option<Where>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => {
            let value: Value =
                serde_json::from_str(raw).map_err(|e| FilterError::Json(e.to_string()))?;
            Where::from_value(&value).map(Some)
        }
    }
}

fn non_negative(key: &str, value: &Value) -> FilterResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .filter(|n| *n >= 0)
        .ok_or_else(|| FilterError::Invalid(format!("{} must be a non-negative integer", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("countryId", "country_id", ColumnKind::Integer),
        Column::new("name", "name", ColumnKind::Text),
        Column::new("translations", "translations", ColumnKind::Json),
    ];

    #[test]
    fn test_parse_empty_filter() {
        assert_eq!(Filter::parse(None).unwrap(), Filter::default());
        assert_eq!(Filter::parse(Some("  ")).unwrap(), Filter::default());
    }

    #[test]
    fn test_parse_full_filter() {
        let filter = Filter::parse(Some(
            r#"{"where":{"countryId":5},"fields":["id","name"],"order":["countryId DESC","name"],"limit":10,"skip":"20"}"#,
        ))
        .unwrap();

        assert_eq!(filter.where_clause, Some(Where::eq("countryId", 5)));
        assert_eq!(
            filter.fields,
            Some(Fields {
                include: vec!["id".to_string(), "name".to_string()],
                exclude: vec![],
            })
        );
        assert_eq!(
            filter.order,
            vec![
                OrderBy::desc("countryId"),
                OrderBy {
                    field: "name".to_string(),
                    direction: SortDirection::Asc
                }
            ]
        );
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.skip, Some(20));
    }

    #[test]
    fn test_where_multiple_keys_are_and() {
        let w = Where::from_value(&json!({"name": "Texas", "countryId": {"gt": 1, "lt": 9}}))
            .unwrap();
        match w {
            Where::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected AND, got {:?}", other),
        }
    }

    #[test]
    fn test_where_or_and_operators() {
        let w = Where::from_value(&json!({"or": [{"countryId": {"inq": [1, 2]}}, {"name": {"like": "A%"}}]}))
            .unwrap();
        assert_eq!(
            w,
            Where::Or(vec![
                Where::inq("countryId", [1, 2]),
                Where::Field {
                    field: "name".to_string(),
                    op: Condition::Like("A%".to_string())
                },
            ])
        );
    }

    #[test]
    fn test_where_rejects_unknown_operator() {
        let err = Where::from_value(&json!({"name": {"regexp": "^A"}})).unwrap_err();
        assert!(matches!(err, FilterError::Invalid(_)));
    }

    #[test]
    fn test_between_requires_two_values() {
        assert!(Where::from_value(&json!({"countryId": {"between": [1]}})).is_err());
        assert!(Where::from_value(&json!({"countryId": {"between": [1, 4]}})).is_ok());
    }

    #[test]
    fn test_resolve_coerces_integer_strings() {
        let w = Where::from_value(&json!({"countryId": {"inq": ["5", 6]}}))
            .unwrap()
            .resolve(COLUMNS, "Country")
            .unwrap();
        assert_eq!(w, Where::inq("countryId", [5, 6]));
    }

    #[test]
    fn test_resolve_rejects_unknown_field() {
        let err = Where::eq("population", 3)
            .resolve(COLUMNS, "Country")
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownField {
                field: "population".to_string(),
                resource: "Country"
            }
        );
    }

    #[test]
    fn test_resolve_rejects_json_columns_and_bad_uuid() {
        assert!(matches!(
            Where::eq("translations", "x").resolve(COLUMNS, "Country"),
            Err(FilterError::NotFilterable(_))
        ));
        assert!(matches!(
            Where::eq("id", "not-a-uuid").resolve(COLUMNS, "Country"),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_like_only_on_text() {
        let w = Where::Field {
            field: "countryId".to_string(),
            op: Condition::Like("1%".to_string()),
        };
        assert!(w.resolve(COLUMNS, "Country").is_err());
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert!(Filter::parse(Some(r#"{"limit": -1}"#)).is_err());
        assert!(Filter::parse(Some(r#"{"skip": "abc"}"#)).is_err());
    }

    #[test]
    fn test_order_string_form_and_bad_direction() {
        let filter = Filter::parse(Some(r#"{"order": "name desc"}"#)).unwrap();
        assert_eq!(filter.order, vec![OrderBy::desc("name")]);
        assert!(Filter::parse(Some(r#"{"order": "name sideways"}"#)).is_err());
    }

    #[test]
    fn test_capped_limit() {
        assert_eq!(Filter::default().capped(200).limit, Some(200));
        let filter = Filter {
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(filter.clone().capped(200).limit, Some(20));
        let filter = Filter {
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(filter.capped(200).limit, Some(200));
    }

    #[test]
    fn test_scoped_filter_keeps_caller_predicate() {
        let filter = Filter {
            where_clause: Some(Where::eq("name", "Austin")),
            ..Default::default()
        }
        .scoped(Where::eq("countryId", 7));

        assert_eq!(
            filter.where_clause,
            Some(Where::And(vec![
                Where::eq("countryId", 7),
                Where::eq("name", "Austin")
            ]))
        );
    }

    #[test]
    fn test_fields_projection() {
        let fields = Fields::from_value(&json!({"name": true, "iso2": true, "iso3": false})).unwrap();
        let projected = fields.project(json!({"id": "x", "name": "Peru", "iso2": "PE", "iso3": "PER"}));
        assert_eq!(projected, json!({"name": "Peru", "iso2": "PE"}));

        let exclude_only = Fields::from_value(&json!({"iso3": false})).unwrap();
        let projected = exclude_only.project(json!({"name": "Peru", "iso3": "PER"}));
        assert_eq!(projected, json!({"name": "Peru"}));
    }

    #[test]
    fn test_fields_validated_on_resolve() {
        let filter = Filter::parse(Some(r#"{"fields": ["name", "bogus"]}"#)).unwrap();
        assert!(filter.resolve(COLUMNS, "Country").is_err());
    }

    #[test]
    fn test_parse_where_param() {
        assert_eq!(parse_where(None).unwrap(), None);
        assert_eq!(
            parse_where(Some(r#"{"countryId": 3}"#)).unwrap(),
            Some(Where::eq("countryId", 3))
        );
        assert!(matches!(
            parse_where(Some("{oops")),
            Err(FilterError::Json(_))
        ));
    }
}
