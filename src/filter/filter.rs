use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::SqlResult;

/// Set of top-level `field = value` predicates over a document collection,
/// with optional paging. Results are always in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    where_data: Map<String, Value>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`. A later call for the same field replaces the earlier one.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_data.insert(field.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: i64, offset: Option<i64>) -> Result<Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if let Some(off) = offset {
            if off < 0 {
                return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
            }
        }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn get_limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        for (field, value) in &self.where_data {
            validate_identifier(field).map_err(|_| FilterError::InvalidField(field.clone()))?;
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Err(FilterError::InvalidValue(field.clone()));
            }
        }
        Ok(())
    }

    /// Postgres query over a `(seq, id, doc)` collection table. Scalar JSONB
    /// containment is exact equality, so every predicate folds into one `@>` param.
    pub fn to_sql(&self, collection: &str) -> Result<SqlResult, FilterError> {
        validate_identifier(collection).map_err(|_| FilterError::InvalidCollection(collection.to_string()))?;
        self.validate()?;

        let mut params = Vec::new();
        let where_clause = if self.where_data.is_empty() {
            String::new()
        } else {
            params.push(Value::Object(self.where_data.clone()));
            "WHERE \"doc\" @> $1".to_string()
        };

        let query = [
            "SELECT \"doc\"".to_string(),
            format!("FROM \"{}\"", collection),
            where_clause,
            "ORDER BY \"seq\" ASC".to_string(),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Same predicate semantics as [`Filter::to_sql`], evaluated against an in-memory document.
    pub fn matches(&self, doc: &Value) -> bool {
        self.where_data
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

/// Collection and field names end up quoted inside SQL, so they are kept to `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => (first.is_ascii_alphabetic() || first == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidField(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_selects_everything_in_order() {
        let sql = Filter::new().to_sql("bookings").unwrap();
        assert_eq!(sql.query, "SELECT \"doc\" FROM \"bookings\" ORDER BY \"seq\" ASC");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn predicates_fold_into_one_containment_param() {
        let sql = Filter::new()
            .eq("user_id", "abc")
            .eq("cancelled", false)
            .limit(10, Some(20))
            .unwrap()
            .to_sql("bookings")
            .unwrap();
        assert_eq!(
            sql.query,
            "SELECT \"doc\" FROM \"bookings\" WHERE \"doc\" @> $1 ORDER BY \"seq\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!({"user_id": "abc", "cancelled": false})]);
    }

    #[test]
    fn rejects_bad_identifiers_and_values() {
        assert!(matches!(
            Filter::new().to_sql("rooms; drop table users"),
            Err(FilterError::InvalidCollection(_))
        ));
        assert!(matches!(
            Filter::new().eq("doc\"", 1).to_sql("rooms"),
            Err(FilterError::InvalidField(_))
        ));
        assert!(matches!(
            Filter::new().eq("rooms", json!([1])).to_sql("hotels"),
            Err(FilterError::InvalidValue(_))
        ));
        assert!(Filter::new().limit(-1, None).is_err());
        assert!(Filter::new().limit(1, Some(-1)).is_err());
    }

    #[test]
    fn matches_requires_every_predicate() {
        let doc = json!({"email": "james@foo.com", "is_admin": false, "rating": 4});
        assert!(Filter::new().matches(&doc));
        assert!(Filter::new().eq("email", "james@foo.com").matches(&doc));
        assert!(Filter::new().eq("email", "james@foo.com").eq("is_admin", false).matches(&doc));
        assert!(!Filter::new().eq("email", "james@foo.com").eq("is_admin", true).matches(&doc));
        assert!(!Filter::new().eq("rating", "4").matches(&doc));
        assert!(!Filter::new().eq("missing", Value::Null).matches(&doc));
    }
}
