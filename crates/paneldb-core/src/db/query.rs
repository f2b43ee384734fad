use crate::{
    sanitize::{SEARCH_QUERY_MAX_LEN, is_valid_column_name, sanitize_search_query},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// QueryError
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum QueryError {
    #[error("invalid column identifier: '{0}'")]
    InvalidIdentifier(String),
}

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

///
/// SelectQuery
///
/// Parameterized select fragment handed to the connector. Conditions carry
/// `?` placeholders; `params` line up positionally. Values are always
/// bound, never interpolated; every identifier spliced into the text has
/// passed `is_valid_column_name`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub conditions: Vec<String>,
    pub params: Vec<Value>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    /// Combined `WHERE` fragment, `None` when unfiltered.
    #[must_use]
    pub fn where_clause(&self) -> Option<String> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(self.conditions.join(" AND "))
        }
    }
}

///
/// QueryBuilder
///
/// Assembles a `SelectQuery`, rejecting any dynamic identifier that fails
/// validation before it can reach a connector.
///

#[derive(Clone, Debug)]
pub struct QueryBuilder {
    query: SelectQuery,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            query: SelectQuery {
                table: table.into(),
                conditions: Vec::new(),
                params: Vec::new(),
                order_by: None,
                limit: None,
                offset: None,
            },
        }
    }

    /// Equality condition with a bound parameter.
    pub fn filter_eq(mut self, column: &str, value: Value) -> Result<Self, QueryError> {
        checked(column)?;
        self.query.conditions.push(format!("{column} = ?"));
        self.query.params.push(value);

        Ok(self)
    }

    /// Free-text search across `columns`, OR-combined.
    ///
    /// The term is wildcard-escaped and wrapped in `%` delimiters, then
    /// bound as a parameter per column. A term that sanitizes to empty
    /// adds no condition.
    pub fn search(mut self, columns: &[&str], term: &str) -> Result<Self, QueryError> {
        for column in columns {
            checked(column)?;
        }

        let escaped = sanitize_search_query(term, SEARCH_QUERY_MAX_LEN);
        if escaped.is_empty() || columns.is_empty() {
            return Ok(self);
        }

        let clause = columns
            .iter()
            .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.query.conditions.push(format!("({clause})"));
        for _ in columns {
            self.query.params.push(Value::Text(format!("%{escaped}%")));
        }

        Ok(self)
    }

    /// Sort by a caller-chosen column (validated).
    pub fn order_by(mut self, column: &str, direction: Direction) -> Result<Self, QueryError> {
        checked(column)?;
        self.query.order_by = Some((column.to_string(), direction));

        Ok(self)
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn build(self) -> SelectQuery {
        self.query
    }
}

fn checked(column: &str) -> Result<(), QueryError> {
    if is_valid_column_name(column) {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_bind_values_as_params() {
        let query = QueryBuilder::new("customers")
            .filter_eq("tier", Value::Text("gold".into()))
            .unwrap()
            .filter_eq("active", Value::Bool(true))
            .unwrap()
            .build();

        assert_eq!(query.conditions, ["tier = ?", "active = ?"]);
        assert_eq!(
            query.params,
            [Value::Text("gold".into()), Value::Bool(true)]
        );
        assert_eq!(query.where_clause().unwrap(), "tier = ? AND active = ?");
    }

    #[test]
    fn invalid_identifiers_never_reach_the_fragment() {
        let err = QueryBuilder::new("customers")
            .filter_eq("tier; drop table", Value::Null)
            .unwrap_err();
        assert_eq!(err, QueryError::InvalidIdentifier("tier; drop table".into()));

        let err = QueryBuilder::new("customers")
            .order_by("1col", Direction::Ascending)
            .unwrap_err();
        assert_eq!(err, QueryError::InvalidIdentifier("1col".into()));
    }

    #[test]
    fn search_terms_are_escaped_and_bound() {
        let query = QueryBuilder::new("customers")
            .search(&["name", "email"], "admin%' OR '1'='1")
            .unwrap()
            .build();

        assert_eq!(
            query.conditions,
            ["(name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')"]
        );
        let expected = Value::Text("%admin\\%' OR '1'='1%".into());
        assert_eq!(query.params, [expected.clone(), expected]);
    }

    #[test]
    fn blank_search_terms_add_no_condition() {
        let query = QueryBuilder::new("customers")
            .search(&["name"], "   ")
            .unwrap()
            .build();

        assert!(query.conditions.is_empty());
        assert!(query.params.is_empty());
    }

    #[test]
    fn pagination_and_order_are_carried() {
        let query = QueryBuilder::new("customers")
            .order_by("name", Direction::Descending)
            .unwrap()
            .limit(25)
            .offset(50)
            .build();

        assert_eq!(
            query.order_by,
            Some(("name".to_string(), Direction::Descending))
        );
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.offset, Some(50));
        assert_eq!(Direction::Descending.keyword(), "DESC");
    }
}
