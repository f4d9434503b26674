//! Table models and query result types.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

/// A table that can be created from DDL.
pub trait TableModel {
    /// Name of the table in the `public` schema.
    const TABLE_NAME: &'static str;

    /// Statements that create the table and anything it depends on, in order.
    fn create_statements() -> &'static [&'static str];
}

/// A star rating, stored in `ratings` with ids drawn from `user_id_seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct Rating {
    pub id: Option<i32>,
    pub stars: i32,
}

impl Rating {
    pub fn new(stars: i32) -> Self {
        Self { id: None, stars }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<stars {}>", self.stars)
    }
}

impl TableModel for Rating {
    const TABLE_NAME: &'static str = "ratings";

    fn create_statements() -> &'static [&'static str] {
        &[
            "CREATE SEQUENCE IF NOT EXISTS user_id_seq",
            "CREATE TABLE IF NOT EXISTS ratings (\
                id INTEGER PRIMARY KEY DEFAULT nextval('user_id_seq'), \
                stars INTEGER\
            )",
        ]
    }
}

/// One column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// One row of a raw query, as text, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryRow {
    pub values: Vec<(String, Option<String>)>,
}

impl QueryRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }
}

impl fmt::Display for QueryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (_, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{v}")?,
                None => f.write_str("NULL")?,
            }
        }
        f.write_str(")")
    }
}

impl Serialize for QueryRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in &self.values {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
