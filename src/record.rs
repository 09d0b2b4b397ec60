use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("a column schema needs at least one column")]
    Empty,

    #[error("column {0} has a blank name")]
    BlankColumn(usize),

    #[error("column name '{0}' appears more than once")]
    DuplicateColumn(String),
}

/// The ordered column names every [`Record`] of an import run is keyed by.
///
/// A schema is either declared up front (see [`ColumnSchema::try_new`]) or adopted from the first
/// header row of a dataset. It is cheap to clone: all records of a run share the same names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema(Arc<[String]>);

impl ColumnSchema {
    /// Builds a declared schema. Names must be non-blank and unique.
    pub fn try_new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(SchemaError::BlankColumn(position));
            }
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self(columns.into()))
    }

    /// Adopts the values of a header row verbatim.
    ///
    /// The caller has already checked that every value is non-blank.
    pub(crate) fn from_header<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item=&'a str>,
    {
        Self(values.into_iter().map(str::to_owned).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.0.iter().position(|name| name == column)
    }
}

impl Display for ColumnSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// One admitted row: raw string values keyed by the columns of the active [`ColumnSchema`].
///
/// Values are kept exactly as read, without trimming or type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: ColumnSchema,
    values: Vec<String>,
}

impl Record {
    /// Pairs `values` positionally with `schema`; `None` if the lengths differ.
    pub fn new(schema: ColumnSchema, values: Vec<String>) -> Option<Self> {
        (schema.len() == values.len()).then_some(Self { schema, values })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Returns the value of `column`, if the schema has such a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema.position(column).and_then(|i| self.values.get(i)).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterates over `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.schema.names().iter().map(String::as_str).zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
