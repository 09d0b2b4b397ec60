//! Turns raw rows into [`Record`]s.
//!
//! A [`RowValidator`] is in one of two states. With a declared schema it starts out
//! [`SchemaState::Fixed`]. Otherwise it starts [`SchemaState::AwaitingSchema`] and moves to
//! `Fixed` exactly once, on the first header-candidate row: a row with the expected number of
//! fields, none of them blank. Until then every row is dropped.

use crate::dataset::SchemaPolicy;
use crate::record::{ColumnSchema, Record};
use csv::StringRecord;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    AwaitingSchema { expected_columns: usize },
    Fixed { columns: ColumnSchema, expected_columns: usize },
}

/// The verdict on a single raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The row was adopted as the column schema. It is not data.
    Header(ColumnSchema),

    /// The row was admitted.
    Record(Record),

    /// The row was rejected.
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No schema is known yet and the row does not qualify as a header.
    NoSchema,

    /// The number of fields differs from the schema.
    FieldCount { expected: usize, actual: usize },
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::NoSchema => write!(f, "row precedes the header row"),
            DropReason::FieldCount { expected, actual } => {
                write!(f, "expected {} fields, found {}", expected, actual)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowValidator {
    state: SchemaState,
}

impl RowValidator {
    pub fn new(policy: &SchemaPolicy) -> Self {
        let state = match policy {
            SchemaPolicy::Fixed { columns, expected_columns } => SchemaState::Fixed {
                columns: columns.clone(),
                expected_columns: *expected_columns,
            },
            SchemaPolicy::Discover { expected_columns } => SchemaState::AwaitingSchema {
                expected_columns: *expected_columns,
            },
        };
        Self { state }
    }

    pub fn state(&self) -> &SchemaState {
        &self.state
    }

    /// The active schema, once one is known.
    pub fn schema(&self) -> Option<&ColumnSchema> {
        match &self.state {
            SchemaState::Fixed { columns, .. } => Some(columns),
            SchemaState::AwaitingSchema { .. } => None,
        }
    }

    pub fn admit(&mut self, row: &StringRecord) -> Admission {
        match &self.state {
            SchemaState::AwaitingSchema { expected_columns } => {
                let expected_columns = *expected_columns;
                if !is_header_candidate(row, expected_columns) {
                    return Admission::Dropped(DropReason::NoSchema);
                }
                let columns = ColumnSchema::from_header(row.iter());
                self.state = SchemaState::Fixed { columns: columns.clone(), expected_columns };
                Admission::Header(columns)
            }
            SchemaState::Fixed { columns, expected_columns } => {
                if row.len() != columns.len() || row.len() != *expected_columns {
                    return Admission::Dropped(DropReason::FieldCount {
                        expected: columns.len(),
                        actual: row.len(),
                    });
                }
                let values = row.iter().map(str::to_owned).collect();
                match Record::new(columns.clone(), values) {
                    Some(record) => Admission::Record(record),
                    None => Admission::Dropped(DropReason::FieldCount {
                        expected: columns.len(),
                        actual: row.len(),
                    }),
                }
            }
        }
    }
}

fn is_header_candidate(row: &StringRecord, expected_columns: usize) -> bool {
    row.len() == expected_columns && row.iter().all(|field| !field.trim().is_empty())
}
