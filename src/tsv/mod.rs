pub mod reader;
pub mod writer;

use std::io;
use thiserror::Error;

pub type TsvResult<T> = Result<T, TsvError>;

#[derive(Error, Debug)]
pub enum TsvError {
    #[error("error processing tsv: {0}")]
    Csv(#[from] csv::Error),

    #[error("error processing tsv: {0}")]
    Io(#[from] io::Error),

    #[error("unreadable row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl TsvError {
    /// Whether reading can continue with the next row after this error.
    ///
    /// Only a row that fails to decode is skippable; I/O failures end the stream.
    pub fn is_row_error(&self) -> bool {
        matches!(self, TsvError::Row { .. })
    }
}
