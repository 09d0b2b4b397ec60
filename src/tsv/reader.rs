use crate::dataset::RecordFormat;
use crate::tsv::{TsvError, TsvResult};
use csv::{Position, ReaderBuilder, StringRecord, Terminator};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazily reads the rows of a delimited file, one raw field sequence at a time.
///
/// Rows are returned as they appear: no header handling, no trimming, and no requirement that all
/// rows have the same number of fields. Judging a row's shape is left to the caller.
pub struct RowIter<'r, R: 'r> {
    reader: &'r mut TsvReader<R>,
}

impl<'r, R: io::Read> Iterator for RowIter<'r, R> {
    type Item = TsvResult<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

/// Reads a delimited file line by line.
///
/// Every physical line is parsed on its own, so a quote is never carried over a line break: a
/// line with an unbalanced quote yields one malformed row and the next line starts afresh. Blank
/// lines are skipped.
pub struct TsvReader<R> {
    input: BufReader<R>,
    parser: ReaderBuilder,
    line: Vec<u8>,
    next_position: Position,
}

impl TsvReader<File> {
    /// Opens the file at `path`. The handle is closed when the reader is dropped.
    pub fn open(path: &Path, format: &RecordFormat) -> TsvResult<Self> {
        Ok(Self::from_reader(File::open(path)?, format))
    }
}

impl<R> TsvReader<R>
where
    R: io::Read,
{
    pub fn from_reader(reader: R, format: &RecordFormat) -> Self {
        let mut parser = ReaderBuilder::new();
        parser
            .has_headers(false)
            .flexible(true)
            .delimiter(format.delimiter)
            .quote(format.quote)
            .escape(Some(format.escape))
            .terminator(Terminator::Any(b'\n'));
        Self {
            input: BufReader::new(reader),
            parser,
            line: Vec::new(),
            next_position: Position::new(),
        }
    }

    /// Iterates over the remaining rows. Rows already returned are not revisited.
    pub fn rows(&mut self) -> RowIter<'_, R> {
        RowIter { reader: self }
    }

    fn read_row(&mut self) -> TsvResult<Option<StringRecord>> {
        loop {
            self.line.clear();
            let read = self.input.read_until(b'\n', &mut self.line)?;
            if read == 0 {
                return Ok(None);
            }
            let mut position = self.next_position.clone();
            self.next_position
                .set_byte(position.byte() + read as u64)
                .set_line(position.line() + 1);

            let mut record = StringRecord::new();
            let parsed = self
                .parser
                .from_reader(strip_line_end(&self.line))
                .read_record(&mut record)
                .map_err(|source| TsvError::Row { line: position.line(), source })?;
            if !parsed {
                continue;
            }

            position.set_record(self.next_position.record());
            self.next_position.set_record(position.record() + 1);
            record.set_position(Some(position));
            return Ok(Some(record));
        }
    }
}

fn strip_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
