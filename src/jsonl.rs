use crate::consumer::{ConsumerError, RecordConsumer};
use crate::record::Record;
use std::io::{self, Write};

/// Writes each record as one JSON object per line, keys in column order.
pub struct JsonLinesWriter<W>
where
    W: io::Write,
{
    writer: io::BufWriter<W>,
}

impl<W> JsonLinesWriter<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer: io::BufWriter::new(writer) }
    }

    pub fn write(&mut self, record: &Record) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W> RecordConsumer for JsonLinesWriter<W>
where
    W: io::Write,
{
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError> {
        Ok(self.write(&record)?)
    }
}
