use crate::consumer::{ConsumerError, RecordConsumer};
use crate::record::Record;
use crate::tsv::TsvResult;
use std::io;

/// Writes records as tab-separated rows, preceded by a header row taken from the first record.
pub struct TsvWriter<W>
where
    W: io::Write,
{
    writer: csv::Writer<W>,
    wrote_header: bool,
}

impl<W> TsvWriter<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        Self { writer, wrote_header: false }
    }

    pub fn write(&mut self, record: &Record) -> TsvResult<()> {
        if !self.wrote_header {
            self.writer.write_record(record.schema().names())?;
            self.wrote_header = true;
        }
        Ok(self.writer.write_record(record.values())?)
    }

    pub fn flush(&mut self) -> TsvResult<()> {
        Ok(self.writer.flush()?)
    }
}

impl<W> RecordConsumer for TsvWriter<W>
where
    W: io::Write,
{
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError> {
        Ok(self.write(&record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ColumnSchema;

    #[test]
    fn header_is_written_once() {
        let schema = ColumnSchema::try_new(["ISO", "Country"]).unwrap();
        let records = [
            Record::new(schema.clone(), vec!["AD".into(), "Andorra".into()]).unwrap(),
            Record::new(schema, vec!["AE".into(), "United Arab Emirates".into()]).unwrap(),
        ];
        let expected = [
            "ISO\tCountry",
            "AD\tAndorra",
            "AE\tUnited Arab Emirates",
        ].join("\n");

        let mut output = Vec::new();
        let result = {
            let mut writer = TsvWriter::new(&mut output);
            records.into_iter().try_for_each(|record| writer.accept(record)).and_then(|_| Ok(writer.flush()?))
        };
        let output = String::from_utf8(output).expect("Failed to convert output into string");

        assert!(result.is_ok(), "Expected writing records to succeed: {:?}", result);
        assert_eq!(output.trim(), expected.trim(), "unexpected tsv output");
    }
}
