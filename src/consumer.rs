use crate::record::Record;
use std::error::Error;
use std::sync::mpsc::Sender;

/// Error type returned by a [`RecordConsumer`] that refuses a record.
pub type ConsumerError = Box<dyn Error + Send + Sync>;

/// Receives the records of an import run, one at a time and in file order.
///
/// Returning an error aborts the run; the error is handed back to the caller of
/// [`Importer::process`](crate::importer::Importer::process).
pub trait RecordConsumer {
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError>;
}

impl<F> RecordConsumer for F
where
    F: FnMut(Record) -> Result<(), ConsumerError>,
{
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError> {
        self(record)
    }
}

/// Collects every record in memory.
impl RecordConsumer for Vec<Record> {
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError> {
        self.push(record);
        Ok(())
    }
}

/// Hands records to another thread. Fails once the receiving end is gone.
impl RecordConsumer for Sender<Record> {
    fn accept(&mut self, record: Record) -> Result<(), ConsumerError> {
        self.send(record).map_err(|_| "record receiver disconnected".into())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsumerError, RecordConsumer};
    use crate::record::{ColumnSchema, Record};
    use std::sync::mpsc;

    fn record(id: &str) -> Record {
        let schema = ColumnSchema::try_new(["geonameid"]).unwrap();
        Record::new(schema, vec![id.into()]).unwrap()
    }

    #[test]
    fn closures_are_consumers() {
        let mut ids = Vec::new();
        let mut consumer = |record: Record| -> Result<(), ConsumerError> {
            ids.push(record.get("geonameid").unwrap_or_default().to_owned());
            Ok(())
        };
        consumer.accept(record("1")).unwrap();
        consumer.accept(record("2")).unwrap();
        assert_eq!(ids, ["1", "2"], "closure did not see both records");
    }

    #[test]
    fn channel_consumer_fails_without_receiver() {
        let (mut sender, receiver) = mpsc::channel();
        sender.accept(record("1")).unwrap();
        assert_eq!(receiver.recv().unwrap(), record("1"), "record not delivered");
        drop(receiver);
        assert!(sender.accept(record("2")).is_err(), "send to closed channel succeeded");
    }
}
