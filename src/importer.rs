use crate::archive;
use crate::consumer::RecordConsumer;
use crate::dataset::ImportSource;
use crate::error::{ConfigError, ConfigResult, ImportError, ImportResult};
use crate::record::ColumnSchema;
use crate::schema::{Admission, RowValidator};
use crate::transport::{Fetcher, HttpFetcher};
use crate::tsv::reader::TsvReader;
use crate::work_area::WorkArea;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

/// What a completed import run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records handed to the consumer.
    pub records: u64,

    /// Rows that were read but not admitted, header row excluded.
    pub dropped: u64,

    /// The schema records were keyed by. `None` if no header row was ever found, in which case
    /// no records were produced.
    pub schema: Option<ColumnSchema>,
}

/// Downloads one dataset and streams its records into a [`RecordConsumer`].
pub struct Importer<C, F = HttpFetcher> {
    source: ImportSource,
    download_dir: PathBuf,
    consumer: C,
    fetcher: F,
}

impl<C> Importer<C, HttpFetcher>
where
    C: RecordConsumer,
{
    /// Sets up an import of `source`, using `download_dir` for temporary files.
    ///
    /// Fails if `download_dir` is not an existing directory. No I/O beyond that check happens
    /// until [`process`](Self::process) is called.
    pub fn try_new(source: ImportSource, download_dir: impl Into<PathBuf>, consumer: C) -> ConfigResult<Self> {
        let download_dir = download_dir.into();
        check_download_dir(&download_dir)?;
        Ok(Self { source, download_dir, consumer, fetcher: HttpFetcher::try_new()? })
    }

    /// Imports the GeoNames country info table.
    pub fn countries(download_dir: impl Into<PathBuf>, consumer: C) -> ConfigResult<Self> {
        Self::try_new(ImportSource::countries(), download_dir, consumer)
    }

    /// Imports the GeoNames city dump `archive_name`, e.g. `cities15000.zip`.
    pub fn cities(download_dir: impl Into<PathBuf>, archive_name: &str, consumer: C) -> ConfigResult<Self> {
        Self::try_new(ImportSource::cities(archive_name)?, download_dir, consumer)
    }
}

impl<C, F> Importer<C, F>
where
    C: RecordConsumer,
    F: Fetcher,
{
    /// Replaces the transport used to download the dataset.
    pub fn with_fetcher<G: Fetcher>(self, fetcher: G) -> Importer<C, G> {
        Importer { source: self.source, download_dir: self.download_dir, consumer: self.consumer, fetcher }
    }

    pub fn source(&self) -> &ImportSource {
        &self.source
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }

    /// Runs the import once: download, extract if the source is an archive, then parse and hand
    /// every admitted record to the consumer.
    ///
    /// Temporary files are removed before this returns, whatever the outcome. A failed download
    /// skips extraction and parsing; a failed extraction skips parsing.
    pub fn process(&mut self) -> ImportResult<ImportSummary> {
        let suffix = if self.source.is_archive() { ".zip" } else { ".txt" };
        let mut work_area = WorkArea::create(&self.download_dir, suffix).map_err(ImportError::WorkArea)?;

        let result = self.run(&mut work_area);

        if work_area.cleanup() {
            info!("temporary files removed");
        } else {
            warn!(dir = %self.download_dir.display(), "temporary files left behind");
        }
        result
    }

    fn run(&mut self, work_area: &mut WorkArea) -> ImportResult<ImportSummary> {
        let url = self.source.url();
        info!(url, "downloading");
        match self.fetcher.fetch(url, work_area.download_path()) {
            Ok(bytes) => info!(url, bytes, "download done"),
            Err(err) => {
                error!(url, error = %err, "download failed");
                return Err(err.into());
            }
        }

        let data_path = match self.source.archive_member() {
            None => work_area.download_path().to_path_buf(),
            Some(member) => {
                let archive_path = work_area.download_path().to_path_buf();
                let extraction_dir = work_area.extraction_dir().map_err(ImportError::WorkArea)?;
                archive::extract(&archive_path, member, extraction_dir).map_err(|err| {
                    error!(member, error = %err, "extraction failed");
                    ImportError::from(err)
                })?
            }
        };

        info!(path = %data_path.display(), "parsing");
        let summary = self.dispatch(&data_path)?;
        info!(records = summary.records, dropped = summary.dropped, "parsing done");
        Ok(summary)
    }

    fn dispatch(&mut self, path: &Path) -> ImportResult<ImportSummary> {
        let mut reader = TsvReader::open(path, self.source.format())?;
        let mut validator = RowValidator::new(self.source.schema());
        let mut summary = ImportSummary::default();

        for row in reader.rows() {
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_row_error() => {
                    debug!(error = %err, "unreadable row skipped");
                    summary.dropped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match validator.admit(&row) {
                Admission::Header(columns) => debug!(%columns, "column schema discovered"),
                Admission::Record(record) => {
                    self.consumer.accept(record).map_err(ImportError::Consumer)?;
                    summary.records += 1;
                }
                Admission::Dropped(reason) => {
                    trace!(line = row.position().map(|position| position.line()), %reason, "row dropped");
                    summary.dropped += 1;
                }
            }
        }

        summary.schema = validator.schema().cloned();
        if summary.schema.is_none() {
            warn!("no header row found, nothing was imported");
        }
        Ok(summary)
    }
}

fn check_download_dir(path: &Path) -> ConfigResult<()> {
    match path.metadata() {
        Err(_) => Err(ConfigError::MissingDirectory(path.to_path_buf())),
        Ok(metadata) if !metadata.is_dir() => Err(ConfigError::NotADirectory(path.to_path_buf())),
        Ok(_) => Ok(()),
    }
}
