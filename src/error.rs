use crate::archive::ArchiveError;
use crate::consumer::ConsumerError;
use crate::record::SchemaError;
use crate::transport::TransportError;
use crate::tsv::TsvError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems detected while an importer is being set up, before any I/O takes place.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("download directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("download path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("an archive name is required")]
    MissingArchiveName,

    #[error("invalid archive name: {0}")]
    InvalidArchiveName(String),

    #[error("an archive member name is required")]
    MissingArchiveMember,

    #[error("invalid column schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("unable to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons an import run was aborted.
///
/// Every variant is reported only after the run's temporary files have been removed.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The dataset could not be downloaded.
    #[error("download failed: {0}")]
    Transport(#[from] TransportError),

    /// The downloaded archive could not be opened or did not yield the expected member.
    #[error("extraction failed: {0}")]
    Archive(#[from] ArchiveError),

    /// The extracted file could not be read.
    #[error("reading records failed: {0}")]
    Read(#[from] TsvError),

    /// The temporary download location could not be prepared.
    #[error("unable to prepare work area: {0}")]
    WorkArea(#[source] io::Error),

    /// The record consumer refused a record.
    #[error("record consumer failed: {0}")]
    Consumer(#[source] ConsumerError),
}

pub type ImportResult<T> = Result<T, ImportError>;
