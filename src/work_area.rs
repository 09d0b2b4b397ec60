use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir, TempPath};
use tracing::{debug, warn};

const PREFIX: &str = "geonames-";

/// The temporary files owned by one import run.
///
/// All names are random, so any number of runs can share the same parent directory. Everything is
/// removed by [`WorkArea::cleanup`], or when the work area is dropped.
#[derive(Debug)]
pub struct WorkArea {
    parent: PathBuf,
    download_path: PathBuf,
    download: Option<TempPath>,
    extraction: Option<TempDir>,
}

impl WorkArea {
    /// Reserves a download file in `parent` whose name ends with `download_suffix`.
    pub fn create(parent: &Path, download_suffix: &str) -> io::Result<Self> {
        let download = Builder::new()
            .prefix(PREFIX)
            .suffix(download_suffix)
            .tempfile_in(parent)?
            .into_temp_path();
        debug!(download = %download.display(), "work area created");
        Ok(Self {
            parent: parent.to_path_buf(),
            download_path: download.to_path_buf(),
            download: Some(download),
            extraction: None,
        })
    }

    /// Path the downloaded artifact is written to.
    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Directory archive members are extracted into. Created on first use.
    pub fn extraction_dir(&mut self) -> io::Result<&Path> {
        let extraction = match self.extraction.take() {
            Some(extraction) => extraction,
            None => Builder::new().prefix(PREFIX).tempdir_in(&self.parent)?,
        };
        Ok(self.extraction.insert(extraction).path())
    }

    /// Whether the work area no longer owns any files.
    pub fn is_clean(&self) -> bool {
        self.download.is_none() && self.extraction.is_none()
    }

    /// Deletes the downloaded artifact and the extraction directory with everything in it.
    ///
    /// Returns `false` if something could not be removed. Calling this more than once is harmless.
    /// Failures are logged, never returned.
    pub fn cleanup(&mut self) -> bool {
        let mut removed = true;
        if let Some(download) = self.download.take() {
            if let Err(err) = download.close().or_else(ignore_missing) {
                warn!(path = %self.download_path.display(), error = %err, "unable to remove downloaded file");
                removed = false;
            }
        }
        if let Some(extraction) = self.extraction.take() {
            let path = extraction.path().to_path_buf();
            if let Err(err) = extraction.close().or_else(ignore_missing) {
                warn!(path = %path.display(), error = %err, "unable to remove extraction directory");
                removed = false;
            }
        }
        removed
    }
}

fn ignore_missing(err: io::Error) -> io::Result<()> {
    match err.kind() {
        io::ErrorKind::NotFound => Ok(()),
        _ => Err(err),
    }
}

impl Drop for WorkArea {
    fn drop(&mut self) {
        self.cleanup();
    }
}
