use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("unable to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("archive has no member named '{0}'")]
    MemberNotFound(String),

    #[error("archive member name '{0}' has no file name")]
    InvalidMember(String),

    #[error("unable to extract to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("extracted file {0} is missing")]
    Missing(PathBuf),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Extracts the single member `member` of the zip file at `archive` into `destination_dir`.
///
/// The extracted file keeps the base name of the member. Returns its path.
pub fn extract(archive: &Path, member: &str, destination_dir: &Path) -> ArchiveResult<PathBuf> {
    let open_error = |source: ZipError| ArchiveError::Open { path: archive.to_path_buf(), source };

    let file = File::open(archive).map_err(|err| open_error(ZipError::Io(err)))?;
    let mut zip = ZipArchive::new(file).map_err(open_error)?;
    let mut entry = match zip.by_name(member) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(ArchiveError::MemberNotFound(member.to_owned())),
        Err(err) => return Err(open_error(err)),
    };

    let file_name = Path::new(member)
        .file_name()
        .ok_or_else(|| ArchiveError::InvalidMember(member.to_owned()))?;
    let target = destination_dir.join(file_name);
    let write_error = |source: io::Error| ArchiveError::Write { path: target.clone(), source };

    let mut output = BufWriter::new(File::create(&target).map_err(write_error)?);
    let written = io::copy(&mut entry, &mut output).map_err(write_error)?;
    output.flush().map_err(write_error)?;
    drop(output);
    debug!(member, target = %target.display(), bytes = written, "archive member extracted");

    if target.is_file() {
        Ok(target)
    } else {
        Err(ArchiveError::Missing(target))
    }
}
