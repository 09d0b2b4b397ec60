use crate::error::{ConfigError, ConfigResult};
use crate::record::ColumnSchema;
use std::path::Path;

/// Where the GeoNames dumps are published.
pub const DEFAULT_BASE_URL: &str = "http://download.geonames.org/export/dump/";

/// File name of the country info dump below [`DEFAULT_BASE_URL`].
pub const COUNTRY_INFO_FILE: &str = "countryInfo.txt";

/// Number of columns in both the city and the country dumps.
pub const COLUMNS_COUNT: usize = 19;

/// Columns of the `geoname` table the city dumps are exported from.
pub const CITY_COLUMNS: [&str; COLUMNS_COUNT] = [
    "geonameid",
    "name",
    "asciiname",
    "alternatenames",
    "latitude",
    "longitude",
    "feature_class",
    "feature_code",
    "country_code",
    "cc2",
    "admin1_code",
    "admin2_code",
    "admin3_code",
    "admin4_code",
    "population",
    "elevation",
    "dem",
    "timezone",
    "modification_date",
];

/// Separator, quote and escape bytes of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormat {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: u8,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self { delimiter: b'\t', quote: b'"', escape: b'\\' }
    }
}

/// How the column names of a dataset are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Column names are known in advance. Only rows with exactly `expected_columns` fields that
    /// also match the schema length are admitted.
    Fixed {
        columns: ColumnSchema,
        expected_columns: usize,
    },

    /// Column names are taken from the first row with `expected_columns` non-blank fields.
    Discover {
        expected_columns: usize,
    },
}

impl SchemaPolicy {
    pub fn expected_columns(&self) -> usize {
        match self {
            SchemaPolicy::Fixed { expected_columns, .. } => *expected_columns,
            SchemaPolicy::Discover { expected_columns } => *expected_columns,
        }
    }
}

/// Everything needed to retrieve and interpret one remote dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    url: String,
    archive_member: Option<String>,
    format: RecordFormat,
    schema: SchemaPolicy,
}

impl ImportSource {
    /// A plain delimited file served at `url`.
    pub fn plain(url: impl Into<String>, schema: SchemaPolicy) -> Self {
        Self { url: url.into(), archive_member: None, format: RecordFormat::default(), schema }
    }

    /// A zip archive served at `url` whose member `member` holds the records.
    pub fn zipped(url: impl Into<String>, member: impl Into<String>, schema: SchemaPolicy) -> ConfigResult<Self> {
        let member = member.into();
        if member.trim().is_empty() {
            return Err(ConfigError::MissingArchiveMember);
        }
        Ok(Self { url: url.into(), archive_member: Some(member), format: RecordFormat::default(), schema })
    }

    /// The GeoNames country info table. Its column names are read from the header row.
    pub fn countries() -> Self {
        Self::plain(
            format!("{DEFAULT_BASE_URL}{COUNTRY_INFO_FILE}"),
            SchemaPolicy::Discover { expected_columns: COLUMNS_COUNT },
        )
    }

    /// A GeoNames city dump such as `cities15000.zip` or `AD.zip`.
    ///
    /// The archive is expected to contain a member named after the archive with a `.txt`
    /// extension, e.g. `cities15000.txt`.
    pub fn cities(archive_name: &str) -> ConfigResult<Self> {
        let archive_name = archive_name.trim();
        if archive_name.is_empty() {
            return Err(ConfigError::MissingArchiveName);
        }
        let stem = Path::new(archive_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !archive_name.contains('/') && !stem.is_empty())
            .ok_or_else(|| ConfigError::InvalidArchiveName(archive_name.to_owned()))?;
        let columns = ColumnSchema::try_new(CITY_COLUMNS)?;
        Self::zipped(
            format!("{DEFAULT_BASE_URL}{archive_name}"),
            format!("{stem}.txt"),
            SchemaPolicy::Fixed { columns, expected_columns: COLUMNS_COUNT },
        )
    }

    /// Resolves the dataset file name against another mirror of the dump directory.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let file = self.url.rsplit('/').next().unwrap_or_default().to_owned();
        self.url = format!("{}/{}", base_url.trim_end_matches('/'), file);
        self
    }

    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Name of the archive member holding the records, or `None` for plain sources.
    pub fn archive_member(&self) -> Option<&str> {
        self.archive_member.as_deref()
    }

    pub fn is_archive(&self) -> bool {
        self.archive_member.is_some()
    }

    pub fn format(&self) -> &RecordFormat {
        &self.format
    }

    pub fn schema(&self) -> &SchemaPolicy {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_source_derives_url_and_member() {
        let source = ImportSource::cities("cities15000.zip").unwrap();
        assert_eq!(source.url(), "http://download.geonames.org/export/dump/cities15000.zip", "wrong url");
        assert_eq!(source.archive_member(), Some("cities15000.txt"), "wrong member");
        assert_eq!(source.schema().expected_columns(), 19, "wrong column count");
    }

    #[test]
    fn country_source_discovers_its_schema() {
        let source = ImportSource::countries();
        assert!(!source.is_archive(), "country info is a plain file");
        assert_eq!(source.schema(), &SchemaPolicy::Discover { expected_columns: 19 }, "wrong policy");
    }

    #[test]
    fn blank_archive_name_is_rejected() {
        assert!(
            matches!(ImportSource::cities("  "), Err(ConfigError::MissingArchiveName)),
            "blank archive name accepted",
        );
        assert!(
            matches!(ImportSource::cities("../x/AD.zip"), Err(ConfigError::InvalidArchiveName(_))),
            "path traversal accepted",
        );
    }

    #[test]
    fn base_url_is_replaced() {
        let source = ImportSource::cities("AD.zip").unwrap().with_base_url("http://mirror.local/dump/");
        assert_eq!(source.url(), "http://mirror.local/dump/AD.zip", "base url not applied");
        assert_eq!(source.archive_member(), Some("AD.txt"), "member changed with base url");
    }
}
