// #![deny(clippy::missing_errors_doc)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::missing_assert_message)]

//! Imports the GeoNames country and city dumps.
//!
//! An [`Importer`] downloads one dataset into a temporary file, unpacks it if it is a zip archive,
//! reads it row by row and hands every well-formed row to a [`RecordConsumer`] as a [`Record`].
//! Temporary files are removed when the run ends, successful or not.
//!
//! ```no_run
//! use geonames_importer::{ConsumerError, Importer, Record};
//!
//! let consumer = |city: Record| -> Result<(), ConsumerError> {
//!     println!("{}", city.get("name").unwrap_or_default());
//!     Ok(())
//! };
//! let mut importer = Importer::cities(std::env::temp_dir(), "cities15000.zip", consumer)?;
//! let summary = importer.process()?;
//! println!("imported {} cities", summary.records);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod consumer;
pub mod dataset;
pub mod error;
pub mod importer;
pub mod jsonl;
pub mod record;
pub mod schema;
pub mod transport;
pub mod tsv;
pub mod work_area;

pub use consumer::{ConsumerError, RecordConsumer};
pub use dataset::ImportSource;
pub use error::{ConfigError, ImportError};
pub use importer::{ImportSummary, Importer};
pub use record::{ColumnSchema, Record};
