use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use geonames_importer::jsonl::JsonLinesWriter;
use geonames_importer::transport::HttpFetcher;
use geonames_importer::tsv::writer::TsvWriter;
use geonames_importer::{ImportSource, Importer, RecordConsumer};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory that receives the temporary download.
    ///
    /// Nothing is left behind in it once the import ends.
    #[arg(long, short = 'd', value_hint = ValueHint::DirPath, default_value_os_t = std::env::temp_dir())]
    download_dir: PathBuf,

    /// Mirror of the GeoNames dump directory to download from.
    #[arg(long, value_hint = ValueHint::Url)]
    base_url: Option<String>,

    /// Give up on a download after this many seconds.
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// How records are written to stdout.
    #[arg(long, value_enum, default_value_t = Format::Tsv)]
    format: Format,

    #[command(subcommand)]
    dataset: Dataset,
}

#[derive(Subcommand, Debug)]
enum Dataset {
    /// The country info table (countryInfo.txt).
    Countries,

    /// A city dump such as cities15000.zip or a per-country archive like AD.zip.
    Cities {
        archive: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    /// Tab-separated values with a header row.
    Tsv,
    /// One JSON object per line.
    Jsonl,
}

fn import<C: RecordConsumer>(cli: &Cli, consumer: C) -> Result<C, anyhow::Error> {
    let mut source = match &cli.dataset {
        Dataset::Countries => ImportSource::countries(),
        Dataset::Cities { archive } => ImportSource::cities(archive)?,
    };
    if let Some(base_url) = &cli.base_url {
        source = source.with_base_url(base_url);
    }
    let fetcher = HttpFetcher::builder().timeout(Duration::from_secs(cli.timeout)).build()?;

    let mut importer = Importer::try_new(source, &cli.download_dir, consumer)?.with_fetcher(fetcher);
    let summary = importer.process().context("import failed")?;
    tracing::info!(records = summary.records, dropped = summary.dropped, "import finished");
    Ok(importer.into_consumer())
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let output = io::stdout().lock();

    match cli.format {
        Format::Tsv => import(&cli, TsvWriter::new(output))?.flush()?,
        Format::Jsonl => import(&cli, JsonLinesWriter::new(output))?.flush()?,
    }
    Ok(())
}
