use crate::error::{ConfigError, ConfigResult};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = concat!("geonames-importer/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned an empty body")]
    Empty { url: String },

    #[error("unable to write download: {0}")]
    Io(#[from] io::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Retrieves a remote resource into a local file.
pub trait Fetcher {
    /// Streams the body served at `url` into `destination`, creating or truncating it.
    ///
    /// Returns the number of bytes written. An empty body is an error.
    fn fetch(&self, url: &str, destination: &Path) -> TransportResult<u64>;
}

/// [`Fetcher`] backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    /// An HTTP fetcher with the default deadlines and user agent.
    pub fn try_new() -> ConfigResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcherBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    system_proxy: bool,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            system_proxy: true,
        }
    }
}

impl HttpFetcherBuilder {
    /// Upper bound for a whole download, body transfer included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether proxies configured through the environment are honoured. Enabled by default.
    pub fn system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    pub fn build(self) -> ConfigResult<HttpFetcher> {
        let mut builder = Client::builder();
        if !self.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(HttpFetcher { client, user_agent: self.user_agent })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> TransportResult<u64> {
        let mut response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|source| TransportError::Network { url: url.to_owned(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_owned(), status: status.as_u16() });
        }
        debug!(url, final_url = %response.url(), "response received");

        let mut file = FailureTracking::new(File::create(destination)?);
        let written = response.copy_to(&mut file).map_err(|source| match file.failure.take() {
            Some(err) => TransportError::Io(err),
            None => TransportError::Network { url: url.to_owned(), source },
        })?;
        file.flush()?;

        if written == 0 {
            return Err(TransportError::Empty { url: url.to_owned() });
        }
        Ok(written)
    }
}

/// Keeps the first write error so a failing destination is not mistaken for a failing body.
struct FailureTracking<W> {
    inner: W,
    failure: Option<io::Error>,
}

impl<W> FailureTracking<W> {
    fn new(inner: W) -> Self {
        Self { inner, failure: None }
    }
}

impl<W: Write> Write for FailureTracking<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(|err| match err.kind() {
            io::ErrorKind::Interrupted => err,
            kind => {
                self.failure.get_or_insert(err);
                io::Error::from(kind)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::{Fetcher, HttpFetcher, TransportError};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::path::Path;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Serves a single canned HTTP response on a loopback port.
    ///
    /// Returns the base url and a handle yielding the request's header lines.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut headers = Vec::new();
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 && line != "\r\n" {
                headers.push(line.trim_end().to_owned());
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            let _ = stream.write_all(body);
            headers
        });
        (format!("http://{address}"), server)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::builder()
            .timeout(Duration::from_secs(10))
            .system_proxy(false)
            .build()
            .unwrap()
    }

    #[test]
    fn body_is_streamed_to_destination() {
        let (url, _) = serve_once("200 OK", b"AD\tAND\n");
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("countryInfo.txt");

        let written = fetcher().fetch(&format!("{url}/countryInfo.txt"), &destination).unwrap();

        assert_eq!(written, 7, "unexpected byte count");
        assert_eq!(std::fs::read(&destination).unwrap(), b"AD\tAND\n", "file content differs");
    }

    #[test]
    fn error_status_fails() {
        let (url, _) = serve_once("404 Not Found", b"missing");
        let dir = tempfile::tempdir().unwrap();
        let result = fetcher().fetch(&format!("{url}/nope.zip"), &dir.path().join("nope.zip"));
        assert!(
            matches!(result, Err(TransportError::Status { status: 404, .. })),
            "expected status error, got {result:?}",
        );
    }

    #[test]
    fn empty_body_fails() {
        let (url, _) = serve_once("200 OK", b"");
        let dir = tempfile::tempdir().unwrap();
        let result = fetcher().fetch(&url, &dir.path().join("empty.txt"));
        assert!(matches!(result, Err(TransportError::Empty { .. })), "expected empty error, got {result:?}");
    }

    #[test]
    fn unreachable_host_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let dir = tempfile::tempdir().unwrap();
        let result = fetcher().fetch(&format!("http://{address}/AD.zip"), &dir.path().join("AD.zip"));
        assert!(matches!(result, Err(TransportError::Network { .. })), "expected network error, got {result:?}");
    }

    #[test]
    fn configured_user_agent_is_sent() {
        let (url, server) = serve_once("200 OK", b"AD\tAND\n");
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent("geonames-mirror-check/1.0")
            .system_proxy(false)
            .build()
            .unwrap();

        fetcher.fetch(&url, &dir.path().join("countryInfo.txt")).unwrap();

        let headers = server.join().unwrap();
        assert!(
            headers.iter().any(|h| h.eq_ignore_ascii_case("user-agent: geonames-mirror-check/1.0")),
            "user agent not sent, got {headers:?}",
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_is_an_io_error() {
        let (url, _) = serve_once("200 OK", b"AD\tAND\n");
        let result = fetcher().fetch(&url, Path::new("/dev/full"));
        assert!(matches!(result, Err(TransportError::Io(_))), "expected io error, got {result:?}");
    }
}
