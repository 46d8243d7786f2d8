//! Release artifact download.

use std::time::Duration;

use crate::error::{InstallError, Result};
use crate::platform::BuildTriple;

pub const LATEST_URL: &str = "https://bismuthcloud.github.io/cli/LATEST";
pub const DOWNLOAD_BASE: &str = "https://github.com/BismuthCloud/cli/releases/download";

const USER_AGENT: &str = concat!("bisup/", env!("CARGO_PKG_VERSION"));

/// Bounds only establishing the connection. The body of a release asset may
/// take arbitrarily long on a slow link.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where release metadata and binaries are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Plain-text resource holding the newest released version.
    pub latest_url: String,
    /// Prefix of the per-version release asset URLs.
    pub download_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self { latest_url: LATEST_URL.to_owned(), download_base: DOWNLOAD_BASE.to_owned() }
    }
}

/// A single blocking GET that buffers the whole response body.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()
            .map_err(|err| InstallError::NetworkFailure {
                url: "(http client setup)".to_owned(),
                reason: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        let failure =
            |err: reqwest::Error| InstallError::NetworkFailure { url: url.to_owned(), reason: err.to_string() };
        let res = self.client.get(url).send().map_err(failure)?.error_for_status().map_err(failure)?;
        let bytes = res.bytes().map_err(failure)?;
        tracing::debug!(url, len = bytes.len(), "response buffered");
        Ok(bytes.to_vec())
    }
}

/// Release tags are `v`-prefixed; accept versions given either way.
fn version_tag(version: &str) -> String {
    if version.starts_with('v') { version.to_owned() } else { format!("v{version}") }
}

pub fn download_url(endpoints: &Endpoints, version: &str, triple: &BuildTriple) -> String {
    let base = endpoints.download_base.trim_end_matches('/');
    let tag = version_tag(version);
    format!("{base}/{tag}/bismuthcli.{triple}")
}

/// Download the binary for `version` and `triple` into memory.
pub fn fetch_artifact(
    fetcher: &dyn Fetch,
    endpoints: &Endpoints,
    version: &str,
    triple: &BuildTriple,
) -> Result<Vec<u8>> {
    let url = download_url(endpoints, version, triple);
    print_info!("Downloading Bismuth CLI {version} for {triple}...");
    fetcher.get(&url)
}
