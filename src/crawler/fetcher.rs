//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a snapshot run, including:
//! - Building HTTP clients with proper user agent strings
//! - Building paginated listing URLs
//! - GET requests for listing and abstract pages, paced by a shared throttle
//! - Error classification into `FetchFailure`

use crate::config::{ListingConfig, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a request did not produce a document
///
/// Returned instead of raised: the caller decides whether a failure ends the
/// run (listing pages) or is absorbed (abstract pages).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchFailure {
    /// The URL the failed request was aimed at
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Source of raw listing documents, one per pagination offset
#[async_trait]
pub trait PageFetcher {
    /// Fetches the listing page starting at `offset`
    async fn fetch(&mut self, offset: u32) -> Result<String, FetchFailure>;
}

/// Source of raw abstract pages, one per paper identifier
#[async_trait]
pub trait AbstractSource {
    /// Fetches the abstract page of the paper with the given identifier
    async fn fetch_abstract_page(&mut self, id: &str) -> Result<String, FetchFailure>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use arxiv_snapshot::config::UserAgentConfig;
/// use arxiv_snapshot::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the URL of the listing page starting at `offset`
///
/// Pagination is expressed as `skip=<offset>&show=<page_size>`; any existing
/// `skip`/`show` parameters on the base URL are replaced, other parameters
/// are kept.
///
/// # Example
///
/// ```
/// use arxiv_snapshot::crawler::listing_url;
///
/// let url = listing_url("https://arxiv.org/list/cs.RO/recent", 100, 50).unwrap();
/// assert_eq!(url.as_str(), "https://arxiv.org/list/cs.RO/recent?skip=100&show=50");
/// ```
pub fn listing_url(base_url: &str, offset: u32, page_size: u32) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "skip" && key != "show")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs
            .append_pair("skip", &offset.to_string())
            .append_pair("show", &page_size.to_string());
    }

    Ok(url)
}

/// Builds the URL of a paper's abstract page
pub fn abstract_url(abstract_base_url: &str, id: &str) -> String {
    format!("{}/{}", abstract_base_url.trim_end_matches('/'), id)
}

/// Fetches a URL and returns its body as text
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Non-2xx status | `Status` |
/// | Timeout | `Timeout` |
/// | Connection refused / DNS / TLS | `Connect` |
/// | Body could not be read | `Body` |
/// | Anything else | `Request` |
///
/// No retries: one call, one request.
pub async fn fetch_document(client: &Client, url: &str) -> Result<String, FetchFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchFailure::Body {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn classify_request_error(url: &str, error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchFailure::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchFailure::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Throttled HTTP implementation of [`PageFetcher`] and [`AbstractSource`]
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
    abstract_base_url: String,
    page_size: u32,
    throttle: Throttle,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the listing described by `listing`
    pub fn new(client: Client, listing: &ListingConfig) -> Self {
        Self {
            client,
            base_url: listing.base_url.clone(),
            abstract_base_url: listing.abstract_base_url.clone(),
            page_size: listing.page_size,
            throttle: Throttle::from_millis(listing.request_delay_ms),
        }
    }

    /// Waits for the throttle, then fetches `url`
    pub async fn get_document(&mut self, url: &str) -> Result<String, FetchFailure> {
        self.throttle.wait().await;
        tracing::debug!("GET {}", url);
        fetch_document(&self.client, url).await
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&mut self, offset: u32) -> Result<String, FetchFailure> {
        let url = listing_url(&self.base_url, offset, self.page_size).map_err(|e| {
            FetchFailure::InvalidUrl {
                url: self.base_url.clone(),
                message: e.to_string(),
            }
        })?;
        self.get_document(url.as_str()).await
    }
}

#[async_trait]
impl AbstractSource for HttpPageFetcher {
    async fn fetch_abstract_page(&mut self, id: &str) -> Result<String, FetchFailure> {
        let url = abstract_url(&self.abstract_base_url, id);
        self.get_document(&url).await
    }
}
