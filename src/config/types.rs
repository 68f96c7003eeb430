use serde::Deserialize;

/// Default listing: recent submissions in arXiv's Robotics category
pub const DEFAULT_BASE_URL: &str = "https://arxiv.org/list/cs.RO/recent";

/// arXiv serves 50 entries per listing page unless told otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Main configuration structure for arxiv-snapshot
///
/// Every section is optional in the TOML file; missing values fall back to
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which listing to page through and how fast
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Listing URL without pagination parameters
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Human-readable name of the category, used in the text report header
    #[serde(rename = "category-label")]
    pub category_label: String,

    /// Number of entries requested per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Hard stop on the number of listing pages fetched in one run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Fixed pause between consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Fetch each paper's abstract page after the listing crawl
    #[serde(rename = "fetch-abstracts")]
    pub fetch_abstracts: bool,

    /// Prefix that an identifier is appended to for the abstract page
    #[serde(rename = "abstract-base-url")]
    pub abstract_base_url: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            category_label: "arXiv cs.RO (Robotics)".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 100,
            request_delay_ms: 1000,
            fetch_abstracts: false,
            abstract_base_url: "https://arxiv.org/abs/".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version (+ContactURL; ContactEmail)`, with the
    /// parenthesised part reduced to whatever contact details are set.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|url| format!("+{}", url)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            base
        } else {
            format!("{} ({})", base, contact.join("; "))
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the structured (JSON) output file
    #[serde(rename = "json-path")]
    pub json_path: String,

    /// Path of the plain-text report
    #[serde(rename = "text-path")]
    pub text_path: String,

    /// Authors shown per paper in the text report (0 shows all)
    #[serde(rename = "text-author-limit")]
    pub text_author_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: "papers.json".to_string(),
            text_path: "papers.txt".to_string(),
            text_author_limit: 3,
        }
    }
}
