use serde::Deserialize;

/// Main configuration structure for Weir
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the frontier is seeded with
    pub seeds: Vec<String>,

    /// Substring every admitted hostname must contain (e.g. ".ics.uci.edu")
    #[serde(rename = "target-domain")]
    pub target_domain: String,

    /// Stop after this many downloads (0 = unlimited)
    #[serde(rename = "max-pages", default)]
    pub max_pages: usize,
}

/// Trap/admission filter thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Longest URL (in characters) that may be admitted
    #[serde(rename = "max-url-length")]
    pub max_url_length: usize,

    /// Most distinct query parameter names a URL may carry
    #[serde(rename = "max-query-params")]
    pub max_query_params: usize,

    /// Highest similarity score that still counts as a near-duplicate of a trap
    #[serde(rename = "similarity-threshold")]
    pub similarity_threshold: usize,

    /// Size of the recently-identified trap window
    #[serde(rename = "recent-traps-capacity")]
    pub recent_traps_capacity: usize,

    /// Query parameter name fragments that mark calendar/pagination traps
    #[serde(rename = "calendar-params")]
    pub calendar_params: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_url_length: 200,
            max_query_params: 5,
            similarity_threshold: 4,
            recent_traps_capacity: 20,
            calendar_params: vec!["week".to_string(), "day".to_string(), "date".to_string()],
        }
    }
}

/// Where page content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusMode {
    /// Live HTTP fetches
    Http,
    /// Pre-fetched pages in a cache directory
    Cache,
}

/// Corpus (fetcher) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub mode: CorpusMode,

    /// Directory of cached pages, required for `mode = "cache"`
    #[serde(rename = "cache-dir")]
    pub cache_dir: Option<String>,

    /// Per-request timeout for live fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            mode: CorpusMode::Http,
            cache_dir: None,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the analytics report file
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// SQLite frontier database; the frontier lives in memory when absent
    #[serde(rename = "frontier-path", default)]
    pub frontier_path: Option<String>,
}
