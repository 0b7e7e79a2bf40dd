use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Optional YAML file with extra or replacement layouts.
    pub layouts_path: Option<PathBuf>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_accept_language: String,
    /// Pause before each "read more" detail fetch.
    pub scraper_detail_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Page ceiling used when the caller does not pass one.
    pub default_max_pages: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            layouts_path: None,
            scraper_request_timeout_secs: 10,
            scraper_user_agent: "Mozilla/5.0".to_owned(),
            scraper_accept_language: "ja-JP,ja;q=0.9".to_owned(),
            scraper_detail_delay_ms: 400,
            scraper_max_retries: 0,
            scraper_retry_backoff_base_secs: 2,
            default_max_pages: 2,
        }
    }
}
