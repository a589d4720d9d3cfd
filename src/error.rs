use thiserror::Error;

/// Errors surfaced while scraping. Fetch and missing-structure errors are
/// handled at page or vessel granularity by the driver; only a failed
/// access check aborts the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("access denied - not logged in")]
    AuthRequired,

    #[error("request failed for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("expected page structure missing: {0}")]
    MissingStructure(&'static str),
}
