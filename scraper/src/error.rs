use thiserror::Error;

/// Errors surfaced by the scraper library.
///
/// Transport failures while fetching pages and missing page elements are
/// handled inside the fetcher and the boards and never show up here.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("invalid selector `{css}`: {reason}")]
    Selector { css: String, reason: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart `{chart}` failed: {reason}")]
    Chart { chart: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
