use std::path::PathBuf;
use std::time::Duration;

/// Knobs for one scrape run. Defaults match the CLI defaults.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Socket timeout for a single request.
    pub request_timeout: Duration,
    /// Pause after each successful listing-page fetch.
    pub listing_delay: Duration,
    /// Pause after each successful detail-page fetch.
    pub detail_delay: Duration,
    pub max_pages: usize,
    pub data_dir: PathBuf,
    pub visualization_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            request_timeout: Duration::from_secs(10),
            listing_delay: Duration::from_secs(2),
            detail_delay: Duration::from_secs(1),
            max_pages: 5,
            visualization_dir: data_dir.join("visualizations"),
            data_dir,
        }
    }
}

impl ScrapeConfig {
    /// Places both the output file and the charts under `data_dir`.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self.visualization_dir = self.data_dir.join("visualizations");
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}
