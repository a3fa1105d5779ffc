//! Job board scraper
//!
//! Walks a board's search results page by page, reads each job's detail
//! page, and writes the collected records plus summary charts to disk.

pub mod config;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod output;
pub mod sites;
pub mod visualize;

pub use config::ScrapeConfig;
pub use error::{Result, ScraperError};
pub use fetch::{Fetcher, PageSource};
pub use orchestrator::{Orchestrator, Pacing};
pub use output::OutputFormat;
pub use sites::{JobBoard, Site};
pub use visualize::JobVisualizer;
