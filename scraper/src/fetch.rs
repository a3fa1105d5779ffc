//! Blocking page fetcher.
//!
//! Every failure (bad URL, transport error, non-2xx status, unreadable body)
//! is logged here and reported to the caller as `None`.

use rand::{rng, Rng};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::Html;
use tracing::{debug, error};

use crate::config::ScrapeConfig;
use crate::error::Result;

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0",
];

/// Anything that can turn a URL into a parsed document.
pub trait PageSource {
    fn fetch(&mut self, url: &str) -> Option<Html>;
}

impl<S: PageSource + ?Sized> PageSource for &mut S {
    fn fetch(&mut self, url: &str) -> Option<Html> {
        (**self).fetch(url)
    }
}

/// Fetches pages over HTTP with one reused client.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client })
    }

    fn get_body(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .send()?
            .error_for_status()?
            .text()
    }
}

impl PageSource for Fetcher {
    fn fetch(&mut self, url: &str) -> Option<Html> {
        if !is_http_url(url) {
            error!("Refusing to fetch non-HTTP URL: {}", url);
            return None;
        }

        match self.get_body(url) {
            Ok(body) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                Some(Html::parse_document(&body))
            }
            Err(e) => {
                error!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rng().random_range(0..USER_AGENTS.len())]
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
