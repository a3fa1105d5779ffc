//! Drives one scrape run: listing page, then each job's detail page, then the
//! next listing page, until the page limit or the last page.

use std::thread;
use std::time::Duration;

use common::{JobRecord, ListingStub, PageCursor};
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::fetch::PageSource;
use crate::sites::JobBoard;

/// Fixed pauses after successful fetches. This is the only rate limiting.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub listing: Duration,
    pub detail: Duration,
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        listing: Duration::ZERO,
        detail: Duration::ZERO,
    };
}

pub struct Orchestrator<S> {
    source: S,
    board: Box<dyn JobBoard>,
    max_pages: usize,
    pacing: Pacing,
}

impl<S: PageSource> Orchestrator<S> {
    pub fn new(source: S, board: Box<dyn JobBoard>, config: &ScrapeConfig) -> Self {
        Self {
            source,
            board,
            max_pages: config.max_pages,
            pacing: Pacing {
                listing: config.listing_delay,
                detail: config.detail_delay,
            },
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Scrapes from `start_url` and returns every record in page order.
    ///
    /// Running out of pages, hitting the page limit and failing to fetch a
    /// listing page all end the run normally with whatever was collected.
    pub fn run(&mut self, start_url: &str) -> Vec<JobRecord> {
        let mut results = Vec::new();
        let mut cursor: PageCursor = Some(start_url.to_string());
        let mut pages_scraped = 0;

        while let Some(url) = cursor.take() {
            if pages_scraped >= self.max_pages {
                info!("Reached page limit of {}", self.max_pages);
                break;
            }

            info!("Scraping page {}: {}", pages_scraped + 1, url);
            let Some(doc) = self.source.fetch(&url) else {
                warn!("Stopping early, could not fetch listing page {}", url);
                break;
            };
            pause(self.pacing.listing);

            let stubs = self.board.extract_listings(&doc);
            let next = self.board.next_page(&doc);
            debug!("Found {} listings on page {}", stubs.len(), pages_scraped + 1);

            for stub in stubs {
                let record = self.scrape_details(stub);
                results.push(record);
            }

            cursor = next;
            pages_scraped += 1;
        }

        info!(
            "Scraped {} jobs from {} page(s) on {}",
            results.len(),
            pages_scraped,
            self.board.name()
        );
        results
    }

    fn scrape_details(&mut self, stub: ListingStub) -> JobRecord {
        match self.source.fetch(&stub.url) {
            Some(doc) => {
                pause(self.pacing.detail);
                self.board.extract_details(&doc, &stub.url)
            }
            None => {
                warn!("Keeping listing data only for {}", stub.url);
                JobRecord::from_stub(stub)
            }
        }
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
