use common::{JobRecord, ListingStub, PageCursor};
use scraper::{Html, Selector};
use url::Url;

use super::{compile, first_in_doc, next_href, JobBoard, ListingSelectors};
use crate::error::Result;

const BASE_URL: &str = "https://www.indeed.com";

pub struct Indeed {
    base: Url,
    listing: ListingSelectors,
    title: Selector,
    company: Selector,
    location: Selector,
    description: Selector,
    metadata: Selector,
    job_type: Selector,
    posted_date: Selector,
    next: Selector,
}

impl Indeed {
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: Url::parse(BASE_URL)?,
            listing: ListingSelectors::new(
                "div.job_seen_beacon",
                "h2.jobTitle",
                "span.companyName",
                "div.companyLocation",
            )?,
            title: compile("h1.jobsearch-JobInfoHeader-title")?,
            company: compile("div.jobsearch-CompanyInfoContainer")?,
            location: compile("div.jobsearch-JobInfoHeader-subtitle")?,
            description: compile("div#jobDescriptionText")?,
            metadata: compile("div.jobsearch-JobMetadataHeader-item")?,
            job_type: compile("div#salaryInfoAndJobType span.jobType")?,
            posted_date: compile("span.jobsearch-JobMetadataFooter-date")?,
            next: compile(r#"a[aria-label="Next Page"]"#)?,
        })
    }
}

impl JobBoard for Indeed {
    fn name(&self) -> &'static str {
        "indeed"
    }

    fn search_url(&self, query: &str, location: &str) -> String {
        let mut url = self.base.clone();
        url.set_path("/jobs");
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("l", location);
        url.into()
    }

    fn extract_listings(&self, doc: &Html) -> Vec<ListingStub> {
        self.listing.extract(doc, &self.base)
    }

    fn extract_details(&self, doc: &Html, url: &str) -> JobRecord {
        let mut job = JobRecord::blank(url);

        if let Some(title) = first_in_doc(doc, &self.title) {
            job.title = title;
        }
        if let Some(company) = first_in_doc(doc, &self.company) {
            job.company = company;
        }
        if let Some(location) = first_in_doc(doc, &self.location) {
            job.location = location;
        }
        if let Some(description) = first_in_doc(doc, &self.description) {
            job.description = description;
        }
        // The metadata header is only a salary when it says so.
        if let Some(salary) = first_in_doc(doc, &self.metadata) {
            if salary.to_lowercase().contains("salary") {
                job.salary = salary;
            }
        }
        if let Some(job_type) = first_in_doc(doc, &self.job_type) {
            job.job_type = job_type;
        }
        if let Some(posted) = first_in_doc(doc, &self.posted_date) {
            job.posted_date = posted;
        }

        job
    }

    fn next_page(&self, doc: &Html) -> PageCursor {
        next_href(doc, &self.next, &self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><a href="/rc/clk?jk=111">  Rust Developer </a></h2>
            <span class="companyName">Ferris Inc</span>
            <div class="companyLocation">Remote</div>
          </div>
          <div class="job_seen_beacon">
            <h2 class="jobTitle">No link here</h2>
            <span class="companyName">Ghost Co</span>
          </div>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><a href="https://www.indeed.com/viewjob?jk=222">Backend Engineer</a></h2>
          </div>
          <nav><a aria-label="Next Page" href="/jobs?q=rust&amp;start=10">Next</a></nav>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <h1 class="jobsearch-JobInfoHeader-title">Rust Developer</h1>
          <div class="jobsearch-CompanyInfoContainer"> Ferris Inc </div>
          <div class="jobsearch-JobInfoHeader-subtitle">Austin, TX</div>
          <div class="jobsearch-JobMetadataHeader-item">Salary: $120,000 - $150,000 a year</div>
          <div id="salaryInfoAndJobType"><span class="jobType">Full-time</span></div>
          <div id="jobDescriptionText"><p>Build fast things.</p><p>Use Rust.</p></div>
          <span class="jobsearch-JobMetadataFooter-date">Posted 3 days ago</span>
        </body></html>
    "#;

    #[test]
    fn test_extract_listings_skips_cards_without_link() {
        let board = Indeed::new().unwrap();
        let stubs = board.extract_listings(&Html::parse_document(LISTING));

        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].title, "Rust Developer");
        assert_eq!(stubs[0].company, "Ferris Inc");
        assert_eq!(stubs[0].location, "Remote");
        assert_eq!(stubs[0].url, "https://www.indeed.com/rc/clk?jk=111");

        assert_eq!(stubs[1].title, "Backend Engineer");
        assert_eq!(stubs[1].company, "");
        assert_eq!(stubs[1].location, "");
        assert_eq!(stubs[1].url, "https://www.indeed.com/viewjob?jk=222");
    }

    #[test]
    fn test_extract_details_all_fields() {
        let board = Indeed::new().unwrap();
        let url = "https://www.indeed.com/viewjob?jk=111";
        let job = board.extract_details(&Html::parse_document(DETAIL), url);

        assert_eq!(job.title, "Rust Developer");
        assert_eq!(job.company, "Ferris Inc");
        assert_eq!(job.location, "Austin, TX");
        assert_eq!(job.description, "Build fast things.Use Rust.");
        assert_eq!(job.salary, "Salary: $120,000 - $150,000 a year");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.posted_date, "Posted 3 days ago");
        assert_eq!(job.url, url);
    }

    #[test]
    fn test_metadata_without_salary_is_ignored() {
        let board = Indeed::new().unwrap();
        let doc = Html::parse_document(
            r#"<div class="jobsearch-JobMetadataHeader-item">Hybrid remote</div>"#,
        );
        assert_eq!(board.extract_details(&doc, "https://x.test/1").salary, "");
    }

    #[test]
    fn test_extract_details_empty_document() {
        let board = Indeed::new().unwrap();
        let job = board.extract_details(&Html::parse_document("<html></html>"), "https://x.test/1");
        assert_eq!(job, JobRecord { scraped_at: job.scraped_at, ..JobRecord::blank("https://x.test/1") });
    }

    #[test]
    fn test_extract_details_is_idempotent() {
        let board = Indeed::new().unwrap();
        let doc = Html::parse_document(DETAIL);
        let first = board.extract_details(&doc, "https://x.test/1");
        let second = board.extract_details(&doc, "https://x.test/1");
        assert_eq!(first, JobRecord { scraped_at: first.scraped_at, ..second });
    }

    #[test]
    fn test_next_page() {
        let board = Indeed::new().unwrap();
        assert_eq!(
            board.next_page(&Html::parse_document(LISTING)).as_deref(),
            Some("https://www.indeed.com/jobs?q=rust&start=10")
        );
        assert_eq!(board.next_page(&Html::parse_document(DETAIL)), None);
    }

    #[test]
    fn test_search_url_encodes_terms() {
        let board = Indeed::new().unwrap();
        assert_eq!(
            board.search_url("rust developer", "New York"),
            "https://www.indeed.com/jobs?q=rust+developer&l=New+York"
        );
    }
}
