use common::{JobRecord, ListingStub, PageCursor};
use scraper::{Html, Selector};
use url::Url;

use super::{compile, element_text, first_in_doc, next_href, JobBoard, ListingSelectors};
use crate::error::Result;

const BASE_URL: &str = "https://www.linkedin.com";

pub struct LinkedIn {
    base: Url,
    listing: ListingSelectors,
    title: Selector,
    company: Selector,
    location: Selector,
    description: Selector,
    criteria: Selector,
    salary: Selector,
    next: Selector,
}

impl LinkedIn {
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: Url::parse(BASE_URL)?,
            listing: ListingSelectors::new(
                "div.base-card",
                "h3.base-search-card__title",
                "h4.base-search-card__subtitle",
                "span.job-search-card__location",
            )?,
            title: compile("h1.top-card-layout__title")?,
            company: compile("a.topcard__org-name-link")?,
            location: compile("span.topcard__flavor--bullet")?,
            description: compile("div.show-more-less-html__markup")?,
            criteria: compile("span.description__job-criteria-text")?,
            salary: compile("div.salary.compensation__salary")?,
            // Rendered as a button on most result pages, which has no href.
            next: compile(r#"[aria-label="Next"]"#)?,
        })
    }
}

impl JobBoard for LinkedIn {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn search_url(&self, query: &str, location: &str) -> String {
        let mut url = self.base.clone();
        url.set_path("/jobs/search/");
        url.query_pairs_mut()
            .append_pair("keywords", query)
            .append_pair("location", location);
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
        if let Some(salary) = first_in_doc(doc, &self.salary) {
            job.salary = salary;
        }

        // Criteria list: job type first, posted date second. Fewer than two means neither.
        let criteria: Vec<String> = doc.select(&self.criteria).map(element_text).collect();
        if let [job_type, posted_date, ..] = criteria.as_slice() {
            job.job_type = job_type.clone();
            job.posted_date = posted_date.clone();
        }

        job
    }

    fn next_page(&self, doc: &Html) -> PageCursor {
        next_href(doc, &self.next, &self.base)
    }
}
