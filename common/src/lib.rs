use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// URL of the next listing page to fetch; `None` ends pagination.
pub type PageCursor = Option<String>;

/// A fully scraped job posting. Missing fields are empty strings, never absent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub posted_date: String,
    pub job_type: String,
    pub salary: String,
    pub url: String,
    pub scraped_at: DateTime<Local>,
}

/// The short entry a listing page shows for one job, before its detail page is read.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListingStub {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
}

impl JobRecord {
    /// Record with every text field empty, stamped with `url` and the current time.
    pub fn blank(url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            description: String::new(),
            posted_date: String::new(),
            job_type: String::new(),
            salary: String::new(),
            url: url.into(),
            scraped_at: Local::now(),
        }
    }

    /// Record built from a listing entry alone, used when the detail page is unavailable.
    pub fn from_stub(stub: ListingStub) -> Self {
        let mut record = Self::blank(stub.url);
        record.title = stub.title;
        record.company = stub.company;
        record.location = stub.location;
        record
    }
}
