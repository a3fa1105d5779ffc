//! Job boards and their selector tables.
//!
//! Each board knows where a listing card, a detail field and the "next page"
//! control live in its markup. Adding a board means adding a selector table
//! plus its pagination rule and a `Site` variant.

mod indeed;
mod linkedin;

use std::fmt;
use std::str::FromStr;

use common::{JobRecord, ListingStub, PageCursor};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, ScraperError};

pub use indeed::Indeed;
pub use linkedin::LinkedIn;

/// What the orchestrator needs from a job board.
pub trait JobBoard {
    fn name(&self) -> &'static str;

    /// First listing page for a search.
    fn search_url(&self, query: &str, location: &str) -> String;

    /// Brief entries on a listing page. Cards without a title link are skipped.
    fn extract_listings(&self, doc: &Html) -> Vec<ListingStub>;

    /// Full record from a detail page. Fields not found stay empty.
    fn extract_details(&self, doc: &Html, url: &str) -> JobRecord;

    /// Absolute URL of the next listing page, if the page links to one.
    fn next_page(&self, doc: &Html) -> PageCursor;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Indeed,
    LinkedIn,
}

impl Site {
    pub fn board(self) -> Result<Box<dyn JobBoard>> {
        Ok(match self {
            Site::Indeed => Box::new(Indeed::new()?),
            Site::LinkedIn => Box::new(LinkedIn::new()?),
        })
    }
}

impl FromStr for Site {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "indeed" => Ok(Site::Indeed),
            "linkedin" => Ok(Site::LinkedIn),
            _ => Err(ScraperError::UnsupportedSite(s.to_string())),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Indeed => f.write_str("indeed"),
            Site::LinkedIn => f.write_str("linkedin"),
        }
    }
}

/// Where the pieces of a listing card live. Both boards share this shape.
pub(crate) struct ListingSelectors {
    card: Selector,
    title: Selector,
    link: Selector,
    company: Selector,
    location: Selector,
}

impl ListingSelectors {
    pub(crate) fn new(card: &str, title: &str, company: &str, location: &str) -> Result<Self> {
        Ok(Self {
            card: compile(card)?,
            title: compile(title)?,
            link: compile("a[href]")?,
            company: compile(company)?,
            location: compile(location)?,
        })
    }

    pub(crate) fn extract(&self, doc: &Html, base: &Url) -> Vec<ListingStub> {
        doc.select(&self.card)
            .filter_map(|card| {
                let title = card.select(&self.title).next()?;
                let href = title.select(&self.link).next()?.value().attr("href")?;
                Some(ListingStub {
                    title: element_text(title),
                    company: first_text(card, &self.company).unwrap_or_default(),
                    location: first_text(card, &self.location).unwrap_or_default(),
                    url: resolve(base, href)?,
                })
            })
            .collect()
    }
}

pub(crate) fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        css: css.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Concatenated descendant text, trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(element_text)
}

pub(crate) fn first_in_doc(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(element_text)
}

/// Follows the first element matching `selector` if it carries an href.
pub(crate) fn next_href(doc: &Html, selector: &Selector, base: &Url) -> PageCursor {
    let href = doc.select(selector).next()?.value().attr("href")?;
    resolve(base, href)
}

pub(crate) fn resolve(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_site_from_str() {
        assert_eq!("indeed".parse::<Site>().unwrap(), Site::Indeed);
        assert_eq!("LinkedIn".parse::<Site>().unwrap(), Site::LinkedIn);
    }

    #[test]
    fn test_unknown_site_is_unsupported() {
        let err = "monster".parse::<Site>().unwrap_err();
        assert!(matches!(err, ScraperError::UnsupportedSite(ref s) if s == "monster"));
        assert_eq!(err.to_string(), "unsupported site: monster");
    }

    #[test]
    fn test_board_names_round_trip() {
        for site in [Site::Indeed, Site::LinkedIn] {
            let board = site.board().unwrap();
            assert_eq!(board.name(), site.to_string());
            assert_eq!(board.name().parse::<Site>().unwrap(), site);
        }
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Url::parse("https://www.indeed.com").unwrap();
        assert_eq!(
            resolve(&base, "/rc/clk?jk=abc").as_deref(),
            Some("https://www.indeed.com/rc/clk?jk=abc")
        );
        assert_eq!(
            resolve(&base, "https://other.example/job/1").as_deref(),
            Some("https://other.example/job/1")
        );
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let err = compile("div[").unwrap_err();
        assert!(matches!(err, ScraperError::Selector { ref css, .. } if css == "div["));
    }

    proptest! {
        #[test]
        fn prop_no_cards_means_no_stubs(text in "[a-zA-Z0-9 ]{0,60}", class in "[a-z]{1,10}") {
            let html = format!(
                r#"<html><body><div class="x-{class}"><h2><a href="/j">{text}</a></h2></div></body></html>"#
            );
            let doc = Html::parse_document(&html);
            for site in [Site::Indeed, Site::LinkedIn] {
                let board = site.board().unwrap();
                prop_assert!(board.extract_listings(&doc).is_empty());
            }
        }
    }
}
