use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use thiserror::Error;
use crate::config::ScanConfig;

/// Placeholder for any field whose sub-element is missing from a tile.
pub const UNKNOWN: &str = "Unknown";
/// A tile without a bid counter sold with zero bids.
pub const NO_BIDS: &str = "0";
/// Promotional tile the marketplace injects at the top of every results page.
const SHOP_PLACEHOLDER: &str = "Shop on eBay";
const LOCATION_PREFIX: &str = "Located in:";

/// One normalized sold listing. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Storage")]
    pub storage: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Sold Price (GBP)")]
    pub sold_price: String,
    #[serde(rename = "Bids")]
    pub bid_count: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Listing URL")]
    pub listing_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Listing(ListingRecord),
    /// Not a real listing (no title, or the shop placeholder tile).
    Skip,
}

/// A tile whose markup is present but malformed. The whole tile is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("link element has no href attribute")]
    MissingHref,
    #[error("bid element contains no bid count")]
    EmptyBidCount,
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid {name} selector '{selector}': {reason}")]
    InvalidSelector {
        name: &'static str,
        selector: String,
        reason: String,
    },
    #[error("invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub(crate) fn compile_selector(name: &'static str, selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|e| ExtractorError::InvalidSelector {
        name,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

pub struct ListingExtractor {
    model_regex: Regex,
    storage_regex: Regex,
    title: Selector,
    price: Selector,
    bids: Selector,
    condition: Selector,
    location: Selector,
    link: Selector,
    currency_symbol: String,
}

impl ListingExtractor {
    pub fn new(config: &ScanConfig) -> Result<Self, ExtractorError> {
        let selectors = &config.selectors;
        Ok(ListingExtractor {
            // Product family followed by any run of words, digits, spaces and '+'.
            model_regex: Regex::new(r"(?i)iPhone\s?[\d\s\w+]+")?,
            storage_regex: Regex::new(r"(?i)(\d{2,4})\s?GB")?,
            title: compile_selector("title", &selectors.title)?,
            price: compile_selector("price", &selectors.price)?,
            bids: compile_selector("bids", &selectors.bids)?,
            condition: compile_selector("condition", &selectors.condition)?,
            location: compile_selector("location", &selectors.location)?,
            link: compile_selector("link", &selectors.link)?,
            currency_symbol: config.currency_symbol.clone(),
        })
    }

    pub fn extract_model(&self, title: &str) -> String {
        self.model_regex
            .find(title)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn extract_storage(&self, title: &str) -> String {
        self.storage_regex
            .captures(title)
            .and_then(|cap| cap.get(1))
            .map(|digits| format!("{}GB", digits.as_str()))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Reads one result tile. Missing sub-elements fall back to their
    /// placeholder; malformed ones fail the whole tile.
    pub fn extract(&self, fragment: ElementRef<'_>) -> Result<Extraction, ExtractionError> {
        let raw_title = match first_text(fragment, &self.title) {
            Some(text) => text,
            None => return Ok(Extraction::Skip),
        };
        if raw_title.contains(SHOP_PLACEHOLDER) {
            return Ok(Extraction::Skip);
        }
        let title = raw_title.trim();

        let sold_price = first_text(fragment, &self.price)
            .map(|text| text.replace(self.currency_symbol.as_str(), "").trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let bid_count = match first_text(fragment, &self.bids) {
            Some(text) => text
                .split_whitespace()
                .next()
                .map(str::to_string)
                .ok_or(ExtractionError::EmptyBidCount)?,
            None => NO_BIDS.to_string(),
        };

        let condition = first_text(fragment, &self.condition)
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let location = first_text(fragment, &self.location)
            .map(|text| text.replace(LOCATION_PREFIX, "").trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let listing_url = match fragment.select(&self.link).next() {
            Some(link) => link
                .value()
                .attr("href")
                .ok_or(ExtractionError::MissingHref)?
                .to_string(),
            None => UNKNOWN.to_string(),
        };

        Ok(Extraction::Listing(ListingRecord {
            model: self.extract_model(title),
            storage: self.extract_storage(title),
            condition,
            sold_price,
            bid_count,
            location,
            listing_url,
        }))
    }
}

fn first_text(fragment: ElementRef<'_>, selector: &Selector) -> Option<String> {
    fragment
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}
