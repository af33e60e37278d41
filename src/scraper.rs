use scraper::{Html, Selector};
use std::time::Duration;
use log::{debug, info, warn};
use thiserror::Error;
use crate::config::ScanConfig;
use crate::delay_manager;
use crate::extractor::{compile_selector, Extraction, ExtractorError, ListingExtractor, ListingRecord};
use crate::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::query::{build_query_url, SearchQuery};

/// Listings in page order, then document order within each page.
pub type ResultSet = Vec<ListingRecord>;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("could not build HTTP client: {0}")]
    Fetcher(#[from] FetchError),
    #[error(transparent)]
    Extractor(#[from] ExtractorError),
}

pub struct AuctionScanner<F: PageFetcher = HttpFetcher> {
    config: ScanConfig,
    fetcher: F,
    extractor: ListingExtractor,
    tile: Selector,
}

impl AuctionScanner<HttpFetcher> {
    pub fn new(config: ScanConfig) -> Result<Self, ScannerError> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher> AuctionScanner<F> {
    pub fn with_fetcher(config: ScanConfig, fetcher: F) -> Result<Self, ScannerError> {
        let extractor = ListingExtractor::new(&config)?;
        let tile = compile_selector("tile", &config.selectors.tile)?;
        Ok(AuctionScanner {
            config,
            fetcher,
            extractor,
            tile,
        })
    }

    /// Fetches and extracts one results page. A failed fetch yields no
    /// listings; it is neither retried nor reported to the caller.
    pub fn harvest_page(&self, term: &str, page: u32) -> Vec<ListingRecord> {
        let url = build_query_url(&self.config, &SearchQuery::new(term, page));
        info!("Visiting: {}", url);

        match self.fetcher.fetch(&url) {
            Ok(html) => self.parse_page(&html),
            Err(e) => {
                warn!("Failed to fetch page {}: {}", page, e);
                Vec::new()
            }
        }
    }

    /// Extracts every listing tile from a results page, in document order.
    pub fn parse_page(&self, html: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for fragment in document.select(&self.tile) {
            match self.extractor.extract(fragment) {
                Ok(Extraction::Listing(record)) => records.push(record),
                Ok(Extraction::Skip) => skipped += 1,
                Err(e) => {
                    warn!("Discarding malformed listing: {}", e);
                    skipped += 1;
                }
            }
        }

        debug!("Extracted {} listings, skipped {} tiles", records.len(), skipped);
        records
    }

    /// Harvests pages `1..=page_count` one after another, pausing `delay`
    /// between requests. Never fails; unreachable pages contribute nothing.
    pub fn scan(&self, term: &str, page_count: u32, delay: Duration) -> ResultSet {
        let mut results = ResultSet::new();

        for page in 1..=page_count {
            let records = self.harvest_page(term, page);
            info!("Page {} / {}: {} listings", page, page_count, records.len());
            results.extend(records);

            if page < page_count {
                delay_manager::page_delay(delay);
            }
        }

        info!("Scan for '{}' finished with {} listings.", term, results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use url::Url;

    /// Serves canned markup keyed by the `_pgn` query parameter.
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<Url>>,
    }

    impl StubFetcher {
        fn new(pages: &[(u32, String)]) -> Self {
            StubFetcher {
                pages: pages.iter().map(|(p, html)| (p.to_string(), html.clone())).collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.clone());
            let page = url
                .query_pairs()
                .find(|(k, _)| k == "_pgn")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            self.pages
                .get(&page)
                .cloned()
                .ok_or(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn tile(title: &str, href: &str) -> String {
        format!(
            r#"<li class="s-item">
                 <a class="s-item__link" href="{href}"><div class="s-item__title">{title}</div></a>
                 <span class="s-item__price">£100.00</span>
               </li>"#
        )
    }

    fn page(tiles: &[String]) -> String {
        format!("<html><body><ul class=\"srp-results\">{}</ul></body></html>", tiles.concat())
    }

    fn scanner(pages: &[(u32, String)]) -> AuctionScanner<StubFetcher> {
        AuctionScanner::with_fetcher(ScanConfig::default(), StubFetcher::new(pages)).unwrap()
    }

    fn urls(records: &[ListingRecord]) -> Vec<&str> {
        records.iter().map(|r| r.listing_url.as_str()).collect()
    }

    #[test]
    fn test_failed_page_contributes_nothing() {
        let first = page(&[
            tile("Shop on eBay", "https://www.ebay.co.uk/itm/123456"),
            tile("iPhone 12 64GB", "https://www.ebay.co.uk/itm/1"),
            tile("iPhone 13 128GB", "https://www.ebay.co.uk/itm/2"),
            tile("iPhone 14 256GB", "https://www.ebay.co.uk/itm/3"),
        ]);
        let scanner = scanner(&[(1, first)]);

        let results = scanner.scan("iphone", 2, Duration::ZERO);

        assert_eq!(results.len(), 3);
        assert_eq!(
            urls(&results),
            vec!["https://www.ebay.co.uk/itm/1", "https://www.ebay.co.uk/itm/2", "https://www.ebay.co.uk/itm/3"]
        );
        assert_eq!(scanner.fetcher.requested.borrow().len(), 2);
    }

    #[test]
    fn test_records_kept_in_page_order() {
        let scanner = scanner(&[
            (1, page(&[tile("iPhone X", "a"), tile("iPhone XS", "b")])),
            (2, page(&[tile("iPhone XR", "c")])),
            (3, page(&[tile("iPhone 11", "d"), tile("iPhone 11 Pro", "e")])),
        ]);

        let results = scanner.scan("iphone", 3, Duration::ZERO);

        assert_eq!(urls(&results), vec!["a", "b", "c", "d", "e"]);
        let pages: Vec<String> = scanner
            .fetcher
            .requested
            .borrow()
            .iter()
            .filter_map(|u| u.query_pairs().find(|(k, _)| k == "_pgn").map(|(_, v)| v.into_owned()))
            .collect();
        assert_eq!(pages, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_duplicate_urls_not_deduplicated() {
        let scanner = scanner(&[
            (1, page(&[tile("iPhone 8", "same")])),
            (2, page(&[tile("iPhone 8", "same")])),
        ]);
        assert_eq!(scanner.scan("iphone", 2, Duration::ZERO).len(), 2);
    }

    #[test]
    fn test_malformed_tile_dropped_rest_kept() {
        let broken = r#"<li class="s-item">
                          <div class="s-item__title">iPhone 7 32GB</div>
                          <a class="s-item__link">missing href</a>
                        </li>"#
            .to_string();
        let scanner = scanner(&[(1, page(&[tile("iPhone 6", "x"), broken, tile("iPhone 6s", "y")]))]);

        let results = scanner.scan("iphone", 1, Duration::ZERO);

        assert_eq!(urls(&results), vec!["x", "y"]);
    }

    #[test]
    fn test_every_page_failing_gives_empty_result() {
        let scanner = scanner(&[]);
        assert!(scanner.scan("iphone", 3, Duration::ZERO).is_empty());
        assert_eq!(scanner.fetcher.requested.borrow().len(), 3);
    }

    #[test]
    fn test_zero_pages_fetches_nothing() {
        let scanner = scanner(&[(1, page(&[tile("iPhone 12", "a")]))]);
        assert!(scanner.scan("iphone", 0, Duration::ZERO).is_empty());
        assert!(scanner.fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn test_page_without_tiles() {
        let scanner = scanner(&[(1, "<html><body><p>No exact matches found</p></body></html>".to_string())]);
        assert!(scanner.harvest_page("iphone", 1).is_empty());
    }

    #[test]
    fn test_harvest_requests_term_and_page() {
        let scanner = scanner(&[]);
        scanner.harvest_page("iphone 15", 4);
        let requested = scanner.fetcher.requested.borrow();
        assert!(requested[0].as_str().contains("_nkw=iphone+15"));
        assert!(requested[0].as_str().contains("_pgn=4"));
    }

    #[test]
    fn test_invalid_tile_selector_rejected() {
        let mut config = ScanConfig::default();
        config.selectors.tile = "<<".to_string();
        let result = AuctionScanner::with_fetcher(config, StubFetcher::new(&[]));
        assert!(matches!(
            result,
            Err(ScannerError::Extractor(ExtractorError::InvalidSelector { name: "tile", .. }))
        ));
    }
}
