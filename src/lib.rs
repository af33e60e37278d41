pub mod config;
pub mod query;
pub mod extractor;
pub mod fetcher;
pub mod scraper;
pub mod delay_manager;
pub mod export;
pub mod logger;

// Exporting types for convenience
pub use config::{ListingSelectors, ScanConfig};
pub use query::{build_query_url, SearchQuery};
pub use extractor::{Extraction, ExtractionError, ExtractorError, ListingExtractor, ListingRecord};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher};
pub use crate::scraper::{AuctionScanner, ResultSet, ScannerError};
pub use export::{ExportError, ExportFormat};
