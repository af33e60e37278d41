use url::Url;
use crate::config::ScanConfig;

/// One page of one search. Built fresh for every page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub page: u32,
}

impl SearchQuery {
    /// Pages are 1-based; a page of 0 is treated as the first page.
    pub fn new(term: impl Into<String>, page: u32) -> Self {
        SearchQuery {
            term: term.into(),
            page: page.max(1),
        }
    }
}

/// Builds the results URL for a query: sold, auction-only listings across
/// the configured category, `results_per_page` per page.
pub fn build_query_url(config: &ScanConfig, query: &SearchQuery) -> Url {
    let mut url = config.search_url.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("_nkw", &query.term)
        .append_pair("_sacat", &config.category)
        .append_pair("LH_Sold", "1")
        .append_pair("LH_Auction", "1")
        .append_pair("_ipg", &config.results_per_page.to_string())
        .append_pair("_pgn", &query.page.to_string())
        .append_pair("rt", "nc");
    url
}
