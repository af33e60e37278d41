use std::time::Duration;
use url::Url;

pub const DEFAULT_SEARCH_URL: &str = "https://www.ebay.co.uk/sch/i.html";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (CodeCopilot/1.0)";

/// CSS markers used to locate one result tile and its sub-elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSelectors {
    pub tile: String,
    pub title: String,
    pub price: String,
    pub bids: String,
    pub condition: String,
    pub location: String,
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        ListingSelectors {
            tile: ".s-item".to_string(),
            title: ".s-item__title".to_string(),
            price: ".s-item__price".to_string(),
            bids: ".s-item__bids".to_string(),
            condition: ".SECONDARY_INFO".to_string(),
            location: ".s-item__location.s-item__itemLocation".to_string(),
            link: ".s-item__link".to_string(),
        }
    }
}

/// Everything a scan needs to know about the marketplace it talks to.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub search_url: Url,
    /// `_sacat` value, "0" searches every category.
    pub category: String,
    pub results_per_page: u32,
    pub user_agent: String,
    pub timeout: Duration,
    /// Stripped from the displayed sold price.
    pub currency_symbol: String,
    pub selectors: ListingSelectors,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            search_url: Url::parse(DEFAULT_SEARCH_URL).expect("default search URL is valid"),
            category: "0".to_string(),
            results_per_page: 100,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            currency_symbol: "\u{a3}".to_string(),
            selectors: ListingSelectors::default(),
        }
    }
}
