use auction_scanner_lib::{export, logger};
use auction_scanner_lib::{AuctionScanner, ExportFormat, ScanConfig};

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use log::{info, warn, LevelFilter};
use url::Url;

/// Collects sold auction listings for a search term and saves them as a table.
#[derive(Parser, Debug)]
#[command(name = "auction-scanner", version, about)]
struct Args {
    /// Search term
    #[arg(default_value = "iphone")]
    term: String,

    /// Number of results pages to scrape
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10))]
    pages: u32,

    /// Seconds to wait between page requests
    #[arg(short, long, default_value_t = 1.0)]
    delay: f64,

    /// File to save the listings to
    #[arg(short, long, default_value = "iphone_auctions.csv")]
    output: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Rows to print to the terminal
    #[arg(long, default_value_t = 20)]
    preview: usize,

    /// Search results endpoint
    #[arg(long)]
    search_url: Option<Url>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Currency symbol stripped from sold prices
    #[arg(long)]
    currency: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default();
        if let Some(url) = &self.search_url {
            config.search_url = url.clone();
        }
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        if let Some(symbol) = &self.currency {
            config.currency_symbol = symbol.clone();
        }
        config.timeout = Duration::from_secs(self.timeout);
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logger::init(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    let delay = Duration::try_from_secs_f64(args.delay)
        .map_err(|e| format!("invalid --delay {}: {}", args.delay, e))?;

    let scanner = AuctionScanner::new(args.scan_config())?;
    info!("Scraping {} pages of sold auctions for '{}'...", args.pages, args.term);

    let records = scanner.scan(&args.term, args.pages, delay);
    if records.is_empty() {
        warn!("No listings found.");
        println!("No listings found.");
        return Ok(());
    }

    println!("Scraped {} listings successfully.", records.len());
    println!("{}", export::render_table(&records, args.preview));
    export::save(&records, &args.output, args.format)?;
    println!("Saved to {}", args.output.display());
    Ok(())
}
