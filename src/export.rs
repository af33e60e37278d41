use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use clap::ValueEnum;
use log::info;
use thiserror::Error;
use crate::extractor::ListingRecord;

/// Column labels, in output order.
pub const COLUMNS: [&str; 7] = [
    "Model",
    "Storage",
    "Condition",
    "Sold Price (GBP)",
    "Bids",
    "Location",
    "Listing URL",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_csv<W: Write>(records: &[ListingRecord], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    // serialize() only emits the header alongside the first row
    if records.is_empty() {
        wtr.write_record(COLUMNS)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(records: &[ListingRecord], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}

pub fn save<P: AsRef<Path>>(records: &[ListingRecord], path: P, format: ExportFormat) -> Result<(), ExportError> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(records, writer)?,
        ExportFormat::Json => write_json(records, writer)?,
    }
    info!("Saved {} listings to {:?}", records.len(), path);
    Ok(())
}

fn row(record: &ListingRecord) -> [&str; 7] {
    [
        record.model.as_str(),
        record.storage.as_str(),
        record.condition.as_str(),
        record.sold_price.as_str(),
        record.bid_count.as_str(),
        record.location.as_str(),
        record.listing_url.as_str(),
    ]
}

/// Left-aligned text table of the first `limit` records.
pub fn render_table(records: &[ListingRecord], limit: usize) -> String {
    let shown = &records[..records.len().min(limit)];
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for record in shown {
        for (width, cell) in widths.iter_mut().zip(row(record)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: [&str; 7]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(COLUMNS)];
    lines.extend(shown.iter().map(|record| format_line(row(record))));
    if records.len() > shown.len() {
        lines.push(format!("... {} more", records.len() - shown.len()));
    }
    lines.join("\n")
}
