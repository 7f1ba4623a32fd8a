//! Filtered views over the snapshot

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

use crate::constants::columns;
use crate::error::Result;

/// One row of the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    pub ticker: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: f64,
    pub pe_ratio: f64,
    /// Year-to-date return in percent
    pub ytd_return: f64,
}

/// Table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Ticker,
    Sector,
    Industry,
    MarketCap,
    PeRatio,
    YtdReturn,
}

impl SortColumn {
    /// Columns in table order
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Ticker,
        SortColumn::Sector,
        SortColumn::Industry,
        SortColumn::MarketCap,
        SortColumn::PeRatio,
        SortColumn::YtdReturn,
    ];

    /// Snapshot header for this column
    pub fn header(self) -> &'static str {
        match self {
            SortColumn::Ticker => columns::TICKER,
            SortColumn::Sector => columns::SECTOR,
            SortColumn::Industry => columns::INDUSTRY,
            SortColumn::MarketCap => columns::MARKET_CAP,
            SortColumn::PeRatio => columns::PE_RATIO,
            SortColumn::YtdReturn => columns::YTD_RETURN,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            SortColumn::MarketCap | SortColumn::PeRatio | SortColumn::YtdReturn
        )
    }

    fn numeric_value(self, row: &Constituent) -> f64 {
        match self {
            SortColumn::MarketCap => row.market_cap,
            SortColumn::PeRatio => row.pe_ratio,
            SortColumn::YtdReturn => row.ytd_return,
            _ => f64::NAN,
        }
    }

    fn text_value(self, row: &Constituent) -> &str {
        match self {
            SortColumn::Ticker => &row.ticker,
            SortColumn::Sector => &row.sector,
            SortColumn::Industry => &row.industry,
            _ => "",
        }
    }
}

/// Result of applying the sidebar filters to the universe
#[derive(Debug, Clone)]
pub struct Selection {
    frame: DataFrame,
    rows: Vec<Constituent>,
}

impl Selection {
    pub fn new(frame: DataFrame, rows: Vec<Constituent>) -> Self {
        Self { frame, rows }
    }

    pub fn rows(&self) -> &[Constituent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tickers in file order (history picker options)
    pub fn tickers(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.ticker.as_str()).collect()
    }

    /// Row indices ordered by `column`; missing numbers go last either way
    pub fn sorted_indices(&self, column: SortColumn, ascending: bool) -> Vec<usize> {
        profiling::scope!("sort_selection");

        let mut indices: Vec<usize> = (0..self.rows.len()).collect();

        if column.is_numeric() {
            indices.sort_by(|&a, &b| {
                let va = column.numeric_value(&self.rows[a]);
                let vb = column.numeric_value(&self.rows[b]);
                match (va.is_nan(), vb.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        let cmp = va.partial_cmp(&vb).unwrap_or(Ordering::Equal);
                        if ascending { cmp } else { cmp.reverse() }
                    }
                }
            });
        } else {
            indices.sort_by(|&a, &b| {
                let cmp = column
                    .text_value(&self.rows[a])
                    .cmp(column.text_value(&self.rows[b]));
                if ascending { cmp } else { cmp.reverse() }
            });
        }

        indices
    }

    /// Write the filtered view to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        let mut frame = self.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;
        tracing::info!(path = %path.display(), rows = frame.height(), "exported selection");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn constituent(
    ticker: &str,
    sector: &str,
    industry: &str,
    market_cap: f64,
    pe_ratio: f64,
    ytd_return: f64,
) -> Constituent {
    Constituent {
        ticker: ticker.to_string(),
        sector: sector.to_string(),
        industry: industry.to_string(),
        market_cap,
        pe_ratio,
        ytd_return,
    }
}
