use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::selection::{Constituent, Selection};
use crate::constants::columns::{self, MARKET_CAP, SECTOR};
use crate::constants::data::INFER_SCHEMA_ROWS;
use crate::constants::filters::ALL_SECTORS;
use crate::error::{DashboardError, Result};
use crate::state::{FilterConfig, SectorFilter};

/// The loaded constituent snapshot.
///
/// Loaded once and never mutated; every filter produces a fresh [`Selection`].
pub struct Universe {
    /// Normalized frame: the six snapshot columns with fixed dtypes
    frame: DataFrame,
    /// Row-major view of `frame` in file order
    rows: Vec<Constituent>,
    /// Original file path
    file_path: Option<PathBuf>,
}

impl Universe {
    /// Load the snapshot from a CSV file
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();

        if extension != "csv" {
            return Err(DashboardError::UnsupportedFormat { extension });
        }

        // Polars reports a missing file as a generic compute error, so check up front.
        if !path.exists() {
            return Err(DashboardError::FileIo(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            )));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        tracing::info!(path = %path.display(), rows = df.height(), "loaded snapshot");

        Self::from_dataframe(df, Some(path.to_path_buf()))
    }

    /// Build from an already-loaded DataFrame (background worker support)
    pub fn from_dataframe(df: DataFrame, path: Option<PathBuf>) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(missing) = columns::REQUIRED
            .iter()
            .find(|required| !names.iter().any(|n| n == *required))
        {
            return Err(DashboardError::ColumnNotFound {
                column: missing.to_string(),
            });
        }

        if df.height() == 0 {
            return Err(DashboardError::EmptyDataset);
        }

        // Unparseable numeric cells become null instead of failing the load
        let exprs: Vec<Expr> = columns::TEXT
            .iter()
            .map(|c| col(*c).cast(DataType::String))
            .chain(
                columns::NUMERIC
                    .iter()
                    .map(|c| col(*c).cast(DataType::Float64)),
            )
            .collect();
        let frame = df.lazy().select(exprs).collect()?;
        let rows = rows_from_frame(&frame)?;

        Ok(Self {
            frame,
            rows,
            file_path: path,
        })
    }

    /// Get a reference to the normalized DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.frame
    }

    /// All constituents in file order
    pub fn rows(&self) -> &[Constituent] {
        &self.rows
    }

    /// Get the number of rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Get the file path
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Sorted unique sector names
    pub fn sectors(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.sector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sector picker entries: "All" followed by the sorted sectors
    pub fn sector_options(&self) -> Vec<String> {
        std::iter::once(ALL_SECTORS.to_string())
            .chain(self.sectors())
            .collect()
    }

    /// Slider range for the market cap threshold, truncated to whole dollars
    pub fn market_cap_bounds(&self) -> (f64, f64) {
        let caps = self
            .rows
            .iter()
            .map(|r| r.market_cap)
            .filter(|v| v.is_finite());

        let (min, max) = caps.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if min.is_finite() && max.is_finite() {
            (min.trunc(), max.trunc())
        } else {
            (0.0, 0.0)
        }
    }

    /// Apply the market cap predicate, then the sector predicate
    pub fn filter(&self, filter: &FilterConfig) -> Result<Selection> {
        profiling::scope!("filter_universe");

        let cap = col(MARKET_CAP);
        let mut lf = self
            .frame
            .clone()
            .lazy()
            .filter(cap.clone().is_not_nan().and(cap.gt_eq(lit(filter.min_market_cap))));

        if let SectorFilter::Named(sector) = &filter.sector {
            lf = lf.filter(col(SECTOR).eq(lit(sector.clone())));
        }

        let frame = lf.collect()?;
        let rows = rows_from_frame(&frame)?;

        tracing::debug!(
            sector = %filter.sector,
            min_market_cap = filter.min_market_cap,
            rows = rows.len(),
            "applied filters"
        );

        Ok(Selection::new(frame, rows))
    }
}

fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = frame.column(name)?.as_materialized_series();
    Ok(series
        .str()?
        .into_iter()
        .map(|opt| opt.unwrap_or("").to_string())
        .collect())
}

/// Missing values come back as NaN
fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = frame.column(name)?.as_materialized_series();
    Ok(series
        .f64()?
        .into_iter()
        .map(|opt| opt.unwrap_or(f64::NAN))
        .collect())
}

fn rows_from_frame(frame: &DataFrame) -> Result<Vec<Constituent>> {
    let tickers = text_column(frame, columns::TICKER)?;
    let sectors = text_column(frame, columns::SECTOR)?;
    let industries = text_column(frame, columns::INDUSTRY)?;
    let caps = numeric_column(frame, columns::MARKET_CAP)?;
    let pes = numeric_column(frame, columns::PE_RATIO)?;
    let returns = numeric_column(frame, columns::YTD_RETURN)?;

    Ok(tickers
        .into_iter()
        .zip(sectors)
        .zip(industries)
        .zip(caps.into_iter().zip(pes).zip(returns))
        .map(
            |(((ticker, sector), industry), ((market_cap, pe_ratio), ytd_return))| Constituent {
                ticker,
                sector,
                industry,
                market_cap,
                pe_ratio,
                ytd_return,
            },
        )
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const HEADER: &str = "Ticker,Sector,Industry,Market_Cap,PE_Ratio,y25td_Return";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn sample() -> tempfile::NamedTempFile {
        write_csv(&[
            HEADER,
            "AAPL,Information Technology,Technology Hardware,3500000000000.7,35.2,12.5",
            "MSFT,Information Technology,Software,3100000000000,33.1,8.25",
            "JPM,Financials,Banks,600000000000,12.4,-3.5",
            "XOM,Energy,Oil & Gas,450000000000,14.0,21.0",
            "NEE,Utilities,Electric Utilities,150000000000.9,20.5,-10.0",
        ])
    }

    #[test]
    fn test_universe_csv_loading() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        assert_eq!(universe.height(), 5);
        assert_eq!(universe.rows()[0].ticker, "AAPL");
        assert_eq!(universe.rows()[2].ytd_return, -3.5);
        assert_eq!(universe.file_path(), Some(file.path()));
    }

    #[test]
    fn test_sector_options_are_sorted_with_all_first() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        assert_eq!(
            universe.sector_options(),
            vec![
                "All",
                "Energy",
                "Financials",
                "Information Technology",
                "Utilities"
            ]
        );
    }

    #[test]
    fn test_market_cap_bounds_truncate() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        let (min, max) = universe.market_cap_bounds();
        assert_eq!(min, 150_000_000_000.0);
        assert_eq!(max, 3_500_000_000_000.0);
    }

    #[test]
    fn test_filter_by_cap_then_sector() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        let filter = FilterConfig {
            sector: SectorFilter::All,
            min_market_cap: 500_000_000_000.0,
        };
        let selection = universe.filter(&filter).unwrap();
        assert_eq!(selection.tickers(), vec!["AAPL", "MSFT", "JPM"]);

        let filter = FilterConfig {
            sector: SectorFilter::Named("Information Technology".to_string()),
            min_market_cap: 3_200_000_000_000.0,
        };
        let selection = universe.filter(&filter).unwrap();
        assert_eq!(selection.tickers(), vec!["AAPL"]);
    }

    #[test]
    fn test_filter_does_not_mutate_universe() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        let filter = FilterConfig {
            sector: SectorFilter::Named("Energy".to_string()),
            min_market_cap: 0.0,
        };
        assert_eq!(universe.filter(&filter).unwrap().len(), 1);
        assert_eq!(universe.height(), 5);
        assert_eq!(universe.rows().len(), 5);
    }

    #[test]
    fn test_threshold_above_max_yields_empty_selection() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        let filter = FilterConfig {
            sector: SectorFilter::All,
            min_market_cap: 1e15,
        };
        assert!(universe.filter(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_sector_yields_empty_selection() {
        let file = sample();
        let universe = Universe::load(file.path()).unwrap();

        let filter = FilterConfig {
            sector: SectorFilter::Named("Crypto".to_string()),
            min_market_cap: 0.0,
        };
        assert!(universe.filter(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_missing_numeric_cells_become_nan() {
        let file = write_csv(&[
            HEADER,
            "AAPL,Information Technology,Technology Hardware,3500000000000,,12.5",
            "BRK.B,Financials,Insurance,,,",
        ]);
        let universe = Universe::load(file.path()).unwrap();

        assert!(universe.rows()[0].pe_ratio.is_nan());
        assert!(universe.rows()[1].market_cap.is_nan());

        // Rows without a market cap never pass the threshold
        let selection = universe.filter(&FilterConfig::default()).unwrap();
        assert_eq!(selection.tickers(), vec!["AAPL"]);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let file = write_csv(&[
            "Ticker,Name,Sector,Industry,Market_Cap,PE_Ratio,y25td_Return",
            "AAPL,Apple Inc.,Information Technology,Technology Hardware,3500000000000,35.2,12.5",
        ]);
        let universe = Universe::load(file.path()).unwrap();
        assert_eq!(universe.dataframe().width(), 6);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv(&[
            "Ticker,Sector,Industry,Market_Cap,PE_Ratio",
            "AAPL,Information Technology,Technology Hardware,3500000000000,35.2",
        ]);
        match Universe::load(file.path()) {
            Err(DashboardError::ColumnNotFound { column }) => assert_eq!(column, "y25td_Return"),
            other => panic!("expected ColumnNotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = Universe::load(Path::new("/nonexistent/sp500_analysis_2025.csv"))
            .err()
            .unwrap();
        match err {
            DashboardError::FileIo(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected FileIo, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Universe::load(Path::new("snapshot.parquet")).err().unwrap();
        assert!(matches!(err, DashboardError::UnsupportedFormat { .. }));
    }
}
