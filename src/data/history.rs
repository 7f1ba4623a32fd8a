//! Daily closing prices for a single ticker

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use yahoo_finance_api as yahoo;

use crate::constants::history::{DEFAULT_INTERVAL, DEFAULT_RANGE};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Date-ordered closes over the trailing window
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Sorts by date and drops points without a usable close
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn latest_close_label(&self) -> String {
        self.latest_close()
            .map(|v| format!("${:.2}", v))
            .unwrap_or_else(|| crate::data::kpi::NOT_AVAILABLE.to_string())
    }

    /// `[unix seconds, close]` pairs for the line chart
    pub fn as_plot_points(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .filter_map(|p| {
                let ts = p.date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
                Some([ts as f64, p.close])
            })
            .collect()
    }
}

/// Yahoo range ("1y", "6mo", ...) and bar interval ("1d", "1wk", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryWindow {
    pub range: String,
    pub interval: String,
}

impl HistoryWindow {
    pub fn new(range: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            interval: interval.into(),
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RANGE, DEFAULT_INTERVAL)
    }
}

/// Source of price history
pub trait HistoryProvider: Send {
    fn fetch(&self, ticker: &str, window: &HistoryWindow) -> Result<PriceHistory>;
}

/// Yahoo Finance chart endpoint
pub struct YahooHistoryProvider {
    connector: yahoo::YahooConnector,
    runtime: tokio::runtime::Runtime,
}

impl std::fmt::Debug for YahooHistoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooHistoryProvider").finish_non_exhaustive()
    }
}

impl YahooHistoryProvider {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            connector: yahoo::YahooConnector::new()?,
            runtime,
        })
    }
}

impl HistoryProvider for YahooHistoryProvider {
    fn fetch(&self, ticker: &str, window: &HistoryWindow) -> Result<PriceHistory> {
        if ticker.trim().is_empty() {
            return Err(DashboardError::InvalidSymbol("Empty symbol".to_string()));
        }

        tracing::info!(ticker, range = %window.range, interval = %window.interval, "fetching price history");

        let response = self.runtime.block_on(self.connector.get_quote_range(
            ticker,
            &window.interval,
            &window.range,
        ))?;
        let quotes = response.quotes()?;

        let history = history_from_quotes(ticker, &quotes)?;
        tracing::debug!(ticker, points = history.points.len(), "price history ready");
        Ok(history)
    }
}

/// Daily adjusted closes from chart bars; bars without a usable close are dropped
pub fn history_from_quotes(ticker: &str, quotes: &[yahoo::Quote]) -> Result<PriceHistory> {
    let points: Vec<PricePoint> = quotes
        .iter()
        .filter_map(|q| {
            let date = DateTime::<Utc>::from_timestamp(q.timestamp as i64, 0)?.date_naive();
            Some(PricePoint {
                date,
                close: q.adjclose,
            })
        })
        .collect();

    let history = PriceHistory::new(ticker, points);
    if history.points.is_empty() {
        return Err(DashboardError::MissingData {
            symbol: ticker.to_string(),
            reason: "No data returned from Yahoo Finance".to_string(),
        });
    }
    Ok(history)
}

/// Memoised fetch state for one ticker
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    Pending,
    Ready(Arc<PriceHistory>),
    Failed(String),
}

/// Per-ticker memo that lives for the session
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: HashMap<String, HistoryEntry>,
}

impl HistoryCache {
    pub fn get(&self, ticker: &str) -> Option<&HistoryEntry> {
        self.entries.get(ticker)
    }

    /// True when nothing has been requested for `ticker` yet
    pub fn needs_fetch(&self, ticker: &str) -> bool {
        !self.entries.contains_key(ticker)
    }

    pub fn mark_pending(&mut self, ticker: &str) {
        self.entries
            .insert(ticker.to_string(), HistoryEntry::Pending);
    }

    pub fn insert_ready(&mut self, history: PriceHistory) {
        self.entries.insert(
            history.ticker.clone(),
            HistoryEntry::Ready(Arc::new(history)),
        );
    }

    pub fn insert_failed(&mut self, ticker: &str, message: impl Into<String>) {
        self.entries
            .insert(ticker.to_string(), HistoryEntry::Failed(message.into()));
    }

    /// Drop a failed entry so the next frame fetches again
    pub fn retry(&mut self, ticker: &str) {
        if matches!(self.entries.get(ticker), Some(HistoryEntry::Failed(_))) {
            self.entries.remove(ticker);
        }
    }

    pub fn is_pending(&self, ticker: &str) -> bool {
        matches!(self.entries.get(ticker), Some(HistoryEntry::Pending))
    }

    pub fn any_pending(&self) -> bool {
        self.entries
            .values()
            .any(|e| matches!(e, HistoryEntry::Pending))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(timestamp: i64, close: f64, adjclose: f64) -> yahoo::Quote {
        yahoo::Quote {
            timestamp,
            open: close,
            high: close,
            low: close,
            volume: 1_000,
            close,
            adjclose,
        }
    }

    fn point(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            close,
        }
    }

    #[test]
    fn test_history_is_date_ordered() {
        let history = PriceHistory::new(
            "AAPL",
            vec![
                point(2025, 3, 3, 241.5),
                point(2025, 3, 1, 239.0),
                point(2025, 3, 2, f64::NAN),
            ],
        );

        assert_eq!(history.points.len(), 2);
        assert_eq!(history.points[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(history.latest_close(), Some(241.5));
        assert_eq!(history.latest_close_label(), "$241.50");
    }

    #[test]
    fn test_plot_points_use_unix_seconds() {
        let history = PriceHistory::new("AAPL", vec![point(2024, 1, 1, 10.0)]);
        assert_eq!(history.as_plot_points(), vec![[1_704_067_200.0, 10.0]]);
    }

    #[test]
    fn test_empty_history_label() {
        let history = PriceHistory::new("AAPL", vec![]);
        assert_eq!(history.latest_close(), None);
        assert_eq!(history.latest_close_label(), "N/A");
    }

    #[test]
    fn test_cache_lifecycle() {
        let mut cache = HistoryCache::default();
        assert!(cache.needs_fetch("AAPL"));

        cache.mark_pending("AAPL");
        assert!(!cache.needs_fetch("AAPL"));
        assert!(cache.is_pending("AAPL"));
        assert!(cache.any_pending());

        cache.insert_ready(PriceHistory::new("AAPL", vec![point(2025, 1, 2, 1.0)]));
        assert!(matches!(cache.get("AAPL"), Some(HistoryEntry::Ready(_))));
        assert!(!cache.any_pending());

        // Ready entries survive a retry request
        cache.retry("AAPL");
        assert!(!cache.needs_fetch("AAPL"));
    }

    #[test]
    fn test_cache_retry_after_failure() {
        let mut cache = HistoryCache::default();
        cache.mark_pending("XYZ");
        cache.insert_failed("XYZ", "not found");
        assert!(matches!(cache.get("XYZ"), Some(HistoryEntry::Failed(_))));

        cache.retry("XYZ");
        assert!(cache.needs_fetch("XYZ"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_quotes_use_adjusted_close_by_date() {
        // 2025-01-03 and 2025-01-02 14:30 UTC, out of order
        let quotes = vec![bar(1_735_914_600, 245.0, 243.1), bar(1_735_828_200, 244.0, 242.2)];

        let history = history_from_quotes("AAPL", &quotes).unwrap();
        assert_eq!(history.ticker, "AAPL");
        assert_eq!(
            history.points,
            vec![point(2025, 1, 2, 242.2), point(2025, 1, 3, 243.1)]
        );
    }

    #[test]
    fn test_quotes_without_usable_closes_are_missing_data() {
        let quotes = vec![bar(1_735_828_200, 244.0, f64::NAN)];
        assert!(matches!(
            history_from_quotes("AAPL", &quotes),
            Err(DashboardError::MissingData { symbol, .. }) if symbol == "AAPL"
        ));
        assert!(matches!(
            history_from_quotes("AAPL", &[]),
            Err(DashboardError::MissingData { .. })
        ));
    }

    #[test]
    fn test_empty_symbol_is_rejected_before_any_request() {
        let provider = YahooHistoryProvider::new().unwrap();
        assert!(matches!(
            provider.fetch("  ", &HistoryWindow::default()),
            Err(DashboardError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_default_window_is_one_year_daily() {
        assert_eq!(HistoryWindow::default(), HistoryWindow::new("1y", "1d"));
    }
}
