//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Snapshot columns
pub mod columns {
    pub const TICKER: &str = "Ticker";
    pub const SECTOR: &str = "Sector";
    pub const INDUSTRY: &str = "Industry";
    pub const MARKET_CAP: &str = "Market_Cap";
    pub const PE_RATIO: &str = "PE_Ratio";
    pub const YTD_RETURN: &str = "y25td_Return";

    /// Columns that must be present in the snapshot, in table order
    pub const REQUIRED: [&str; 6] = [TICKER, SECTOR, INDUSTRY, MARKET_CAP, PE_RATIO, YTD_RETURN];

    /// Text columns
    pub const TEXT: [&str; 3] = [TICKER, SECTOR, INDUSTRY];

    /// Numeric columns
    pub const NUMERIC: [&str; 3] = [MARKET_CAP, PE_RATIO, YTD_RETURN];
}

/// Filtering defaults
pub mod filters {
    /// Sector option that disables the sector predicate
    pub const ALL_SECTORS: &str = "All";
}

/// Data loading defaults
pub mod data {
    /// Default snapshot file, relative to the working directory
    pub const DEFAULT_DATA_FILE: &str = "sp500_analysis_2025.csv";

    /// Rows used for CSV schema inference
    pub const INFER_SCHEMA_ROWS: usize = 100;

    /// Market cap divisor for the billions KPI
    pub const BILLION: f64 = 1e9;
}

/// Performance and bookkeeping constants
pub mod performance {
    /// Maximum number of recent files to track
    pub const MAX_RECENT_FILES: usize = 10;

    /// Repaint interval while background work is in flight
    pub const POLL_INTERVAL_MS: u64 = 100;
}

/// Quote history defaults
pub mod history {
    /// Trailing window requested from the quote service
    pub const DEFAULT_RANGE: &str = "1y";

    /// Bar interval requested from the quote service
    pub const DEFAULT_INTERVAL: &str = "1d";
}

/// Treemap defaults
pub mod treemap {
    /// Default treemap height in points
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Header strip reserved above each non-leaf tile for its label
    pub const HEADER_HEIGHT: f32 = 16.0;

    /// Gap between sibling tiles
    pub const PADDING: f32 = 1.0;

    /// Minimum tile size before labels are drawn
    pub const MIN_LABEL_WIDTH: f32 = 28.0;
    pub const MIN_LABEL_HEIGHT: f32 = 14.0;

    /// Root label
    pub const ROOT_LABEL: &str = "Market";
}

/// UI layout defaults
pub mod layout {
    /// Left panel (filters) default width
    pub const SIDEBAR_WIDTH: f32 = 240.0;

    /// Data table height
    pub const TABLE_HEIGHT: f32 = 360.0;

    /// Table row height
    pub const TABLE_ROW_HEIGHT: f32 = 18.0;

    /// Table header row height
    pub const TABLE_HEADER_HEIGHT: f32 = 22.0;

    /// Price history chart height
    pub const HISTORY_PLOT_HEIGHT: f32 = 320.0;

    /// Minimum KPI card width
    pub const METRIC_CARD_WIDTH: f32 = 160.0;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name
    pub const CONFIG_FILE: &str = "sp500-dashboard.json";
}
