//! Error types for the dashboard
//!
//! Every fallible operation (CSV load, filtering, quote history fetch,
//! settings I/O) reports through [`DashboardError`].

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Column not found in data
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Empty dataset error
    #[error("Dataset is empty or has no rows")]
    EmptyDataset,

    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Quote history came back empty
    #[error("Missing data for {symbol}: {reason}")]
    MissingData { symbol: String, reason: String },

    /// Invalid ticker symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background worker went away
    #[error("Background worker unavailable")]
    WorkerGone,
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<yahoo_finance_api::YahooError> for DashboardError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}

/// UI-friendly error message formatting
impl DashboardError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::FileIo(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("Data file not found: {}", e)
            }
            DashboardError::FileIo(e) => format!("File error: {}", e),
            DashboardError::Polars(e) => format!("Data error: {}", e),
            DashboardError::Config(msg) => format!("Config error: {}", msg),
            DashboardError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            DashboardError::ColumnNotFound { column } => {
                format!("Column '{}' not found", column)
            }
            DashboardError::EmptyDataset => "Dataset is empty".to_string(),
            DashboardError::YahooApi(msg) => format!("Quote service error: {}", msg),
            DashboardError::MissingData { symbol, reason } => {
                format!("No price history for {}: {}", symbol, reason)
            }
            DashboardError::InvalidSymbol(msg) => format!("Invalid symbol: {}", msg),
            DashboardError::Json(e) => format!("JSON error: {}", e),
            DashboardError::WorkerGone => "Background worker stopped".to_string(),
        }
    }

    /// Get a short title for the error (for toast notifications)
    pub fn title(&self) -> &'static str {
        match self {
            DashboardError::FileIo(_) => "File Error",
            DashboardError::Polars(_) => "Data Error",
            DashboardError::Config(_) => "Configuration Error",
            DashboardError::UnsupportedFormat { .. } => "Unsupported Format",
            DashboardError::ColumnNotFound { .. } => "Column Not Found",
            DashboardError::EmptyDataset => "Empty Dataset",
            DashboardError::YahooApi(_) => "Quote Service Error",
            DashboardError::MissingData { .. } => "Missing Data",
            DashboardError::InvalidSymbol(_) => "Invalid Symbol",
            DashboardError::Json(_) => "JSON Error",
            DashboardError::WorkerGone => "Worker Error",
        }
    }
}
