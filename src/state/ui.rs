//! UI interaction state

use crate::data::SortColumn;

/// Table state with pre-computed sort order
#[derive(Debug, Clone, Default)]
pub struct TableState {
    /// Selection row indices in display order
    pub display_indices: Vec<usize>,
    /// Last sort config (column, ascending)
    sort_cache_key: Option<(SortColumn, bool)>,
    /// Selection version the indices were computed for
    selection_version: u64,
}

impl TableState {
    /// Check if cache is valid for current sort/selection
    pub fn is_cache_valid(&self, column: SortColumn, ascending: bool, selection_version: u64) -> bool {
        self.sort_cache_key == Some((column, ascending)) && self.selection_version == selection_version
    }

    /// Update cache keys after recomputation
    pub fn update_cache_keys(&mut self, column: SortColumn, ascending: bool, selection_version: u64) {
        self.sort_cache_key = Some((column, ascending));
        self.selection_version = selection_version;
    }

    /// Invalidate cache (forces recomputation)
    pub fn invalidate(&mut self) {
        self.sort_cache_key = None;
        self.display_indices.clear();
    }
}

/// UI state manages table interaction, sorting, and the history picker
#[derive(Debug, Clone)]
pub struct UiState {
    /// Column to sort by in data table
    pub sort_column: SortColumn,

    /// Sort direction (true = ascending, false = descending)
    pub sort_ascending: bool,

    /// Error message to display in UI (toast/status bar)
    pub error_message: Option<String>,

    /// Table state with pre-computed indices
    pub table: TableState,

    /// Ticker shown in the price history section
    pub history_ticker: Option<String>,

    /// Dark mode theme toggle
    pub dark_mode: bool,

    /// Show help window
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sort_column: SortColumn::YtdReturn,
            sort_ascending: false,
            error_message: None,
            table: TableState::default(),
            history_ticker: None,
            dark_mode: true,
            show_help: false,
        }
    }
}

impl UiState {
    /// Create a new UiState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the default table order (best performers first)
    pub fn clear_sort(&mut self) {
        self.sort_column = SortColumn::YtdReturn;
        self.sort_ascending = false;
        self.table.invalidate();
    }

    /// Toggle sort direction for a column; a new column starts descending for numbers
    pub fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = matches!(
                column,
                SortColumn::Ticker | SortColumn::Sector | SortColumn::Industry
            );
        }
        self.table.invalidate();
    }

    /// Keep the history ticker inside the current selection
    pub fn sync_history_ticker(&mut self, tickers: &[&str]) {
        let still_listed = self
            .history_ticker
            .as_deref()
            .is_some_and(|t| tickers.contains(&t));
        if !still_listed {
            self.history_ticker = tickers.first().map(|t| t.to_string());
        }
    }

    /// Set an error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Clear the current error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort_is_return_descending() {
        let ui = UiState::new();
        assert_eq!(ui.sort_column, SortColumn::YtdReturn);
        assert!(!ui.sort_ascending);
    }

    #[test]
    fn test_toggle_sort() {
        let mut ui = UiState::new();
        ui.toggle_sort(SortColumn::YtdReturn);
        assert!(ui.sort_ascending);

        ui.toggle_sort(SortColumn::Ticker);
        assert_eq!(ui.sort_column, SortColumn::Ticker);
        assert!(ui.sort_ascending);

        ui.toggle_sort(SortColumn::MarketCap);
        assert!(!ui.sort_ascending);

        ui.clear_sort();
        assert_eq!(ui.sort_column, SortColumn::YtdReturn);
        assert!(!ui.sort_ascending);
    }

    #[test]
    fn test_table_cache_keys() {
        let mut table = TableState::default();
        assert!(!table.is_cache_valid(SortColumn::YtdReturn, false, 1));

        table.update_cache_keys(SortColumn::YtdReturn, false, 1);
        assert!(table.is_cache_valid(SortColumn::YtdReturn, false, 1));
        assert!(!table.is_cache_valid(SortColumn::YtdReturn, false, 2));

        table.invalidate();
        assert!(!table.is_cache_valid(SortColumn::YtdReturn, false, 1));
    }

    #[test]
    fn test_sync_history_ticker() {
        let mut ui = UiState::new();
        ui.sync_history_ticker(&["AAPL", "MSFT"]);
        assert_eq!(ui.history_ticker.as_deref(), Some("AAPL"));

        ui.history_ticker = Some("MSFT".to_string());
        ui.sync_history_ticker(&["AAPL", "MSFT"]);
        assert_eq!(ui.history_ticker.as_deref(), Some("MSFT"));

        // Filtered out: fall back to the first remaining ticker
        ui.sync_history_ticker(&["JPM"]);
        assert_eq!(ui.history_ticker.as_deref(), Some("JPM"));

        ui.sync_history_ticker(&[]);
        assert_eq!(ui.history_ticker, None);
    }
}
