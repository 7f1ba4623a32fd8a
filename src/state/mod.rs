//! Application state management
//!
//! The snapshot, the sidebar filters and everything derived from them. Derived
//! views are recomputed only when the filters or the snapshot change.

mod filters;
mod ui;

pub use filters::{FilterConfig, SectorFilter};
pub use ui::{TableState, UiState};

use crate::constants::performance::MAX_RECENT_FILES;
use crate::data::{ColorScale, HistoryCache, Kpis, Selection, TreemapNode, Universe};
use crate::error::Result;
use std::path::PathBuf;

/// Everything the page renders for one filter setting
pub struct FilteredView {
    pub selection: Selection,
    pub kpis: Kpis,
    pub treemap: TreemapNode,
    pub color_scale: ColorScale,
}

impl FilteredView {
    pub fn build(selection: Selection) -> Self {
        let kpis = Kpis::compute(selection.rows());
        let treemap = TreemapNode::build(selection.rows());
        let color_scale = ColorScale::rd_yl_gn(&treemap.leaf_color_values(), 0.0);
        Self {
            selection,
            kpis,
            treemap,
            color_scale,
        }
    }
}

/// Main application state container
#[derive(Default)]
pub struct AppState {
    /// Loaded snapshot
    pub universe: Option<Universe>,

    /// Why the snapshot could not be loaded; halts the page
    pub load_error: Option<String>,

    /// A load request is in flight
    pub loading: bool,

    /// Sidebar filters
    pub filters: FilterConfig,

    /// UI interaction state
    pub ui: UiState,

    /// Per-ticker price history memo
    pub history: HistoryCache,

    /// Derived view for `view_key`
    pub view: Option<FilteredView>,

    /// Filters `view` was computed for
    view_key: Option<FilterConfig>,

    /// Bumped every time `view` is rebuilt
    pub view_version: u64,

    /// Currently loaded file path
    pub current_file: Option<PathBuf>,

    /// Recently opened files
    pub recent_files: Vec<PathBuf>,
}

impl AppState {
    /// Create a new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if data is loaded
    pub fn has_data(&self) -> bool {
        self.universe.is_some()
    }

    /// Get the number of rows in the current snapshot
    pub fn row_count(&self) -> usize {
        self.universe.as_ref().map(|u| u.height()).unwrap_or(0)
    }

    /// Install a freshly loaded snapshot and reset the filters to its bounds
    pub fn set_universe(&mut self, path: PathBuf, universe: Universe) {
        let (min_cap, _) = universe.market_cap_bounds();
        self.filters = FilterConfig::for_bounds(min_cap);
        self.universe = Some(universe);
        self.load_error = None;
        self.loading = false;
        self.invalidate_view();
        self.ui.table.invalidate();
        self.push_recent(path.clone());
        self.current_file = Some(path);
    }

    /// Record a failed load; the page stops after the error banner
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.universe = None;
        self.loading = false;
        self.load_error = Some(message.into());
        self.invalidate_view();
    }

    /// Restore filters to the snapshot defaults
    pub fn reset_filters(&mut self) {
        let min_cap = self
            .universe
            .as_ref()
            .map(|u| u.market_cap_bounds().0)
            .unwrap_or(0.0);
        self.filters = FilterConfig::for_bounds(min_cap);
    }

    pub fn invalidate_view(&mut self) {
        self.view = None;
        self.view_key = None;
    }

    /// Rebuild the derived view if the filters changed since the last build
    pub fn refresh_view(&mut self) -> Result<()> {
        let Some(universe) = &self.universe else {
            self.invalidate_view();
            return Ok(());
        };

        if self.view.is_some() && self.view_key.as_ref() == Some(&self.filters) {
            return Ok(());
        }

        let selection = universe.filter(&self.filters)?;
        self.view = Some(FilteredView::build(selection));
        self.view_key = Some(self.filters.clone());
        self.view_version += 1;
        Ok(())
    }

    fn push_recent(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn loaded_state() -> (AppState, tempfile::NamedTempFile) {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Ticker,Sector,Industry,Market_Cap,PE_Ratio,y25td_Return").unwrap();
        writeln!(file, "AAPL,Tech,Hardware,3000,30,10").unwrap();
        writeln!(file, "MSFT,Tech,Software,2000,35,20").unwrap();
        writeln!(file, "JPM,Financials,Banks,1000,12,-5").unwrap();
        file.flush().unwrap();

        let universe = Universe::load(file.path()).unwrap();
        let mut state = AppState::new();
        state.set_universe(file.path().to_path_buf(), universe);
        (state, file)
    }

    #[test]
    fn test_set_universe_resets_filters_to_min_cap() {
        let (state, file) = loaded_state();
        assert_eq!(state.filters.min_market_cap, 1000.0);
        assert_eq!(state.filters.sector, SectorFilter::All);
        assert_eq!(state.current_file.as_deref(), Some(file.path()));
        assert_eq!(state.recent_files.len(), 1);
    }

    #[test]
    fn test_refresh_view_is_memoised() {
        let (mut state, _file) = loaded_state();

        state.refresh_view().unwrap();
        assert_eq!(state.view_version, 1);
        assert_eq!(state.view.as_ref().unwrap().selection.len(), 3);

        state.refresh_view().unwrap();
        assert_eq!(state.view_version, 1);

        state.filters.sector = SectorFilter::Named("Tech".to_string());
        state.refresh_view().unwrap();
        assert_eq!(state.view_version, 2);

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.selection.tickers(), vec!["AAPL", "MSFT"]);
        assert_eq!(view.kpis.top_performer.as_ref().unwrap().ticker, "MSFT");
    }

    #[test]
    fn test_load_error_clears_view() {
        let (mut state, _file) = loaded_state();
        state.refresh_view().unwrap();

        state.set_load_error("missing");
        assert!(!state.has_data());
        assert!(state.view.is_none());
        assert_eq!(state.load_error.as_deref(), Some("missing"));
    }

    #[test]
    fn test_reset_filters() {
        let (mut state, _file) = loaded_state();
        state.filters.min_market_cap = 2500.0;
        state.filters.sector = SectorFilter::Named("Tech".to_string());

        state.reset_filters();
        assert_eq!(state.filters, FilterConfig::for_bounds(1000.0));
    }
}
