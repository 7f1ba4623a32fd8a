//! Dashboard settings file

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{data, history, treemap};
use crate::data::HistoryWindow;
use crate::error::{DashboardError, Result};
use crate::state::FilterConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Snapshot CSV
    pub data_path: PathBuf,
    pub dark_mode: bool,
    pub treemap_height: f32,
    /// Yahoo range for the price history chart
    pub history_range: String,
    /// Yahoo bar interval for the price history chart
    pub history_interval: String,
    /// Filters to apply after the snapshot loads
    pub filters: Option<FilterConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(data::DEFAULT_DATA_FILE),
            dark_mode: true,
            treemap_height: treemap::DEFAULT_HEIGHT,
            history_range: history::DEFAULT_RANGE.to_string(),
            history_interval: history::DEFAULT_INTERVAL.to_string(),
            filters: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Range and interval used for price history requests
    pub fn history_window(&self) -> HistoryWindow {
        HistoryWindow::new(self.history_range.clone(), self.history_interval.clone())
    }

    fn validate(&self) -> Result<()> {
        if !(self.treemap_height.is_finite() && self.treemap_height > 0.0) {
            return Err(DashboardError::Config(format!(
                "treemap_height must be positive, got {}",
                self.treemap_height
            )));
        }
        if self.history_range.trim().is_empty() || self.history_interval.trim().is_empty() {
            return Err(DashboardError::Config(
                "history_range and history_interval must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
