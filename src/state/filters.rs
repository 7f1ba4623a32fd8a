//! Sidebar filter configuration

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::filters::ALL_SECTORS;

/// Sector picker value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectorFilter {
    #[default]
    All,
    Named(String),
}

impl SectorFilter {
    /// Parse a picker entry; "All" disables the predicate
    pub fn from_option(option: &str) -> Self {
        if option == ALL_SECTORS {
            SectorFilter::All
        } else {
            SectorFilter::Named(option.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SectorFilter::All => ALL_SECTORS,
            SectorFilter::Named(name) => name,
        }
    }
}

impl fmt::Display for SectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter configuration applied to the universe, market cap first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub sector: SectorFilter,

    /// Rows with a smaller Market_Cap are dropped
    pub min_market_cap: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sector: SectorFilter::All,
            min_market_cap: 0.0,
        }
    }
}

impl FilterConfig {
    /// Default filters for a snapshot: every sector, threshold at the smallest cap
    pub fn for_bounds(min_market_cap: f64) -> Self {
        Self {
            sector: SectorFilter::All,
            min_market_cap,
        }
    }

    /// Check if any filters are active
    pub fn has_active_filters(&self, lower_bound: f64) -> bool {
        self.sector != SectorFilter::All || self.min_market_cap > lower_bound
    }

    /// Keep the threshold inside the slider range
    pub fn clamp_to(&mut self, bounds: (f64, f64)) {
        let (lo, hi) = bounds;
        if lo <= hi {
            self.min_market_cap = self.min_market_cap.clamp(lo, hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_filter_from_option() {
        assert_eq!(SectorFilter::from_option("All"), SectorFilter::All);
        assert_eq!(
            SectorFilter::from_option("Energy"),
            SectorFilter::Named("Energy".to_string())
        );
        assert_eq!(SectorFilter::Named("Energy".to_string()).to_string(), "Energy");
        assert_eq!(SectorFilter::All.to_string(), "All");
    }

    #[test]
    fn test_active_filters() {
        let filter = FilterConfig::for_bounds(100.0);
        assert!(!filter.has_active_filters(100.0));

        let mut filter = filter;
        filter.min_market_cap = 150.0;
        assert!(filter.has_active_filters(100.0));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let mut filter = FilterConfig::for_bounds(5e12);
        filter.clamp_to((1e9, 3e12));
        assert_eq!(filter.min_market_cap, 3e12);
    }
}
