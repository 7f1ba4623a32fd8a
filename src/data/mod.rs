pub mod history;
pub mod kpi;
pub mod selection;
pub mod source;
pub mod treemap;

// Re-export key types for convenience
pub use history::{
    HistoryCache, HistoryEntry, HistoryProvider, HistoryWindow, PriceHistory, YahooHistoryProvider,
};
pub use kpi::Kpis;
pub use selection::{Constituent, Selection, SortColumn};
pub use source::Universe;
pub use treemap::{ColorScale, TreemapNode};
