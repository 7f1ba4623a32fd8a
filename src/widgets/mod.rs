//! Reusable UI widgets for the dashboard

mod filter_controls;
mod metric_card;

pub use filter_controls::{FilterControls, format_dollars};
pub use metric_card::MetricCard;
