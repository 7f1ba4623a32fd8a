mod data_table;
mod help_dialog;
mod history;
mod kpi_cards;
mod sidebar;
mod treemap;

pub use data_table::render_data_table;
pub use help_dialog::render_help_dialog;
pub use history::render_history;
pub use kpi_cards::render_kpi_cards;
pub use sidebar::render_sidebar;
pub use treemap::render_treemap;
