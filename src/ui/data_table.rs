use crate::constants::layout::{TABLE_HEADER_HEIGHT, TABLE_HEIGHT, TABLE_ROW_HEIGHT};
use crate::data::{Constituent, Selection, SortColumn};
use crate::state::{FilteredView, UiState};
use crate::widgets::format_dollars;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

/// Recompute sorted row indices for the current selection
fn recompute_indices(selection: &Selection, ui_state: &mut UiState, version: u64) {
    profiling::scope!("recompute_table_indices");

    let column = ui_state.sort_column;
    let ascending = ui_state.sort_ascending;
    ui_state.table.display_indices = selection.sorted_indices(column, ascending);
    ui_state.table.update_cache_keys(column, ascending, version);
}

fn cell_text(row: &Constituent, column: SortColumn) -> String {
    match column {
        SortColumn::Ticker => row.ticker.clone(),
        SortColumn::Sector => row.sector.clone(),
        SortColumn::Industry => row.industry.clone(),
        SortColumn::MarketCap => format_number(row.market_cap, 0),
        SortColumn::PeRatio => format_number(row.pe_ratio, 2),
        SortColumn::YtdReturn => format_number(row.ytd_return, 2),
    }
}

fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        String::new()
    }
}

/// Render the constituents table of the filtered view
pub fn render_data_table(
    view: &FilteredView,
    ui_state: &mut UiState,
    view_version: u64,
    ui: &mut egui::Ui,
) {
    profiling::scope!("render_data_table");

    let selection = &view.selection;

    if !ui_state
        .table
        .is_cache_valid(ui_state.sort_column, ui_state.sort_ascending, view_version)
    {
        recompute_indices(selection, ui_state, view_version);
    }

    ui.horizontal(|ui| {
        ui.label(format!("{} rows", selection.len()));
        ui.separator();
        let dir = if ui_state.sort_ascending { "↑" } else { "↓" };
        ui.small(format!("Sorted by {} {}", ui_state.sort_column.header(), dir));
        if ui.small_button("✖").on_hover_text("Restore default order").clicked() {
            ui_state.clear_sort();
        }
        ui.separator();
        if ui
            .small_button("Copy")
            .on_hover_text("Copy the table as tab separated text")
            .clicked()
        {
            let text = table_as_tsv(selection, &ui_state.table.display_indices);
            ui.ctx().copy_text(text);
        }
    });

    ui.separator();

    // Sorting may have been cleared above; never render stale indices
    if !ui_state
        .table
        .is_cache_valid(ui_state.sort_column, ui_state.sort_ascending, view_version)
    {
        recompute_indices(selection, ui_state, view_version);
    }

    let rows = selection.rows();
    let mut clicked_header = None;

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(TABLE_HEIGHT)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::initial(110.0).resizable(true).clip(true), SortColumn::ALL.len())
        .header(TABLE_HEADER_HEIGHT, |mut header| {
            for column in SortColumn::ALL {
                header.col(|ui| {
                    let indicator = if ui_state.sort_column == column {
                        if ui_state.sort_ascending { " ↑" } else { " ↓" }
                    } else {
                        ""
                    };
                    let btn = egui::Button::new(
                        egui::RichText::new(format!("{}{}", column.header(), indicator)).strong(),
                    )
                    .frame(false);
                    if ui.add(btn).on_hover_text("Click to sort").clicked() {
                        clicked_header = Some(column);
                    }
                });
            }
        })
        .body(|body| {
            let display_indices = &ui_state.table.display_indices;
            body.rows(TABLE_ROW_HEIGHT, display_indices.len(), |mut row| {
                let Some(record) = display_indices.get(row.index()).and_then(|&i| rows.get(i))
                else {
                    return;
                };
                for column in SortColumn::ALL {
                    row.col(|ui| {
                        let text = cell_text(record, column);
                        if column == SortColumn::Ticker {
                            ui.strong(text);
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });

    if let Some(column) = clicked_header {
        ui_state.toggle_sort(column);
    }
}

/// Selection rows in display order as TSV, header first
fn table_as_tsv(selection: &Selection, display_indices: &[usize]) -> String {
    let mut output = String::new();
    let headers: Vec<&str> = SortColumn::ALL.iter().map(|c| c.header()).collect();
    output.push_str(&headers.join("\t"));
    output.push('\n');

    for &idx in display_indices {
        let Some(row) = selection.rows().get(idx) else {
            continue;
        };
        let cells: Vec<String> = SortColumn::ALL.iter().map(|&c| cell_text(row, c)).collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }

    output
}
