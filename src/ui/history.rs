use crate::app::MarketDashboard;
use crate::constants::layout::HISTORY_PLOT_HEIGHT;
use crate::data::{HistoryEntry, PriceHistory};
use crate::widgets::MetricCard;
use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32};
use egui_plot::{Line, Plot};

const NO_MATCH_WARNING: &str = "⚠️ No stocks match the current filters. Please adjust your selection.";

/// Render the ticker picker and its price history chart
pub fn render_history(app: &mut MarketDashboard, ui: &mut egui::Ui) {
    profiling::scope!("render_history");

    let tickers: Vec<String> = match &app.state.view {
        Some(view) => view.selection.tickers().into_iter().map(String::from).collect(),
        None => return,
    };

    if tickers.is_empty() {
        ui.colored_label(Color32::from_rgb(230, 160, 30), NO_MATCH_WARNING);
        return;
    }

    let refs: Vec<&str> = tickers.iter().map(String::as_str).collect();
    app.state.ui.sync_history_ticker(&refs);
    let Some(mut ticker) = app.state.ui.history_ticker.clone() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.label("Select a stock");
        egui::ComboBox::from_id_salt("history_ticker")
            .selected_text(ticker.as_str())
            .height(300.0)
            .show_ui(ui, |ui| {
                for t in &tickers {
                    ui.selectable_value(&mut ticker, t.clone(), t);
                }
            });
    });
    app.state.ui.history_ticker = Some(ticker.clone());

    ui.heading(format!(
        "📈 {} Price History ({})",
        ticker, app.config.history_range
    ));

    if app.state.history.needs_fetch(&ticker) {
        app.request_history(&ticker);
    }

    match app.state.history.get(&ticker).cloned() {
        Some(HistoryEntry::Ready(history)) => {
            let label = format!("{} Latest Close", history.ticker);
            let value = history.latest_close_label();
            MetricCard::new(&label, &value).show(ui);
            ui.add_space(4.0);
            render_price_plot(&history, ui);
        }
        Some(HistoryEntry::Failed(message)) => {
            ui.colored_label(Color32::from_rgb(214, 39, 40), format!("⚠ {}", message));
            if ui.button("Retry").clicked() {
                app.state.history.retry(&ticker);
            }
        }
        Some(HistoryEntry::Pending) | None => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Fetching {} price history...", ticker));
            });
        }
    }
}

fn render_price_plot(history: &PriceHistory, ui: &mut egui::Ui) {
    let points = history.as_plot_points();

    Plot::new("price_history")
        .height(HISTORY_PLOT_HEIGHT)
        .show_x(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark, _range| {
            DateTime::<Utc>::from_timestamp(mark.value as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .y_axis_formatter(|mark, _range| format!("${:.0}", mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(history.ticker.clone(), points).color(Color32::from_rgb(31, 119, 180)),
            );
        });
}
