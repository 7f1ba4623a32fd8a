use crate::state::FilteredView;
use crate::widgets::MetricCard;

/// Render the four KPI cards in one row
pub fn render_kpi_cards(view: &FilteredView, ui: &mut eframe::egui::Ui) {
    profiling::scope!("render_kpi_cards");

    let kpis = &view.kpis;
    let avg_return = kpis.avg_return_label();
    let avg_pe = kpis.avg_pe_label();
    let (top_ticker, top_delta) = kpis.top_performer_label();
    let total_cap = kpis.total_market_cap_label();

    ui.columns(4, |cols| {
        MetricCard::new("Avg YTD Return", &avg_return).show(&mut cols[0]);
        MetricCard::new("Avg P/E Ratio", &avg_pe).show(&mut cols[1]);
        MetricCard::new("Top Performer", &top_ticker)
            .delta(top_delta.as_deref())
            .show(&mut cols[2]);
        MetricCard::new("Total Market Cap", &total_cap).show(&mut cols[3]);
    });
}
