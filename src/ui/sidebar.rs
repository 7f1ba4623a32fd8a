use crate::app::MarketDashboard;
use crate::widgets::FilterControls;

/// Render the filter sidebar and file controls
pub fn render_sidebar(app: &mut MarketDashboard, ctx: &eframe::egui::Context, ui: &mut eframe::egui::Ui) {
    profiling::scope!("render_sidebar");

    ui.horizontal(|ui| {
        if ui.button("📂").on_hover_text("Open snapshot CSV").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv"])
                .pick_file()
            {
                app.load_file(path);
            }
        }

        if !app.state.recent_files.is_empty() {
            eframe::egui::ComboBox::from_id_salt("recent_files")
                .selected_text("📋")
                .show_ui(ui, |ui| {
                    ui.label("Recent Files:");
                    ui.separator();
                    for path in app.state.recent_files.clone() {
                        if let Some(name) = path.file_name() {
                            if ui.button(name.to_string_lossy()).clicked() {
                                app.load_file(path.clone());
                            }
                        }
                    }
                });
        }

        ui.separator();

        if ui.button("💾").on_hover_text("Export filtered CSV").clicked() {
            app.export_csv();
        }
        if ui.button("⚙").on_hover_text("Save settings").clicked() {
            app.save_settings();
        }
        if ui.button("📥").on_hover_text("Load settings").clicked() {
            app.load_settings();
        }
    });

    ui.horizontal(|ui| {
        let theme_icon = if app.state.ui.dark_mode { "🌙" } else { "☀" };
        if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
            app.state.ui.dark_mode = !app.state.ui.dark_mode;
        }
        if ui.button("❓").on_hover_text("Help (F1)").clicked() {
            app.state.ui.show_help = !app.state.ui.show_help;
        }
    });

    if let Some(file) = &app.state.current_file {
        ui.label(format!(
            "📄 {}",
            file.file_name().and_then(|n| n.to_str()).unwrap_or("Unknown")
        ))
        .on_hover_text(file.display().to_string());
    }

    ui.separator();

    let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
    if let Some(path) = dropped {
        app.load_file(path);
    }

    ui.heading("🔍 Filters");
    ui.add_space(4.0);

    let Some(universe) = &app.state.universe else {
        ui.label("No snapshot loaded");
        return;
    };

    let options = universe.sector_options();
    let bounds = universe.market_cap_bounds();

    FilterControls::new(&mut app.state.filters, &options, bounds).show(ui);

    ui.add_space(8.0);

    if app.state.filters.has_active_filters(bounds.0) && ui.button("Reset filters").clicked() {
        app.state.reset_filters();
    }
}
