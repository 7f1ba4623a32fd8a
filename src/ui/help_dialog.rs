use crate::app::MarketDashboard;

pub fn render_help_dialog(app: &mut MarketDashboard, ctx: &eframe::egui::Context) {
    if app.state.ui.show_help {
        eframe::egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(eframe::egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Keyboard");
                ui.label("T - Toggle dark/light theme");
                ui.label("Ctrl + O - Open snapshot");
                ui.label("Ctrl + R - Reset filters");
                ui.label("H / F1 - Toggle help");
                ui.label("ESC - Close help");

                ui.separator();
                ui.heading("Mouse");
                ui.label("Hover a treemap tile - Show details");
                ui.label("Click a column header - Sort the table");
                ui.label("Scroll / drag on the price chart - Zoom and pan");
                ui.label("Drop a CSV on the window - Load it");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.ui.show_help = false;
                }
            });
    }
}
