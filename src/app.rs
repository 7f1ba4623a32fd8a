use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, CentralPanel, Color32, ScrollArea, SidePanel, TopBottomPanel};

use crate::config::DashboardConfig;
use crate::constants::{config, layout, performance};
use crate::data::{HistoryCache, HistoryWindow, YahooHistoryProvider};
use crate::state::{AppState, FilterConfig, SectorFilter};
use crate::ui;
use crate::worker::{BackgroundWorker, WorkerRequest, WorkerResult};

pub struct MarketDashboard {
    pub state: AppState,
    pub config: DashboardConfig,
    worker: BackgroundWorker,
    /// Filters from a settings file, applied once the snapshot arrives
    pending_filters: Option<FilterConfig>,
}

impl MarketDashboard {
    /// Start the worker and request the configured snapshot
    pub fn new(config: DashboardConfig) -> Self {
        let worker = BackgroundWorker::spawn(YahooHistoryProvider::new);
        Self::with_worker(config, worker)
    }

    pub fn with_worker(config: DashboardConfig, worker: BackgroundWorker) -> Self {
        let mut state = AppState::new();
        state.ui.dark_mode = config.dark_mode;

        let mut app = Self {
            state,
            pending_filters: config.filters.clone(),
            config,
            worker,
        };
        let path = app.config.data_path.clone();
        app.load_file(path);
        app
    }

    /// Queue a snapshot load; the result arrives through `poll_worker`
    pub fn load_file(&mut self, path: PathBuf) {
        tracing::info!(path = %path.display(), "loading snapshot");
        self.state.loading = true;
        self.state.load_error = None;
        if let Err(e) = self.worker.request(WorkerRequest::LoadFile { path }) {
            self.state.set_load_error(e.user_message());
        }
    }

    /// Queue a price history fetch for `ticker`
    pub fn request_history(&mut self, ticker: &str) {
        self.state.history.mark_pending(ticker);
        let request = WorkerRequest::FetchHistory {
            ticker: ticker.to_string(),
            window: self.config.history_window(),
        };
        if let Err(e) = self.worker.request(request) {
            self.state.history.insert_failed(ticker, e.user_message());
        }
    }

    /// Drain finished background work
    pub fn poll_worker(&mut self) {
        while let Some(result) = self.worker.poll() {
            self.handle_result(result);
        }
    }

    fn handle_result(&mut self, result: WorkerResult) {
        match result {
            WorkerResult::FileLoaded { path, universe } => {
                tracing::info!(path = %path.display(), rows = universe.height(), "snapshot loaded");
                self.state.set_universe(path.clone(), universe);
                self.config.data_path = path;
                if let Some(filters) = self.pending_filters.take() {
                    self.apply_filters(filters);
                }
            }
            WorkerResult::LoadFailed { path, error } => {
                tracing::error!(path = %path.display(), error = %error, "snapshot unavailable");
                self.state.set_load_error(format!("{}: {}", error.title(), error.user_message()));
            }
            WorkerResult::HistoryReady { history, window } => {
                if self.is_current_window(&history.ticker, &window) {
                    self.state.history.insert_ready(history);
                }
            }
            WorkerResult::HistoryFailed {
                ticker,
                window,
                error,
            } => {
                if self.is_current_window(&ticker, &window) {
                    self.state.history.insert_failed(&ticker, error.user_message());
                }
            }
        }
    }

    /// Results fetched for a window the settings no longer ask for are dropped
    fn is_current_window(&self, ticker: &str, window: &HistoryWindow) -> bool {
        let current = *window == self.config.history_window();
        if !current {
            tracing::debug!(ticker, range = %window.range, "discarding stale price history");
        }
        current
    }

    /// Install saved filters, fitted to the loaded snapshot
    fn apply_filters(&mut self, mut filters: FilterConfig) {
        let Some(universe) = &self.state.universe else {
            return;
        };
        filters.clamp_to(universe.market_cap_bounds());
        if let SectorFilter::Named(name) = &filters.sector {
            if !universe.sectors().contains(name) {
                tracing::warn!(sector = %name, "saved sector not in snapshot, using All");
                filters.sector = SectorFilter::All;
            }
        }
        self.state.filters = filters;
    }

    /// Settings reflecting what is on screen now
    pub fn current_config(&self) -> DashboardConfig {
        DashboardConfig {
            data_path: self
                .state
                .current_file
                .clone()
                .unwrap_or_else(|| self.config.data_path.clone()),
            dark_mode: self.state.ui.dark_mode,
            filters: self.state.has_data().then(|| self.state.filters.clone()),
            ..self.config.clone()
        }
    }

    /// Replace the running settings; reloads the snapshot when the path changed
    pub fn apply_config(&mut self, new_config: DashboardConfig) {
        self.state.ui.dark_mode = new_config.dark_mode;

        // The worker keeps running; in-flight fetches for the old window are dropped on arrival
        if new_config.history_window() != self.config.history_window() {
            self.state.history = HistoryCache::default();
        }

        let reload = self.state.current_file.as_ref() != Some(&new_config.data_path);
        let filters = new_config.filters.clone();
        let path = new_config.data_path.clone();
        self.config = new_config;

        if reload {
            self.pending_filters = filters;
            self.load_file(path);
        } else if let Some(filters) = filters {
            self.apply_filters(filters);
        }
    }

    pub fn export_csv(&mut self) {
        let Some(view) = &self.state.view else {
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("sp500_filtered.csv")
            .save_file()
        {
            if let Err(e) = view.selection.export_csv(&path) {
                self.state.ui.set_error(e.user_message());
            }
        }
    }

    pub fn save_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(config::CONFIG_FILE)
            .save_file()
        {
            if let Err(e) = self.current_config().save(&path) {
                self.state.ui.set_error(format!("Failed to save settings: {}", e.user_message()));
            }
        }
    }

    pub fn load_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            match DashboardConfig::load(&path) {
                Ok(loaded) => self.apply_config(loaded),
                Err(e) => {
                    self.state.ui.set_error(format!("Failed to load settings: {}", e.user_message()));
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut open_dialog = false;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::T) {
                self.state.ui.dark_mode = !self.state.ui.dark_mode;
            }
            if i.key_pressed(egui::Key::H) || i.key_pressed(egui::Key::F1) {
                self.state.ui.show_help = !self.state.ui.show_help;
            }
            if i.key_pressed(egui::Key::Escape) {
                self.state.ui.show_help = false;
            }
            if i.modifiers.command && i.key_pressed(egui::Key::R) {
                self.state.reset_filters();
            }
            if i.modifiers.command && i.key_pressed(egui::Key::O) {
                open_dialog = true;
            }
        });

        if open_dialog {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv"])
                .pick_file()
            {
                self.load_file(path);
            }
        }
    }

    fn render_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("📈 S&P 500 Market Dashboard");

        if let Some(message) = &self.state.load_error {
            ui.add_space(8.0);
            ui.colored_label(Color32::from_rgb(214, 39, 40), format!("⚠ {}", message));
            ui.label("Open a snapshot with 📂 or drop a CSV file on the window.");
            return;
        }

        if !self.state.has_data() {
            if self.state.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading snapshot...");
                });
            }
            return;
        }

        if let Err(e) = self.state.refresh_view() {
            tracing::error!(error = %e, "failed to apply filters");
            self.state.ui.set_error(e.user_message());
        }

        let Some(view) = &self.state.view else {
            return;
        };

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label("Showing ");
            ui.strong(self.state.filters.sector.label());
            ui.label(" sector, ");
            ui.strong(view.selection.len().to_string());
            ui.label(" stocks");
        });
        ui.add_space(8.0);

        ui::render_kpi_cards(view, ui);
        ui.add_space(8.0);

        ui.heading("🗺 Sector Treemap");
        ui::render_treemap(view, self.config.treemap_height, ui);
        ui.add_space(8.0);

        ui.heading("📋 Constituents");
        ui::render_data_table(view, &mut self.state.ui, self.state.view_version, ui);

        ui.separator();
        ui::render_history(self, ui);
    }

    fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(name) = self.state.current_file.as_ref().and_then(|f| f.file_name()) {
                ui.label(format!("📁 {}", name.to_string_lossy()));
                ui.separator();
            }
            ui.label(format!("Rows: {}", self.state.row_count()));
            if let Some(view) = &self.state.view {
                ui.separator();
                ui.label(format!("Filtered: {}", view.selection.len()));
            }
            if self.state.history.len() > 0 {
                ui.separator();
                ui.label(format!("Histories: {}", self.state.history.len()));
            }
            if let Some(message) = self.state.ui.error_message.clone() {
                ui.separator();
                ui.colored_label(Color32::from_rgb(214, 39, 40), message);
                if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                    self.state.ui.clear_error();
                }
            }
        });
    }
}

impl eframe::App for MarketDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::scope!("update");

        self.poll_worker();

        if self.state.ui.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.handle_shortcuts(ctx);

        SidePanel::left("filters")
            .default_width(layout::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| ui::render_sidebar(self, ctx, ui));
            });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.render_status_bar(ui));

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.render_page(ui));
        });

        ui::render_help_dialog(self, ctx);

        if self.state.loading || self.state.history.any_pending() {
            ctx.request_repaint_after(Duration::from_millis(performance::POLL_INTERVAL_MS));
        }

        profiling::finish_frame!();
    }
}
