//! KPI card widget

use egui::{Color32, Response, RichText, Ui};

/// Label, headline value and an optional signed delta
pub struct MetricCard<'a> {
    label: &'a str,
    value: &'a str,
    delta: Option<&'a str>,
}

impl<'a> MetricCard<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            delta: None,
        }
    }

    /// Delta shown under the value; a leading '-' renders red, anything else green
    pub fn delta(mut self, delta: Option<&'a str>) -> Self {
        self.delta = delta;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        ui.group(|ui| {
            ui.set_min_width(crate::constants::layout::METRIC_CARD_WIDTH);
            ui.vertical(|ui| {
                ui.label(RichText::new(self.label).small().weak());
                ui.label(RichText::new(self.value).size(24.0).strong());
                if let Some(delta) = self.delta {
                    let (arrow, color) = if delta.starts_with('-') {
                        ("↓", Color32::from_rgb(214, 39, 40))
                    } else {
                        ("↑", Color32::from_rgb(44, 160, 44))
                    };
                    ui.colored_label(color, format!("{} {}", arrow, delta));
                }
            });
        })
        .response
    }
}
