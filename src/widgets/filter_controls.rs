//! Sector and market cap filter widget

use crate::state::{FilterConfig, SectorFilter};
use egui::{Response, Ui};

/// Sidebar filter controls: sector picker and minimum market cap slider
pub struct FilterControls<'a> {
    config: &'a mut FilterConfig,
    sector_options: &'a [String],
    cap_bounds: (f64, f64),
}

impl<'a> FilterControls<'a> {
    /// Create a new filter controls widget
    pub fn new(
        config: &'a mut FilterConfig,
        sector_options: &'a [String],
        cap_bounds: (f64, f64),
    ) -> Self {
        Self {
            config,
            sector_options,
            cap_bounds,
        }
    }

    /// Show the filter controls
    pub fn show(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| {
            ui.label("Sector");
            let mut selected = self.config.sector.label().to_string();
            egui::ComboBox::from_id_salt("sector_filter")
                .selected_text(&selected)
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for option in self.sector_options {
                        ui.selectable_value(&mut selected, option.clone(), option);
                    }
                });
            if selected != self.config.sector.label() {
                self.config.sector = SectorFilter::from_option(&selected);
            }

            ui.add_space(8.0);

            ui.label("Min Market Cap");
            let (lo, hi) = self.cap_bounds;
            self.config.clamp_to(self.cap_bounds);
            ui.add(
                egui::Slider::new(&mut self.config.min_market_cap, lo..=hi)
                    .step_by(1.0)
                    .custom_formatter(|v, _| format_dollars(v)),
            );
        })
        .response
    }
}

/// Compact dollar amount for slider labels
pub fn format_dollars(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("${:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else {
        format!("${:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(3.52e12), "$3.52T");
        assert_eq!(format_dollars(6.1e9), "$6.1B");
        assert_eq!(format_dollars(2.5e6), "$2.5M");
        assert_eq!(format_dollars(950.0), "$950");
    }
}
