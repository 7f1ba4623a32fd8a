use crate::constants::treemap::{HEADER_HEIGHT, MIN_LABEL_HEIGHT, MIN_LABEL_WIDTH, PADDING};
use crate::data::treemap::{Bounds, TreemapTile, layout};
use crate::state::FilteredView;
use crate::widgets::format_dollars;
use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, StrokeKind, pos2, vec2};

const LEGEND_STEPS: usize = 48;

fn to_rect(b: Bounds) -> Rect {
    Rect::from_min_size(pos2(b.x as f32, b.y as f32), vec2(b.w as f32, b.h as f32))
}

fn to_color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Black on light fills, white on dark ones
fn label_color(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn format_return(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        "N/A".to_string()
    }
}

/// Render the sector treemap with hover details and a colour legend
pub fn render_treemap(view: &FilteredView, height: f32, ui: &mut egui::Ui) {
    profiling::scope!("render_treemap");

    if view.treemap.children.is_empty() {
        ui.label("No constituents with a market cap in the current selection.");
        return;
    }

    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let bounds = Bounds::new(
        rect.left() as f64,
        rect.top() as f64,
        rect.width() as f64,
        rect.height() as f64,
    );
    let tiles = layout(&view.treemap, bounds, HEADER_HEIGHT as f64, PADDING as f64);

    let painter = ui.painter_at(rect);
    let border = ui.visuals().extreme_bg_color;

    for tile in &tiles {
        let tile_rect = to_rect(tile.bounds);
        if tile_rect.width() < 0.5 || tile_rect.height() < 0.5 {
            continue;
        }

        let fill = to_color(view.color_scale.color_for(tile.color_value));
        painter.rect_filled(tile_rect, 0.0, fill);
        painter.rect_stroke(tile_rect, 0.0, Stroke::new(1.0, border), StrokeKind::Inside);

        if tile_rect.width() < MIN_LABEL_WIDTH || tile_rect.height() < MIN_LABEL_HEIGHT {
            continue;
        }

        let clipped = painter.with_clip_rect(tile_rect.shrink(1.0));
        let text_color = label_color(fill);
        if tile.leaf.is_some() {
            let size = (tile_rect.height() / 4.0).clamp(9.0, 18.0);
            let text = if tile_rect.height() >= size * 3.0 {
                format!("{}\n{}", tile.label(), format_return(tile.color_value))
            } else {
                tile.label().to_string()
            };
            clipped.text(
                tile_rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(size),
                text_color,
            );
        } else {
            clipped.text(
                tile_rect.left_top() + vec2(3.0, 1.0),
                Align2::LEFT_TOP,
                tile.label(),
                FontId::proportional(11.0),
                text_color,
            );
        }
    }

    // Parents come first, so the last hit is the deepest tile
    let hovered = response
        .hover_pos()
        .and_then(|pos| tiles.iter().rev().find(|t| to_rect(t.bounds).contains(pos)));

    if let Some(tile) = hovered {
        painter.rect_stroke(
            to_rect(tile.bounds),
            0.0,
            Stroke::new(2.0, ui.visuals().strong_text_color()),
            StrokeKind::Inside,
        );
        response.on_hover_ui_at_pointer(|ui| render_tooltip(tile, ui));
    }

    ui.add_space(4.0);
    render_legend(view, ui);
}

fn render_tooltip(tile: &TreemapTile, ui: &mut egui::Ui) {
    ui.strong(tile.path.join(" / "));
    match &tile.leaf {
        Some(leaf) => {
            ui.label(format!("Market_Cap: {}", format_dollars(leaf.market_cap)));
            if leaf.pe_ratio.is_finite() {
                ui.label(format!("PE_Ratio: {:.2}", leaf.pe_ratio));
            } else {
                ui.label("PE_Ratio: N/A");
            }
            ui.label(format!("y25td_Return: {}", format_return(leaf.ytd_return)));
        }
        None => {
            ui.label(format!("Market_Cap: {}", format_dollars(tile.value)));
            ui.label(format!(
                "y25td_Return (cap weighted): {}",
                format_return(tile.color_value)
            ));
        }
    }
}

fn render_legend(view: &FilteredView, ui: &mut egui::Ui) {
    let (lo, hi) = view.color_scale.domain();
    let width = ui.available_width().min(360.0);

    ui.horizontal(|ui| {
        ui.small(format_return(lo));
        let (bar, _) = ui.allocate_exact_size(vec2(width, 12.0), Sense::hover());
        let painter = ui.painter();
        let step = bar.width() / LEGEND_STEPS as f32;
        for i in 0..LEGEND_STEPS {
            let t = (i as f64 + 0.5) / LEGEND_STEPS as f64;
            let value = lo + (hi - lo) * t;
            let cell = Rect::from_min_size(
                pos2(bar.left() + i as f32 * step, bar.top()),
                vec2(step + 0.5, bar.height()),
            );
            painter.rect_filled(cell, 0.0, to_color(view.color_scale.color_for(value)));
        }
        ui.small(format_return(hi));
        ui.small("y25td_Return");
    });
}
