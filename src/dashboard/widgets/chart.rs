use crate::dashboard::renderer::{ChartKind, ChartPoint, ChartView};
use eframe::egui;
use std::f32::consts::TAU;

const CHART_HEIGHT: f32 = 140.0;

pub fn chart_palette(idx: usize) -> egui::Color32 {
    const PALETTE: [egui::Color32; 5] = [
        egui::Color32::from_rgb(59, 130, 246),
        egui::Color32::from_rgb(16, 185, 129),
        egui::Color32::from_rgb(245, 158, 11),
        egui::Color32::from_rgb(239, 68, 68),
        egui::Color32::from_rgb(139, 92, 246),
    ];
    PALETTE[idx % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub start: f32,
    pub sweep: f32,
}

/// Angular slices for a radial chart. Non-positive values get no slice.
pub fn pie_slices(points: &[ChartPoint]) -> Vec<PieSlice> {
    let total: f64 = points.iter().map(|p| p.value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    points
        .iter()
        .filter(|p| p.value > 0.0)
        .map(|p| {
            let sweep = (p.value / total) as f32 * TAU;
            let slice = PieSlice {
                label: p.label.clone(),
                start,
                sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}

pub(super) fn paint(ui: &mut egui::Ui, view: &ChartView) {
    if view.points.is_empty() {
        ui.label(egui::RichText::new("No data points").color(ui.visuals().weak_text_color()));
        return;
    }
    let width = ui.available_width().max(80.0);
    let (response, painter) =
        ui.allocate_painter(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    let rect = response.rect.shrink(4.0);
    match view.kind {
        ChartKind::Pie | ChartKind::Doughnut => paint_radial(ui, &painter, rect, view),
        ChartKind::Bar => paint_bars(&painter, rect, &view.points),
        ChartKind::Line => paint_line(&painter, rect, &view.points, false),
        ChartKind::Area => paint_line(&painter, rect, &view.points, true),
    }
    if !view.kind.is_radial() {
        ui.horizontal(|ui| {
            if let (Some(first), Some(last)) = (view.points.first(), view.points.last()) {
                ui.small(&first.label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(&last.label);
                });
            }
        });
    }
}

fn max_value(points: &[ChartPoint]) -> f32 {
    points
        .iter()
        .map(|p| p.value as f32)
        .fold(0.0_f32, f32::max)
        .max(f32::EPSILON)
}

fn value_to_y(rect: egui::Rect, value: f64, max: f32) -> f32 {
    rect.bottom() - (value.max(0.0) as f32 / max) * rect.height()
}

fn paint_bars(painter: &egui::Painter, rect: egui::Rect, points: &[ChartPoint]) {
    let max = max_value(points);
    let slot = rect.width() / points.len() as f32;
    for (idx, point) in points.iter().enumerate() {
        let left = rect.left() + slot * idx as f32 + slot * 0.15;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, value_to_y(rect, point.value, max)),
            egui::pos2(left + slot * 0.7, rect.bottom()),
        );
        painter.rect_filled(bar, 2.0, chart_palette(0));
    }
}

fn paint_line(painter: &egui::Painter, rect: egui::Rect, points: &[ChartPoint], fill: bool) {
    let max = max_value(points);
    let step = if points.len() > 1 {
        rect.width() / (points.len() - 1) as f32
    } else {
        0.0
    };
    let line: Vec<egui::Pos2> = points
        .iter()
        .enumerate()
        .map(|(idx, p)| egui::pos2(rect.left() + step * idx as f32, value_to_y(rect, p.value, max)))
        .collect();
    let color = chart_palette(0);
    if fill {
        let area = color.gamma_multiply(0.25);
        for pair in line.windows(2) {
            let quad = vec![
                egui::pos2(pair[0].x, rect.bottom()),
                pair[0],
                pair[1],
                egui::pos2(pair[1].x, rect.bottom()),
            ];
            painter.add(egui::Shape::convex_polygon(quad, area, egui::Stroke::NONE));
        }
    }
    if line.len() == 1 {
        painter.circle_filled(line[0], 3.0, color);
    } else {
        painter.add(egui::Shape::line(line, egui::Stroke::new(2.0, color)));
    }
}

fn paint_radial(ui: &egui::Ui, painter: &egui::Painter, rect: egui::Rect, view: &ChartView) {
    let center = rect.center();
    let radius = rect.height().min(rect.width()) / 2.0;
    for (idx, slice) in pie_slices(&view.points).iter().enumerate() {
        let color = chart_palette(idx);
        let segments = ((slice.sweep / TAU) * 64.0).ceil().max(1.0) as usize;
        let step = slice.sweep / segments as f32;
        for seg in 0..segments {
            let a0 = slice.start + step * seg as f32;
            let a1 = a0 + step;
            let tri = vec![
                center,
                center + radius * egui::vec2(a0.cos(), a0.sin()),
                center + radius * egui::vec2(a1.cos(), a1.sin()),
            ];
            painter.add(egui::Shape::convex_polygon(tri, color, egui::Stroke::NONE));
        }
    }
    if view.kind == ChartKind::Doughnut {
        painter.circle_filled(center, radius * 0.55, ui.visuals().panel_fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            label: label.into(),
            value,
        }
    }

    #[test]
    fn slices_cover_full_circle() {
        let slices = pie_slices(&[point("a", 1.0), point("b", 3.0)]);
        assert_eq!(slices.len(), 2);
        let total: f32 = slices.iter().map(|s| s.sweep).sum();
        assert!((total - TAU).abs() < 1e-4);
        assert!((slices[1].start - TAU / 4.0).abs() < 1e-4);
    }

    #[test]
    fn slices_skip_non_positive() {
        assert!(pie_slices(&[point("a", 0.0)]).is_empty());
        assert_eq!(pie_slices(&[point("a", -2.0), point("b", 2.0)]).len(), 1);
    }
}
