use crate::dashboard::renderer::{StatsView, Trend};
use eframe::egui;

pub(super) fn paint(ui: &mut egui::Ui, view: &StatsView) {
    ui.label(egui::RichText::new(&view.value).size(28.0).strong());
    let (arrow, color) = match view.trend {
        Trend::Up => ("▲", egui::Color32::from_rgb(34, 160, 90)),
        Trend::Down => ("▼", egui::Color32::from_rgb(210, 60, 60)),
        Trend::Flat => ("■", ui.visuals().weak_text_color()),
    };
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{arrow} {}", view.change)).color(color));
        ui.label(
            egui::RichText::new(view.label.as_deref().unwrap_or("from last month"))
                .color(ui.visuals().weak_text_color()),
        );
    });
}
