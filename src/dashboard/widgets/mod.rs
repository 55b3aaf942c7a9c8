use crate::dashboard::data::ListItem;
use crate::dashboard::model::WidgetConfig;
use crate::dashboard::renderer::{SkeletonKind, WidgetView};
use eframe::egui;
use serde_json::{json, Value};

mod chart;
mod list;
mod stats;

pub use chart::{chart_palette, pie_slices, PieSlice};

/// Action name emitted when a list entry is clicked.
pub const ITEM_CLICK: &str = "item-click";

/// User action reported by a widget. New action names may be added without
/// changing this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetAction {
    pub action: String,
    pub payload: Value,
}

impl WidgetAction {
    pub fn item_click(widget: &WidgetConfig, item: &ListItem) -> Self {
        Self {
            action: ITEM_CLICK.into(),
            payload: json!({ "widget": widget, "item": item }),
        }
    }
}

const ERROR_ICON: &str = "⚠";
const INFO_ICON: &str = "ℹ";

/// Paint a resolved widget view. Returns the action the user triggered, if
/// any.
pub fn paint(ui: &mut egui::Ui, widget: &WidgetConfig, view: &WidgetView) -> Option<WidgetAction> {
    match view {
        WidgetView::Error { message } => {
            notice(ui, ERROR_ICON, message, ui.visuals().error_fg_color);
            None
        }
        WidgetView::Loading(kind) => {
            skeleton(ui, *kind);
            None
        }
        WidgetView::NoData => {
            notice(ui, INFO_ICON, "No data available", ui.visuals().weak_text_color());
            None
        }
        WidgetView::Stats(stats) => {
            stats::paint(ui, stats);
            None
        }
        WidgetView::Chart(chart) => {
            chart::paint(ui, chart);
            None
        }
        WidgetView::UnsupportedChart { chart_type } => {
            notice(
                ui,
                ERROR_ICON,
                &format!("Unsupported chart type: {chart_type}"),
                ui.visuals().warn_fg_color,
            );
            None
        }
        WidgetView::List(list) => list::paint(ui, widget, list),
        WidgetView::NotImplemented { widget_type } => {
            notice(
                ui,
                INFO_ICON,
                &format!("The {widget_type} widget is not yet implemented"),
                ui.visuals().weak_text_color(),
            );
            None
        }
        WidgetView::Unsupported { widget_type } => {
            notice(
                ui,
                ERROR_ICON,
                &format!("Unsupported widget type: {widget_type}"),
                ui.visuals().warn_fg_color,
            );
            None
        }
    }
}

fn notice(ui: &mut egui::Ui, icon: &str, message: &str, color: egui::Color32) {
    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(icon).size(22.0).color(color));
        ui.label(egui::RichText::new(message).color(color));
    });
}

fn skeleton(ui: &mut egui::Ui, kind: SkeletonKind) {
    let fill = ui.visuals().faint_bg_color;
    let width = ui.available_width().max(40.0);
    let bars: &[(f32, f32)] = match kind {
        SkeletonKind::Stats => &[(0.5, 28.0), (0.3, 14.0)],
        SkeletonKind::Chart => &[(1.0, 120.0)],
        SkeletonKind::List => &[(0.9, 14.0), (0.7, 14.0), (0.8, 14.0), (0.6, 14.0)],
    };
    for (fraction, height) in bars {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(width * fraction, *height), egui::Sense::hover());
        ui.painter().rect_filled(rect, 4.0, fill);
    }
}
