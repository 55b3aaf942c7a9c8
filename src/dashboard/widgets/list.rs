use super::WidgetAction;
use crate::dashboard::model::WidgetConfig;
use crate::dashboard::renderer::ListView;
use eframe::egui;

pub(super) fn paint(
    ui: &mut egui::Ui,
    widget: &WidgetConfig,
    view: &ListView,
) -> Option<WidgetAction> {
    if view.items.is_empty() {
        ui.label(egui::RichText::new("Nothing to show").color(ui.visuals().weak_text_color()));
        return None;
    }
    let mut clicked = None;
    for item in &view.items {
        ui.push_id(&item.id, |ui| {
            let resp = ui
                .horizontal(|ui| {
                    let title = ui.add(
                        egui::Label::new(egui::RichText::new(&item.title).strong())
                            .sense(egui::Sense::click()),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(ts) = &item.timestamp {
                            ui.small(ts);
                        }
                        if let Some(status) = &item.status {
                            ui.label(egui::RichText::new(status).color(status_color(status)));
                        }
                    });
                    title
                })
                .inner;
            if let Some(sub) = &item.subtitle {
                ui.small(sub);
            }
            if resp.clicked() {
                tracing::debug!(widget = %widget.id, item = %item.id, "list item clicked");
                clicked = Some(WidgetAction::item_click(widget, item));
            }
        });
        ui.separator();
    }
    clicked
}

fn status_color(status: &str) -> egui::Color32 {
    match status.to_ascii_lowercase().as_str() {
        "completed" | "success" | "paid" => egui::Color32::from_rgb(34, 160, 90),
        "pending" | "processing" => egui::Color32::from_rgb(220, 160, 40),
        "failed" | "cancelled" => egui::Color32::from_rgb(210, 60, 60),
        _ => egui::Color32::GRAY,
    }
}
