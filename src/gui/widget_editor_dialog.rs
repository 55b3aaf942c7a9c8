use crate::dashboard::builder::DashboardBuilder;
use crate::dashboard::model::WidgetSize;
use eframe::egui;
use serde_json::Value;

/// Window editing the builder's working copy of one widget.
#[derive(Default)]
pub struct WidgetEditorDialog {
    widget_id: Option<String>,
    description: String,
    config_text: String,
    error: Option<String>,
}

impl WidgetEditorDialog {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the id of the widget whose edit was committed this frame.
    pub fn ui(&mut self, ctx: &egui::Context, builder: &mut DashboardBuilder) -> Option<String> {
        let Some(editing) = builder.editing() else {
            if self.widget_id.is_some() {
                self.reset();
            }
            return None;
        };
        if self.widget_id.as_deref() != Some(editing.id.as_str()) {
            self.widget_id = Some(editing.id.clone());
            self.description = editing.description.clone().unwrap_or_default();
            self.config_text =
                serde_json::to_string_pretty(&editing.config).unwrap_or_else(|_| "{}".into());
            self.error = None;
        }

        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        egui::Window::new("Edit widget")
            .open(&mut open)
            .resizable(true)
            .collapsible(false)
            .show(ctx, |ui| {
                if let Some(widget) = builder.editing_mut() {
                    ui.horizontal(|ui| {
                        ui.label("Type");
                        ui.monospace(widget.widget_type.as_str());
                    });
                    ui.horizontal(|ui| {
                        ui.label("Title");
                        ui.text_edit_singleline(&mut widget.title);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Description");
                        ui.text_edit_singleline(&mut self.description);
                    });
                    egui::ComboBox::from_label("Size")
                        .selected_text(widget.size.label().to_string())
                        .show_ui(ui, |ui| {
                            for size in WidgetSize::ALL {
                                let label = size.label().to_string();
                                ui.selectable_value(&mut widget.size, size, label);
                            }
                        });
                }
                ui.label("Settings (JSON)");
                ui.add(
                    egui::TextEdit::multiline(&mut self.config_text)
                        .code_editor()
                        .desired_rows(6),
                );
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if save {
            return self.commit(builder);
        }
        if cancel || !open {
            builder.close_editor();
            self.reset();
        }
        None
    }

    fn commit(&mut self, builder: &mut DashboardBuilder) -> Option<String> {
        let config: Value = match serde_json::from_str(&self.config_text) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) => {
                self.error = Some("Settings must be a JSON object".into());
                return None;
            }
            Err(e) => {
                self.error = Some(format!("Invalid settings: {e}"));
                return None;
            }
        };
        let description = self.description.trim();
        if let Some(widget) = builder.editing_mut() {
            widget.config = config;
            widget.description = (!description.is_empty()).then(|| description.to_string());
        }
        let id = self.widget_id.clone();
        match builder.commit_edit() {
            Ok(()) => {
                self.reset();
                id
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
