use crate::dashboard::data::WidgetState;
use crate::dashboard::error::DashboardError;
use crate::dashboard::grid::{self, DashboardGrid, GridEvent, ReorderDrag};
use crate::dashboard::history::LayoutHistory;
use crate::dashboard::model::{DashboardLayout, WidgetConfig, WidgetPosition, WidgetSize};
use crate::dashboard::templates::{self, TemplateCategory, WidgetTemplate};
use crate::dashboard::widgets::WidgetAction;
use eframe::egui;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Outcome of an editing session, handed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderEvent {
    /// The finished layout, unchanged, for the persistence collaborator.
    Saved(DashboardLayout),
    /// Edits were discarded; the caller restores its own copy.
    Cancelled,
}

/// Edit-mode controller. Every change to the layout goes through a pure
/// transform and replaces the held layout.
pub struct DashboardBuilder {
    layout: DashboardLayout,
    pub selected_category: Option<TemplateCategory>,
    catalogue_open: bool,
    editing: Option<WidgetConfig>,
    history: LayoutHistory,
    drag: ReorderDrag,
    issued_ids: HashSet<String>,
}

impl DashboardBuilder {
    pub fn new(layout: DashboardLayout) -> Self {
        let issued_ids = layout.widgets.iter().map(|w| w.id.clone()).collect();
        Self {
            layout,
            selected_category: None,
            catalogue_open: false,
            editing: None,
            history: LayoutHistory::default(),
            drag: ReorderDrag::default(),
            issued_ids,
        }
    }

    /// Builder for a fresh, empty layout.
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DashboardLayout::new(id, name))
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    fn apply(&mut self, next: DashboardLayout) {
        let previous = std::mem::replace(&mut self.layout, next);
        self.history.record(previous);
    }

    fn next_widget_id(&mut self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id = format!(
                "widget-{}-{:04x}",
                chrono::Utc::now().timestamp_millis(),
                rng.gen::<u16>()
            );
            if !self.issued_ids.contains(&id) && !self.layout.contains_widget(&id) {
                self.issued_ids.insert(id.clone());
                return id;
            }
        }
    }

    /// Instantiate `template` and append it. Returns the new widget id.
    pub fn add_widget(&mut self, template: &WidgetTemplate) -> String {
        let id = self.next_widget_id();
        let widget = WidgetConfig {
            id: id.clone(),
            widget_type: template.widget_type(),
            title: template.name.to_string(),
            description: Some(template.description.to_string()),
            size: WidgetSize::Medium,
            position: WidgetPosition::default(),
            config: template.default_config(),
        };
        tracing::debug!(widget = %id, template = template.key, "widget added");
        let next = self.layout.with_widget(widget);
        self.apply(next);
        self.catalogue_open = false;
        id
    }

    pub fn add_template(&mut self, key: &str) -> Result<String, DashboardError> {
        let template =
            templates::template(key).ok_or_else(|| DashboardError::UnknownTemplate(key.into()))?;
        Ok(self.add_widget(template))
    }

    /// Remove the widget from `widgets` and `widget_order` in one step.
    pub fn delete_widget(&mut self, id: &str) -> Result<(), DashboardError> {
        if !self.layout.contains_widget(id) && !self.layout.widget_order.iter().any(|o| o == id) {
            return Err(DashboardError::UnknownWidget(id.into()));
        }
        let next = self.layout.without_widget(id);
        self.apply(next);
        if self.editing.as_ref().is_some_and(|w| w.id == id) {
            self.editing = None;
        }
        tracing::debug!(widget = %id, "widget deleted");
        Ok(())
    }

    /// Open the editor on a copy of `widget`.
    pub fn edit_widget(&mut self, widget: &WidgetConfig) {
        self.editing = Some(widget.clone());
    }

    pub fn editing(&self) -> Option<&WidgetConfig> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut WidgetConfig> {
        self.editing.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    /// Replace the widget with the same id. `widget_order` is untouched.
    pub fn update_widget(&mut self, updated: WidgetConfig) -> Result<(), DashboardError> {
        let id = updated.id.clone();
        let next = self
            .layout
            .with_widget_replaced(updated)
            .ok_or_else(|| DashboardError::UnknownWidget(id.clone()))?;
        self.apply(next);
        tracing::debug!(widget = %id, "widget updated");
        Ok(())
    }

    /// Apply the editor copy and close the editor.
    pub fn commit_edit(&mut self) -> Result<(), DashboardError> {
        let Some(updated) = self.editing.take() else {
            return Ok(());
        };
        self.update_widget(updated)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let mut next = self.layout.clone();
        next.name = name.into();
        self.layout = next;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        let mut next = self.layout.clone();
        next.description = description.filter(|d| !d.trim().is_empty());
        self.layout = next;
    }

    /// Set the column count, clamped to 1-4.
    pub fn set_columns(&mut self, columns: u8) {
        let clamped = columns.clamp(1, 4);
        if clamped != columns {
            tracing::warn!(columns, clamped, "column count clamped");
        }
        if clamped == self.layout.columns {
            return;
        }
        let mut next = self.layout.clone();
        next.columns = clamped;
        self.apply(next);
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let next = grid::reorder(&self.layout, from, to);
        if next != self.layout {
            self.apply(next);
        }
    }

    /// Step back one structural change. The current name and description are
    /// kept, since they are not part of the history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.layout) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.layout) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, mut snapshot: DashboardLayout) {
        snapshot.name = std::mem::take(&mut self.layout.name);
        snapshot.description = self.layout.description.take();
        self.layout = snapshot;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn open_catalogue(&mut self) {
        self.catalogue_open = true;
    }

    pub fn close_catalogue(&mut self) {
        self.catalogue_open = false;
    }

    pub fn catalogue_open(&self) -> bool {
        self.catalogue_open
    }

    /// Catalogue entries for the selected category.
    pub fn filtered_templates(&self) -> Vec<&'static WidgetTemplate> {
        templates::filter_templates(self.selected_category)
    }

    pub fn save(&self) -> BuilderEvent {
        tracing::info!(layout = %self.layout.id, widgets = self.layout.widgets.len(), "layout saved");
        BuilderEvent::Saved(self.layout.clone())
    }

    pub fn cancel(&mut self) -> BuilderEvent {
        self.editing = None;
        self.catalogue_open = false;
        self.drag = ReorderDrag::default();
        BuilderEvent::Cancelled
    }

    /// Route a grid signal to the matching builder operation. Widget actions
    /// are passed back to the caller.
    pub fn handle_grid_event(&mut self, event: GridEvent) -> Option<WidgetAction> {
        match event {
            GridEvent::Reorder { from, to } => self.reorder(from, to),
            GridEvent::Edit(widget) => self.edit_widget(&widget),
            GridEvent::Delete(id) => {
                if let Err(e) = self.delete_widget(&id) {
                    tracing::warn!("delete failed: {e}");
                }
            }
            GridEvent::AddFirst => self.open_catalogue(),
            GridEvent::Action(action) => return Some(action),
        }
        None
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        states: &HashMap<String, WidgetState>,
    ) -> Option<BuilderEvent> {
        let mut outcome = None;

        ui.horizontal(|ui| {
            ui.label("Name");
            let mut name = self.layout.name.clone();
            if ui.text_edit_singleline(&mut name).changed() {
                self.set_name(name);
            }
            ui.label("Columns");
            let mut columns = self.layout.columns;
            if ui
                .add(egui::DragValue::new(&mut columns).clamp_range(1..=4))
                .changed()
            {
                self.set_columns(columns);
            }
        });
        ui.horizontal(|ui| {
            ui.label("Description");
            let mut desc = self.layout.description.clone().unwrap_or_default();
            if ui.text_edit_singleline(&mut desc).changed() {
                self.set_description(Some(desc));
            }
        });
        ui.horizontal(|ui| {
            if ui.button("➕ Add widget").clicked() {
                self.catalogue_open = !self.catalogue_open;
            }
            if ui.button("Save").clicked() {
                outcome = Some(self.save());
            }
            if ui.button("Cancel").clicked() {
                outcome = Some(self.cancel());
            }
        });

        if self.catalogue_open {
            self.catalogue_ui(ui);
        }
        ui.separator();

        let event = egui::ScrollArea::vertical()
            .id_source("builder-grid")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                DashboardGrid::new(&self.layout, states)
                    .edit_mode(true)
                    .ui(ui, &mut self.drag)
            })
            .inner;
        if let Some(event) = event {
            if let Some(action) = self.handle_grid_event(event) {
                tracing::debug!(action = %action.action, "widget action in edit mode ignored");
            }
        }
        outcome
    }

    fn catalogue_ui(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.selected_category, None, "All");
                for category in TemplateCategory::ALL {
                    ui.selectable_value(
                        &mut self.selected_category,
                        Some(category),
                        category.label(),
                    );
                }
            });
            ui.separator();
            let mut chosen = None;
            for template in self.filtered_templates() {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(template.name);
                        ui.small(template.description);
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Add").clicked() {
                            chosen = Some(template);
                        }
                        ui.small(template.category.label());
                    });
                });
            }
            if let Some(template) = chosen {
                self.add_widget(template);
            }
        });
    }
}
