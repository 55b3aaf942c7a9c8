mod widget_editor_dialog;

pub use widget_editor_dialog::WidgetEditorDialog;

use crate::dashboard::builder::{BuilderEvent, DashboardBuilder};
use crate::dashboard::data_source::{SimulatedDataSource, WidgetDataSource};
use crate::dashboard::export;
use crate::dashboard::model::{DashboardLayout, WidgetSize};
use crate::dashboard::store::{JsonLayoutStore, LayoutStore, LayoutSummary};
use crate::dashboard::viewer::{DashboardViewer, RepaintFn};
use crate::dashboard::widgets::WidgetAction;
use crate::settings::Settings;
use eframe::egui::{self, CentralPanel, TopBottomPanel};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Edit,
}

/// Starter layout written when the configured default is missing.
pub fn demo_layout(id: &str) -> anyhow::Result<DashboardLayout> {
    let mut builder = DashboardBuilder::empty(id, "Overview");
    builder.set_description(Some("Sales and traffic at a glance".into()));
    let mut wide = Vec::new();
    for key in [
        "sales-stats",
        "users-count",
        "conversion-rate",
        "sales-chart",
        "performance-pie",
        "recent-orders",
        "traffic-bar",
        "activity-feed",
    ] {
        let widget_id = builder.add_template(key)?;
        if key == "sales-chart" || key == "traffic-bar" {
            wide.push(widget_id);
        }
    }
    let mut layout = builder.layout().clone();
    for widget in layout.widgets.iter_mut().filter(|w| wide.contains(&w.id)) {
        widget.size = WidgetSize::Wide;
    }
    Ok(layout)
}

pub struct DashboardApp {
    settings: Settings,
    store: Arc<dyn LayoutStore>,
    source: Arc<dyn WidgetDataSource>,
    notify: RepaintFn,
    mode: Mode,
    viewer: DashboardViewer,
    builder: Option<DashboardBuilder>,
    editor: WidgetEditorDialog,
    layouts: Vec<LayoutSummary>,
    toasts: Toasts,
}

impl DashboardApp {
    pub fn new(ctx: &egui::Context, settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn LayoutStore> = Arc::new(JsonLayoutStore::new(&settings.layouts_dir)?);
        if store.load(&settings.default_layout_id)?.is_none() {
            tracing::info!(layout = %settings.default_layout_id, "seeding starter layout");
            let mut layout = demo_layout(&settings.default_layout_id)?;
            layout.is_default = true;
            store.save(&layout)?;
        }
        let source: Arc<dyn WidgetDataSource> = Arc::new(SimulatedDataSource::new(
            settings.simulated_latency(),
            settings.failure_rate(),
        ));
        let repaint_ctx = ctx.clone();
        let notify: RepaintFn = Arc::new(move || repaint_ctx.request_repaint());

        let mut app = Self {
            viewer: DashboardViewer::new(settings.default_layout_id.clone(), Arc::clone(&source)),
            settings,
            store,
            source,
            notify,
            mode: Mode::View,
            builder: None,
            editor: WidgetEditorDialog::default(),
            layouts: Vec::new(),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
        };
        let id = app.settings.default_layout_id.clone();
        app.open_layout(&id);
        app.reload_list();
        Ok(app)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        if !self.settings.enable_toasts {
            return;
        }
        let text: String = text.into();
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    fn reload_list(&mut self) {
        match self.store.list() {
            Ok(list) => self.layouts = list,
            Err(e) => {
                tracing::error!("failed to list layouts: {e:#}");
                self.toast(ToastKind::Error, format!("Failed to list dashboards: {e}"));
            }
        }
    }

    fn open_layout(&mut self, id: &str) {
        let mut viewer = DashboardViewer::new(id, Arc::clone(&self.source))
            .with_notifier(Arc::clone(&self.notify));
        viewer.load_from(Arc::clone(&self.store));
        self.viewer = viewer;
        self.builder = None;
        self.mode = Mode::View;
    }

    fn enter_edit(&mut self) {
        let Some(layout) = self.viewer.layout() else {
            return;
        };
        self.builder = Some(DashboardBuilder::new(layout.clone()));
        self.mode = Mode::Edit;
    }

    fn finish_edit(&mut self, event: BuilderEvent) {
        match event {
            BuilderEvent::Saved(layout) => match self.store.save(&layout) {
                Ok(()) => {
                    self.toast(ToastKind::Success, format!("Saved {}", layout.name));
                    self.viewer.set_layout(Some(layout));
                    self.builder = None;
                    self.mode = Mode::View;
                    self.reload_list();
                }
                Err(e) => {
                    tracing::error!("failed to save layout: {e:#}");
                    self.toast(ToastKind::Error, format!("Failed to save: {e}"));
                }
            },
            BuilderEvent::Cancelled => {
                self.builder = None;
                self.mode = Mode::View;
            }
        }
    }

    fn export(&mut self) {
        let written = self
            .viewer
            .export()
            .and_then(|doc| export::write_export(&self.settings.export_dir, &doc));
        match written {
            Ok(path) => self.toast(ToastKind::Success, format!("Exported to {}", path.display())),
            Err(e) => {
                tracing::error!("export failed: {e}");
                self.toast(ToastKind::Error, format!("Export failed: {e}"));
            }
        }
    }

    fn share(&mut self) {
        match self.viewer.share(&self.settings.share_base_url) {
            Ok(url) => self.toast(ToastKind::Info, format!("Link copied: {url}")),
            Err(e) => {
                tracing::error!("share failed: {e}");
                self.toast(ToastKind::Error, format!("Share failed: {e}"));
            }
        }
    }

    fn handle_action(&mut self, action: WidgetAction) {
        tracing::info!(action = %action.action, payload = %action.payload, "widget action");
        let title = action
            .payload
            .pointer("/item/title")
            .and_then(|v| v.as_str())
            .unwrap_or("item")
            .to_string();
        self.toast(ToastKind::Info, format!("Opened {title}"));
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let current = self.viewer.layout_id().to_string();
            let selected = self
                .layouts
                .iter()
                .find(|l| l.id == current)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| current.clone());
            let mut pick = None;
            ui.add_enabled_ui(self.mode == Mode::View, |ui| {
                egui::ComboBox::from_id_source("layout-picker")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for summary in &self.layouts {
                            if ui.selectable_label(summary.id == current, &summary.name).clicked() {
                                pick = Some(summary.id.clone());
                            }
                        }
                    });
            });
            if let Some(id) = pick.filter(|id| *id != current) {
                self.open_layout(&id);
            }
            ui.separator();

            match self.mode {
                Mode::View => {
                    let ready = self.viewer.layout().is_some();
                    if ui.add_enabled(ready, egui::Button::new("✏ Edit")).clicked() {
                        self.enter_edit();
                    }
                    if ui.add_enabled(ready, egui::Button::new("⟳ Refresh")).clicked() {
                        self.viewer.refresh();
                    }
                    if ui.add_enabled(ready, egui::Button::new("Export")).clicked() {
                        self.export();
                    }
                    if ui.add_enabled(ready, egui::Button::new("Share")).clicked() {
                        self.share();
                    }
                }
                Mode::Edit => {
                    if let Some(builder) = self.builder.as_mut() {
                        if ui
                            .add_enabled(builder.can_undo(), egui::Button::new("↶ Undo"))
                            .clicked()
                        {
                            builder.undo();
                        }
                        if ui
                            .add_enabled(builder.can_redo(), egui::Button::new("↷ Redo"))
                            .clicked()
                        {
                            builder.redo();
                        }
                    }
                }
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.viewer.poll();

        TopBottomPanel::top("menu_bar").show(ctx, |ui| self.top_bar(ui));

        let mut finished = None;
        let mut action = None;
        CentralPanel::default().show(ctx, |ui| match self.mode {
            Mode::View => action = self.viewer.ui(ui),
            Mode::Edit => {
                let states = self.viewer.display_states();
                if let Some(builder) = self.builder.as_mut() {
                    finished = builder.ui(ui, &states);
                }
            }
        });

        if let Some(builder) = self.builder.as_mut() {
            if let Some(id) = self.editor.ui(ctx, builder) {
                tracing::debug!(widget = %id, "widget edit committed");
            }
        }
        if let Some(event) = finished {
            self.finish_edit(event);
        }
        if let Some(action) = action {
            self.handle_action(action);
        }

        self.toasts.show(ctx);
    }
}
