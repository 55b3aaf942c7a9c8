use crate::dashboard::data::{WidgetData, WidgetState};
use crate::dashboard::data_source::WidgetDataSource;
use crate::dashboard::error::DashboardError;
use crate::dashboard::export::{self, ExportDocument};
use crate::dashboard::grid::{DashboardGrid, GridEvent, ReorderDrag};
use crate::dashboard::model::{DashboardLayout, WidgetConfig};
use crate::dashboard::store::LayoutStore;
use crate::dashboard::widgets::WidgetAction;
use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Lifecycle of one widget's data within the current fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Whole-view state. `NotFound` and `Failed` take priority over anything a
/// widget reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerStatus {
    /// The layout itself has not arrived yet.
    Loading,
    Ready,
    NotFound,
    Failed(String),
}

/// Outcome of one widget fetch, tagged with the cycle that issued it.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub generation: u64,
    pub widget_id: String,
    pub outcome: Result<WidgetData, String>,
}

enum ViewerMessage {
    Layout(Result<Option<DashboardLayout>, String>),
    Widget(FetchResult),
}

pub type RepaintFn = Arc<dyn Fn() + Send + Sync>;

/// Runtime controller for viewing a dashboard.
pub struct DashboardViewer {
    layout_id: String,
    layout: Option<DashboardLayout>,
    status: ViewerStatus,
    phases: HashMap<String, FetchPhase>,
    states: HashMap<String, WidgetState>,
    generation: u64,
    source: Arc<dyn WidgetDataSource>,
    tx: Sender<ViewerMessage>,
    rx: Receiver<ViewerMessage>,
    notify: Option<RepaintFn>,
    drag: ReorderDrag,
}

impl DashboardViewer {
    pub fn new(layout_id: impl Into<String>, source: Arc<dyn WidgetDataSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            layout_id: layout_id.into(),
            layout: None,
            status: ViewerStatus::Loading,
            phases: HashMap::new(),
            states: HashMap::new(),
            generation: 0,
            source,
            tx,
            rx,
            notify: None,
            drag: ReorderDrag::default(),
        }
    }

    /// Called from worker threads whenever a message is queued.
    pub fn with_notifier(mut self, notify: RepaintFn) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Resolve the layout on a worker thread. Until it arrives the viewer
    /// stays in [`ViewerStatus::Loading`].
    pub fn load_from(&mut self, store: Arc<dyn LayoutStore>) {
        self.status = ViewerStatus::Loading;
        let id = self.layout_id.clone();
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        let spawned = std::thread::Builder::new()
            .name("layout-load".into())
            .spawn(move || {
                let result = store.load(&id).map_err(|e| format!("{e:#}"));
                let _ = tx.send(ViewerMessage::Layout(result));
                if let Some(notify) = notify {
                    notify();
                }
            });
        if let Err(e) = spawned {
            tracing::error!("failed to spawn layout loader: {e}");
            self.status = ViewerStatus::Failed(format!("Could not load dashboard: {e}"));
        }
    }

    /// Install a resolved layout, or mark the view as not found, and start
    /// the first fetch cycle.
    pub fn set_layout(&mut self, layout: Option<DashboardLayout>) {
        match layout {
            Some(layout) => {
                tracing::info!(layout = %layout.id, widgets = layout.widgets.len(), "dashboard opened");
                self.layout_id = layout.id.clone();
                self.phases = layout
                    .widgets
                    .iter()
                    .map(|w| (w.id.clone(), FetchPhase::Idle))
                    .collect();
                self.states.clear();
                self.layout = Some(layout);
                self.status = ViewerStatus::Ready;
                self.refresh();
            }
            None => {
                tracing::warn!(layout = %self.layout_id, "dashboard not found");
                self.layout = None;
                self.phases.clear();
                self.states.clear();
                self.status = ViewerStatus::NotFound;
            }
        }
    }

    /// Start a new fetch cycle. Every widget re-enters `Loading` while keeping
    /// what it currently shows. Returns the new generation.
    pub fn refresh(&mut self) -> u64 {
        let widgets = self.begin_cycle();
        let generation = self.generation;
        for widget in widgets {
            self.dispatch(generation, widget);
        }
        generation
    }

    /// Bump the generation and mark every widget as loading. Returns the
    /// widgets to fetch for the new cycle.
    pub fn begin_cycle(&mut self) -> Vec<WidgetConfig> {
        let Some(layout) = &self.layout else {
            return Vec::new();
        };
        self.generation += 1;
        tracing::debug!(layout = %layout.id, generation = self.generation, "fetch cycle started");
        for widget in &layout.widgets {
            self.phases.insert(widget.id.clone(), FetchPhase::Loading);
            self.states.entry(widget.id.clone()).or_default().is_loading = true;
        }
        layout.widgets.clone()
    }

    fn dispatch(&mut self, generation: u64, widget: WidgetConfig) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        let widget_id = widget.id.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("widget-fetch-{widget_id}"))
            .spawn(move || {
                let outcome = source.fetch(&widget);
                let _ = tx.send(ViewerMessage::Widget(FetchResult {
                    generation,
                    widget_id: widget.id,
                    outcome,
                }));
                if let Some(notify) = notify {
                    notify();
                }
            });
        if let Err(e) = spawned {
            tracing::error!(widget = %widget_id, "failed to spawn fetch: {e}");
            self.apply_result(FetchResult {
                generation,
                widget_id,
                outcome: Err(format!("Could not start fetch: {e}")),
            });
        }
    }

    /// Drain queued messages. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ViewerMessage::Layout(Ok(layout)) => {
                    self.set_layout(layout);
                    applied += 1;
                }
                ViewerMessage::Layout(Err(e)) => {
                    tracing::error!(layout = %self.layout_id, "failed to load dashboard: {e}");
                    self.status = ViewerStatus::Failed(e);
                    applied += 1;
                }
                ViewerMessage::Widget(result) => {
                    if self.apply_result(result) {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// Store a fetch outcome. Results from an older generation, or for a
    /// widget no longer in the layout, are dropped.
    pub fn apply_result(&mut self, result: FetchResult) -> bool {
        if result.generation != self.generation {
            tracing::debug!(
                widget = %result.widget_id,
                stale = result.generation,
                current = self.generation,
                "stale fetch result discarded"
            );
            return false;
        }
        let known = self
            .layout
            .as_ref()
            .is_some_and(|l| l.contains_widget(&result.widget_id));
        if !known {
            return false;
        }
        let (phase, state) = match result.outcome {
            Ok(data) => (FetchPhase::Loaded, WidgetState::loaded(data)),
            Err(message) => {
                tracing::warn!(widget = %result.widget_id, "widget fetch failed: {message}");
                (FetchPhase::Errored, WidgetState::errored(message))
            }
        };
        self.phases.insert(result.widget_id.clone(), phase);
        self.states.insert(result.widget_id, state);
        true
    }

    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    /// Dashboard-level loading gate: true only before the layout is known.
    pub fn is_loading(&self) -> bool {
        self.status == ViewerStatus::Loading
    }

    pub fn layout(&self) -> Option<&DashboardLayout> {
        self.layout.as_ref()
    }

    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self, widget_id: &str) -> FetchPhase {
        self.phases
            .get(widget_id)
            .copied()
            .unwrap_or(FetchPhase::Idle)
    }

    pub fn state(&self, widget_id: &str) -> Option<&WidgetState> {
        self.states.get(widget_id)
    }

    /// Raw runtime state per widget.
    pub fn widget_states(&self) -> &HashMap<String, WidgetState> {
        &self.states
    }

    /// State handed to the grid. A widget that is reloading but still has
    /// data or an error to show keeps showing it instead of a skeleton.
    pub fn display_states(&self) -> HashMap<String, WidgetState> {
        self.states
            .iter()
            .map(|(id, state)| {
                let mut shown = state.clone();
                if shown.data.is_some() || shown.error.is_some() {
                    shown.is_loading = false;
                }
                (id.clone(), shown)
            })
            .collect()
    }

    pub fn is_refreshing(&self, widget_id: &str) -> bool {
        self.phase(widget_id) == FetchPhase::Loading
    }

    pub fn export(&self) -> Result<ExportDocument, DashboardError> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| DashboardError::LayoutNotFound(self.layout_id.clone()))?;
        export::export_layout(layout)
    }

    pub fn share_url(&self, base_url: &str) -> Result<String, DashboardError> {
        if self.layout.is_none() {
            return Err(DashboardError::LayoutNotFound(self.layout_id.clone()));
        }
        Ok(export::share_url(base_url, &self.layout_id))
    }

    /// Copy the view address to the clipboard and return it.
    pub fn share(&self, base_url: &str) -> Result<String, DashboardError> {
        let url = self.share_url(base_url)?;
        export::copy_to_clipboard(&url)?;
        tracing::info!(%url, "dashboard link copied");
        Ok(url)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<WidgetAction> {
        match self.status.clone() {
            ViewerStatus::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.label("Loading dashboard…");
                });
                None
            }
            ViewerStatus::NotFound => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(egui::RichText::new("🔍").size(32.0));
                    ui.heading("Dashboard not found");
                    ui.label(format!(
                        "No dashboard with id '{}' exists. Pick another dashboard.",
                        self.layout_id
                    ));
                });
                None
            }
            ViewerStatus::Failed(message) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(
                        egui::RichText::new("⚠")
                            .size(32.0)
                            .color(ui.visuals().error_fg_color),
                    );
                    ui.heading("Dashboard could not be loaded");
                    ui.label(message);
                });
                None
            }
            ViewerStatus::Ready => self.ready_ui(ui),
        }
    }

    fn ready_ui(&mut self, ui: &mut egui::Ui) -> Option<WidgetAction> {
        let Some(layout) = &self.layout else {
            return None;
        };
        ui.heading(&layout.name);
        if let Some(desc) = &layout.description {
            ui.label(egui::RichText::new(desc).color(ui.visuals().weak_text_color()));
        }
        if let Some(tags) = layout.tags.as_ref().filter(|t| !t.is_empty()) {
            ui.horizontal_wrapped(|ui| {
                for tag in tags {
                    ui.small(format!("#{tag}"));
                }
            });
        }
        let refreshing = layout.widgets.iter().any(|w| self.is_refreshing(&w.id));
        if refreshing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.small("Refreshing…");
            });
        }
        ui.separator();
        let states = self.display_states();
        let event = egui::ScrollArea::vertical()
            .id_source("viewer-grid")
            .auto_shrink([false; 2])
            .show(ui, |ui| DashboardGrid::new(layout, &states).ui(ui, &mut self.drag))
            .inner;
        match event {
            Some(GridEvent::Action(action)) => Some(action),
            Some(other) => {
                tracing::debug!(?other, "edit signal ignored in view mode");
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::data_source::SimulatedDataSource;
    use crate::dashboard::model::WidgetType;
    use crate::dashboard::store::MemoryLayoutStore;
    use std::time::{Duration, Instant};

    fn layout() -> DashboardLayout {
        DashboardLayout::new("d1", "Sales")
            .with_widget(WidgetConfig::new("a", WidgetType::Stats, "A"))
            .with_widget(WidgetConfig::new("b", WidgetType::Chart, "B"))
    }

    fn viewer() -> DashboardViewer {
        DashboardViewer::new("d1", Arc::new(SimulatedDataSource::instant()))
    }

    fn wait_until(viewer: &mut DashboardViewer, done: impl Fn(&DashboardViewer) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(viewer) && Instant::now() < deadline {
            viewer.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn starts_in_loading_gate() {
        let v = viewer();
        assert!(v.is_loading());
        assert!(v.widget_states().is_empty());
    }

    #[test]
    fn missing_layout_is_not_found() {
        let mut v = viewer();
        v.load_from(Arc::new(MemoryLayoutStore::new()));
        wait_until(&mut v, |v| !v.is_loading());
        assert_eq!(v.status(), &ViewerStatus::NotFound);
        assert!(matches!(v.export(), Err(DashboardError::LayoutNotFound(_))));
    }

    #[test]
    fn widgets_load_after_layout_arrives() {
        let mut v = viewer();
        v.load_from(Arc::new(MemoryLayoutStore::with_layouts([layout()])));
        wait_until(&mut v, |v| {
            v.phase("a") == FetchPhase::Loaded && v.phase("b") == FetchPhase::Loaded
        });
        assert_eq!(v.status(), &ViewerStatus::Ready);
        assert!(v.state("a").unwrap().data.is_some());
        assert!(!v.state("b").unwrap().is_loading);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut v = viewer();
        v.layout = Some(layout());
        v.status = ViewerStatus::Ready;
        v.begin_cycle();
        let first = v.generation();
        v.begin_cycle();
        let second = v.generation();
        assert!(second > first);

        let stale = FetchResult {
            generation: first,
            widget_id: "a".into(),
            outcome: Ok(WidgetData::stats(1.0, 0.0)),
        };
        assert!(!v.apply_result(stale));
        assert_eq!(v.phase("a"), FetchPhase::Loading);

        let fresh = FetchResult {
            generation: second,
            widget_id: "a".into(),
            outcome: Ok(WidgetData::stats(2.0, 0.0)),
        };
        assert!(v.apply_result(fresh));
        assert_eq!(v.phase("a"), FetchPhase::Loaded);
        assert_eq!(
            v.state("a").unwrap().data,
            Some(WidgetData::stats(2.0, 0.0))
        );
    }

    #[test]
    fn refresh_keeps_previous_data_visible() {
        let mut v = viewer();
        v.layout = Some(layout());
        v.status = ViewerStatus::Ready;
        v.begin_cycle();
        let generation = v.generation();
        v.apply_result(FetchResult {
            generation,
            widget_id: "a".into(),
            outcome: Ok(WidgetData::stats(5.0, 1.0)),
        });
        v.begin_cycle();
        let raw = v.state("a").unwrap();
        assert!(raw.is_loading);
        assert!(raw.data.is_some());
        let shown = v.display_states();
        assert!(!shown["a"].is_loading);
        assert!(shown["b"].is_loading, "nothing to show yet for b");
    }

    #[test]
    fn errors_stay_local() {
        let mut v = viewer();
        v.layout = Some(layout());
        v.status = ViewerStatus::Ready;
        v.begin_cycle();
        let generation = v.generation();
        v.apply_result(FetchResult {
            generation,
            widget_id: "a".into(),
            outcome: Err("timeout".into()),
        });
        v.apply_result(FetchResult {
            generation,
            widget_id: "b".into(),
            outcome: Ok(WidgetData::series(Vec::new())),
        });
        assert_eq!(v.phase("a"), FetchPhase::Errored);
        assert_eq!(v.phase("b"), FetchPhase::Loaded);
        assert_eq!(v.status(), &ViewerStatus::Ready);
    }

    #[test]
    fn results_for_unknown_widgets_are_dropped() {
        let mut v = viewer();
        v.layout = Some(layout());
        v.begin_cycle();
        let generation = v.generation();
        assert!(!v.apply_result(FetchResult {
            generation,
            widget_id: "ghost".into(),
            outcome: Ok(WidgetData::default()),
        }));
    }

    #[test]
    fn share_url_uses_layout_id() {
        let mut v = viewer();
        v.set_layout(Some(layout()));
        assert_eq!(
            v.share_url("http://localhost:8080").unwrap(),
            "http://localhost:8080/dashboards/d1"
        );
    }
}
