use eframe::egui;
use std::collections::HashMap;
use widget_dashboard::dashboard::builder::DashboardBuilder;
use widget_dashboard::dashboard::data::WidgetState;
use widget_dashboard::dashboard::grid::{self, DashboardGrid, GridEvent, ReorderDrag};
use widget_dashboard::dashboard::model::{DashboardLayout, WidgetConfig, WidgetType};
use widget_dashboard::dashboard::renderer::WidgetView;

fn widget(id: &str, ty: WidgetType) -> WidgetConfig {
    WidgetConfig::new(id, ty, id.to_uppercase())
}

fn three() -> DashboardLayout {
    DashboardLayout::new("d1", "Sales")
        .with_widget(widget("a", WidgetType::Stats))
        .with_widget(widget("b", WidgetType::Chart))
        .with_widget(widget("c", WidgetType::List))
}

fn run_ui(mut add_contents: impl FnMut(&mut egui::Ui)) {
    let ctx = egui::Context::default();
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
    });
}

#[test]
fn moving_last_widget_to_front() {
    let layout = three();
    let moved = grid::reorder(&layout, 2, 0);
    assert_eq!(moved.widget_order, vec!["c", "a", "b"]);
    assert_eq!(moved.widgets, layout.widgets);
    assert_eq!(layout.widget_order, vec!["a", "b", "c"]);
}

#[test]
fn reorder_forward_and_back_restores_order() {
    let layout = three();
    let there = grid::reorder(&layout, 0, 2);
    assert_eq!(there.widget_order, vec!["b", "c", "a"]);
    let back = grid::reorder(&there, 2, 0);
    assert_eq!(back.widget_order, layout.widget_order);
}

#[test]
fn dangling_ids_render_nothing() {
    let mut layout = three();
    layout.widget_order.insert(1, "ghost".into());
    let states = HashMap::new();
    let grid = DashboardGrid::new(&layout, &states);
    let ids: Vec<&str> = grid.cells().iter().map(|c| c.widget.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(grid.cells()[1].order_index, 2);

    run_ui(|ui| {
        let mut drag = ReorderDrag::default();
        assert!(grid.ui(ui, &mut drag).is_none());
    });
}

#[test]
fn cell_views_follow_widget_state() {
    let layout = three();
    let mut states = HashMap::new();
    states.insert("a".to_string(), WidgetState::errored("boom"));
    states.insert("b".to_string(), WidgetState::loading());
    let grid = DashboardGrid::new(&layout, &states);
    let cells = grid.cells();
    assert!(matches!(&cells[0].view, WidgetView::Error { message } if message == "boom"));
    assert!(matches!(cells[1].view, WidgetView::Loading(_)));
    assert_eq!(cells[2].view, WidgetView::NoData);
}

#[test]
fn empty_layout_paints_in_both_modes() {
    let layout = DashboardLayout::new("empty", "Empty");
    let states = HashMap::new();
    assert!(DashboardGrid::new(&layout, &states)
        .edit_mode(true)
        .cells()
        .is_empty());
    run_ui(|ui| {
        let mut drag = ReorderDrag::default();
        assert!(DashboardGrid::new(&layout, &states).ui(ui, &mut drag).is_none());
        assert!(DashboardGrid::new(&layout, &states)
            .edit_mode(true)
            .ui(ui, &mut drag)
            .is_none());
    });
}

#[test]
fn empty_state_add_signal_opens_catalogue() {
    let mut builder = DashboardBuilder::empty("empty", "Empty");
    let states = HashMap::new();
    assert!(DashboardGrid::new(builder.layout(), &states)
        .edit_mode(true)
        .cells()
        .is_empty());
    assert!(!builder.catalogue_open());

    assert!(builder.handle_grid_event(GridEvent::AddFirst).is_none());
    assert!(builder.catalogue_open());

    let id = builder.add_template("sales-stats").unwrap();
    let cells = DashboardGrid::new(builder.layout(), &states)
        .edit_mode(true)
        .cells();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].widget.id, id);
}
