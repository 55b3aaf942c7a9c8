use crate::dashboard::data::WidgetState;
use crate::dashboard::model::{DashboardLayout, WidgetConfig, WidgetSize};
use crate::dashboard::renderer::{WidgetRenderer, WidgetView};
use crate::dashboard::widgets::{self, WidgetAction};
use eframe::egui;
use std::collections::HashMap;

/// Column count used when a layout carries an out-of-range value.
pub const DEFAULT_COLUMNS: usize = 3;

const CELL_GAP: f32 = 12.0;

/// Number of grid columns for `layout.columns`. Values outside 1-4 fall back
/// to [`DEFAULT_COLUMNS`].
pub fn effective_columns(columns: u8) -> usize {
    match columns {
        1..=4 => columns as usize,
        _ => DEFAULT_COLUMNS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColSpan {
    Single,
    Two,
    FullRow,
}

impl ColSpan {
    pub fn resolve(self, columns: usize) -> usize {
        let columns = columns.max(1);
        match self {
            ColSpan::Single => 1,
            ColSpan::Two => 2.min(columns),
            ColSpan::FullRow => columns,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHint {
    pub height: f32,
    pub span: ColSpan,
}

/// Height class and column span for a widget size. Unknown sizes get the
/// medium height.
pub fn size_hint(size: &WidgetSize) -> SizeHint {
    const MEDIUM: f32 = 220.0;
    match size {
        WidgetSize::Small => SizeHint {
            height: 160.0,
            span: ColSpan::Single,
        },
        WidgetSize::Medium => SizeHint {
            height: MEDIUM,
            span: ColSpan::Single,
        },
        WidgetSize::Large => SizeHint {
            height: 300.0,
            span: ColSpan::Single,
        },
        WidgetSize::Wide => SizeHint {
            height: MEDIUM,
            span: ColSpan::Two,
        },
        WidgetSize::ExtraLarge => SizeHint {
            height: 380.0,
            span: ColSpan::FullRow,
        },
        WidgetSize::Other(other) => {
            tracing::debug!(size = %other, "unknown widget size, using medium");
            SizeHint {
                height: MEDIUM,
                span: ColSpan::Single,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    pub height: f32,
}

/// Flow cells left to right, wrapping when a span does not fit the rest of
/// the row. Earlier gaps are never back-filled.
pub fn place_cells(hints: &[SizeHint], columns: usize) -> Vec<CellPlacement> {
    let columns = columns.max(1);
    let mut row = 0;
    let mut col = 0;
    let mut placed = Vec::with_capacity(hints.len());
    for hint in hints {
        let span = hint.span.resolve(columns);
        if col + span > columns {
            row += 1;
            col = 0;
        }
        placed.push(CellPlacement {
            row,
            col,
            col_span: span,
            height: hint.height,
        });
        col += span;
        if col >= columns {
            row += 1;
            col = 0;
        }
    }
    placed
}

/// Height of each row, taken from its tallest cell.
pub fn row_heights(placements: &[CellPlacement]) -> Vec<f32> {
    let rows = placements.iter().map(|p| p.row + 1).max().unwrap_or(0);
    let mut heights = vec![0.0_f32; rows];
    for p in placements {
        heights[p.row] = heights[p.row].max(p.height);
    }
    heights
}

/// Move the id at `from` to `to` in `widget_order`. Nothing else changes.
/// Out-of-range `from` is a no-op; `to` is clamped to the end.
pub fn reorder(layout: &DashboardLayout, from: usize, to: usize) -> DashboardLayout {
    let mut next = layout.clone();
    if from == to || from >= next.widget_order.len() {
        return next;
    }
    let id = next.widget_order.remove(from);
    let to = to.min(next.widget_order.len());
    next.widget_order.insert(to, id);
    tracing::debug!(layout = %layout.id, from, to, "widget order changed");
    next
}

/// Signals raised by the grid. The grid never edits `widgets` itself.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    Reorder { from: usize, to: usize },
    Edit(WidgetConfig),
    Delete(String),
    AddFirst,
    Action(WidgetAction),
}

/// One resolved, placed widget. `order_index` is the widget's position in
/// `widget_order`, which may differ from its position among rendered cells
/// when the order contains dangling ids.
#[derive(Debug, Clone)]
pub struct GridCell<'a> {
    pub order_index: usize,
    pub widget: &'a WidgetConfig,
    pub placement: CellPlacement,
    pub view: WidgetView,
}

/// In-progress pointer drag for reordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReorderDrag {
    source: Option<usize>,
}

impl ReorderDrag {
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }
}

/// Index of the cell under `pos`, else the cell whose centre is closest.
pub fn drop_target(rects: &[egui::Rect], pos: egui::Pos2) -> Option<usize> {
    if let Some(idx) = rects.iter().position(|r| r.contains(pos)) {
        return Some(idx);
    }
    rects
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.center()
                .distance_sq(pos)
                .total_cmp(&b.center().distance_sq(pos))
        })
        .map(|(idx, _)| idx)
}

pub struct DashboardGrid<'a> {
    layout: &'a DashboardLayout,
    states: &'a HashMap<String, WidgetState>,
    edit_mode: bool,
}

impl<'a> DashboardGrid<'a> {
    pub fn new(layout: &'a DashboardLayout, states: &'a HashMap<String, WidgetState>) -> Self {
        Self {
            layout,
            states,
            edit_mode: false,
        }
    }

    pub fn edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    pub fn columns(&self) -> usize {
        effective_columns(self.layout.columns)
    }

    /// Resolve `widget_order` into placed cells, dropping ids with no widget.
    pub fn cells(&self) -> Vec<GridCell<'a>> {
        let resolved: Vec<(usize, &'a WidgetConfig)> = self
            .layout
            .widget_order
            .iter()
            .enumerate()
            .filter_map(|(idx, id)| self.layout.widget(id).map(|w| (idx, w)))
            .collect();
        let hints: Vec<SizeHint> = resolved.iter().map(|(_, w)| size_hint(&w.size)).collect();
        let placements = place_cells(&hints, self.columns());
        resolved
            .into_iter()
            .zip(placements)
            .map(|((order_index, widget), placement)| GridCell {
                order_index,
                widget,
                placement,
                view: WidgetRenderer::render_state(widget, self.states.get(&widget.id)),
            })
            .collect()
    }

    pub fn ui(&self, ui: &mut egui::Ui, drag: &mut ReorderDrag) -> Option<GridEvent> {
        let cells = self.cells();
        if cells.is_empty() {
            return self.empty_state(ui);
        }

        let columns = self.columns();
        let width = ui.available_width();
        let col_width = (width - CELL_GAP * (columns - 1) as f32) / columns as f32;
        let placements: Vec<CellPlacement> = cells.iter().map(|c| c.placement).collect();
        let heights = row_heights(&placements);
        let mut row_top = Vec::with_capacity(heights.len());
        let mut y = 0.0;
        for h in &heights {
            row_top.push(y);
            y += h + CELL_GAP;
        }
        let total = egui::vec2(width, (y - CELL_GAP).max(0.0));
        let (rect, _) = ui.allocate_exact_size(total, egui::Sense::hover());
        let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::LEFT));

        let rects: Vec<egui::Rect> = cells
            .iter()
            .map(|cell| {
                let p = cell.placement;
                egui::Rect::from_min_size(
                    rect.min + egui::vec2((col_width + CELL_GAP) * p.col as f32, row_top[p.row]),
                    egui::vec2(
                        col_width * p.col_span as f32 + CELL_GAP * (p.col_span - 1) as f32,
                        heights[p.row],
                    ),
                )
            })
            .collect();

        if drag.is_active() {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                if let Some(target) = drop_target(&rects, pos) {
                    ui.painter().rect_stroke(
                        rects[target].expand(2.0),
                        6.0,
                        egui::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                    );
                }
            }
        }

        let mut event = None;
        let last = cells.len() - 1;
        for (pos, (cell, cell_rect)) in cells.iter().zip(&rects).enumerate() {
            let neighbours = (
                pos.checked_sub(1).map(|p| cells[p].order_index),
                (pos < last).then(|| cells[pos + 1].order_index),
            );
            let inner = child
                .allocate_ui_at_rect(*cell_rect, |ui| {
                    ui.set_clip_rect(cell_rect.intersect(ui.clip_rect()));
                    ui.set_min_size(cell_rect.size());
                    self.cell_ui(ui, cell, neighbours, &rects, &cells, drag)
                })
                .inner;
            event = event.or(inner);
        }
        event
    }

    fn cell_ui(
        &self,
        ui: &mut egui::Ui,
        cell: &GridCell<'_>,
        (prev, next): (Option<usize>, Option<usize>),
        rects: &[egui::Rect],
        cells: &[GridCell<'_>],
        drag: &mut ReorderDrag,
    ) -> Option<GridEvent> {
        let widget = cell.widget;
        egui::Frame::group(ui.style())
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                let mut event = None;
                ui.horizontal(|ui| {
                    if self.edit_mode {
                        let handle = ui
                            .add(egui::Label::new("☰").sense(egui::Sense::drag()))
                            .on_hover_text("Drag to reorder");
                        if handle.drag_started() {
                            drag.source = Some(cell.order_index);
                        }
                        if handle.drag_stopped() {
                            if let (Some(from), Some(pos)) =
                                (drag.source.take(), handle.interact_pointer_pos())
                            {
                                if let Some(target) = drop_target(rects, pos) {
                                    let to = cells[target].order_index;
                                    if from != to {
                                        event = Some(GridEvent::Reorder { from, to });
                                    }
                                }
                            }
                        }
                    }
                    ui.heading(&widget.title);
                    if self.edit_mode {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                event = Some(GridEvent::Delete(widget.id.clone()));
                            }
                            if ui.small_button("✏").on_hover_text("Edit").clicked() {
                                event = Some(GridEvent::Edit(widget.clone()));
                            }
                            if ui
                                .add_enabled(next.is_some(), egui::Button::new("⬇").small())
                                .on_hover_text("Move down")
                                .clicked()
                            {
                                if let Some(to) = next {
                                    event = Some(GridEvent::Reorder {
                                        from: cell.order_index,
                                        to,
                                    });
                                }
                            }
                            if ui
                                .add_enabled(prev.is_some(), egui::Button::new("⬆").small())
                                .on_hover_text("Move up")
                                .clicked()
                            {
                                if let Some(to) = prev {
                                    event = Some(GridEvent::Reorder {
                                        from: cell.order_index,
                                        to,
                                    });
                                }
                            }
                        });
                    }
                });
                if let Some(desc) = &widget.description {
                    ui.label(egui::RichText::new(desc).color(ui.visuals().weak_text_color()));
                }
                ui.separator();
                let action = widgets::paint(ui, widget, &cell.view);
                event.or(action.map(GridEvent::Action))
            })
            .inner
    }

    fn empty_state(&self, ui: &mut egui::Ui) -> Option<GridEvent> {
        let mut event = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading("No widgets yet");
                ui.label("Add your first widget to start building this dashboard.");
                ui.add_space(8.0);
                if ui
                    .add_enabled(self.edit_mode, egui::Button::new("➕ Add your first widget"))
                    .clicked()
                {
                    event = Some(GridEvent::AddFirst);
                }
                ui.add_space(24.0);
            });
        });
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::WidgetType;

    fn layout(ids: &[&str]) -> DashboardLayout {
        let mut layout = DashboardLayout::new("l", "Layout");
        for id in ids {
            layout = layout.with_widget(WidgetConfig::new(*id, WidgetType::Stats, *id));
        }
        layout
    }

    fn order(layout: &DashboardLayout) -> Vec<&str> {
        layout.widget_order.iter().map(String::as_str).collect()
    }

    #[test]
    fn columns_fall_back_to_three() {
        assert_eq!(effective_columns(1), 1);
        assert_eq!(effective_columns(4), 4);
        assert_eq!(effective_columns(0), 3);
        assert_eq!(effective_columns(9), 3);
    }

    #[test]
    fn size_hints() {
        assert_eq!(size_hint(&WidgetSize::Wide).span, ColSpan::Two);
        assert_eq!(size_hint(&WidgetSize::ExtraLarge).span, ColSpan::FullRow);
        assert_eq!(
            size_hint(&WidgetSize::Other("huge".into())).height,
            size_hint(&WidgetSize::Medium).height
        );
        assert_eq!(ColSpan::Two.resolve(1), 1);
        assert_eq!(ColSpan::FullRow.resolve(4), 4);
    }

    #[test]
    fn placement_wraps_wide_cells() {
        let medium = size_hint(&WidgetSize::Medium);
        let wide = size_hint(&WidgetSize::Wide);
        let placed = place_cells(&[medium, medium, wide], 3);
        assert_eq!((placed[0].row, placed[0].col), (0, 0));
        assert_eq!((placed[1].row, placed[1].col), (0, 1));
        assert_eq!((placed[2].row, placed[2].col, placed[2].col_span), (1, 0, 2));
    }

    #[test]
    fn full_row_cells_take_a_row() {
        let medium = size_hint(&WidgetSize::Medium);
        let xl = size_hint(&WidgetSize::ExtraLarge);
        let placed = place_cells(&[medium, xl, medium], 2);
        assert_eq!((placed[1].row, placed[1].col_span), (1, 2));
        assert_eq!((placed[2].row, placed[2].col), (2, 0));
        assert_eq!(row_heights(&placed).len(), 3);
    }

    #[test]
    fn reorder_moves_single_id() {
        let l = layout(&["a", "b", "c"]);
        assert_eq!(order(&reorder(&l, 0, 2)), vec!["b", "c", "a"]);
        assert_eq!(order(&reorder(&l, 2, 0)), vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_same_index_is_identity() {
        let l = layout(&["a", "b", "c"]);
        assert_eq!(reorder(&l, 1, 1), l);
    }

    #[test]
    fn reorder_round_trip_restores_order() {
        let l = layout(&["a", "b", "c"]);
        let back = reorder(&reorder(&l, 0, 2), 2, 0);
        assert_eq!(back, l);
    }

    #[test]
    fn reorder_only_touches_order() {
        let mut l = layout(&["a", "b", "c"]);
        l.columns = 2;
        l.description = Some("desc".into());
        let next = reorder(&l, 0, 1);
        let mut expected = l.clone();
        expected.widget_order = next.widget_order.clone();
        assert_eq!(next, expected);
        assert_ne!(next.widget_order, l.widget_order);
    }

    #[test]
    fn reorder_out_of_range() {
        let l = layout(&["a", "b"]);
        assert_eq!(reorder(&l, 5, 0), l);
        assert_eq!(order(&reorder(&l, 0, 10)), vec!["b", "a"]);
    }

    #[test]
    fn cells_skip_dangling_ids() {
        let mut l = layout(&["a", "b"]);
        l.widget_order.insert(1, "ghost".into());
        let states = HashMap::new();
        let grid = DashboardGrid::new(&l, &states);
        let cells = grid.cells();
        let ids: Vec<_> = cells.iter().map(|c| c.widget.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cells[1].order_index, 2);
    }

    #[test]
    fn drop_target_prefers_containing_rect() {
        let rects = [
            egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(10.0, 10.0)),
            egui::Rect::from_min_size(egui::pos2(20.0, 0.0), egui::vec2(10.0, 10.0)),
        ];
        assert_eq!(drop_target(&rects, egui::pos2(25.0, 5.0)), Some(1));
        assert_eq!(drop_target(&rects, egui::pos2(14.0, 50.0)), Some(0));
        assert_eq!(drop_target(&[], egui::pos2(0.0, 0.0)), None);
    }
}
