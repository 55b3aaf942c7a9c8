use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Kind of content a widget shows. Unknown strings are kept verbatim so a
/// layout written by a newer build still loads and renders a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    Stats,
    Metric,
    Chart,
    List,
    RecentActivity,
    Table,
    Progress,
    Calendar,
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Stats => "stats",
            WidgetType::Metric => "metric",
            WidgetType::Chart => "chart",
            WidgetType::List => "list",
            WidgetType::RecentActivity => "recent-activity",
            WidgetType::Table => "table",
            WidgetType::Progress => "progress",
            WidgetType::Calendar => "calendar",
            WidgetType::Other(s) => s,
        }
    }
}

impl From<String> for WidgetType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stats" => WidgetType::Stats,
            "metric" => WidgetType::Metric,
            "chart" => WidgetType::Chart,
            "list" => WidgetType::List,
            "recent-activity" => WidgetType::RecentActivity,
            "table" => WidgetType::Table,
            "progress" => WidgetType::Progress,
            "calendar" => WidgetType::Calendar,
            _ => WidgetType::Other(value),
        }
    }
}

impl From<&str> for WidgetType {
    fn from(value: &str) -> Self {
        WidgetType::from(value.to_string())
    }
}

impl From<WidgetType> for String {
    fn from(value: WidgetType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout hint for a widget. Maps to a height class and a column span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
    Wide,
    ExtraLarge,
    Other(String),
}

impl WidgetSize {
    /// Sizes offered by the widget editor.
    pub const ALL: [WidgetSize; 5] = [
        WidgetSize::Small,
        WidgetSize::Medium,
        WidgetSize::Large,
        WidgetSize::Wide,
        WidgetSize::ExtraLarge,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
            WidgetSize::Wide => "wide",
            WidgetSize::ExtraLarge => "extra-large",
            WidgetSize::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WidgetSize::Small => "Small",
            WidgetSize::Medium => "Medium",
            WidgetSize::Large => "Large",
            WidgetSize::Wide => "Wide",
            WidgetSize::ExtraLarge => "Extra large",
            WidgetSize::Other(s) => s,
        }
    }
}

impl Default for WidgetSize {
    fn default() -> Self {
        WidgetSize::Medium
    }
}

impl From<String> for WidgetSize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "small" => WidgetSize::Small,
            "medium" => WidgetSize::Medium,
            "large" => WidgetSize::Large,
            "wide" => WidgetSize::Wide,
            "extra-large" => WidgetSize::ExtraLarge,
            _ => WidgetSize::Other(value),
        }
    }
}

impl From<WidgetSize> for String {
    fn from(value: WidgetSize) -> Self {
        value.as_str().to_string()
    }
}

/// Advisory grid coordinates. Render order comes from `widget_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for WidgetPosition {
    fn default() -> Self {
        Self { x: 0, y: 0, w: 2, h: 1 }
    }
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// One configured widget instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub size: WidgetSize,
    #[serde(default)]
    pub position: WidgetPosition,
    #[serde(default = "empty_object")]
    pub config: Value,
}

impl WidgetConfig {
    pub fn new(id: impl Into<String>, widget_type: WidgetType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widget_type,
            title: title.into(),
            description: None,
            size: WidgetSize::default(),
            position: WidgetPosition::default(),
            config: empty_object(),
        }
    }

    /// String value from the `config` bag.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

fn default_columns() -> u8 {
    3
}

/// One saved dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
    #[serde(default)]
    pub widget_order: Vec<String>,
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl DashboardLayout {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            is_default: false,
            is_public: false,
            widgets: Vec::new(),
            widget_order: Vec::new(),
            columns: default_columns(),
            tags: None,
        }
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetConfig> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains_widget(&self, id: &str) -> bool {
        self.widget(id).is_some()
    }

    /// Widgets in render order. Order entries without a widget are skipped.
    pub fn ordered_widgets(&self) -> Vec<&WidgetConfig> {
        self.widget_order
            .iter()
            .filter_map(|id| self.widget(id))
            .collect()
    }

    /// Order entries that reference no widget.
    pub fn dangling_ids(&self) -> Vec<&str> {
        self.widget_order
            .iter()
            .filter(|id| !self.contains_widget(id))
            .map(String::as_str)
            .collect()
    }

    /// Widgets that exist but are absent from `widget_order`.
    pub fn hidden_widgets(&self) -> Vec<&WidgetConfig> {
        self.widgets
            .iter()
            .filter(|w| !self.widget_order.iter().any(|id| id == &w.id))
            .collect()
    }

    /// New layout with `widget` appended to both collections.
    pub fn with_widget(&self, widget: WidgetConfig) -> Self {
        let mut next = self.clone();
        next.widget_order.push(widget.id.clone());
        next.widgets.push(widget);
        next
    }

    /// New layout with the widget removed from `widgets` and `widget_order`.
    pub fn without_widget(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.widgets.retain(|w| w.id != id);
        next.widget_order.retain(|o| o != id);
        next
    }

    /// New layout with the widget of the same id replaced. Returns `None` when
    /// no widget matches.
    pub fn with_widget_replaced(&self, widget: WidgetConfig) -> Option<Self> {
        let idx = self.widgets.iter().position(|w| w.id == widget.id)?;
        let mut next = self.clone();
        next.widgets[idx] = widget;
        Some(next)
    }

    /// Drop widgets whose id repeats an earlier one. `widget_order` is left
    /// alone; dangling entries are filtered at render time.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let layout_id = self.id.clone();
        self.widgets.retain(|w| {
            if seen.insert(w.id.clone()) {
                true
            } else {
                tracing::warn!(widget = %w.id, layout = %layout_id, "duplicate widget id dropped");
                warnings.push(format!("duplicate widget id '{}' dropped", w.id));
                false
            }
        });
        if !(1..=4).contains(&self.columns) {
            warnings.push(format!(
                "layout columns {} outside 1-4; the grid falls back to 3",
                self.columns
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layout_with(ids: &[&str]) -> DashboardLayout {
        let mut layout = DashboardLayout::new("l1", "Sales");
        for id in ids {
            layout = layout.with_widget(WidgetConfig::new(*id, WidgetType::Stats, *id));
        }
        layout
    }

    #[test]
    fn widget_type_keeps_unknown_strings() {
        let ty: WidgetType = serde_json::from_value(json!("heatmap")).unwrap();
        assert_eq!(ty, WidgetType::Other("heatmap".into()));
        assert_eq!(serde_json::to_value(&ty).unwrap(), json!("heatmap"));
        let ty: WidgetType = serde_json::from_value(json!("recent-activity")).unwrap();
        assert_eq!(ty, WidgetType::RecentActivity);
    }

    #[test]
    fn layout_uses_camel_case_field_names() {
        let mut layout = layout_with(&["a"]);
        layout.is_default = true;
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["isDefault"], json!(true));
        assert_eq!(value["isPublic"], json!(false));
        assert_eq!(value["widgetOrder"], json!(["a"]));
        assert_eq!(value["widgets"][0]["type"], json!("stats"));
        assert_eq!(value["widgets"][0]["size"], json!("medium"));
        assert_eq!(
            value["widgets"][0]["position"],
            json!({"x": 0, "y": 0, "w": 2, "h": 1})
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let layout: DashboardLayout = serde_json::from_value(json!({
            "id": "x",
            "name": "Empty",
            "widgets": [{"id": "w", "type": "chart", "title": "T"}]
        }))
        .unwrap();
        assert_eq!(layout.columns, 3);
        assert!(layout.widget_order.is_empty());
        assert_eq!(layout.widgets[0].size, WidgetSize::Medium);
        assert!(layout.widgets[0].config.is_object());
    }

    #[test]
    fn without_widget_removes_from_both_collections() {
        let layout = layout_with(&["a", "b"]);
        let next = layout.without_widget("a");
        assert!(!next.contains_widget("a"));
        assert!(!next.widget_order.contains(&"a".to_string()));
        assert_eq!(layout.widgets.len(), 2, "original untouched");
    }

    #[test]
    fn ordered_widgets_skip_dangling_ids() {
        let mut layout = layout_with(&["a", "b"]);
        layout.widget_order.insert(1, "ghost".into());
        let ids: Vec<_> = layout.ordered_widgets().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(layout.dangling_ids(), vec!["ghost"]);
    }

    #[test]
    fn hidden_widgets_are_kept() {
        let mut layout = layout_with(&["a", "b"]);
        layout.widget_order.retain(|id| id != "b");
        assert_eq!(layout.hidden_widgets().len(), 1);
        assert_eq!(layout.ordered_widgets().len(), 1);
        assert_eq!(layout.widgets.len(), 2);
    }

    #[test]
    fn sanitize_drops_duplicate_ids() {
        let mut layout = layout_with(&["a"]);
        layout.widgets.push(WidgetConfig::new("a", WidgetType::List, "dup"));
        let warnings = layout.sanitize();
        assert_eq!(layout.widgets.len(), 1);
        assert_eq!(layout.widgets[0].widget_type, WidgetType::Stats);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn replace_unknown_widget_is_none() {
        let layout = layout_with(&["a"]);
        assert!(layout
            .with_widget_replaced(WidgetConfig::new("zz", WidgetType::Stats, "t"))
            .is_none());
    }
}
