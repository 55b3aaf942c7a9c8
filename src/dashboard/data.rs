use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline number for stats and metric widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsData {
    pub value: f64,
    /// Percentage change against the previous period.
    #[serde(default)]
    pub change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One x-axis entry of a chart series. `values` maps data keys to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WidgetPayload {
    Stats(StatsData),
    Series { points: Vec<SeriesPoint> },
    Items { items: Vec<ListItem> },
}

/// Data delivered for one widget. A source may embed its own error or loading
/// flag; the renderer honours them the same way as the explicit arguments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<WidgetPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub is_loading: bool,
}

impl WidgetData {
    pub fn payload(payload: WidgetPayload) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }

    pub fn stats(value: f64, change: f64) -> Self {
        Self::payload(WidgetPayload::Stats(StatsData {
            value,
            change,
            label: None,
        }))
    }

    pub fn series(points: Vec<SeriesPoint>) -> Self {
        Self::payload(WidgetPayload::Series { points })
    }

    pub fn items(items: Vec<ListItem>) -> Self {
        Self::payload(WidgetPayload::Items { items })
    }
}

/// Runtime state of one widget as handed to the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetState {
    pub data: Option<WidgetData>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl WidgetState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn loaded(data: WidgetData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
