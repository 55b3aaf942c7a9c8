use crate::dashboard::data::{ListItem, WidgetData, WidgetPayload, WidgetState};
use crate::dashboard::model::{WidgetConfig, WidgetType};
use serde::{Deserialize, Serialize};

/// Which presentational collaborator handles a widget type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetFamily {
    Stats,
    Chart,
    List,
    NotImplemented,
    Unsupported,
}

impl WidgetType {
    pub fn family(&self) -> WidgetFamily {
        match self {
            WidgetType::Stats | WidgetType::Metric => WidgetFamily::Stats,
            WidgetType::Chart => WidgetFamily::Chart,
            WidgetType::List | WidgetType::RecentActivity => WidgetFamily::List,
            WidgetType::Table | WidgetType::Progress | WidgetType::Calendar => {
                WidgetFamily::NotImplemented
            }
            WidgetType::Other(_) => WidgetFamily::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Area,
    Bar,
    Line,
    Pie,
    Doughnut,
}

impl ChartKind {
    /// Parse `config.chartType`. Unset means `Area`; unknown kinds are
    /// returned as the error value.
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value {
            None => Ok(ChartKind::Area),
            Some("area") => Ok(ChartKind::Area),
            Some("bar") => Ok(ChartKind::Bar),
            Some("line") => Ok(ChartKind::Line),
            Some("pie") => Ok(ChartKind::Pie),
            Some("doughnut") => Ok(ChartKind::Doughnut),
            Some(other) => Err(other.to_string()),
        }
    }

    pub fn is_radial(&self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Doughnut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub value: String,
    pub change: String,
    pub trend: Trend,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub kind: ChartKind,
    pub data_key: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub items: Vec<ListItem>,
}

/// Skeleton shape shown while a widget is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonKind {
    Stats,
    Chart,
    List,
}

/// What a widget cell shows. Every branch is a visible state, including the
/// degraded ones.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Error { message: String },
    Loading(SkeletonKind),
    NoData,
    Stats(StatsView),
    Chart(ChartView),
    UnsupportedChart { chart_type: String },
    List(ListView),
    NotImplemented { widget_type: String },
    Unsupported { widget_type: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsConfig {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    suffix: Option<String>,
}

fn default_data_key() -> String {
    "value".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartConfig {
    #[serde(default)]
    chart_type: Option<String>,
    #[serde(default = "default_data_key")]
    data_key: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: None,
            data_key: default_data_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ListConfig {
    #[serde(default)]
    limit: Option<usize>,
}

fn typed_config<C: serde::de::DeserializeOwned + Default>(widget: &WidgetConfig) -> C {
    serde_json::from_value(widget.config.clone()).unwrap_or_default()
}

/// Abbreviate large numbers with `K`/`M` at one decimal.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    // 999_950 rounds to 1000.0K, so pick the suffix after rounding.
    let rounded_thousands = (magnitude / 100.0).round() / 10.0;
    if rounded_thousands >= 1_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        value.to_string()
    }
}

pub fn trend_for(change: f64) -> Trend {
    if change > 0.0 {
        Trend::Up
    } else if change < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    }
}

pub fn format_change(change: f64) -> String {
    match trend_for(change) {
        Trend::Flat => "0.0%".into(),
        _ => format!("{change:+.1}%"),
    }
}

pub struct WidgetRenderer;

impl WidgetRenderer {
    /// Resolve what a widget should display.
    ///
    /// Dispatch is on `config.widget_type` first. For the supported families
    /// an error (argument or embedded in `data`) wins over loading, and
    /// loading wins over content.
    pub fn render(
        config: &WidgetConfig,
        data: Option<&WidgetData>,
        is_loading: bool,
        error: Option<&str>,
    ) -> WidgetView {
        let family = config.widget_type.family();
        let skeleton = match family {
            WidgetFamily::Stats => SkeletonKind::Stats,
            WidgetFamily::Chart => SkeletonKind::Chart,
            WidgetFamily::List => SkeletonKind::List,
            WidgetFamily::NotImplemented => {
                return WidgetView::NotImplemented {
                    widget_type: config.widget_type.to_string(),
                }
            }
            WidgetFamily::Unsupported => {
                return WidgetView::Unsupported {
                    widget_type: config.widget_type.to_string(),
                }
            }
        };

        let error = error.or_else(|| data.and_then(|d| d.error.as_deref()));
        if let Some(message) = error {
            return WidgetView::Error {
                message: message.to_string(),
            };
        }
        if is_loading || data.map(|d| d.is_loading).unwrap_or(false) {
            return WidgetView::Loading(skeleton);
        }
        let Some(payload) = data.and_then(|d| d.payload.as_ref()) else {
            return WidgetView::NoData;
        };

        match family {
            WidgetFamily::Stats => Self::stats_view(config, payload),
            WidgetFamily::Chart => Self::chart_view(config, payload),
            _ => Self::list_view(config, payload),
        }
    }

    pub fn render_state(config: &WidgetConfig, state: Option<&WidgetState>) -> WidgetView {
        match state {
            Some(state) => Self::render(
                config,
                state.data.as_ref(),
                state.is_loading,
                state.error.as_deref(),
            ),
            None => Self::render(config, None, false, None),
        }
    }

    fn stats_view(config: &WidgetConfig, payload: &WidgetPayload) -> WidgetView {
        let WidgetPayload::Stats(stats) = payload else {
            return WidgetView::NoData;
        };
        let cfg: StatsConfig = typed_config(config);
        let value = format!(
            "{}{}{}",
            cfg.prefix.unwrap_or_default(),
            format_compact(stats.value),
            cfg.suffix.unwrap_or_default()
        );
        WidgetView::Stats(StatsView {
            value,
            change: format_change(stats.change),
            trend: trend_for(stats.change),
            label: stats.label.clone(),
        })
    }

    fn chart_view(config: &WidgetConfig, payload: &WidgetPayload) -> WidgetView {
        let cfg: ChartConfig = typed_config(config);
        let kind = match ChartKind::parse(cfg.chart_type.as_deref()) {
            Ok(kind) => kind,
            Err(chart_type) => {
                tracing::warn!(widget = %config.id, %chart_type, "unsupported chart type");
                return WidgetView::UnsupportedChart { chart_type };
            }
        };
        let WidgetPayload::Series { points } = payload else {
            return WidgetView::NoData;
        };
        let points = points
            .iter()
            .map(|p| ChartPoint {
                label: p.label.clone(),
                value: p.values.get(&cfg.data_key).copied().unwrap_or(0.0),
            })
            .collect();
        WidgetView::Chart(ChartView {
            kind,
            data_key: cfg.data_key,
            points,
        })
    }

    fn list_view(config: &WidgetConfig, payload: &WidgetPayload) -> WidgetView {
        let WidgetPayload::Items { items } = payload else {
            return WidgetView::NoData;
        };
        let cfg: ListConfig = typed_config(config);
        let limit = cfg.limit.unwrap_or(items.len());
        WidgetView::List(ListView {
            items: items.iter().take(limit).cloned().collect(),
        })
    }
}
