pub mod builder;
pub mod data;
pub mod data_source;
pub mod error;
pub mod export;
pub mod grid;
pub mod history;
pub mod model;
pub mod renderer;
pub mod store;
pub mod templates;
pub mod viewer;
pub mod widgets;

pub use builder::{BuilderEvent, DashboardBuilder};
pub use data::{WidgetData, WidgetPayload, WidgetState};
pub use data_source::{SimulatedDataSource, WidgetDataSource};
pub use error::DashboardError;
pub use grid::{DashboardGrid, GridEvent};
pub use model::{DashboardLayout, WidgetConfig, WidgetPosition, WidgetSize, WidgetType};
pub use renderer::{WidgetRenderer, WidgetView};
pub use store::{JsonLayoutStore, LayoutStore, LayoutSummary, MemoryLayoutStore};
pub use viewer::{DashboardViewer, FetchPhase, FetchResult, ViewerStatus};
pub use widgets::WidgetAction;
