/// Errors raised by dashboard operations that callers may want to match on.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no widget with id '{0}'")]
    UnknownWidget(String),

    #[error("dashboard '{0}' not found")]
    LayoutNotFound(String),

    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("invalid dashboard document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}
