use crate::dashboard::error::DashboardError;
use crate::dashboard::model::DashboardLayout;
use crate::dashboard::store::file_stem;
use std::path::{Path, PathBuf};

/// A downloadable layout document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

pub fn export_file_name(layout: &DashboardLayout) -> String {
    let slug: String = layout
        .name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("dashboard-{}.json", file_stem(&layout.id))
    } else {
        format!("dashboard-{slug}.json")
    }
}

/// Serialize the layout itself. Runtime widget data is never included.
pub fn export_layout(layout: &DashboardLayout) -> Result<ExportDocument, DashboardError> {
    Ok(ExportDocument {
        file_name: export_file_name(layout),
        contents: serde_json::to_string_pretty(layout)?,
    })
}

/// Parse an exported document back into a layout.
pub fn import_layout(contents: &str) -> Result<DashboardLayout, DashboardError> {
    let mut layout: DashboardLayout = serde_json::from_str(contents)?;
    for w in layout.sanitize() {
        tracing::warn!("import: {w}");
    }
    Ok(layout)
}

pub fn write_export(dir: &Path, doc: &ExportDocument) -> Result<PathBuf, DashboardError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&doc.file_name);
    std::fs::write(&path, &doc.contents)?;
    tracing::info!(path = %path.display(), "dashboard exported");
    Ok(path)
}

/// Address of a dashboard view.
pub fn share_url(base_url: &str, layout_id: &str) -> String {
    format!("{}/dashboards/{}", base_url.trim_end_matches('/'), layout_id)
}

pub fn copy_to_clipboard(text: &str) -> Result<(), DashboardError> {
    let mut cb = arboard::Clipboard::new().map_err(|e| DashboardError::Clipboard(e.to_string()))?;
    cb.set_text(text.to_string())
        .map_err(|e| DashboardError::Clipboard(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{WidgetConfig, WidgetType};

    #[test]
    fn export_keeps_order_and_ids() {
        let layout = DashboardLayout::new("d1", "Q3 Sales")
            .with_widget(WidgetConfig::new("a", WidgetType::Stats, "A"))
            .with_widget(WidgetConfig::new("b", WidgetType::Chart, "B"))
            .with_widget(WidgetConfig::new("c", WidgetType::List, "C"));
        let doc = export_layout(&layout).unwrap();
        assert_eq!(doc.file_name, "dashboard-q3-sales.json");
        let back = import_layout(&doc.contents).unwrap();
        assert_eq!(back, layout);
        assert_eq!(back.widget_order, vec!["a", "b", "c"]);
    }

    #[test]
    fn file_name_falls_back_to_id() {
        let layout = DashboardLayout::new("d9", "  ");
        assert_eq!(export_file_name(&layout), "dashboard-d9.json");
    }

    #[test]
    fn fallback_name_stays_inside_export_dir() {
        let layout = DashboardLayout::new("../team/q3", "");
        let name = export_file_name(&layout);
        assert!(!name.contains('/'));
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), &export_layout(&layout).unwrap()).unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
    }

    #[test]
    fn share_url_joins_cleanly() {
        assert_eq!(
            share_url("https://example.com/", "d1"),
            "https://example.com/dashboards/d1"
        );
    }

    #[test]
    fn import_rejects_garbage() {
        assert!(matches!(
            import_layout("{not json"),
            Err(DashboardError::Serialization(_))
        ));
    }
}
