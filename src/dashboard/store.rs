use crate::dashboard::model::DashboardLayout;
use anyhow::Context;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Short listing entry for a stored layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

impl From<&DashboardLayout> for LayoutSummary {
    fn from(layout: &DashboardLayout) -> Self {
        Self {
            id: layout.id.clone(),
            name: layout.name.clone(),
            is_default: layout.is_default,
        }
    }
}

/// Persistence collaborator. `load` after `save` must return an equal layout.
pub trait LayoutStore: Send + Sync {
    fn save(&self, layout: &DashboardLayout) -> anyhow::Result<()>;
    fn load(&self, id: &str) -> anyhow::Result<Option<DashboardLayout>>;
    fn list(&self) -> anyhow::Result<Vec<LayoutSummary>>;
}

#[derive(Default)]
pub struct MemoryLayoutStore {
    layouts: Mutex<HashMap<String, DashboardLayout>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layouts(layouts: impl IntoIterator<Item = DashboardLayout>) -> Self {
        Self {
            layouts: Mutex::new(layouts.into_iter().map(|l| (l.id.clone(), l)).collect()),
        }
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn save(&self, layout: &DashboardLayout) -> anyhow::Result<()> {
        let mut map = self
            .layouts
            .lock()
            .map_err(|_| anyhow::anyhow!("layout store lock poisoned"))?;
        map.insert(layout.id.clone(), layout.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> anyhow::Result<Option<DashboardLayout>> {
        let map = self
            .layouts
            .lock()
            .map_err(|_| anyhow::anyhow!("layout store lock poisoned"))?;
        Ok(map.get(id).cloned())
    }

    fn list(&self) -> anyhow::Result<Vec<LayoutSummary>> {
        let map = self
            .layouts
            .lock()
            .map_err(|_| anyhow::anyhow!("layout store lock poisoned"))?;
        let mut out: Vec<LayoutSummary> = map.values().map(LayoutSummary::from).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

/// One `<id>.json` file per layout inside a directory.
pub struct JsonLayoutStore {
    dir: PathBuf,
}

impl JsonLayoutStore {
    pub fn new(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating layout directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// File path for a layout id, see [`file_stem`].
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(id)))
    }
}

/// File-name-safe form of an id. ASCII letters, digits and `-` are kept; every
/// other byte, `_` included, becomes `_xx` in hex. Distinct ids never share a
/// stem and the result never contains a path separator.
pub fn file_stem(id: &str) -> String {
    if id.is_empty() {
        return "_".into();
    }
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

impl LayoutStore for JsonLayoutStore {
    fn save(&self, layout: &DashboardLayout) -> anyhow::Result<()> {
        let path = self.path_for(&layout.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(layout)?;
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("finalizing {}", path.display()))?;
        tracing::info!(layout = %layout.id, path = %path.display(), "layout written");
        Ok(())
    }

    fn load(&self, id: &str) -> anyhow::Result<Option<DashboardLayout>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let mut layout: DashboardLayout = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if layout.id != id {
            tracing::warn!(path = %path.display(), expected = id, found = %layout.id, "layout id mismatch");
            return Ok(None);
        }
        for w in layout.sanitize() {
            tracing::warn!("{w}");
        }
        Ok(Some(layout))
    }

    fn list(&self) -> anyhow::Result<Vec<LayoutSummary>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|c| Ok(serde_json::from_str::<DashboardLayout>(&c)?));
            match parsed {
                Ok(layout) => out.push(LayoutSummary::from(&layout)),
                Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable layout: {e}"),
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{WidgetConfig, WidgetType};

    fn sample() -> DashboardLayout {
        DashboardLayout::new("sales", "Sales")
            .with_widget(WidgetConfig::new("a", WidgetType::Stats, "A"))
    }

    #[test]
    fn memory_round_trip() {
        let store = MemoryLayoutStore::new();
        store.save(&sample()).unwrap();
        assert_eq!(store.load("sales").unwrap(), Some(sample()));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLayoutStore::new(dir.path()).unwrap();
        store.save(&sample()).unwrap();
        assert_eq!(store.load("sales").unwrap(), Some(sample()));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn ids_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLayoutStore::new(dir.path()).unwrap();
        let path = store.path_for("../etc/passwd");
        assert_eq!(path.parent().unwrap(), dir.path());
    }

    #[test]
    fn similar_ids_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLayoutStore::new(dir.path()).unwrap();
        let dotted = DashboardLayout::new("team.sales", "Team sales");
        let underscored = DashboardLayout::new("team_sales", "Other");
        store.save(&dotted).unwrap();
        store.save(&underscored).unwrap();
        assert_ne!(store.path_for("team.sales"), store.path_for("team_sales"));
        assert_eq!(store.load("team.sales").unwrap(), Some(dotted));
        assert_eq!(store.load("team_sales").unwrap(), Some(underscored));
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn file_with_foreign_id_is_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLayoutStore::new(dir.path()).unwrap();
        let other = DashboardLayout::new("b", "B");
        std::fs::write(store.path_for("a"), serde_json::to_string(&other).unwrap()).unwrap();
        assert_eq!(store.load("a").unwrap(), None);
    }

    #[test]
    fn file_stems() {
        assert_eq!(file_stem("sales-q3"), "sales-q3");
        assert_eq!(file_stem("team.sales"), "team_2esales");
        assert_eq!(file_stem("team_sales"), "team_5fsales");
        assert_eq!(file_stem("a/b"), "a_2fb");
        assert_eq!(file_stem(""), "_");
    }
}
