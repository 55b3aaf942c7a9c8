use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output instead of stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Directory holding one `<id>.json` file per saved layout.
    #[serde(default = "default_layouts_dir")]
    pub layouts_dir: PathBuf,
    /// Where exported layout documents are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Base address used when sharing a dashboard link.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Layout opened on start-up.
    #[serde(default = "default_layout_id")]
    pub default_layout_id: String,
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
    /// Probability in `[0, 1]` that a simulated fetch fails.
    #[serde(default)]
    pub simulated_failure_rate: f64,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_layouts_dir() -> PathBuf {
    PathBuf::from("layouts")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_share_base_url() -> String {
    "http://localhost:8080".into()
}

fn default_layout_id() -> String {
    "overview".into()
}

fn default_simulated_latency_ms() -> u64 {
    400
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            layouts_dir: default_layouts_dir(),
            export_dir: default_export_dir(),
            share_base_url: default_share_base_url(),
            default_layout_id: default_layout_id(),
            simulated_latency_ms: default_simulated_latency_ms(),
            simulated_failure_rate: 0.0,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Failure rate clamped into `[0, 1]`.
    pub fn failure_rate(&self) -> f64 {
        if self.simulated_failure_rate.is_nan() {
            0.0
        } else {
            self.simulated_failure_rate.clamp(0.0, 1.0)
        }
    }
}
