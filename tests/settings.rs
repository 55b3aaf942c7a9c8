use tempfile::tempdir;
use widget_dashboard::settings::Settings;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
    assert!(settings.enable_toasts);
}

#[test]
fn partial_file_fills_defaults() {
    let json = r#"{ "debug_logging": true, "simulated_failure_rate": 3.0 }"#;
    let settings: Settings = serde_json::from_str(json).unwrap();
    assert!(settings.debug_logging);
    assert_eq!(settings.failure_rate(), 1.0);
    assert_eq!(settings.default_layout_id, Settings::default().default_layout_id);
    assert_eq!(settings.toast_duration, 3.0);
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();
    let mut settings = Settings::default();
    settings.share_base_url = "https://dash.example.com".into();
    settings.simulated_latency_ms = 25;
    settings.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), settings);
}
