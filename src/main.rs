use eframe::egui;
use widget_dashboard::gui::DashboardApp;
use widget_dashboard::logging;
use widget_dashboard::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(layout = %settings.default_layout_id, "starting dashboard");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Widget Dashboard",
        native_options,
        Box::new(move |cc| match DashboardApp::new(&cc.egui_ctx, settings) {
            Ok(app) => Box::new(app) as Box<dyn eframe::App>,
            Err(e) => {
                tracing::error!("failed to start dashboard: {e:#}");
                Box::new(StartupError(format!("{e:#}")))
            }
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

struct StartupError(String);

impl eframe::App for StartupError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Dashboard could not start");
            ui.colored_label(ui.visuals().error_fg_color, &self.0);
        });
    }
}
