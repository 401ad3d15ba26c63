mod app;
mod color;
mod data;
mod error;
mod report;
mod settings;
mod state;
mod ui;

use app::BusinessReportApp;
use eframe::egui;
use settings::ReportSettings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = ReportSettings::from_env().unwrap_or_else(|e| {
        log::error!("{e:#}; using default settings");
        ReportSettings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AI Business Report",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can show the uploaded logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(BusinessReportApp::new(settings)))
        }),
    )
}
