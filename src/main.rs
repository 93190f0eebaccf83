mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::BorderCrossingsApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Reading crossing data from {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Historical US Border Crossings",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the svg flags.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(BorderCrossingsApp::new(config)))
        }),
    )
}
