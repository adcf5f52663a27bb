mod app;
mod color;
mod data;
mod export;
mod state;
mod ui;
mod views;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: the data directory (default ./data).
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DemandView – Study Results",
        options,
        Box::new(move |_cc| {
            let mut state = AppState::default();
            if data_dir.is_dir() {
                state.load_data_dir(&data_dir);
            } else {
                log::warn!(
                    "data directory {} not found; use File → Open data folder…",
                    data_dir.display()
                );
                state.status_message =
                    Some(format!("Data directory {} not found", data_dir.display()));
            }
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
}
