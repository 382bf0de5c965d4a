mod app;
mod color;
mod config;
mod data;
mod state;
mod stats;
mod ui;

use anyhow::Context;
use app::VehicleExplorerApp;
use clap::Parser;
use config::{AppConfig, Cli, DATA_ENV};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli, std::env::var(DATA_ENV).ok())?;
    log::info!("Listings file: {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Price Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(VehicleExplorerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
