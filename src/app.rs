use eframe::egui;

use crate::config::AppConfig;
use crate::data::store::DatasetStore;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VehicleExplorerApp {
    pub state: AppState,
}

impl VehicleExplorerApp {
    /// Start a session on the configured listings file. A load failure
    /// leaves the app empty with the error in the status bar.
    pub fn new(config: AppConfig) -> Self {
        let store = DatasetStore::new(config.data_path.clone());
        let mut state = AppState::new(config);
        state.open_store(&store);
        Self { state }
    }
}

impl eframe::App for VehicleExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &mut self.state);
        });
    }
}
