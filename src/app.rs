use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{dashboard, panels};

/// Loaded at startup when present next to the executable, mirroring the
/// export name of the data preparation step.
pub const DEFAULT_DATA_PATH: &str = "customer_transactions_processed.csv";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyLedgerApp {
    pub state: AppState,
}

impl RustyLedgerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut state = AppState::default();

        let default_path = Path::new(DEFAULT_DATA_PATH);
        if default_path.exists() {
            state.load_path(default_path);
        }

        Self { state }
    }
}

impl eframe::App for RustyLedgerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::dashboard(ui, &self.state);
        });
    }
}
