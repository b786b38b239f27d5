use eframe::egui;

use crate::state::AppState;
use crate::ui::{cards, charts, modal, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DigestDashboardApp {
    pub state: AppState,
}

impl DigestDashboardApp {
    /// Fetch the digest once at start-up.
    pub fn new(source: &str) -> Self {
        let mut state = AppState::default();
        state.load(source);
        Self { state }
    }
}

impl eframe::App for DigestDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and header ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and highlights ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts above the article list ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::chart_row(ui, &self.state);
            ui.separator();
            cards::article_list(ui, &mut self.state);
        });

        // ---- Detail window ----
        modal::article_detail(ctx, &mut self.state);
    }
}
