use eframe::egui::{self, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{heatmap, panels, pie, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BorderCrossingsApp {
    pub state: AppState,
}

impl BorderCrossingsApp {
    /// Build the app and read the configured dataset once.
    pub fn new(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = AppState::new(config);
        // The map exists before any data arrives, with an empty layer.
        state.map_mut();
        state.load_path(&data_path);
        Self { state }
    }
}

impl eframe::App for BorderCrossingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year filter ----
        egui::SidePanel::left("filter_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts above, map below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let charts_height = (avail.y * 0.5).max(220.0);

            ui.allocate_ui(egui::vec2(avail.x, charts_height), |ui: &mut Ui| {
                if self.state.dataset.is_none() {
                    ui.centered_and_justified(|ui: &mut Ui| {
                        ui.heading("No crossing data loaded  (File → Open…)");
                    });
                    return;
                }
                let views = &self.state.views;
                let flag_dir = &self.state.config.flag_dir;
                ui.columns(2, |cols| {
                    pie::share_chart(&mut cols[0], &views.titles.share, &views.shares, flag_dir);
                    plot::time_series_plot(&mut cols[1], &views.titles.series, &views.series);
                });
            });

            ui.separator();
            panels::map_controls(ui, &mut self.state);
            heatmap::heatmap(ui, self.state.map_mut());
        });
    }
}
