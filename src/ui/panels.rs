use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{BorderFilter, ViewMode};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ui.strong("Year");
    let current = state.filters.year.clone();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt("year_select")
        .selected_text(current.as_deref().unwrap_or("All"))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, None, "All");
            for year in &dataset.years {
                ui.selectable_value(&mut selected, Some(year.clone()), year);
            }
        });
    if selected != current {
        state.select_year(selected);
    }

    match state.filters.mode() {
        ViewMode::AllYears => ui.label("Totals by year"),
        ViewMode::SingleYear(y) => ui.label(format!("Totals by month in {y}")),
    };

    ui.separator();
    ui.label(format!("{} records", dataset.len()));
    ui.label(format!("{} years", dataset.years.len()));
    if dataset.malformed > 0 {
        ui.label(
            RichText::new(format!("{} records with unreadable numbers", dataset.malformed))
                .color(Color32::YELLOW),
        );
    }
}

// ---------------------------------------------------------------------------
// Map controls – border filter and zoom, shown above the heatmap
// ---------------------------------------------------------------------------

pub fn map_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Border");
        let current = state.filters.border;
        let mut selected = current;
        egui::ComboBox::from_id_salt("border_select")
            .selected_text(current.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for option in BorderFilter::OPTIONS {
                    ui.selectable_value(&mut selected, option, option.to_string());
                }
            });
        if selected != current {
            state.select_border(selected);
        }

        ui.separator();

        // Slider → map only; dragging the map leaves the slider alone.
        let map = state.map_mut();
        let mut zoom = map.zoom();
        let range = map.min_zoom..=map.max_zoom;
        if ui
            .add(egui::Slider::new(&mut zoom, range).step_by(1.0).text("Zoom"))
            .changed()
        {
            map.set_zoom(zoom);
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let scope = state.filters.year.as_deref().unwrap_or("all years");
            ui.label(format!("{} records loaded, showing {scope}", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open crossing data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
