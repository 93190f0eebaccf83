use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::data::aggregate::{SeriesAxis, TimeSeries};

const SERIES_COLOR: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);

/// Tick text for a category axis: the label at integer positions, nothing
/// in between. Month names are shortened so adjacent ticks stay legible.
pub fn category_label(labels: &[String], axis: SeriesAxis, value: f64) -> String {
    if value.fract().abs() > 1e-6 || value < 0.0 {
        return String::new();
    }
    let Some(label) = labels.get(value.round() as usize) else {
        return String::new();
    };
    match axis {
        SeriesAxis::Year => label.clone(),
        SeriesAxis::Month if label.is_empty() => "(none)".to_string(),
        SeriesAxis::Month => label.chars().take(3).collect(),
    }
}

// ---------------------------------------------------------------------------
// Time-series plot
// ---------------------------------------------------------------------------

/// Render the totals line: years in the all-time view, months otherwise.
pub fn time_series_plot(ui: &mut Ui, title: &str, series: &TimeSeries) {
    ui.heading(title);

    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data");
        });
        return;
    }

    let coords: Vec<[f64; 2]> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v as f64])
        .collect();

    let labels = series.labels.clone();
    let axis = series.axis;
    let x_label = match axis {
        SeriesAxis::Year => "Year",
        SeriesAxis::Month => "Month",
    };

    Plot::new("time_series")
        .x_axis_label(x_label)
        .y_axis_label("Crossings")
        .x_axis_formatter(move |mark, _range| category_label(&labels, axis, mark.value))
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(SERIES_COLOR)
                    .width(2.0),
            );
            plot_ui.points(Points::new(coords).color(SERIES_COLOR).radius(4.0).filled(true));
        });
}
