use eframe::egui::{Color32, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, Points};

use crate::color::heat_bands;
use crate::data::aggregate::HeatPoint;
use crate::state::MapView;

/// Number of intensity buckets drawn as separate point series.
const BANDS: usize = 8;

/// Points sharing one colour and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayer {
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
    pub radius: f32,
}

fn band_of(weight: i64, max_weight: i64) -> usize {
    if max_weight <= 0 || weight <= 0 {
        return 0;
    }
    let t = weight as f64 / max_weight as f64;
    ((t * BANDS as f64).ceil() as usize).clamp(1, BANDS) - 1
}

/// Bucket points by weight relative to the heaviest one. Layers are
/// ordered light to heavy so heavy points draw on top; empty buckets are
/// omitted.
pub fn heat_layers(points: &[HeatPoint], max_weight: i64, base_radius: f32) -> Vec<HeatLayer> {
    let colors = heat_bands(BANDS);
    let mut layers: Vec<HeatLayer> = colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| HeatLayer {
            points: Vec::new(),
            color,
            radius: base_radius * (0.4 + 0.6 * (i + 1) as f32 / BANDS as f32),
        })
        .collect();

    for p in points {
        layers[band_of(p.weight, max_weight)]
            .points
            .push([p.longitude, p.latitude]);
    }

    layers.retain(|l| !l.points.is_empty());
    layers
}

// ---------------------------------------------------------------------------
// Heatmap plot
// ---------------------------------------------------------------------------

/// Draw the weighted points on a longitude/latitude plane. The camera is
/// reset only when the zoom control moved.
pub fn heatmap(ui: &mut Ui, map: &mut MapView) {
    let reset = map.take_zoom_change();
    let (half_lon, half_lat) = map.half_extent();
    let [cx, cy] = map.center;
    let bounds = PlotBounds::from_min_max([cx - half_lon, cy - half_lat], [cx + half_lon, cy + half_lat]);
    let layers = heat_layers(map.heat(), map.max_weight(), map.point_radius);

    Plot::new("heatmap")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(false)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if reset {
                plot_ui.set_plot_bounds(bounds);
            }
            for layer in layers {
                plot_ui.points(
                    Points::new(layer.points)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .color(layer.color)
                        .radius(layer.radius),
                );
            }
        });
}
