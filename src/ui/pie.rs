use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use eframe::egui::{
    self, epaint::Mesh, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2,
};

use crate::color::country_color;
use crate::data::aggregate::CountryShares;

const LEGEND_HEIGHT: f32 = 44.0;
/// Horizontal offset of the second pass that thickens the wedge labels.
const BOLD_OFFSET: f32 = 0.8;
const FLAG_SIZE: Vec2 = Vec2::new(60.0, 36.0);

/// Flag image file for a country, if one is shipped.
pub fn flag_file(country: &str) -> Option<&'static str> {
    match country {
        "Mexico" => Some("Flag_of_Mexico.svg"),
        "Canada" => Some("Flag_of_Canada.svg"),
        _ => None,
    }
}

/// One wedge: start angle and sweep in radians, measured clockwise from
/// twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f32,
    pub sweep: f32,
    pub color: Color32,
    pub percent: f64,
}

/// Wedge geometry, index-aligned with `shares.entries`. Empty when the
/// grand total is zero.
pub fn wedges(shares: &CountryShares) -> Vec<Wedge> {
    let mut start = 0.0;
    shares
        .entries
        .iter()
        .filter_map(|e| {
            let percent = e.percent?;
            let sweep = (percent / 100.0) as f32 * TAU;
            let wedge = Wedge {
                start,
                sweep,
                color: country_color(&e.country),
                percent,
            };
            start += sweep;
            Some(wedge)
        })
        .collect()
}

/// Wedge label text, two decimals.
pub fn wedge_label(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Anchor positions for drawing a label in bold. The default fonts carry
/// no bold face, so the glyphs are painted twice, slightly apart.
fn bold_passes(pos: Pos2) -> [Pos2; 2] {
    [pos, pos + Vec2::new(BOLD_OFFSET, 0.0)]
}

fn screen_angle(a: f32) -> f32 {
    a - FRAC_PI_2
}

fn wedge_mesh(center: Pos2, radius: f32, wedge: &Wedge) -> Mesh {
    let steps = ((wedge.sweep / TAU) * 128.0).ceil().max(1.0) as u32;
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, wedge.color);
    for i in 0..=steps {
        let a = screen_angle(wedge.start + wedge.sweep * i as f32 / steps as f32);
        mesh.colored_vertex(center + radius * Vec2::angled(a), wedge.color);
    }
    for i in 1..=steps {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}

/// Render the share chart and its flag legend.
pub fn share_chart(ui: &mut Ui, title: &str, shares: &CountryShares, flag_dir: &Path) {
    ui.heading(title);

    if !shares.has_data() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data");
        });
        return;
    }

    let slices = wedges(shares);
    let avail = ui.available_size();
    let side = avail.x.min(avail.y - LEGEND_HEIGHT).max(64.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(avail.x, side), Sense::hover());
    let center = response.rect.center();
    let radius = side / 2.0 - 4.0;
    let outline = Stroke::new(0.5, Color32::BLACK);

    for wedge in &slices {
        painter.add(Shape::mesh(wedge_mesh(center, radius, wedge)));
        let edge = center + radius * Vec2::angled(screen_angle(wedge.start));
        painter.line_segment([center, edge], outline);
    }
    painter.circle_stroke(center, radius, outline);

    for wedge in &slices {
        let mid = screen_angle(wedge.start + wedge.sweep / 2.0);
        let pos = center + radius * 0.65 * Vec2::angled(mid);
        for anchor in bold_passes(pos) {
            painter.text(
                anchor,
                Align2::CENTER_CENTER,
                wedge_label(wedge.percent),
                FontId::proportional(15.0),
                Color32::BLACK,
            );
        }
    }

    legend(ui, shares, flag_dir);
}

/// Colour swatch plus flag (or name) per country, in pie order.
fn legend(ui: &mut Ui, shares: &CountryShares, flag_dir: &Path) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for entry in &shares.entries {
            let (rect, swatch) = ui.allocate_exact_size(Vec2::splat(20.0), Sense::hover());
            ui.painter().rect_filled(rect, 0.0, country_color(&entry.country));
            swatch.on_hover_text(format!("{}: {} crossings", entry.country, entry.total));

            let flag = flag_file(&entry.country)
                .map(|f| flag_dir.join(f))
                .filter(|p| p.exists());
            match flag {
                Some(path) => {
                    ui.add(
                        egui::Image::new(format!("file://{}", path.display()))
                            .fit_to_exact_size(FLAG_SIZE),
                    );
                }
                None => {
                    ui.label(&entry.country);
                }
            }
            ui.add_space(16.0);
        }
    });
}
