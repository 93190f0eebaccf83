use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed country colours
// ---------------------------------------------------------------------------

pub const MEXICO: Color32 = Color32::from_rgb(0x66, 0xb2, 0xb2);
pub const CANADA: Color32 = Color32::from_rgb(0xff, 0x99, 0x99);
pub const OTHER: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Wedge / swatch colour of a normalized country name.
pub fn country_color(country: &str) -> Color32 {
    match country {
        "Mexico" => MEXICO,
        "Canada" => CANADA,
        _ => OTHER,
    }
}

// ---------------------------------------------------------------------------
// Heat ramp
// ---------------------------------------------------------------------------

/// Colour for a normalised intensity in `[0, 1]`: translucent blue at the
/// low end through green and yellow to opaque red.
pub fn heat_color(intensity: f32) -> Color32 {
    let t = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let hue = 240.0 * (1.0 - t);
    let hsl = Hsl::new(hue, 0.9, 0.5);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgba_unmultiplied(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
        (80.0 + 175.0 * t) as u8,
    )
}

/// `n` evenly spaced ramp colours, lowest intensity first.
pub fn heat_bands(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| heat_color((i as f32 + 1.0) / n as f32))
        .collect()
}
