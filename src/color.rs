use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::report::chart::ChartKind;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Series colour for a chart kind as 8-bit sRGB.
///
/// Line is blue, Bar green, Scatter red; the preview and the PDF chart share
/// these so both look alike.
pub fn series_rgb(kind: ChartKind) -> (u8, u8, u8) {
    let hue = match kind {
        ChartKind::Line => 225.0,
        ChartKind::Bar => 130.0,
        ChartKind::Scatter => 0.0,
    };
    let hsl = Hsl::new(hue, 0.75, 0.45);
    let rgb: Srgb = hsl.into_color();
    (
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Colour for the interactive egui preview.
pub fn series_color32(kind: ChartKind) -> Color32 {
    let (r, g, b) = series_rgb(kind);
    Color32::from_rgb(r, g, b)
}

/// Colour for the off-screen plotters chart.
pub fn series_plotters(kind: ChartKind) -> RGBColor {
    let (r, g, b) = series_rgb(kind);
    RGBColor(r, g, b)
}
