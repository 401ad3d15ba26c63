use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{DynamicImage, RgbImage as PdfRgbImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};

use super::layout::{FontWeight, ImageRegion, ImageSlot, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, ReportLayout};
use crate::error::{ReportError, ReportResult};

/// Resolution images are embedded at; the transform scales them to their region.
const EMBED_DPI: f32 = 300.0;

/// Pixels backing the image regions of a layout.
pub struct PageImages<'a> {
    pub logo: Option<&'a image::RgbImage>,
    pub chart: &'a image::RgbImage,
}

/// Write `layout` as a one-page PDF at `path`.
pub fn write_pdf(layout: &ReportLayout, images: &PageImages<'_>, path: &Path) -> ReportResult<()> {
    let (doc, page, layer) = PdfDocument::new(
        layout.title.text.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Report",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

    for line in layout.text_lines().filter(|l| !l.text.is_empty()) {
        let font: &IndirectFontRef = match line.weight {
            FontWeight::Regular => &regular,
            FontWeight::Bold => &bold,
        };
        layer.use_text(
            win_ansi_safe(&line.text),
            line.size_pt,
            Mm(line.x_mm),
            Mm(PAGE_HEIGHT_MM - line.baseline_mm),
            font,
        );
    }

    for region in &layout.images {
        let pixels = match region.slot {
            ImageSlot::Logo => match images.logo {
                Some(logo) => logo,
                None => continue,
            },
            ImageSlot::Chart => images.chart,
        };
        place_image(&layer, pixels, region)?;
    }

    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_err)?;
    Ok(())
}

fn place_image(
    layer: &PdfLayerReference,
    pixels: &image::RgbImage,
    region: &ImageRegion,
) -> ReportResult<()> {
    let (width_px, height_px) = pixels.dimensions();
    let native_width_mm = width_px as f32 / EMBED_DPI * 25.4;
    let native_height_mm = height_px as f32 / EMBED_DPI * 25.4;

    // printpdf bundles its own `image` release, so hand over raw RGB bytes
    let raw = PdfRgbImage::from_raw(width_px, height_px, pixels.as_raw().clone())
        .ok_or_else(|| ReportError::Pdf("image buffer has the wrong size".to_string()))?;
    let embedded = Image::from_dynamic_image(&DynamicImage::ImageRgb8(raw));

    embedded.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(region.x_mm)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - region.y_mm - region.height_mm)),
            scale_x: Some(region.width_mm / native_width_mm),
            scale_y: Some(region.height_mm / native_height_mm),
            dpi: Some(EMBED_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

fn pdf_err(e: printpdf::Error) -> ReportError {
    ReportError::Pdf(e.to_string())
}

/// Printable characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

// The built-in fonts are WinAnsi encoded; anything else becomes '?'.
fn win_ansi_safe(text: &str) -> String {
    text.chars()
        .map(|c| {
            let encodable = (' '..='~').contains(&c)
                || ('\u{A0}'..='\u{FF}').contains(&c)
                || WIN_ANSI_EXTRAS.contains(c);
            if encodable { c } else { '?' }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_punctuation_survives() {
        let text = "Umsatz – Köln: 5 € “net” ‘Q1’ … ™";
        assert_eq!(win_ansi_safe(text), text);
    }

    #[test]
    fn text_outside_win_ansi_is_replaced() {
        assert_eq!(win_ansi_safe("東京 ✓"), "?? ?");
        assert_eq!(win_ansi_safe("tab\there"), "tab?here");
    }
}
