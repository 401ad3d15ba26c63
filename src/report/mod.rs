//! Report pipeline: summarize, chart, assemble.
//!
//! ```text
//!   Dataset ──► summary::summarize ──► Summary ─────┐
//!      │                                             ├─► assemble_report ──► PDF in ReportSession dir
//!      └──► chart::render_chart(ChartSpec) ► ChartFigure ┘        ▲
//!                                                     optional logo bytes
//! ```
//!
//! Each step is a plain function of its inputs; callers hold the state.

pub mod chart;
pub mod layout;
pub mod pdf;
pub mod session;
pub mod summary;

use std::path::PathBuf;

use image::ImageFormat;
use uuid::Uuid;

use crate::data::model::Dataset;
use crate::error::{ReportError, ReportResult};
use crate::settings::ReportSettings;
use chart::ChartFigure;
use layout::{ReportLayout, layout_report};
use pdf::{PageImages, write_pdf};
use session::ReportSession;
use summary::Summary;

/// Inputs of one "Generate report" action.
pub struct ReportRequest<'a> {
    pub dataset: &'a Dataset,
    /// Raw PNG or JPEG bytes as uploaded.
    pub logo: Option<&'a [u8]>,
    pub summary: &'a Summary,
    pub chart: &'a ChartFigure,
}

/// A written report and where it lives.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub session_id: Uuid,
    pub layout: ReportLayout,
}

struct Logo {
    pixels: image::RgbImage,
    extension: &'static str,
}

fn decode_logo(bytes: &[u8]) -> ReportResult<Logo> {
    let format = image::guess_format(bytes).map_err(|_| ReportError::UnsupportedLogo)?;
    let extension = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        _ => return Err(ReportError::UnsupportedLogo),
    };
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let pixels = if decoded.color().has_alpha() {
        flatten_onto_white(&decoded.to_rgba8())
    } else {
        decoded.to_rgb8()
    };
    Ok(Logo { pixels, extension })
}

// The page is white, so transparent logo pixels must come out white too.
fn flatten_onto_white(rgba: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Compose logo, summary and chart into `business_report.pdf` inside the
/// session directory and return its path.
///
/// Summary and chart must both come from `request.dataset`.
pub fn assemble_report(
    request: &ReportRequest<'_>,
    session: &ReportSession,
    settings: &ReportSettings,
) -> ReportResult<ReportArtifact> {
    let dataset_id = request.dataset.id();
    if request.summary.dataset_id != dataset_id {
        return Err(ReportError::StaleArtifact("summary"));
    }
    if request.chart.dataset_id != dataset_id {
        return Err(ReportError::StaleArtifact("chart"));
    }

    let logo = match request.logo {
        Some(bytes) => {
            let logo = decode_logo(bytes)?;
            let path = session.logo_path(logo.extension);
            std::fs::write(&path, bytes).map_err(|e| ReportError::io(&path, e))?;
            Some(logo)
        }
        None => None,
    };

    request.chart.save_png(&session.chart_path())?;

    let body = if request.summary.text.trim().is_empty() {
        settings.summary_placeholder.as_str()
    } else {
        request.summary.text.as_str()
    };
    let layout = layout_report(
        &settings.title,
        body,
        logo.as_ref().map(|l| l.pixels.dimensions()),
        request.chart.image.dimensions(),
    );

    let path = session.report_path();
    let images = PageImages {
        logo: logo.as_ref().map(|l| &l.pixels),
        chart: &request.chart.image,
    };
    write_pdf(&layout, &images, &path)?;

    log::info!(
        "Report written to {} ({} body line(s), {} image(s))",
        path.display(),
        layout.body.len(),
        layout.images.len()
    );

    Ok(ReportArtifact {
        path,
        session_id: session.id(),
        layout,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::data::loader::load_bytes;
    use chart::{ChartKind, ChartSpec, render_chart};
    use layout::ImageSlot;
    use summary::summarize;

    fn sales() -> Dataset {
        load_bytes(b"Month,Revenue\nJan,100\nFeb,150\nMar,120\n", b',').unwrap()
    }

    fn png_logo() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(40, 20, image::Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn jpeg_logo() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(30, 30, image::Rgb([20, 60, 200]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn image_xobjects(path: &std::path::Path) -> (usize, usize) {
        let doc = lopdf::Document::load(path).unwrap();
        let images = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .filter(|stream| {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name_str())
                    .map(|name| name == "Image")
                    .unwrap_or(false)
            })
            .count();
        (doc.get_pages().len(), images)
    }

    #[test]
    fn empty_summary_without_logo_uses_placeholder() {
        let root = tempfile::tempdir().unwrap();
        let session = ReportSession::create(root.path()).unwrap();
        let ds = sales();
        let chart = render_chart(&ds, &ChartSpec::new("Month", "Revenue", ChartKind::Line)).unwrap();
        let summary = Summary {
            dataset_id: ds.id(),
            text: String::new(),
        };

        let request = ReportRequest {
            dataset: &ds,
            logo: None,
            summary: &summary,
            chart: &chart,
        };
        let artifact = assemble_report(&request, &session, &ReportSettings::default()).unwrap();

        assert_eq!(artifact.layout.body_text(), "No summary available.");
        assert_eq!(artifact.layout.title.text, "AI-Based Business Report");
        assert_eq!(artifact.path, session.report_path());
        assert!(session.chart_path().is_file());

        let (pages, images) = image_xobjects(&artifact.path);
        assert_eq!(pages, 1);
        assert_eq!(images, 1);
    }

    #[test]
    fn logo_adds_a_second_image() {
        let root = tempfile::tempdir().unwrap();
        let session = ReportSession::create(root.path()).unwrap();
        let ds = sales();
        let chart = render_chart(&ds, &ChartSpec::new("Month", "Revenue", ChartKind::Bar)).unwrap();
        let summary = summarize(&ds);
        let logo = png_logo();

        let request = ReportRequest {
            dataset: &ds,
            logo: Some(&logo),
            summary: &summary,
            chart: &chart,
        };
        let artifact = assemble_report(&request, &session, &ReportSettings::default()).unwrap();

        assert_eq!(artifact.layout.body_text(), summary.text);
        let region = artifact.layout.image(ImageSlot::Logo).unwrap();
        assert!((region.height_mm - 15.0).abs() < 1e-4);
        assert_eq!(std::fs::read(session.logo_path("png")).unwrap(), logo);

        let (pages, images) = image_xobjects(&artifact.path);
        assert_eq!(pages, 1);
        assert_eq!(images, 2);
    }

    #[test]
    fn jpeg_logo_is_kept_as_jpg() {
        let root = tempfile::tempdir().unwrap();
        let session = ReportSession::create(root.path()).unwrap();
        let ds = sales();
        let chart = render_chart(&ds, &ChartSpec::new("Month", "Revenue", ChartKind::Line)).unwrap();
        let summary = summarize(&ds);
        let logo = jpeg_logo();

        let request = ReportRequest {
            dataset: &ds,
            logo: Some(&logo),
            summary: &summary,
            chart: &chart,
        };
        let artifact = assemble_report(&request, &session, &ReportSettings::default()).unwrap();

        assert_eq!(std::fs::read(session.logo_path("jpg")).unwrap(), logo);
        assert!(!session.logo_path("png").exists());
        let region = artifact.layout.image(ImageSlot::Logo).unwrap();
        assert!((region.height_mm - 30.0).abs() < 1e-4);

        let (pages, images) = image_xobjects(&artifact.path);
        assert_eq!(pages, 1);
        assert_eq!(images, 2);
    }

    #[test]
    fn transparent_logo_pixels_become_white() {
        let mut img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, image::Rgba([200, 30, 30, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let logo = decode_logo(&bytes).unwrap();
        assert_eq!(logo.extension, "png");
        assert_eq!(*logo.pixels.get_pixel(3, 3), image::Rgb([255, 255, 255]));
        assert_eq!(*logo.pixels.get_pixel(0, 0), image::Rgb([200, 30, 30]));
        assert_eq!(*logo.pixels.get_pixel(1, 0), image::Rgb([127, 127, 127]));
    }

    #[test]
    fn artifacts_from_another_dataset_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let session = ReportSession::create(root.path()).unwrap();
        let old = sales();
        let new = sales();
        let chart = render_chart(&new, &ChartSpec::new("Month", "Revenue", ChartKind::Scatter)).unwrap();
        let stale_summary = summarize(&old);

        let request = ReportRequest {
            dataset: &new,
            logo: None,
            summary: &stale_summary,
            chart: &chart,
        };
        let err = assemble_report(&request, &session, &ReportSettings::default()).unwrap_err();
        assert!(matches!(err, ReportError::StaleArtifact("summary")));
        assert!(!session.report_path().exists());
    }

    #[test]
    fn logo_must_be_png_or_jpeg() {
        assert!(matches!(
            decode_logo(b"GIF89a not really"),
            Err(ReportError::UnsupportedLogo)
        ));
        assert!(matches!(decode_logo(b"hello"), Err(ReportError::UnsupportedLogo)));
        assert_eq!(decode_logo(&png_logo()).unwrap().extension, "png");
    }
}
