use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use plotters::prelude::*;
use plotters::style::FontStyle;

use crate::color::series_plotters;
use crate::data::model::{CellValue, Column, Dataset, DatasetId};
use crate::error::{ReportError, ReportResult};

/// Nominal figure size in inches (width, height).
pub const FIGURE_SIZE_IN: (f64, f64) = (8.0, 5.0);
/// Raster resolution of the figure.
pub const FIGURE_DPI: f64 = 100.0;

const FONT_FAMILY: &str = "sans-serif";

// ---------------------------------------------------------------------------
// ChartKind / ChartSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Scatter => "Scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReportError::UnsupportedChartKind(s.to_string()))
    }
}

/// The user's choice of axes and chart kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub x_column: String,
    pub y_column: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(x_column: impl Into<String>, y_column: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            x_column: x_column.into(),
            y_column: y_column.into(),
            kind,
        }
    }

    /// `"{kind} Chart: {y} vs {x}"`
    pub fn title(&self) -> String {
        format!("{} Chart: {} vs {}", self.kind, self.y_column, self.x_column)
    }
}

// ---------------------------------------------------------------------------
// Series extraction
// ---------------------------------------------------------------------------

/// Plot-ready points for one chart.
///
/// When `categories` is set the x coordinate of every point is an index
/// into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<(f64, f64)>,
    pub categories: Option<Vec<String>>,
}

impl ChartSeries {
    /// Axis ranges with some padding; bars always include zero.
    pub fn ranges(&self, kind: ChartKind) -> (Range<f64>, Range<f64>) {
        let x_range = match &self.categories {
            Some(labels) => -0.5..(labels.len().max(1) as f64 - 0.5),
            None => padded(self.points.iter().map(|p| p.0), 0.05),
        };
        let y_values = self.points.iter().map(|p| p.1);
        let y_range = if kind == ChartKind::Bar {
            padded(y_values.chain(std::iter::once(0.0)), 0.1)
        } else {
            padded(y_values, 0.1)
        };
        (x_range, y_range)
    }

    /// Tick label for a categorical x coordinate; empty between categories.
    pub fn category_label(&self, x: f64) -> String {
        let Some(labels) = &self.categories else {
            return format!("{x}");
        };
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn padded(values: impl Iterator<Item = f64>, fraction: f64) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * fraction)..(max + span * fraction)
}

fn require_column<'a>(dataset: &'a Dataset, name: &str) -> ReportResult<&'a Column> {
    dataset
        .column(name)
        .ok_or_else(|| ReportError::UnknownColumn(name.to_string()))
}

/// Pair up the chosen columns, skipping rows where either side is null.
///
/// * Bar: one slot per row, labelled with the x value.
/// * Line / Scatter: numeric x is used as-is; any other x is categorical,
///   categories in order of first appearance.
pub fn extract_series(dataset: &Dataset, spec: &ChartSpec) -> ReportResult<ChartSeries> {
    let x_col = require_column(dataset, &spec.x_column)?;
    let y_col = require_column(dataset, &spec.y_column)?;
    // an all-null column has no dtype to object to; it just plots nothing
    if !y_col.is_numeric() && y_col.values.iter().any(|v| !v.is_null()) {
        return Err(ReportError::NonNumericColumn(y_col.name.clone()));
    }

    let rows = x_col
        .values
        .iter()
        .zip(y_col.values.iter())
        .filter_map(|(x, y)| match (x, y.as_f64()) {
            (CellValue::Null, _) | (_, None) => None,
            (x, Some(y)) => Some((x, y)),
        });

    let series = if spec.kind == ChartKind::Bar {
        let (labels, points): (Vec<String>, Vec<(f64, f64)>) = rows
            .enumerate()
            .map(|(i, (x, y))| (x.to_string(), (i as f64, y)))
            .unzip();
        ChartSeries {
            points,
            categories: Some(labels),
        }
    } else if x_col.is_numeric() {
        ChartSeries {
            points: rows.filter_map(|(x, y)| Some((x.as_f64()?, y))).collect(),
            categories: None,
        }
    } else {
        let mut labels: Vec<String> = Vec::new();
        let mut points = Vec::new();
        for (x, y) in rows {
            let label = x.to_string();
            let idx = match labels.iter().position(|l| *l == label) {
                Some(idx) => idx,
                None => {
                    labels.push(label);
                    labels.len() - 1
                }
            };
            points.push((idx as f64, y));
        }
        ChartSeries {
            points,
            categories: Some(labels),
        }
    };

    Ok(series)
}

// ---------------------------------------------------------------------------
// ChartFigure – the off-screen rendering
// ---------------------------------------------------------------------------

/// A rendered chart held in memory until the report is assembled.
#[derive(Debug, Clone)]
pub struct ChartFigure {
    pub dataset_id: DatasetId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub image: image::RgbImage,
}

impl ChartFigure {
    /// Pixel dimensions derived from [`FIGURE_SIZE_IN`] and [`FIGURE_DPI`].
    pub fn pixel_size() -> (u32, u32) {
        (
            (FIGURE_SIZE_IN.0 * FIGURE_DPI) as u32,
            (FIGURE_SIZE_IN.1 * FIGURE_DPI) as u32,
        )
    }

    pub fn save_png(&self, path: &Path) -> ReportResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

static FONT_REGISTRATION: OnceLock<Result<(), String>> = OnceLock::new();

// Text is drawn with the font egui bundles, so no system fonts are needed.
fn ensure_font() -> ReportResult<()> {
    FONT_REGISTRATION
        .get_or_init(|| {
            plotters::style::register_font(
                FONT_FAMILY,
                FontStyle::Normal,
                epaint_default_fonts::UBUNTU_LIGHT,
            )
            .map_err(|_| "embedded chart font could not be loaded".to_string())
        })
        .clone()
        .map_err(ReportError::Chart)
}

/// Render the chart described by `spec` for `dataset`.
pub fn render_chart(dataset: &Dataset, spec: &ChartSpec) -> ReportResult<ChartFigure> {
    ensure_font()?;
    let series = extract_series(dataset, spec)?;
    let title = spec.title();
    let (width, height) = ChartFigure::pixel_size();

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    draw(&series, spec, &title, &mut buffer, (width, height))
        .map_err(|e| ReportError::Chart(e.to_string()))?;

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ReportError::Chart("pixel buffer has the wrong size".to_string()))?;

    log::info!("Rendered '{title}' with {} point(s)", series.points.len());

    Ok(ChartFigure {
        dataset_id: dataset.id(),
        title,
        x_label: spec.x_column.clone(),
        y_label: spec.y_column.clone(),
        image,
    })
}

fn draw(
    series: &ChartSeries,
    spec: &ChartSpec,
    title: &str,
    buffer: &mut [u8],
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = series.ranges(spec.kind);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    let category_fmt = |x: &f64| series.category_label(*x);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_column.as_str())
        .y_desc(spec.y_column.as_str())
        .label_style((FONT_FAMILY, 14));
    if let Some(labels) = &series.categories {
        mesh.x_labels(labels.len().clamp(1, 20))
            .x_label_formatter(&category_fmt)
            .disable_x_mesh();
    }
    mesh.draw()?;

    let color = series_plotters(spec.kind);
    match spec.kind {
        ChartKind::Line => {
            chart.draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(2),
            ))?;
            chart.draw_series(
                series
                    .points
                    .iter()
                    .map(|&p| Circle::new(p, 4, color.filled())),
            )?;
        }
        ChartKind::Bar => {
            chart.draw_series(series.points.iter().map(|&(x, y)| {
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, y)], color.filled())
            }))?;
        }
        ChartKind::Scatter => {
            chart.draw_series(
                series
                    .points
                    .iter()
                    .map(|&p| Circle::new(p, 5, color.filled())),
            )?;
        }
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn sales() -> Dataset {
        load_bytes(
            b"Month,Revenue,Units,Region\n\
              Jan,100,3,North\n\
              Feb,150,5,South\n\
              Mar,120,4,North\n",
            b',',
        )
        .unwrap()
    }

    #[test]
    fn title_names_kind_and_axes() {
        for (kind, expected) in [
            (ChartKind::Line, "Line Chart: Revenue vs Month"),
            (ChartKind::Bar, "Bar Chart: Revenue vs Month"),
            (ChartKind::Scatter, "Scatter Chart: Revenue vs Month"),
        ] {
            assert_eq!(ChartSpec::new("Month", "Revenue", kind).title(), expected);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert!(matches!(
            "Pie".parse::<ChartKind>(),
            Err(ReportError::UnsupportedChartKind(k)) if k == "Pie"
        ));
    }

    #[test]
    fn y_axis_must_be_numeric() {
        let spec = ChartSpec::new("Month", "Region", ChartKind::Line);
        assert!(matches!(
            extract_series(&sales(), &spec),
            Err(ReportError::NonNumericColumn(c)) if c == "Region"
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let spec = ChartSpec::new("Week", "Revenue", ChartKind::Scatter);
        assert!(matches!(
            extract_series(&sales(), &spec),
            Err(ReportError::UnknownColumn(c)) if c == "Week"
        ));
    }

    #[test]
    fn text_x_becomes_categories_in_first_seen_order() {
        let spec = ChartSpec::new("Region", "Revenue", ChartKind::Scatter);
        let series = extract_series(&sales(), &spec).unwrap();
        assert_eq!(
            series.categories,
            Some(vec!["North".to_string(), "South".to_string()])
        );
        assert_eq!(series.points, vec![(0.0, 100.0), (1.0, 150.0), (0.0, 120.0)]);
        assert_eq!(series.category_label(1.0), "South");
        assert_eq!(series.category_label(0.5), "");
    }

    #[test]
    fn bars_get_one_slot_per_row() {
        let spec = ChartSpec::new("Units", "Revenue", ChartKind::Bar);
        let series = extract_series(&sales(), &spec).unwrap();
        assert_eq!(
            series.categories,
            Some(vec!["3".to_string(), "5".to_string(), "4".to_string()])
        );
        let (_, y_range) = series.ranges(ChartKind::Bar);
        assert!(y_range.start <= 0.0);
    }

    #[test]
    fn numeric_x_is_plotted_as_is() {
        let spec = ChartSpec::new("Units", "Revenue", ChartKind::Line);
        let series = extract_series(&sales(), &spec).unwrap();
        assert!(series.categories.is_none());
        assert_eq!(series.points[1], (5.0, 150.0));
    }

    #[test]
    fn renders_an_eight_by_five_figure() {
        let ds = sales();
        let spec = ChartSpec::new("Month", "Revenue", ChartKind::Bar);
        let figure = render_chart(&ds, &spec).unwrap();

        assert_eq!(figure.image.dimensions(), (800, 500));
        assert_eq!(figure.title, "Bar Chart: Revenue vs Month");
        assert_eq!(figure.x_label, "Month");
        assert_eq!(figure.y_label, "Revenue");
        assert_eq!(figure.dataset_id, ds.id());

        let bar = series_plotters(ChartKind::Bar);
        let bar_pixels = figure
            .image
            .pixels()
            .filter(|p| p.0 == [bar.0, bar.1, bar.2])
            .count();
        assert!(bar_pixels > 100);
    }

    fn pixels_of(figure: &ChartFigure, kind: ChartKind) -> usize {
        let c = series_plotters(kind);
        figure
            .image
            .pixels()
            .filter(|p| p.0 == [c.0, c.1, c.2])
            .count()
    }

    #[test]
    fn every_kind_draws_in_its_own_colour() {
        let ds = sales();
        for kind in ChartKind::ALL {
            let figure = render_chart(&ds, &ChartSpec::new("Month", "Revenue", kind)).unwrap();
            assert!(
                pixels_of(&figure, kind) > 50,
                "{kind} chart has too few series pixels"
            );
            for other in ChartKind::ALL.into_iter().filter(|k| *k != kind) {
                assert_eq!(pixels_of(&figure, other), 0, "{kind} chart uses the {other} colour");
            }
        }
    }

    #[test]
    fn line_chart_connects_points_beyond_its_markers() {
        let ds = sales();
        let line = render_chart(&ds, &ChartSpec::new("Month", "Revenue", ChartKind::Line)).unwrap();
        let markers_only =
            render_chart(&ds, &ChartSpec::new("Month", "Revenue", ChartKind::Scatter)).unwrap();
        // Scatter circles are larger, so extra line pixels show the segments were drawn
        assert!(pixels_of(&line, ChartKind::Line) > pixels_of(&markers_only, ChartKind::Scatter));
    }

    #[test]
    fn empty_dataset_renders_empty_axes() {
        let ds = load_bytes(b"Month,Revenue\n", b',').unwrap();
        let spec = ChartSpec::new("Month", "Revenue", ChartKind::Line);
        let figure = render_chart(&ds, &spec).unwrap();
        assert_eq!(figure.image.dimensions(), ChartFigure::pixel_size());
    }
}
