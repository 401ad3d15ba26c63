//! Fixed-coordinate page layout of the report.
//!
//! All positions are millimetres measured from the top-left corner of an A4
//! page. The PDF writer flips them into PDF user space.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// Content never extends below `PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM`.
pub const BOTTOM_MARGIN_MM: f32 = 20.0;

const POINT_MM: f32 = 25.4 / 72.0;
const CELL_PADDING_MM: f32 = 1.0;

const LOGO_X_MM: f32 = 10.0;
const LOGO_Y_MM: f32 = 8.0;
const LOGO_WIDTH_MM: f32 = 30.0;

const TITLE_SIZE_PT: f32 = 16.0;
const TITLE_CELL_WIDTH_MM: f32 = 200.0;
const TITLE_CELL_HEIGHT_MM: f32 = 10.0;
const GAP_AFTER_TITLE_MM: f32 = 20.0;

const BODY_SIZE_PT: f32 = 12.0;
const BODY_LINE_HEIGHT_MM: f32 = 10.0;
const GAP_AFTER_BODY_MM: f32 = 10.0;

const CHART_X_MM: f32 = 30.0;
const CHART_WIDTH_MM: f32 = 150.0;
/// Body text stops early rather than squeeze the chart below this height.
const MIN_CHART_HEIGHT_MM: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One line of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x_mm: f32,
    /// Baseline, from the top of the page.
    pub baseline_mm: f32,
    pub size_pt: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Logo,
    Chart,
}

/// Rectangle reserved for an image; `y_mm` is its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRegion {
    pub slot: ImageSlot,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Everything that goes on the single report page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: TextLine,
    pub body: Vec<TextLine>,
    pub images: Vec<ImageRegion>,
    /// Body lines that did not fit on the page.
    pub dropped_lines: usize,
}

impl ReportLayout {
    /// The body as it reads on the page, one wrapped line per `\n`.
    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&ImageRegion> {
        self.images.iter().find(|r| r.slot == slot)
    }

    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        std::iter::once(&self.title).chain(self.body.iter())
    }
}

/// Lay out the page.
///
/// `logo_px` and `chart_px` are pixel sizes; only their aspect ratio
/// matters. `body` is used verbatim, so the caller substitutes any
/// placeholder for an empty summary.
pub fn layout_report(
    title: &str,
    body: &str,
    logo_px: Option<(u32, u32)>,
    chart_px: (u32, u32),
) -> ReportLayout {
    let mut images = Vec::with_capacity(2);

    if let Some(size) = logo_px {
        images.push(ImageRegion {
            slot: ImageSlot::Logo,
            x_mm: LOGO_X_MM,
            y_mm: LOGO_Y_MM,
            width_mm: LOGO_WIDTH_MM,
            height_mm: LOGO_WIDTH_MM * aspect(size),
        });
    }

    let mut y = MARGIN_MM;
    let title_width = text_width_mm(title, TITLE_SIZE_PT, FontWeight::Bold);
    let title = TextLine {
        text: title.to_string(),
        x_mm: MARGIN_MM + ((TITLE_CELL_WIDTH_MM - title_width) / 2.0).max(0.0),
        baseline_mm: baseline(y, TITLE_CELL_HEIGHT_MM, TITLE_SIZE_PT),
        size_pt: TITLE_SIZE_PT,
        weight: FontWeight::Bold,
    };
    y += TITLE_CELL_HEIGHT_MM + GAP_AFTER_TITLE_MM;

    let usable_bottom = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
    let body_bottom = usable_bottom - GAP_AFTER_BODY_MM - MIN_CHART_HEIGHT_MM;
    let body_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - 2.0 * CELL_PADDING_MM;

    let mut lines = Vec::new();
    let mut dropped_lines = 0;
    for text in body
        .split('\n')
        .flat_map(|p| wrap(p, body_width, BODY_SIZE_PT, FontWeight::Regular))
    {
        if y + BODY_LINE_HEIGHT_MM > body_bottom {
            dropped_lines += 1;
            continue;
        }
        lines.push(TextLine {
            text,
            x_mm: MARGIN_MM + CELL_PADDING_MM,
            baseline_mm: baseline(y, BODY_LINE_HEIGHT_MM, BODY_SIZE_PT),
            size_pt: BODY_SIZE_PT,
            weight: FontWeight::Regular,
        });
        y += BODY_LINE_HEIGHT_MM;
    }
    if dropped_lines > 0 {
        log::warn!("{dropped_lines} summary line(s) do not fit on the page and were left out");
    }
    y += GAP_AFTER_BODY_MM;

    // shrink proportionally if the chart would run past the bottom margin
    let mut chart_width = CHART_WIDTH_MM;
    let mut chart_height = CHART_WIDTH_MM * aspect(chart_px);
    let room = usable_bottom - y;
    if chart_height > room {
        chart_width *= room / chart_height;
        chart_height = room;
    }
    images.push(ImageRegion {
        slot: ImageSlot::Chart,
        x_mm: CHART_X_MM,
        y_mm: y,
        width_mm: chart_width,
        height_mm: chart_height,
    });

    ReportLayout {
        title,
        body: lines,
        images,
        dropped_lines,
    }
}

fn aspect((w, h): (u32, u32)) -> f32 {
    if w == 0 {
        return 1.0;
    }
    h as f32 / w as f32
}

// Baseline of text vertically centred in a cell starting at `top`.
fn baseline(top: f32, cell_height: f32, size_pt: f32) -> f32 {
    top + cell_height / 2.0 + 0.3 * size_pt * POINT_MM
}

// ---------------------------------------------------------------------------
// Text measurement (Helvetica AFM widths, 1/1000 em)
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32, weight: FontWeight) -> f32 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA_WIDTHS,
        FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                table[(code - 32) as usize] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 / 1000.0 * size_pt * POINT_MM
}

/// Greedy word wrap; words wider than a line are broken by character.
/// An empty paragraph yields one empty line.
pub fn wrap(paragraph: &str, max_width_mm: f32, size_pt: f32, weight: FontWeight) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, size_pt, weight) <= max_width_mm;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_and_chart_use_fixed_positions() {
        let layout = layout_report("Report", "one line", Some((200, 100)), (800, 500));

        let logo = layout.image(ImageSlot::Logo).unwrap();
        assert_eq!((logo.x_mm, logo.y_mm, logo.width_mm), (10.0, 8.0, 30.0));
        assert!((logo.height_mm - 15.0).abs() < 1e-4);

        let chart = layout.image(ImageSlot::Chart).unwrap();
        assert_eq!((chart.x_mm, chart.width_mm), (30.0, 150.0));
        assert!((chart.height_mm - 93.75).abs() < 1e-4);
        // margin, title cell, gap, one body line, gap
        assert!((chart.y_mm - 60.0).abs() < 1e-4);
    }

    #[test]
    fn no_logo_means_one_image() {
        let layout = layout_report("Report", "", None, (800, 500));
        assert_eq!(layout.images.len(), 1);
        assert!(layout.image(ImageSlot::Logo).is_none());
    }

    #[test]
    fn title_is_centred_in_its_cell() {
        let layout = layout_report("AI-Based Business Report", "x", None, (800, 500));
        let width = text_width_mm(&layout.title.text, 16.0, FontWeight::Bold);
        let centre = layout.title.x_mm + width / 2.0;
        assert!((centre - 110.0).abs() < 1e-3);
        assert_eq!(layout.title.weight, FontWeight::Bold);
    }

    #[test]
    fn long_paragraphs_wrap_within_the_body_width() {
        let paragraph = "revenue ".repeat(60);
        let lines = wrap(&paragraph, 188.0, 12.0, FontWeight::Regular);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|l| text_width_mm(l, 12.0, FontWeight::Regular) <= 188.0));
        assert_eq!(lines.join(" ").split_whitespace().count(), 60);
    }

    #[test]
    fn oversized_word_is_broken() {
        let word = "W".repeat(200);
        let lines = wrap(&word, 50.0, 12.0, FontWeight::Regular);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn overflowing_summary_keeps_a_single_page() {
        let body = vec!["- a bullet"; 40].join("\n");
        let layout = layout_report("Report", &body, None, (800, 500));
        let chart = layout.image(ImageSlot::Chart).unwrap();

        assert!(layout.dropped_lines > 0);
        assert_eq!(layout.body.len() + layout.dropped_lines, 40);
        assert!(chart.y_mm + chart.height_mm <= PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM + 1e-3);
        assert!(chart.height_mm >= MIN_CHART_HEIGHT_MM - 1e-3);
    }
}
