use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::series_color32;
use crate::report::chart::{ChartKind, extract_series};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Interactive chart preview (Charts tab)
// ---------------------------------------------------------------------------

/// Render the interactive preview of the current chart selection.
///
/// Draws from the same series the PDF chart is rendered from.
pub fn chart_preview(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let spec = &session.chart_spec;

    ui.heading(spec.title());
    if let Some(figure) = &session.figure {
        let (w, h) = figure.image.dimensions();
        ui.small(format!(
            "Report chart: {w}×{h} px, x = {}, y = {}",
            figure.x_label, figure.y_label
        ));
    }

    if let Some(err) = &session.chart_error {
        ui.label(RichText::new(err).color(Color32::RED));
        return;
    }

    let series = match extract_series(&session.dataset, spec) {
        Ok(series) => series,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };

    let color = series_color32(spec.kind);
    let name = spec.y_column.clone();

    let mut plot = Plot::new("chart_preview")
        .legend(egui_plot::Legend::default())
        .x_axis_label(spec.x_column.as_str())
        .y_axis_label(spec.y_column.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if series.categories.is_some() {
        let labels = series.clone();
        plot = plot.x_axis_formatter(move |mark: GridMark, _range| labels.category_label(mark.value));
    }

    plot.show(ui, |plot_ui| {
        let points = || series.points.iter().map(|&(x, y)| [x, y]).collect::<PlotPoints>();

        match spec.kind {
            ChartKind::Line => {
                plot_ui.line(Line::new(points()).name(&name).color(color).width(1.5));
                plot_ui.points(Points::new(points()).color(color).radius(3.0));
            }
            ChartKind::Bar => {
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|&(x, y)| Bar::new(x, y).width(0.8))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&name).color(color));
            }
            ChartKind::Scatter => {
                plot_ui.points(Points::new(points()).name(&name).color(color).radius(4.0));
            }
        }
    });
}
