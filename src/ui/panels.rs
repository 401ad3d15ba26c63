use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::report::chart::{ChartKind, ChartSpec};
use crate::state::{AppState, Tab};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – logo and chart controls
// ---------------------------------------------------------------------------

/// Render the left panel: logo upload and axis / chart-kind selection.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Company logo");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Upload…").clicked() {
            open_logo_dialog(state);
        }
        if state.logo.is_some() && ui.small_button("Remove").clicked() {
            state.clear_logo();
        }
    });

    if let Some(logo) = &state.logo {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::from_bytes(format!("bytes://{}", logo.name), logo.bytes.clone())
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0)
                    .corner_radius(4.0),
            );
            ui.small(logo.name.as_str());
        });
    } else {
        ui.label("Optional (PNG or JPEG).");
    }
    ui.add_space(8.0);

    ui.heading("Chart");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    let columns = session.dataset.column_names();
    let mut spec: ChartSpec = session.chart_spec.clone();

    ui.strong("X-axis");
    column_combo(ui, "x_axis", &columns, &mut spec.x_column);
    ui.strong("Y-axis");
    column_combo(ui, "y_axis", &columns, &mut spec.y_column);

    ui.add_space(4.0);
    ui.strong("Chart type");
    for kind in ChartKind::ALL {
        ui.radio_value(&mut spec.kind, kind, kind.name());
    }

    // Re-render only when the selection actually changed.
    state.set_chart_spec(spec);
}

fn column_combo(ui: &mut Ui, id: &str, columns: &[String], selected: &mut String) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                ui.selectable_value(selected, col.clone(), col.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open table…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Upload logo…").clicked() {
                open_logo_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} rows, {} columns",
                session.source_name,
                session.dataset.len(),
                session.dataset.columns().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – data preview and tabs
// ---------------------------------------------------------------------------

/// Render the table preview and the Charts / Summary / Report tabs.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to begin  (File → Open table…)");
        });
        return;
    };

    ui.collapsing(format!("Data ({})", session.source_name), |ui: &mut Ui| {
        table::data_table(ui, &session.dataset);
    });
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Charts, "Charts");
        ui.selectable_value(&mut state.tab, Tab::Summary, "Summary");
        ui.selectable_value(&mut state.tab, Tab::Report, "Generate Report");
    });
    ui.separator();

    match state.tab {
        Tab::Charts => plot::chart_preview(ui, state),
        Tab::Summary => summary_tab(ui, state),
        Tab::Report => report_tab(ui, state),
    }
}

fn summary_tab(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        return;
    };
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for line in session.summary.text.lines() {
                ui.label(line);
            }
        });
}

fn report_tab(ui: &mut Ui, state: &mut AppState) {
    ui.label("Click below to generate the report as a one-page PDF.");
    ui.add_space(4.0);

    if ui.button("Generate PDF Report").clicked() {
        match state.generate_report() {
            Ok(path) => {
                log::info!("Report ready at {}", path.display());
                state.status_message = None;
            }
            Err(e) => state.report_error(&e),
        }
    }

    let Some(report) = state.session.as_ref().and_then(|s| s.report.as_ref()) else {
        return;
    };

    ui.add_space(8.0);
    ui.label(format!("Report written to {}", report.path.display()));
    ui.small(format!("Session {}", report.session_id));
    if report.layout.dropped_lines > 0 {
        ui.label(
            RichText::new(format!(
                "{} summary line(s) did not fit on the page.",
                report.layout.dropped_lines
            ))
            .color(Color32::YELLOW),
        );
    }
    if ui.button("Download Report…").clicked() {
        save_report_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "tsv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    let Some(path) = file else {
        return;
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let result = crate::data::loader::load_file(&path)
        .and_then(|dataset| state.set_dataset(dataset, &name));
    if let Err(e) = result {
        state.report_error(&e.context(format!("Failed to load {name}")));
    }
}

pub fn open_logo_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload company logo")
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file();

    let Some(path) = file else {
        return;
    };
    match std::fs::read(&path) {
        Ok(bytes) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "logo".to_string());
            state.set_logo(&name, bytes);
        }
        Err(e) => {
            let e = anyhow::Error::new(e).context(format!("reading {}", path.display()));
            state.report_error(&e);
        }
    }
}

fn save_report_dialog(state: &mut AppState) {
    let destination = rfd::FileDialog::new()
        .set_title("Save report")
        .set_file_name(state.settings.download_file_name.as_str())
        .add_filter("PDF", &["pdf"])
        .save_file();

    if let Some(path) = destination {
        if let Err(e) = state.save_report_to(&path) {
            state.report_error(&e);
        }
    }
}
